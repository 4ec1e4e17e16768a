use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::Deserialize;

const DEFAULT_CONFIG_NAME: &str = "slack-notify.toml";

pub const WEBHOOK_URL_VAR: &str = "SLACK_WEBHOOK_URL";
pub const SERVICE_NAME_VAR: &str = "SERVICE_NAME";
pub const DEFAULT_SERVICE_NAME: &str = "Melina";
pub const UNKNOWN_HOSTNAME: &str = "unkw";

/// Optional on-disk configuration. Environment variables win over it.
#[derive(Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub webhook_url: Option<String>,
    pub service_name: Option<String>,
}

impl FileConfig {
    /// Load from an explicit path, or search upward from current dir and then
    /// the user config dir. Nothing found means an empty config.
    pub fn load(path_override: Option<PathBuf>) -> Result<Self> {
        let path = match path_override.or_else(find_config) {
            Some(p) => p,
            None => return Ok(Self::default()),
        };

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Reading config file {}", path.display()))?;
        let cfg: FileConfig = toml::from_str(&contents)
            .with_context(|| format!("Parsing TOML config {}", path.display()))?;
        tracing::debug!(path = %path.display(), "loaded config file");
        Ok(cfg)
    }
}

fn find_config() -> Option<PathBuf> {
    find_upwards(DEFAULT_CONFIG_NAME).or_else(|| {
        let candidate = dirs::config_dir()?.join("slack-notify").join("config.toml");
        candidate.exists().then_some(candidate)
    })
}

fn find_upwards(file_name: &str) -> Option<PathBuf> {
    let mut dir = std::env::current_dir().ok()?;
    loop {
        let candidate = dir.join(file_name);
        if candidate.exists() {
            return Some(candidate);
        }
        if !dir.pop() {
            break;
        }
    }
    None
}

/// Identifies which deployment and machine emitted a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Origin {
    service_name: String,
    hostname: String,
}

impl Origin {
    pub fn new(service_name: impl Into<String>, hostname: impl Into<String>) -> Self {
        Self {
            service_name: service_name.into(),
            hostname: hostname.into(),
        }
    }

    pub fn service_name(&self) -> &str {
        &self.service_name
    }

    pub fn hostname(&self) -> &str {
        &self.hostname
    }

    /// Prefix `text` with `<service>_<host>_`.
    pub fn tag(&self, text: &str) -> String {
        format!("{}_{}_{}", self.service_name, self.hostname, text)
    }

    fn resolve<H>(service_name: Option<String>, lookup_host: H) -> Self
    where
        H: FnOnce() -> io::Result<OsString>,
    {
        let service_name = match service_name {
            Some(name) => name,
            None => {
                tracing::info!("{SERVICE_NAME_VAR} is not set, using {DEFAULT_SERVICE_NAME} as default");
                DEFAULT_SERVICE_NAME.to_string()
            }
        };

        let hostname = match lookup_host() {
            Ok(name) => name.to_string_lossy().into_owned(),
            Err(e) => {
                tracing::warn!(error = %e, "Error retrieving hostname, using {UNKNOWN_HOSTNAME}");
                UNKNOWN_HOSTNAME.to_string()
            }
        };

        Self::new(service_name, hostname)
    }
}

/// Startup context: resolved once, then handed to [`crate::Notifier::from_settings`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub webhook_url: Option<String>,
    pub origin: Origin,
}

impl Settings {
    /// Read the config file (if any), then the process environment and OS hostname.
    pub fn load(path_override: Option<PathBuf>) -> Result<Self> {
        let file = FileConfig::load(path_override)?;
        Ok(Self::resolve(file))
    }

    pub fn resolve(file: FileConfig) -> Self {
        Self::resolve_with(file, |key| std::env::var(key).ok(), hostname::get)
    }

    /// Same as [`Settings::resolve`] with the environment and hostname lookups supplied.
    pub fn resolve_with<E, H>(file: FileConfig, env: E, lookup_host: H) -> Self
    where
        E: Fn(&str) -> Option<String>,
        H: FnOnce() -> io::Result<OsString>,
    {
        let webhook_url = non_blank(env(WEBHOOK_URL_VAR)).or_else(|| non_blank(file.webhook_url));
        let service_name =
            non_empty(env(SERVICE_NAME_VAR)).or_else(|| non_empty(file.service_name));

        Self {
            webhook_url,
            origin: Origin::resolve(service_name, lookup_host),
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
