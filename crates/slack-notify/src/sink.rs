use reqwest::header::CONTENT_TYPE;
use serde::{Deserialize, Serialize};

use crate::config::{Origin, Settings, WEBHOOK_URL_VAR};
use crate::error::SendError;

/// A colored sub-block rendered under the message text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    pub text: String,
    /// Hex code or Slack keyword (`good`, `warning`, `danger`). Not validated.
    pub color: String,
}

impl Attachment {
    pub fn new(text: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            color: color.into(),
        }
    }
}

/// The JSON body posted to the webhook.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub text: String,
    pub attachments: Vec<Attachment>,
}

impl Message {
    pub fn tagged(origin: &Origin, text: &str, attachments: &[Attachment]) -> Self {
        Self {
            text: origin.tag(text),
            attachments: attachments.to_vec(),
        }
    }
}

/// Posts origin-tagged messages to one incoming webhook.
///
/// Holds no per-call state; share it by reference or `Arc` across tasks.
#[derive(Debug, Clone)]
pub struct SlackNotifier {
    destination: String,
    origin: Origin,
    client: reqwest::Client,
}

impl SlackNotifier {
    pub fn new(destination: impl Into<String>, origin: Origin) -> Self {
        Self::with_client(destination, origin, reqwest::Client::new())
    }

    pub fn with_client(destination: impl Into<String>, origin: Origin, client: reqwest::Client) -> Self {
        Self {
            destination: destination.into(),
            origin,
            client,
        }
    }

    pub fn destination(&self) -> &str {
        &self.destination
    }

    pub fn origin(&self) -> &Origin {
        &self.origin
    }

    pub fn payload(&self, text: &str, attachments: &[Attachment]) -> Message {
        Message::tagged(&self.origin, text, attachments)
    }

    /// Post one message. Success means the request was transmitted; the
    /// response status is only logged.
    pub async fn send(&self, text: &str, attachments: &[Attachment]) -> Result<(), SendError> {
        let body = serde_json::to_vec(&self.payload(text, attachments)).map_err(|e| {
            tracing::error!(error = %e, "Error encoding Slack payload");
            SendError::Encode(e)
        })?;

        let request = self
            .client
            .post(&self.destination)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .build()
            .map_err(|e| {
                tracing::error!(error = %e, "Error creating Slack request");
                SendError::Request(e)
            })?;

        let response = self.client.execute(request).await.map_err(|e| {
            tracing::error!(error = %e, "Error sending Slack payload");
            SendError::Transport(e)
        })?;

        let status = response.status();
        if status.is_success() {
            tracing::debug!(status = %status, "Slack payload delivered");
        } else {
            tracing::warn!(status = %status, "Slack webhook answered with a non-success status");
        }
        Ok(())
    }
}

/// Either a configured notifier or nothing to send to.
#[derive(Debug, Clone)]
pub enum Notifier {
    Disabled,
    Active(SlackNotifier),
}

impl Notifier {
    pub fn from_settings(settings: Settings) -> Self {
        match settings.webhook_url {
            Some(url) => Notifier::Active(SlackNotifier::new(url, settings.origin)),
            None => {
                tracing::info!("{WEBHOOK_URL_VAR} is not set, Slack notifications are disabled");
                Notifier::Disabled
            }
        }
    }

    pub fn active(&self) -> Option<&SlackNotifier> {
        match self {
            Notifier::Active(n) => Some(n),
            Notifier::Disabled => None,
        }
    }

    pub fn is_enabled(&self) -> bool {
        matches!(self, Notifier::Active(_))
    }

    /// No-op returning `Ok` when disabled.
    pub async fn send(&self, text: &str, attachments: &[Attachment]) -> Result<(), SendError> {
        match self {
            Notifier::Active(n) => n.send(text, attachments).await,
            Notifier::Disabled => {
                tracing::debug!("Slack notifications disabled, dropping message");
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn origin() -> Origin {
        Origin::new("svc", "host")
    }

    #[test]
    fn payload_is_prefixed_with_origin() {
        let n = SlackNotifier::new("https://hooks.slack.com/services/x", origin());
        let msg = n.payload("disk full", &[]);
        assert_eq!(msg.text, "svc_host_disk full");
        assert!(msg.attachments.is_empty());
    }

    #[test]
    fn empty_attachments_serialize_as_array() {
        let msg = Message::tagged(&origin(), "hello", &[]);
        assert_eq!(
            serde_json::to_string(&msg).unwrap(),
            r##"{"text":"svc_host_hello","attachments":[]}"##
        );
    }

    #[test]
    fn attachments_keep_order_and_fields() {
        let attachments = vec![
            Attachment::new("first", "#ff0000"),
            Attachment::new("second", "good"),
            Attachment::new("", "not-a-color"),
        ];
        let msg = Message::tagged(&origin(), "deploy", &attachments);
        let json = serde_json::to_string(&msg).unwrap();
        assert_eq!(
            json,
            r##"{"text":"svc_host_deploy","attachments":[{"text":"first","color":"#ff0000"},{"text":"second","color":"good"},{"text":"","color":"not-a-color"}]}"##
        );

        let decoded: Message = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded.attachments, attachments);
    }

    #[test]
    fn missing_url_yields_disabled() {
        let notifier = Notifier::from_settings(Settings {
            webhook_url: None,
            origin: origin(),
        });
        assert!(!notifier.is_enabled());
        assert!(notifier.active().is_none());
    }

    #[test]
    fn configured_url_yields_active() {
        let notifier = Notifier::from_settings(Settings {
            webhook_url: Some("https://hooks.slack.com/services/x".into()),
            origin: origin(),
        });
        let active = notifier.active().expect("active notifier");
        assert_eq!(active.destination(), "https://hooks.slack.com/services/x");
        assert_eq!(active.origin(), &origin());
    }

    #[tokio::test]
    async fn disabled_send_is_noop() {
        assert!(Notifier::Disabled.send("hello", &[]).await.is_ok());
    }
}
