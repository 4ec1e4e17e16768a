use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::sink::Attachment;

/// slack-notify – post origin-tagged messages to a Slack webhook
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Activate verbose output (-v, -vv, etc.)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Sets a custom config file
    #[arg(short, long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Send a message to the configured webhook
    Send {
        /// Message text (prefixed with service and hostname)
        text: String,

        /// Colored attachment, repeatable (e.g. -a "#ff0000=disk full")
        #[arg(short, long = "attach", value_name = "COLOR=TEXT", value_parser = parse_attachment)]
        attachments: Vec<Attachment>,

        /// Print the JSON payload instead of sending it
        #[arg(long)]
        dry_run: bool,
    },
    /// Print build information
    Version {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Split on the first `=`, so the text may itself contain `=`.
pub fn parse_attachment(raw: &str) -> Result<Attachment, String> {
    let (color, text) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected COLOR=TEXT, got '{raw}'"))?;
    Ok(Attachment::new(text, color))
}
