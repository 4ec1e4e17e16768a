//! Post origin-tagged messages to a Slack incoming webhook.
//!
//! ```no_run
//! # async fn run() -> anyhow::Result<()> {
//! use slack_notify::{Attachment, Notifier, Settings};
//!
//! let notifier = Notifier::from_settings(Settings::load(None)?);
//! if let Some(slack) = notifier.active() {
//!     slack
//!         .send("backup finished", &[Attachment::new("42 GiB", "good")])
//!         .await?;
//! }
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod sink;

pub use config::{Origin, Settings};
pub use error::SendError;
pub use sink::{Attachment, Message, Notifier, SlackNotifier};
