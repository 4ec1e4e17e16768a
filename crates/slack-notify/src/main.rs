use anyhow::Context;
use clap::Parser;
use tokio::runtime::Runtime;

use slack_notify::cli::{Cli, Commands};
use slack_notify::config::Settings;
use slack_notify::logging;
use slack_notify::sink::{Message, Notifier};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let rt = Runtime::new()?;
    rt.block_on(async {
        match cli.command {
            Commands::Send {
                text,
                attachments,
                dry_run,
            } => {
                let settings = Settings::load(cli.config.clone())?;

                if dry_run {
                    let message = Message::tagged(&settings.origin, &text, &attachments);
                    println!("{}", serde_json::to_string(&message)?);
                    return Ok(());
                }

                match Notifier::from_settings(settings) {
                    Notifier::Active(slack) => {
                        slack
                            .send(&text, &attachments)
                            .await
                            .context("Posting message to Slack webhook")?;
                    }
                    Notifier::Disabled => {
                        tracing::info!("message not sent");
                    }
                }
            }
            Commands::Version { json } => {
                if json {
                    let info = serde_json::json!({
                        "version": env!("CARGO_PKG_VERSION"),
                        "commit": option_env!("GIT_SHA").unwrap_or("unknown"),
                        "build_date": option_env!("BUILD_DATE").unwrap_or("unknown"),
                    });
                    println!("{}", serde_json::to_string_pretty(&info)?);
                } else {
                    println!(
                        "slack-notify {} (commit: {}, built: {})",
                        env!("CARGO_PKG_VERSION"),
                        option_env!("GIT_SHA").unwrap_or("unknown"),
                        option_env!("BUILD_DATE").unwrap_or("unknown"),
                    );
                }
            }
        }
        Ok(())
    })
}
