use thiserror::Error;

/// Failure outcome of a single webhook post.
#[derive(Error, Debug)]
pub enum SendError {
    #[error("failed to encode Slack payload: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("failed to build Slack request: {0}")]
    Request(#[source] reqwest::Error),
    #[error("failed to send Slack payload: {0}")]
    Transport(#[source] reqwest::Error),
}
