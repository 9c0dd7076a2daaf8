use thiserror::Error;

/// Failure of a request to the remote movie database.
///
/// Cancellation is deliberately absent: a superseded request simply never
/// reports back.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("parse error: {0}")]
    Parse(String),
}
