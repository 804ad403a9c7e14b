//! Error types for the tour request Lambda functions.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while handling a tour request.
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error
    #[error("{0}")]
    Config(String),

    /// Validation error
    #[error("{0}")]
    Validation(String),

    /// One or more required fields were absent or blank
    #[error("Missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<String>),

    /// Downstream service answered with a non-success status
    #[error("Upstream {status}: {body}")]
    Upstream { status: u16, body: String },

    /// Transport-level HTTP failure
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// AWS SDK error
    #[error("AWS error: {0}")]
    Aws(String),
}

impl Error {
    /// Get HTTP status code for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            Error::Validation(_) | Error::MissingFields(_) => 400,
            Error::Upstream { .. } => 502,
            _ => 500,
        }
    }
}
