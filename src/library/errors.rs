//! Document library error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Document resource returned status {status_code} from {location}")]
    Status {
        status_code: u16,
        location: String,
    },

    #[error("Failed to parse document collection: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("Document collection must be a JSON array or object, found {0}")]
    UnexpectedShape(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
