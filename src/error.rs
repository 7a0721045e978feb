//! Error types for the snapshot exporter

use thiserror::Error;

/// Result type alias for exporter operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while snapshotting a page
#[derive(Error, Debug)]
pub enum Error {
    /// The root element to snapshot was not found
    #[error("Root element not found: {0}")]
    MissingRoot(String),

    /// Failed to fetch a resource
    #[error("Network error: {0}")]
    NetworkError(String),

    /// Invalid selector or URL
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Invalid configuration or download options
    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    /// The download sink could not store the document
    #[error("Save failed: {0}")]
    SaveError(String),

    /// Underlying I/O failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Error::ParseError(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::ConfigError(err.to_string())
    }
}
