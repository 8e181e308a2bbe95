//! Error types for hostlink

use thiserror::Error;

/// Main error type for hostlink operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid supervisor endpoint: {0:?}")]
    InvalidEndpoint(String),
}

/// Result type alias using hostlink's Error
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Error::Config(message.into())
    }
}
