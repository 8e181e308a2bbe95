//! Surveillance client error types

use thiserror::Error;

/// Errors reported by a surveillance station client
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Request failed: {0}")]
    Request(String),
}

pub type ClientResult<T> = Result<T, ClientError>;
