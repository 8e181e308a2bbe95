//! Auth provider error types

use crate::storage::StorageError;
use thiserror::Error;

/// Errors raised by credential stores
#[derive(Debug, Error)]
pub enum AuthError {
    /// Unknown user, wrong password and disabled user all map here
    #[error("Invalid username or password")]
    InvalidAuth,
    #[error("User not found: {0}")]
    InvalidUser(String),
    #[error("Username already exists: {0}")]
    UsernameTaken(String),
    #[error("Username must not be empty")]
    EmptyUsername,
    #[error("Password hashing failed: {0}")]
    Hash(String),
    #[error("Worker task failed: {0}")]
    Worker(String),
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

pub type AuthResult<T> = Result<T, AuthError>;

impl From<tokio::task::JoinError> for AuthError {
    fn from(err: tokio::task::JoinError) -> Self {
        AuthError::Worker(err.to_string())
    }
}
