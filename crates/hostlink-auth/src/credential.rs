//! Stored user credentials
//!
//! A credential pairs a normalized username with an argon2id password hash.

use serde::{Deserialize, Serialize};

/// A user known to the local provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    /// Normalized username (see [`normalize_username`])
    pub username: String,
    /// PHC-formatted argon2id hash
    pub password_hash: String,
    /// Disabled users never pass login validation
    #[serde(default)]
    pub disabled: bool,
}

impl Credential {
    /// Create an enabled credential; the username is normalized
    pub fn new(username: &str, password_hash: String) -> Self {
        Self {
            username: normalize_username(username),
            password_hash,
            disabled: false,
        }
    }
}

/// Usernames are matched case-insensitively and without surrounding whitespace
pub fn normalize_username(username: &str) -> String {
    username.trim().to_lowercase()
}

/// Summary information about a user, without the hash
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialInfo {
    pub username: String,
    pub disabled: bool,
}

impl From<&Credential> for CredentialInfo {
    fn from(credential: &Credential) -> Self {
        Self {
            username: credential.username.clone(),
            disabled: credential.disabled,
        }
    }
}
