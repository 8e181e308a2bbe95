//! Request payloads and schema validation
//!
//! Fields are required and must be non-empty. Scalar values are coerced to
//! strings (`{"username": 1234}` is the user `"1234"`, `true` is `"True"`);
//! unknown fields are ignored. The body is parsed as JSON whatever its
//! `Content-Type` says.

use crate::error::BridgeError;
use axum::{
    async_trait,
    body::Bytes,
    extract::{FromRequest, Request},
};
use serde::de::{self, DeserializeOwned};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Semantic checks run after deserialization
pub trait Validate {
    fn validate(&self) -> Result<(), String>;
}

/// Credential verification request
#[derive(Clone, Deserialize)]
pub struct AuthRequest {
    #[serde(deserialize_with = "coerce_string")]
    pub username: String,
    #[serde(deserialize_with = "coerce_string")]
    pub password: String,
    /// Add-on asking on behalf of the user
    #[serde(deserialize_with = "coerce_string")]
    pub addon: String,
}

impl Validate for AuthRequest {
    fn validate(&self) -> Result<(), String> {
        require_non_empty(&[
            ("username", &self.username),
            ("password", &self.password),
            ("addon", &self.addon),
        ])
    }
}

impl std::fmt::Debug for AuthRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthRequest")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("addon", &self.addon)
            .finish()
    }
}

/// Password reset request; `password` is the new password
#[derive(Clone, Deserialize)]
pub struct PasswordResetRequest {
    #[serde(deserialize_with = "coerce_string")]
    pub username: String,
    #[serde(deserialize_with = "coerce_string")]
    pub password: String,
}

impl Validate for PasswordResetRequest {
    fn validate(&self) -> Result<(), String> {
        require_non_empty(&[("username", &self.username), ("password", &self.password)])
    }
}

impl std::fmt::Debug for PasswordResetRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PasswordResetRequest")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

fn require_non_empty(fields: &[(&str, &String)]) -> Result<(), String> {
    match fields.iter().find(|(_, value)| value.is_empty()) {
        Some((name, _)) => Err(format!("field `{}` must not be empty", name)),
        None => Ok(()),
    }
}

fn coerce_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(true) => Ok("True".to_string()),
        Value::Bool(false) => Ok("False".to_string()),
        Value::Null => Err(de::Error::custom("expected a string, got null")),
        Value::Array(_) => Err(de::Error::custom("expected a string, got an array")),
        Value::Object(_) => Err(de::Error::custom("expected a string, got an object")),
    }
}

/// JSON body extractor that rejects schema violations with 400
pub struct Payload<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for Payload<T>
where
    T: DeserializeOwned + Validate + Send,
    S: Send + Sync,
{
    type Rejection = BridgeError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let body = Bytes::from_request(req, state)
            .await
            .map_err(|rejection| BridgeError::SchemaInvalid(rejection.body_text()))?;
        let value: T = serde_json::from_slice(&body)
            .map_err(|e| BridgeError::SchemaInvalid(format!("Invalid JSON body: {}", e)))?;
        value.validate().map_err(BridgeError::SchemaInvalid)?;
        Ok(Self(value))
    }
}
