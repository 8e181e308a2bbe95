//! Bridge error kinds and their HTTP mapping

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use hostlink_auth::AuthError;
use serde_json::json;
use std::net::IpAddr;
use thiserror::Error;
use tracing::warn;

/// Why a bridge request failed
#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("Request from untrusted address {0}")]
    OriginRejected(IpAddr),
    #[error("Local auth provider is not configured")]
    ProviderUnavailable,
    #[error("Credentials rejected: {0}")]
    CredentialRejected(#[from] AuthError),
    #[error("Message format incorrect: {0}")]
    SchemaInvalid(String),
}

pub type BridgeResult<T> = Result<T, BridgeError>;

/// HTTP status for an error kind
pub fn status_for(err: &BridgeError) -> StatusCode {
    match err {
        BridgeError::OriginRejected(_) | BridgeError::CredentialRejected(_) => {
            StatusCode::FORBIDDEN
        }
        BridgeError::ProviderUnavailable => StatusCode::NOT_FOUND,
        BridgeError::SchemaInvalid(_) => StatusCode::BAD_REQUEST,
    }
}

impl IntoResponse for BridgeError {
    fn into_response(self) -> Response {
        let status = status_for(&self);
        match self {
            BridgeError::SchemaInvalid(_) => {
                (status, Json(json!({ "message": self.to_string() }))).into_response()
            }
            BridgeError::CredentialRejected(ref e) => {
                // Detail stays in the log; the caller only sees 403
                warn!("Auth request rejected: {}", e);
                status.into_response()
            }
            _ => status.into_response(),
        }
    }
}
