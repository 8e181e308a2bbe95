//! HTTP request handlers
//!
//! Both endpoints answer 200 with an empty body on success.

use axum::{extract::State, http::StatusCode, middleware, routing::post, Router};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::bridge::LocalAuthBridge;
use crate::error::BridgeError;
use crate::origin::require_trusted_origin;
use crate::payload::{AuthRequest, PasswordResetRequest, Payload};

/// Credential verification endpoint
pub const AUTH_PATH: &str = "/api/hassio_auth";

/// Password reset endpoint
pub const PASSWORD_RESET_PATH: &str = "/api/hassio_auth/password_reset";

/// Create the bridge router.
///
/// Must be served with connect info (`into_make_service_with_connect_info`);
/// the origin check needs the peer address.
pub fn create_router(bridge: Arc<LocalAuthBridge>) -> Router {
    Router::new()
        .route(AUTH_PATH, post(auth_handler))
        .route(PASSWORD_RESET_PATH, post(password_reset_handler))
        .route_layer(middleware::from_fn_with_state(
            bridge.clone(),
            require_trusted_origin,
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(bridge)
}

/// Verify credentials for an add-on
async fn auth_handler(
    State(bridge): State<Arc<LocalAuthBridge>>,
    Payload(request): Payload<AuthRequest>,
) -> Result<StatusCode, BridgeError> {
    bridge.verify_credentials(&request).await?;
    Ok(StatusCode::OK)
}

/// Reset a user's password
async fn password_reset_handler(
    State(bridge): State<Arc<LocalAuthBridge>>,
    Payload(request): Payload<PasswordResetRequest>,
) -> Result<StatusCode, BridgeError> {
    bridge.reset_password(request).await?;
    Ok(StatusCode::OK)
}
