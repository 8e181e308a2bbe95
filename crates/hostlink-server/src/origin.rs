//! Trusted origin middleware
//!
//! Runs before payload extraction, so untrusted callers get 403 whatever
//! they send and never reach an auth provider.

use axum::{
    extract::{ConnectInfo, Request, State},
    middleware::Next,
    response::Response,
};
use std::net::SocketAddr;
use std::sync::Arc;

use crate::bridge::LocalAuthBridge;
use crate::error::BridgeError;

/// Reject requests whose peer address is not the trusted supervisor
pub async fn require_trusted_origin(
    State(bridge): State<Arc<LocalAuthBridge>>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    request: Request,
    next: Next,
) -> Result<Response, BridgeError> {
    bridge.check_origin(peer.ip())?;
    Ok(next.run(request).await)
}
