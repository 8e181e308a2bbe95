//! Hostlink Server - Axum-based local auth bridge
//!
//! Exposes credential verification and password reset to the co-located
//! supervisor. Every request passes the same gates in order:
//!
//! 1. origin check against the trusted address (403)
//! 2. payload schema validation (400)
//! 3. auth provider lookup (404)
//! 4. provider call, any auth error mapped to 403

pub mod bridge;
pub mod error;
pub mod http;
pub mod origin;
pub mod payload;

pub use bridge::LocalAuthBridge;
pub use error::{status_for, BridgeError, BridgeResult};
pub use http::{create_router, AUTH_PATH, PASSWORD_RESET_PATH};
pub use payload::{AuthRequest, PasswordResetRequest, Payload, Validate};
