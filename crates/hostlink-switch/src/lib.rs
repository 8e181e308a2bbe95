//! Hostlink Switch
//!
//! Exposes a surveillance station's "home mode" as an on/off switch entity.
//!
//! The vendor HTTP client is not part of this crate; it plugs in through
//! [`SurveillanceClient`]. Client failures never escape a switch: reads fall
//! back to off and writes are logged and dropped.

mod client;
mod error;
mod switch;

pub use client::SurveillanceClient;
pub use error::{ClientError, ClientResult};
pub use switch::{setup_platform, HomeModeSwitch, SurveillanceData, SwitchEntity, SwitchState};
