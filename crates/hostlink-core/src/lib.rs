//! Hostlink Core - Shared configuration and error types
//!
//! This crate provides the types used across all hostlink components.

pub mod config;
pub mod error;

pub use config::{parse_endpoint, Config, TrustedOrigin, DEFAULT_PORT, SUPERVISOR_ENV};
pub use error::{Error, Result};
