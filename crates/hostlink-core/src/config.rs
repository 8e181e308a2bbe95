//! Configuration types for hostlink

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use tracing::error;

/// Default listening port for the bridge
pub const DEFAULT_PORT: u16 = 8099;

/// Environment variable holding the supervisor endpoint (`<ip>:<port>`)
pub const SUPERVISOR_ENV: &str = "SUPERVISOR";

/// Where the address of the trusted supervisor comes from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TrustedOrigin {
    /// Address resolved once at startup
    Fixed(IpAddr),
    /// Endpoint re-read from this environment variable on every request
    Env(String),
}

impl Default for TrustedOrigin {
    fn default() -> Self {
        TrustedOrigin::Env(SUPERVISOR_ENV.to_string())
    }
}

impl TrustedOrigin {
    /// Resolve the currently trusted address.
    ///
    /// Returns `None` when the environment variable is unset or malformed,
    /// in which case no caller is trusted.
    pub fn resolve(&self) -> Option<IpAddr> {
        match self {
            TrustedOrigin::Fixed(ip) => Some(*ip),
            TrustedOrigin::Env(var) => {
                let value = std::env::var(var).ok()?;
                match parse_endpoint(&value) {
                    Ok(ip) => Some(ip),
                    Err(e) => {
                        error!("{} holds an unusable endpoint: {}", var, e);
                        None
                    }
                }
            }
        }
    }

    /// Check whether `caller` is the trusted supervisor
    pub fn is_trusted(&self, caller: IpAddr) -> bool {
        self.resolve()
            .is_some_and(|trusted| normalize(trusted) == normalize(caller))
    }
}

impl std::str::FromStr for TrustedOrigin {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        parse_endpoint(s).map(TrustedOrigin::Fixed)
    }
}

/// Extract the address portion of a supervisor endpoint.
///
/// Accepts `<ip>:<port...>`, `[<ipv6>]:<port>` and a bare address.
pub fn parse_endpoint(value: &str) -> Result<IpAddr> {
    let value = value.trim();

    if let Ok(ip) = value.parse::<IpAddr>() {
        return Ok(ip);
    }
    if let Ok(addr) = value.parse::<SocketAddr>() {
        return Ok(addr.ip());
    }

    value
        .split(':')
        .next()
        .and_then(|host| host.parse::<IpAddr>().ok())
        .ok_or_else(|| Error::InvalidEndpoint(value.to_string()))
}

// IPv4-mapped IPv6 peers (dual-stack listeners) compare equal to their IPv4 form
fn normalize(ip: IpAddr) -> IpAddr {
    match ip {
        IpAddr::V6(v6) => v6
            .to_ipv4_mapped()
            .map(IpAddr::V4)
            .unwrap_or(IpAddr::V6(v6)),
        v4 => v4,
    }
}

/// Main configuration for hostlink
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Address the bridge listens on
    pub bind: SocketAddr,
    /// The single caller allowed to use the bridge
    pub trusted_origin: TrustedOrigin,
    /// Credential document of the local auth provider
    pub store_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([0, 0, 0, 0], DEFAULT_PORT)),
            trusted_origin: TrustedOrigin::default(),
            store_path: Self::default_store_path()
                .unwrap_or_else(|_| PathBuf::from("auth_provider.json")),
        }
    }
}

impl Config {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder pattern: set listening address
    pub fn with_bind(mut self, bind: SocketAddr) -> Self {
        self.bind = bind;
        self
    }

    /// Builder pattern: set trusted origin
    pub fn with_trusted_origin(mut self, origin: TrustedOrigin) -> Self {
        self.trusted_origin = origin;
        self
    }

    /// Builder pattern: set credential document path
    pub fn with_store_path(mut self, path: PathBuf) -> Self {
        self.store_path = path;
        self
    }

    /// Default credential document (~/.config/hostlink/auth_provider.json)
    pub fn default_store_path() -> Result<PathBuf> {
        let config_dir =
            dirs::config_dir().ok_or_else(|| Error::config("configuration directory not found"))?;
        Ok(config_dir.join("hostlink").join("auth_provider.json"))
    }
}
