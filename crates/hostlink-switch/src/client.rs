//! Surveillance station client seam

use crate::error::ClientResult;

/// The subset of a surveillance station API the home mode switch needs.
///
/// Implementations are blocking; the host calls entities from worker threads.
pub trait SurveillanceClient: Send + Sync {
    /// Whether home mode is currently enabled
    fn home_mode_status(&self) -> ClientResult<bool>;

    /// Enable or disable home mode
    fn set_home_mode(&self, enabled: bool) -> ClientResult<()>;
}
