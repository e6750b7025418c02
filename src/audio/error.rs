//! Audio subsystem error types.

use std::time::Duration;
use thiserror::Error;

/// Errors from the mute-control stack.
///
/// Every variant degrades rather than aborts: the controller reduces all of
/// these to a boolean success flag at its boundary.
#[derive(Debug, Clone, Error)]
pub enum AudioError {
    /// COM/audio subsystem could not be initialized for this process.
    #[error("audio subsystem initialization failed: {0}")]
    InitFailed(String),

    /// No default capture device is present.
    #[error("no default capture device available")]
    DeviceUnavailable,

    /// A native mute query failed.
    #[error("mute query failed: {0}")]
    QueryFailed(String),

    /// A native mute update failed.
    #[error("mute update failed: {0}")]
    SetFailed(String),

    /// The external fallback command failed or exited non-zero.
    #[error("fallback command failed: {0}")]
    FallbackFailed(String),

    /// The external fallback command did not exit before the deadline.
    #[error("fallback command timed out after {0:?}")]
    Timeout(Duration),
}
