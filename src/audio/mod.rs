//! Mute control for the default capture device.
//!
//! `controller` is the platform-neutral façade; the Windows Core Audio
//! binding and the PowerShell fallback plug into it through traits.

pub mod controller;
pub mod error;

#[cfg(windows)]
pub mod binding;
#[cfg(windows)]
pub mod fallback;

pub use controller::{FallbackCommand, MuteBackend, MuteController};
pub use error::AudioError;

#[cfg(windows)]
pub use binding::{ComGuard, CoreAudioBinding};
#[cfg(windows)]
pub use fallback::AppCommandFallback;
