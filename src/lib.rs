//! MicMute - Library
//!
//! A system tray utility that mutes and unmutes the default microphone on
//! Windows.
//!
//! ## Features
//!
//! - One-click mute toggle from the tray icon
//! - Typed Core Audio binding with a PowerShell fallback path
//! - One-time setup window with persisted preferences
//! - Start with Windows option

pub mod audio;
pub mod platform;

#[cfg(windows)]
pub mod app;
#[cfg(windows)]
pub mod ui;

pub use audio::{AudioError, FallbackCommand, MuteBackend, MuteController};

#[cfg(windows)]
pub use app::MicMuteApp;
#[cfg(windows)]
pub use audio::{AppCommandFallback, ComGuard, CoreAudioBinding};
#[cfg(windows)]
pub use platform::{RegistryPreferences, UserPreferences};
#[cfg(windows)]
pub use ui::{TrayEvent, TrayManager, TrayState};
