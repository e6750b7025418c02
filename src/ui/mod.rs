//! UI module for the system tray and the setup window.

#[cfg(windows)]
pub mod setup;
#[cfg(windows)]
pub mod theme;
#[cfg(windows)]
pub mod tray;

#[cfg(windows)]
pub use setup::{SetupAction, SetupWindow};
#[cfg(windows)]
pub use tray::{MenuItemId, TrayError, TrayEvent, TrayManager, TrayState};
