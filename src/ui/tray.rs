//! System tray icon management.
//!
//! The tray is the primary surface: a left-click toggles mute, the context
//! menu exposes mute/unmute, settings, autostart, and exit. The icon is a
//! plain colored circle (green active, red with a strike-through when
//! muted), generated as raw RGBA.

use std::sync::mpsc::{channel, Receiver, Sender};
use thiserror::Error;
use tray_icon::{
    menu::{CheckMenuItem, Menu, MenuEvent, MenuItem, PredefinedMenuItem},
    Icon, TrayIcon, TrayIconBuilder, TrayIconEvent,
};

/// Initial state for the tray icon.
#[derive(Debug, Clone)]
pub struct TrayState {
    /// Tooltip text (device name + mute state)
    pub tooltip: String,

    /// Whether the default microphone is muted
    pub muted: bool,

    /// Whether "Start with Windows" is enabled
    pub start_with_windows: bool,
}

impl Default for TrayState {
    fn default() -> Self {
        Self {
            tooltip: "MicMute".to_string(),
            muted: false,
            start_with_windows: false,
        }
    }
}

/// Events from the system tray.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrayEvent {
    /// Left-click on the tray icon (toggle mute)
    LeftClick,

    /// Menu item selected
    MenuItemClicked { id: MenuItemId },
}

/// Menu item identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MenuItemId {
    ToggleMute,
    Settings,
    StartWithWindows,
    Exit,
}

/// Tray service error types.
#[derive(Debug, Error)]
pub enum TrayError {
    #[error("Failed to create tray icon: {0}")]
    CreateFailed(String),

    #[error("Failed to load icon resource")]
    IconLoadFailed,

    #[error("Tray icon not initialized")]
    NotInitialized,

    #[error("Failed to create menu: {0}")]
    MenuFailed(String),
}

/// System tray manager.
pub struct TrayManager {
    tray_icon: Option<TrayIcon>,
    event_sender: Sender<TrayEvent>,
    event_receiver: Receiver<TrayEvent>,
    toggle_item: Option<MenuItem>,
    settings_menu_id: Option<tray_icon::menu::MenuId>,
    startup_item: Option<CheckMenuItem>,
    exit_menu_id: Option<tray_icon::menu::MenuId>,
}

impl TrayManager {
    pub fn new() -> Self {
        let (sender, receiver) = channel();
        Self {
            tray_icon: None,
            event_sender: sender,
            event_receiver: receiver,
            toggle_item: None,
            settings_menu_id: None,
            startup_item: None,
            exit_menu_id: None,
        }
    }

    /// Create and show the tray icon.
    pub fn create(&mut self, initial_state: TrayState) -> Result<(), TrayError> {
        let icon = create_icon(initial_state.muted)?;

        let menu = Menu::new();

        let toggle_item = MenuItem::new(toggle_label(initial_state.muted), true, None);
        self.toggle_item = Some(toggle_item.clone());
        menu.append(&toggle_item)
            .map_err(|e| TrayError::MenuFailed(e.to_string()))?;

        menu.append(&PredefinedMenuItem::separator())
            .map_err(|e| TrayError::MenuFailed(e.to_string()))?;

        let settings_item = MenuItem::new("Settings", true, None);
        self.settings_menu_id = Some(settings_item.id().clone());
        menu.append(&settings_item)
            .map_err(|e| TrayError::MenuFailed(e.to_string()))?;

        let startup_item = CheckMenuItem::new(
            "Start with Windows",
            true,
            initial_state.start_with_windows,
            None,
        );
        self.startup_item = Some(startup_item.clone());
        menu.append(&startup_item)
            .map_err(|e| TrayError::MenuFailed(e.to_string()))?;

        menu.append(&PredefinedMenuItem::separator())
            .map_err(|e| TrayError::MenuFailed(e.to_string()))?;

        let exit_item = MenuItem::new("Exit", true, None);
        self.exit_menu_id = Some(exit_item.id().clone());
        menu.append(&exit_item)
            .map_err(|e| TrayError::MenuFailed(e.to_string()))?;

        let tray_icon = TrayIconBuilder::new()
            .with_icon(icon)
            .with_tooltip(&initial_state.tooltip)
            .with_menu(Box::new(menu))
            .build()
            .map_err(|e| TrayError::CreateFailed(e.to_string()))?;

        self.tray_icon = Some(tray_icon);

        Ok(())
    }

    /// Process tray icon events. Call this from the event loop.
    pub fn process_events(&self) {
        if let Ok(event) = TrayIconEvent::receiver().try_recv() {
            if let TrayIconEvent::Click {
                button: tray_icon::MouseButton::Left,
                button_state: tray_icon::MouseButtonState::Up,
                ..
            } = event
            {
                let _ = self.event_sender.send(TrayEvent::LeftClick);
            }
        }

        if let Ok(event) = MenuEvent::receiver().try_recv() {
            let id = if Some(&event.id) == self.toggle_item.as_ref().map(|i| i.id()) {
                Some(MenuItemId::ToggleMute)
            } else if Some(&event.id) == self.settings_menu_id.as_ref() {
                Some(MenuItemId::Settings)
            } else if Some(&event.id) == self.startup_item.as_ref().map(|i| i.id()) {
                Some(MenuItemId::StartWithWindows)
            } else if Some(&event.id) == self.exit_menu_id.as_ref() {
                Some(MenuItemId::Exit)
            } else {
                None
            };

            if let Some(id) = id {
                let _ = self.event_sender.send(TrayEvent::MenuItemClicked { id });
            }
        }
    }

    /// Get the event receiver for tray events.
    pub fn events(&self) -> &Receiver<TrayEvent> {
        &self.event_receiver
    }

    /// Update the icon and menu label for a new mute state.
    pub fn set_muted(&mut self, muted: bool) -> Result<(), TrayError> {
        let icon = create_icon(muted)?;
        let tray = self.tray_icon.as_mut().ok_or(TrayError::NotInitialized)?;
        tray.set_icon(Some(icon))
            .map_err(|e| TrayError::CreateFailed(e.to_string()))?;

        if let Some(ref item) = self.toggle_item {
            item.set_text(toggle_label(muted));
        }
        Ok(())
    }

    /// Update the tooltip text.
    pub fn set_tooltip(&mut self, text: &str) -> Result<(), TrayError> {
        let tray = self.tray_icon.as_mut().ok_or(TrayError::NotInitialized)?;
        tray.set_tooltip(Some(text))
            .map_err(|e| TrayError::CreateFailed(e.to_string()))?;
        Ok(())
    }

    /// Update the "Start with Windows" menu item checkmark.
    pub fn set_startup_checked(&mut self, checked: bool) {
        if let Some(ref item) = self.startup_item {
            item.set_checked(checked);
        }
    }

    /// Destroy the tray icon.
    pub fn destroy(&mut self) {
        self.tray_icon = None;
    }
}

impl Default for TrayManager {
    fn default() -> Self {
        Self::new()
    }
}

/// Context-menu label for the mute toggle item.
pub fn toggle_label(muted: bool) -> &'static str {
    if muted {
        "Unmute Microphone"
    } else {
        "Mute Microphone"
    }
}

/// Icon size in pixels.
const ICON_SIZE: usize = 32;

/// Generate the tray icon for the given mute state.
///
/// A filled circle: green when active, red with a white strike-through when
/// muted.
fn create_icon(muted: bool) -> Result<Icon, TrayError> {
    let rgba = icon_rgba(muted);
    Icon::from_rgba(rgba, ICON_SIZE as u32, ICON_SIZE as u32).map_err(|_| TrayError::IconLoadFailed)
}

fn icon_rgba(muted: bool) -> Vec<u8> {
    let mut rgba = vec![0u8; ICON_SIZE * ICON_SIZE * 4];

    let center = ICON_SIZE as f32 / 2.0;
    let radius = center - 2.0;

    let (r, g, b) = if muted {
        (239u8, 68u8, 68u8)
    } else {
        (34u8, 197u8, 94u8)
    };

    for y in 0..ICON_SIZE {
        for x in 0..ICON_SIZE {
            let idx = (y * ICON_SIZE + x) * 4;
            let dx = x as f32 - center;
            let dy = y as f32 - center;
            let dist = (dx * dx + dy * dy).sqrt();

            if dist < radius {
                rgba[idx] = r;
                rgba[idx + 1] = g;
                rgba[idx + 2] = b;
                rgba[idx + 3] = 255;
            } else if dist < radius + 1.0 {
                // Anti-aliased edge
                rgba[idx] = r;
                rgba[idx + 1] = g;
                rgba[idx + 2] = b;
                rgba[idx + 3] = ((radius + 1.0 - dist) * 255.0) as u8;
            }
        }
    }

    if muted {
        draw_strike_through(&mut rgba);
    }

    rgba
}

fn draw_strike_through(rgba: &mut [u8]) {
    for i in 5..(ICON_SIZE - 5) {
        for t in 0..2 {
            let idx = ((i + t) * ICON_SIZE + i) * 4;
            rgba[idx] = 255;
            rgba[idx + 1] = 255;
            rgba[idx + 2] = 255;
            rgba[idx + 3] = 255;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_label_follows_state() {
        assert_eq!(toggle_label(true), "Unmute Microphone");
        assert_eq!(toggle_label(false), "Mute Microphone");
    }

    #[test]
    fn muted_icon_differs_from_active() {
        let active = icon_rgba(false);
        let muted = icon_rgba(true);
        assert_eq!(active.len(), ICON_SIZE * ICON_SIZE * 4);
        assert_ne!(active, muted);
    }
}
