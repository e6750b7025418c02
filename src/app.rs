//! Application state and lifecycle.
//!
//! `MicMuteApp` owns the controller, preferences, tray, and setup window,
//! and drives them from the eframe update loop.

use crate::audio::{CoreAudioBinding, MuteController};
use crate::platform::{RegistryPreferences, UserPreferences};
use crate::ui::{MenuItemId, SetupAction, SetupWindow, TrayEvent, TrayManager, TrayState};
use eframe::egui;
use std::time::Duration;
use tracing::{info, warn};

/// How often the update loop wakes to drain tray events.
const EVENT_POLL_INTERVAL: Duration = Duration::from_millis(100);

pub struct MicMuteApp {
    controller: MuteController,
    binding: CoreAudioBinding,
    store: RegistryPreferences,
    preferences: UserPreferences,
    tray: TrayManager,
    setup: SetupWindow,

    /// Mirror of the controller's cached state, for icon/tooltip updates
    muted: bool,

    window_visible: bool,
    exit_confirmed: bool,
}

impl MicMuteApp {
    /// Build the app and show the tray icon.
    ///
    /// Must run on the event-loop thread; the tray icon is bound to it.
    pub fn new(
        controller: MuteController,
        store: RegistryPreferences,
        preferences: UserPreferences,
    ) -> Self {
        let binding = CoreAudioBinding::new();
        let muted = controller.get();

        let mut tray = TrayManager::new();
        let tray_state = TrayState {
            tooltip: tooltip_text(binding.default_capture_name().as_deref(), muted),
            muted,
            start_with_windows: preferences.start_with_windows,
        };
        if let Err(e) = tray.create(tray_state) {
            warn!("failed to create tray icon: {e}");
        }

        // The settings window stays visible until setup completes; after
        // that it only opens on demand (or when start-minimized is off).
        let window_visible = !preferences.setup_complete || !preferences.start_minimized;

        Self {
            controller,
            binding,
            store,
            preferences,
            tray,
            setup: SetupWindow::new(),
            muted,
            window_visible,
            exit_confirmed: false,
        }
    }

    fn toggle_mute(&mut self) {
        self.muted = self.controller.toggle();
        info!(muted = self.muted, "toggled microphone");
        self.refresh_tray();
    }

    fn refresh_tray(&mut self) {
        let tooltip = tooltip_text(self.binding.default_capture_name().as_deref(), self.muted);
        if let Err(e) = self.tray.set_muted(self.muted) {
            warn!("failed to update tray icon: {e}");
        }
        if let Err(e) = self.tray.set_tooltip(&tooltip) {
            warn!("failed to update tray tooltip: {e}");
        }
    }

    fn show_window(&mut self, ctx: &egui::Context) {
        self.window_visible = true;
        ctx.send_viewport_cmd(egui::ViewportCommand::Visible(true));
        ctx.send_viewport_cmd(egui::ViewportCommand::Focus);
    }

    fn hide_window(&mut self, ctx: &egui::Context) {
        self.window_visible = false;
        ctx.send_viewport_cmd(egui::ViewportCommand::Visible(false));
    }

    fn save_preferences(&self) {
        if let Err(e) = self.store.save(&self.preferences) {
            warn!("failed to save preferences: {e}");
        }
    }

    fn handle_tray_event(&mut self, event: TrayEvent, ctx: &egui::Context) {
        match event {
            TrayEvent::LeftClick => self.toggle_mute(),
            TrayEvent::MenuItemClicked { id } => match id {
                MenuItemId::ToggleMute => self.toggle_mute(),
                MenuItemId::Settings => self.show_window(ctx),
                MenuItemId::StartWithWindows => {
                    self.preferences.start_with_windows = !self.preferences.start_with_windows;
                    if let Err(e) = self
                        .store
                        .set_startup_enabled(self.preferences.start_with_windows)
                    {
                        warn!("failed to update autostart: {e}");
                    }
                    self.tray
                        .set_startup_checked(self.preferences.start_with_windows);
                }
                MenuItemId::Exit => {
                    self.exit_confirmed = true;
                    ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                }
            },
        }
    }

    fn handle_setup_action(&mut self, action: SetupAction, ctx: &egui::Context) {
        match action {
            SetupAction::ToggleMute => self.toggle_mute(),
            SetupAction::SetStartMinimized(value) => {
                self.preferences.start_minimized = value;
                self.save_preferences();
            }
            SetupAction::SetShowNotifications(value) => {
                self.preferences.show_notifications = value;
                self.save_preferences();
            }
            SetupAction::SetStartWithWindows(value) => {
                self.preferences.start_with_windows = value;
                self.save_preferences();
                self.tray.set_startup_checked(value);
            }
            SetupAction::FinishSetup => {
                self.preferences.setup_complete = true;
                if let Err(e) = self.store.set_setup_complete(true) {
                    warn!("failed to persist setup flag: {e}");
                }
                info!("setup complete");
                self.hide_window(ctx);
            }
        }
    }
}

impl eframe::App for MicMuteApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.tray.process_events();
        while let Ok(event) = self.tray.events().try_recv() {
            self.handle_tray_event(event, ctx);
        }

        if self.window_visible {
            self.setup.show(
                ctx,
                self.muted,
                self.preferences.setup_complete,
                &self.preferences,
            );
            for action in self.setup.take_actions() {
                self.handle_setup_action(action, ctx);
            }
        }

        // Closing the window before setup completes exits the app; after
        // that it just hides to the tray.
        if ctx.input(|i| i.viewport().close_requested())
            && !self.exit_confirmed
            && self.preferences.setup_complete
        {
            ctx.send_viewport_cmd(egui::ViewportCommand::CancelClose);
            self.hide_window(ctx);
        }

        // Keep draining tray events while the window is hidden.
        ctx.request_repaint_after(EVENT_POLL_INTERVAL);
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.tray.destroy();
    }
}

/// Tray tooltip for the current device and mute state.
fn tooltip_text(device_name: Option<&str>, muted: bool) -> String {
    match device_name {
        Some(name) => {
            if muted {
                format!("{} (Muted)", name)
            } else {
                name.to_string()
            }
        }
        None => "No microphone".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tooltip_reflects_device_and_mute_state() {
        assert_eq!(tooltip_text(Some("Headset Mic"), false), "Headset Mic");
        assert_eq!(
            tooltip_text(Some("Headset Mic"), true),
            "Headset Mic (Muted)"
        );
        assert_eq!(tooltip_text(None, true), "No microphone");
    }
}
