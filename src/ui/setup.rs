//! Setup and settings window.
//!
//! Shown on first launch until the user clicks "Start MicMute", and on
//! demand from the tray menu afterwards. Renders the large mute toggle,
//! a short feature summary, and the preference checkboxes.

use crate::platform::UserPreferences;
use crate::ui::theme::Theme;
use eframe::egui;

/// Actions that can be triggered from the setup UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetupAction {
    /// Toggle the microphone mute state
    ToggleMute,
    /// Persist a preference checkbox change
    SetStartMinimized(bool),
    SetShowNotifications(bool),
    SetStartWithWindows(bool),
    /// "Start MicMute": mark setup complete and hide the window
    FinishSetup,
}

/// Setup window state.
pub struct SetupWindow {
    theme: Theme,
    actions: Vec<SetupAction>,
}

impl SetupWindow {
    pub fn new() -> Self {
        Self {
            theme: Theme::dark(),
            actions: Vec::new(),
        }
    }

    /// Render the window content.
    pub fn show(
        &mut self,
        ctx: &egui::Context,
        muted: bool,
        setup_complete: bool,
        preferences: &UserPreferences,
    ) {
        self.theme.apply(ctx);

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.add_space(24.0);
                ui.heading(
                    egui::RichText::new("MicMute")
                        .size(32.0)
                        .strong()
                        .color(self.theme.text_primary),
                );
                ui.label(
                    egui::RichText::new("Control your microphone with one click")
                        .color(self.theme.text_secondary),
                );

                ui.add_space(32.0);
                self.render_mute_button(ui, muted);
                ui.add_space(12.0);

                let (status, color) = if muted {
                    ("MICROPHONE MUTED", self.theme.muted)
                } else {
                    ("MICROPHONE ACTIVE", self.theme.active)
                };
                ui.label(egui::RichText::new(status).size(16.0).strong().color(color));

                ui.add_space(24.0);
                self.render_feature_card(ui);

                ui.add_space(16.0);
                self.render_preferences(ui, preferences);

                ui.add_space(16.0);
                if !setup_complete {
                    let start = egui::Button::new(
                        egui::RichText::new("Start MicMute")
                            .size(16.0)
                            .color(self.theme.text_primary),
                    )
                    .fill(self.theme.accent)
                    .min_size(egui::vec2(ui.available_width().min(360.0), 44.0))
                    .rounding(12.0);

                    if ui.add(start).clicked() {
                        self.actions.push(SetupAction::FinishSetup);
                    }
                }
            });
        });
    }

    /// The large circular mute toggle.
    fn render_mute_button(&mut self, ui: &mut egui::Ui, muted: bool) {
        let diameter = 130.0;
        let (rect, response) = ui.allocate_exact_size(
            egui::vec2(diameter, diameter),
            egui::Sense::click(),
        );

        if ui.is_rect_visible(rect) {
            let color = if muted {
                self.theme.muted
            } else {
                self.theme.active
            };
            let center = rect.center();
            let painter = ui.painter();

            painter.circle_filled(center, diameter / 2.0, color);
            if response.hovered() {
                painter.circle_stroke(
                    center,
                    diameter / 2.0,
                    egui::Stroke::new(2.0, self.theme.text_primary),
                );
            }

            let label = if muted { "MUTED" } else { "ACTIVE" };
            painter.text(
                center,
                egui::Align2::CENTER_CENTER,
                label,
                egui::FontId::proportional(18.0),
                self.theme.text_primary,
            );
        }

        if response.clicked() {
            self.actions.push(SetupAction::ToggleMute);
        }
    }

    fn render_feature_card(&self, ui: &mut egui::Ui) {
        egui::Frame::none()
            .fill(self.theme.surface)
            .rounding(12.0)
            .inner_margin(16.0)
            .show(ui, |ui| {
                ui.set_width(ui.available_width().min(360.0));
                for line in [
                    "Runs silently in the system tray",
                    "Single-click mute and unmute",
                    "Always accessible from the taskbar",
                ] {
                    ui.horizontal(|ui| {
                        ui.colored_label(self.theme.accent, "•");
                        ui.colored_label(self.theme.text_secondary, line);
                    });
                }
            });
    }

    fn render_preferences(&mut self, ui: &mut egui::Ui, preferences: &UserPreferences) {
        egui::Frame::none()
            .fill(self.theme.surface)
            .rounding(12.0)
            .inner_margin(16.0)
            .show(ui, |ui| {
                ui.set_width(ui.available_width().min(360.0));

                let mut start_minimized = preferences.start_minimized;
                if ui
                    .checkbox(&mut start_minimized, "Start minimized to tray")
                    .changed()
                {
                    self.actions
                        .push(SetupAction::SetStartMinimized(start_minimized));
                }

                let mut show_notifications = preferences.show_notifications;
                if ui
                    .checkbox(&mut show_notifications, "Show notifications")
                    .changed()
                {
                    self.actions
                        .push(SetupAction::SetShowNotifications(show_notifications));
                }

                let mut start_with_windows = preferences.start_with_windows;
                if ui
                    .checkbox(&mut start_with_windows, "Start with Windows")
                    .changed()
                {
                    self.actions
                        .push(SetupAction::SetStartWithWindows(start_with_windows));
                }
            });
    }

    /// Take all pending actions.
    pub fn take_actions(&mut self) -> Vec<SetupAction> {
        std::mem::take(&mut self.actions)
    }
}

impl Default for SetupWindow {
    fn default() -> Self {
        Self::new()
    }
}
