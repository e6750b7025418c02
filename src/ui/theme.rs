//! Application theme.
//!
//! Dark theme only; the palette matches the tray icons (green active,
//! red muted) with a violet accent.

use eframe::egui;

/// MicMute theme colors.
pub struct Theme {
    /// Window background
    pub background: egui::Color32,

    /// Surface color (cards, panels)
    pub surface: egui::Color32,

    /// Primary accent color (violet)
    pub accent: egui::Color32,

    /// Text primary color
    pub text_primary: egui::Color32,

    /// Text secondary color
    pub text_secondary: egui::Color32,

    /// Microphone active (green)
    pub active: egui::Color32,

    /// Microphone muted (red)
    pub muted: egui::Color32,

    /// Border color
    pub border: egui::Color32,
}

impl Theme {
    pub fn dark() -> Self {
        Self {
            background: egui::Color32::from_rgb(26, 27, 38),
            surface: egui::Color32::from_rgb(31, 41, 55),
            accent: egui::Color32::from_rgb(139, 92, 246),
            text_primary: egui::Color32::from_rgb(255, 255, 255),
            text_secondary: egui::Color32::from_rgb(156, 163, 175),
            active: egui::Color32::from_rgb(34, 197, 94),
            muted: egui::Color32::from_rgb(239, 68, 68),
            border: egui::Color32::from_rgb(55, 65, 81),
        }
    }

    /// Apply the theme to an egui context.
    pub fn apply(&self, ctx: &egui::Context) {
        let mut style = (*ctx.style()).clone();

        // Panel colors
        style.visuals.panel_fill = self.background;
        style.visuals.window_fill = self.surface;

        // Widget colors
        style.visuals.widgets.noninteractive.bg_fill = self.surface;
        style.visuals.widgets.inactive.bg_fill = self.surface;
        style.visuals.widgets.hovered.bg_fill = self.border;
        style.visuals.widgets.active.bg_fill = self.accent;

        // Text colors
        style.visuals.widgets.noninteractive.fg_stroke.color = self.text_primary;
        style.visuals.widgets.inactive.fg_stroke.color = self.text_secondary;
        style.visuals.widgets.hovered.fg_stroke.color = self.text_primary;
        style.visuals.widgets.active.fg_stroke.color = self.text_primary;

        // Selection color
        style.visuals.selection.bg_fill = self.accent;
        style.visuals.selection.stroke.color = self.text_primary;

        // Window rounding
        style.visuals.window_rounding = egui::Rounding::same(8.0);

        ctx.set_style(style);
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}
