use eframe::egui::{self, Color32, Stroke, Visuals};
use serde::{Deserialize, Serialize};

/// Available theme presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ThemePreset {
    #[default]
    Midnight,
    Amber,
    Purple,
    Catppuccin,
}

impl ThemePreset {
    pub fn all() -> &'static [ThemePreset] {
        &[
            ThemePreset::Midnight,
            ThemePreset::Amber,
            ThemePreset::Purple,
            ThemePreset::Catppuccin,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            ThemePreset::Midnight => "Midnight",
            ThemePreset::Amber => "Amber",
            ThemePreset::Purple => "Purple",
            ThemePreset::Catppuccin => "Catppuccin Mocha",
        }
    }

    /// Config spelling, as serialized
    pub fn key(&self) -> &'static str {
        match self {
            ThemePreset::Midnight => "midnight",
            ThemePreset::Amber => "amber",
            ThemePreset::Purple => "purple",
            ThemePreset::Catppuccin => "catppuccin",
        }
    }

    /// Parse a preset from its config spelling
    pub fn parse(value: &str) -> Option<ThemePreset> {
        match value.to_lowercase().as_str() {
            "midnight" => Some(ThemePreset::Midnight),
            "amber" => Some(ThemePreset::Amber),
            "purple" => Some(ThemePreset::Purple),
            "catppuccin" => Some(ThemePreset::Catppuccin),
            _ => None,
        }
    }

    pub fn theme(&self) -> Theme {
        match self {
            ThemePreset::Midnight => Theme::midnight(),
            ThemePreset::Amber => Theme::amber(),
            ThemePreset::Purple => Theme::purple(),
            ThemePreset::Catppuccin => Theme::catppuccin(),
        }
    }
}

/// Theme color definitions
#[derive(Debug, Clone)]
pub struct Theme {
    // Base colors
    pub bg_darkest: Color32,
    pub bg_dark: Color32,
    pub bg_card: Color32,
    pub bg_light: Color32,

    // Text colors
    pub text_primary: Color32,
    pub text_secondary: Color32,
    pub text_muted: Color32,

    // Accent colors
    pub accent: Color32,
    pub accent_hover: Color32,
    pub accent_muted: Color32,

    // Semantic colors
    pub success: Color32,
    pub locked: Color32,
    pub error: Color32,
    pub premium: Color32,

    // UI element colors
    pub border: Color32,
}

impl Theme {
    /// Midnight theme - dark blue storefront
    pub fn midnight() -> Self {
        Self {
            bg_darkest: Color32::from_rgb(10, 14, 26),
            bg_dark: Color32::from_rgb(17, 24, 39),
            bg_card: Color32::from_rgb(30, 41, 59),
            bg_light: Color32::from_rgb(51, 65, 85),

            text_primary: Color32::from_rgb(248, 250, 252),
            text_secondary: Color32::from_rgb(203, 213, 225),
            text_muted: Color32::from_rgb(148, 163, 184),

            accent: Color32::from_rgb(59, 130, 246),        // Blue-500
            accent_hover: Color32::from_rgb(96, 165, 250),  // Blue-400
            accent_muted: Color32::from_rgb(37, 99, 235),   // Blue-600

            success: Color32::from_rgb(34, 197, 94),   // Green-500
            locked: Color32::from_rgb(100, 116, 139),  // Slate-500
            error: Color32::from_rgb(239, 68, 68),     // Red-500
            premium: Color32::from_rgb(250, 204, 21),  // Yellow-400

            border: Color32::from_rgb(51, 65, 85),
        }
    }

    pub fn amber() -> Self {
        Self {
            bg_darkest: Color32::from_rgb(16, 16, 18),
            bg_dark: Color32::from_rgb(24, 24, 27),
            bg_card: Color32::from_rgb(32, 32, 36),
            bg_light: Color32::from_rgb(48, 48, 54),

            text_primary: Color32::from_rgb(250, 250, 250),
            text_secondary: Color32::from_rgb(200, 200, 200),
            text_muted: Color32::from_rgb(140, 140, 140),

            accent: Color32::from_rgb(245, 158, 11),       // Amber-500
            accent_hover: Color32::from_rgb(251, 191, 36), // Amber-400
            accent_muted: Color32::from_rgb(180, 116, 8),

            success: Color32::from_rgb(34, 197, 94),
            locked: Color32::from_rgb(113, 113, 122),
            error: Color32::from_rgb(239, 68, 68),
            premium: Color32::from_rgb(253, 224, 71),

            border: Color32::from_rgb(63, 63, 70),
        }
    }

    pub fn purple() -> Self {
        Self {
            bg_darkest: Color32::from_rgb(22, 18, 32),
            bg_dark: Color32::from_rgb(30, 26, 46),
            bg_card: Color32::from_rgb(42, 36, 62),
            bg_light: Color32::from_rgb(58, 50, 82),

            text_primary: Color32::from_rgb(250, 250, 255),
            text_secondary: Color32::from_rgb(200, 195, 220),
            text_muted: Color32::from_rgb(140, 135, 160),

            accent: Color32::from_rgb(168, 85, 247),        // Purple-500
            accent_hover: Color32::from_rgb(192, 132, 252), // Purple-400
            accent_muted: Color32::from_rgb(126, 58, 200),

            success: Color32::from_rgb(74, 222, 128),
            locked: Color32::from_rgb(110, 100, 135),
            error: Color32::from_rgb(248, 113, 113),
            premium: Color32::from_rgb(250, 204, 21),

            border: Color32::from_rgb(75, 65, 100),
        }
    }

    pub fn catppuccin() -> Self {
        Self {
            bg_darkest: Color32::from_rgb(17, 17, 27), // Crust
            bg_dark: Color32::from_rgb(24, 24, 37),    // Mantle
            bg_card: Color32::from_rgb(30, 30, 46),    // Base
            bg_light: Color32::from_rgb(49, 50, 68),   // Surface0

            text_primary: Color32::from_rgb(205, 214, 244),   // Text
            text_secondary: Color32::from_rgb(186, 194, 222), // Subtext1
            text_muted: Color32::from_rgb(147, 153, 178),     // Overlay1

            accent: Color32::from_rgb(137, 180, 250),       // Blue
            accent_hover: Color32::from_rgb(180, 190, 254), // Lavender
            accent_muted: Color32::from_rgb(116, 148, 204),

            success: Color32::from_rgb(166, 227, 161), // Green
            locked: Color32::from_rgb(108, 112, 134),  // Overlay0
            error: Color32::from_rgb(243, 139, 168),   // Red
            premium: Color32::from_rgb(249, 226, 175), // Yellow

            border: Color32::from_rgb(69, 71, 90), // Surface1
        }
    }

    /// Apply this theme to egui's visuals
    pub fn apply(&self, ctx: &egui::Context) {
        let mut visuals = Visuals::dark();

        visuals.window_fill = self.bg_dark;
        visuals.panel_fill = self.bg_dark;
        visuals.faint_bg_color = self.bg_card;
        visuals.extreme_bg_color = self.bg_darkest;

        visuals.widgets.noninteractive.bg_fill = self.bg_card;
        visuals.widgets.noninteractive.weak_bg_fill = self.bg_light;
        visuals.widgets.noninteractive.bg_stroke = Stroke::new(1.0, self.border);
        visuals.widgets.noninteractive.fg_stroke = Stroke::new(1.0, self.text_secondary);

        visuals.widgets.inactive.bg_fill = self.bg_card;
        visuals.widgets.inactive.weak_bg_fill = self.bg_light;
        visuals.widgets.inactive.bg_stroke = Stroke::new(1.0, self.border);
        visuals.widgets.inactive.fg_stroke = Stroke::new(1.0, self.text_primary);

        visuals.widgets.hovered.bg_fill = self.bg_light;
        visuals.widgets.hovered.weak_bg_fill = self.bg_light;
        visuals.widgets.hovered.bg_stroke = Stroke::new(1.0, self.accent);
        visuals.widgets.hovered.fg_stroke = Stroke::new(1.0, self.text_primary);

        visuals.widgets.active.bg_fill = self.accent_muted;
        visuals.widgets.active.weak_bg_fill = self.accent_muted;
        visuals.widgets.active.bg_stroke = Stroke::new(1.0, self.accent_hover);
        visuals.widgets.active.fg_stroke = Stroke::new(1.0, self.text_primary);

        visuals.widgets.open.bg_fill = self.bg_light;
        visuals.widgets.open.weak_bg_fill = self.bg_light;
        visuals.widgets.open.bg_stroke = Stroke::new(1.0, self.accent);
        visuals.widgets.open.fg_stroke = Stroke::new(1.0, self.text_primary);

        // Progress bars fill with the selection color
        visuals.selection.bg_fill = self.accent;
        visuals.selection.stroke = Stroke::new(1.0, self.text_primary);

        visuals.hyperlink_color = self.accent;

        visuals.window_stroke = Stroke::new(1.0, self.border);
        visuals.window_shadow = egui::epaint::Shadow::NONE;
        visuals.popup_shadow = egui::epaint::Shadow::NONE;

        ctx.set_visuals(visuals);
    }
}
