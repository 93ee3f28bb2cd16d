//! UI-only state

use crate::ui::{Theme, ThemePreset};

/// State that only affects rendering
pub struct UiState {
    /// Current theme colors
    pub current_theme: Theme,
    /// Preset the colors were built from
    pub current_preset: ThemePreset,
    /// Theme needs to be re-applied to the egui context
    pub theme_dirty: bool,
    /// Search box contents, mirrored into the library on change
    pub search_input: String,
}

impl UiState {
    pub fn new(preset: ThemePreset) -> Self {
        Self {
            current_theme: preset.theme(),
            current_preset: preset,
            theme_dirty: true,
            search_input: String::new(),
        }
    }

    /// Switch presets; returns false when nothing changed
    pub fn set_preset(&mut self, preset: ThemePreset) -> bool {
        if preset == self.current_preset {
            return false;
        }
        self.current_theme = preset.theme();
        self.current_preset = preset;
        self.theme_dirty = true;
        true
    }
}
