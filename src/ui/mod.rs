//! UI modules for the game library window

mod components;
mod library_view;
mod settings_window;
mod theme;

pub use library_view::render_library;
pub use settings_window::render_settings_window;
pub use theme::{Theme, ThemePreset};
