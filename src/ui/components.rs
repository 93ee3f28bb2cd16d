//! Shared UI components for the library window

use eframe::egui::{self, RichText, Vec2};

use crate::ui::Theme;
use crate::view::CardAction;

/// Render a category pill; returns true when clicked
pub fn category_button(ui: &mut egui::Ui, theme: &Theme, label: &str, selected: bool) -> bool {
    let (bg, text_color) = if selected {
        (theme.accent, theme.bg_darkest)
    } else {
        (theme.bg_card, theme.text_secondary)
    };

    let button = egui::Button::new(RichText::new(capitalize(label)).color(text_color))
        .fill(bg)
        .corner_radius(14.0)
        .min_size(Vec2::new(72.0, 28.0));

    ui.add(button).clicked()
}

/// Render the action button of a card; returns true when clicked
pub fn action_button(ui: &mut egui::Ui, theme: &Theme, action: &CardAction, width: f32) -> bool {
    let (fill, text_color, enabled) = match action {
        CardAction::Download => (theme.accent, theme.bg_darkest, true),
        CardAction::Downloading { .. } => (theme.error, theme.text_primary, true),
        CardAction::Locked | CardAction::Unavailable => (theme.bg_light, theme.locked, false),
        CardAction::Downloaded | CardAction::DownloadStarted => {
            (theme.bg_light, theme.success, false)
        }
    };

    let button = egui::Button::new(RichText::new(action.label()).color(text_color).strong())
        .fill(fill)
        .corner_radius(6.0)
        .min_size(Vec2::new(width, 34.0));

    ui.add_enabled(enabled, button).clicked()
}

/// Render a framed section with a title
pub fn section_frame<R>(
    ui: &mut egui::Ui,
    theme: &Theme,
    title: &str,
    content: impl FnOnce(&mut egui::Ui) -> R,
) -> R {
    egui::Frame::new()
        .fill(theme.bg_card)
        .corner_radius(8.0)
        .inner_margin(16.0)
        .stroke(egui::Stroke::new(1.0, theme.border))
        .show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.label(RichText::new(title).color(theme.accent).size(13.0).strong());
            ui.add_space(12.0);
            content(ui)
        })
        .inner
}

/// "rpg" -> "Rpg", "all" -> "All"
fn capitalize(label: &str) -> String {
    let mut chars = label.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
