//! Library grid rendering
//!
//! Draws a `LibraryView` and reports what the user did as `LibraryEvent`s.
//! Nothing here touches library state directly.

use eframe::egui::{self, RichText, Vec2};

use crate::catalog::Variant;
use crate::filter::CategoryFilter;
use crate::state::CoverState;
use crate::ui::Theme;
use crate::ui::components::{action_button, category_button};
use crate::view::{CardAction, CardView, LibraryEvent, LibraryView, speed_label};

const CARD_WIDTH: f32 = 260.0;
const COVER_HEIGHT: f32 = 120.0;

/// Render the search box, category row and card grid
pub fn render_library(
    ui: &mut egui::Ui,
    view: &LibraryView,
    theme: &Theme,
    covers: &CoverState,
    search_input: &mut String,
) -> Vec<LibraryEvent> {
    let mut events = Vec::new();

    ui.horizontal(|ui| {
        ui.label(RichText::new("Game Library").color(theme.text_primary).size(22.0).strong());
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            let search = egui::TextEdit::singleline(search_input)
                .hint_text("Search games...")
                .desired_width(260.0);
            if ui.add(search).changed() {
                events.push(LibraryEvent::SearchChanged(search_input.clone()));
            }
        });
    });

    ui.add_space(12.0);

    ui.horizontal_wrapped(|ui| {
        for label in &view.categories {
            let selected = view.selected_category == *label;
            if category_button(ui, theme, label, selected) && !selected {
                events.push(LibraryEvent::CategorySelected(CategoryFilter::parse(label)));
            }
        }
    });

    ui.add_space(16.0);

    if let Some(message) = view.empty_message {
        ui.vertical_centered(|ui| {
            ui.add_space(48.0);
            ui.label(RichText::new(message).color(theme.text_muted).size(16.0));
        });
        return events;
    }

    egui::ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui| {
            ui.horizontal_wrapped(|ui| {
                ui.spacing_mut().item_spacing = Vec2::new(16.0, 16.0);
                for card in &view.cards {
                    if let Some(event) = render_card(ui, card, view.variant, theme, covers.texture(card.id)) {
                        events.push(event);
                    }
                }
            });
        });

    events
}

fn render_card(
    ui: &mut egui::Ui,
    card: &CardView,
    variant: Variant,
    theme: &Theme,
    cover: Option<&egui::TextureHandle>,
) -> Option<LibraryEvent> {
    let mut event = None;

    egui::Frame::new()
        .fill(theme.bg_card)
        .corner_radius(10.0)
        .inner_margin(12.0)
        .stroke(egui::Stroke::new(1.0, theme.border))
        .show(ui, |ui| {
            ui.set_width(CARD_WIDTH);
            ui.vertical(|ui| {
                render_cover(ui, card, theme, cover);
                ui.add_space(8.0);

                ui.horizontal(|ui| {
                    ui.label(RichText::new(&card.title).color(theme.text_primary).size(15.0).strong());
                    if card.premium {
                        ui.label(RichText::new("★").color(theme.premium).size(15.0))
                            .on_hover_text("Premium");
                    }
                });

                ui.horizontal(|ui| {
                    ui.label(RichText::new(&card.size).color(theme.text_muted).size(12.0));
                    if let CardAction::Downloading { speed, .. } = &card.action {
                        ui.label(RichText::new(speed_label(*speed)).color(theme.accent).size(12.0));
                    }
                });

                if let CardAction::Downloading { progress, remaining, .. } = &card.action {
                    ui.add_space(6.0);
                    ui.add(
                        egui::ProgressBar::new(f32::from(*progress) / 100.0)
                            .show_percentage()
                            .desired_width(CARD_WIDTH),
                    );
                    if let Some(remaining) = remaining {
                        ui.label(
                            RichText::new(format!("{} remaining", remaining))
                                .color(theme.text_muted)
                                .size(11.0),
                        );
                    }
                }

                ui.add_space(8.0);
                if action_button(ui, theme, &card.action, CARD_WIDTH) {
                    event = click_event(card, variant);
                }
            });
        });

    event
}

/// Event for a click on the card's action button
fn click_event(card: &CardView, variant: Variant) -> Option<LibraryEvent> {
    match card.action {
        CardAction::Download => match variant {
            Variant::Simulated => Some(LibraryEvent::Start(card.id)),
            Variant::External => Some(LibraryEvent::OpenDownload(card.id)),
        },
        CardAction::Downloading { .. } => Some(LibraryEvent::Cancel(card.id)),
        _ => None,
    }
}

/// Cover texture, or the title's initial while it loads or if it failed
fn render_cover(
    ui: &mut egui::Ui,
    card: &CardView,
    theme: &Theme,
    cover: Option<&egui::TextureHandle>,
) {
    let size = Vec2::new(CARD_WIDTH, COVER_HEIGHT);
    if let Some(texture) = cover {
        ui.add(egui::Image::new(texture).fit_to_exact_size(size).corner_radius(6.0));
        return;
    }

    let (rect, _) = ui.allocate_exact_size(size, egui::Sense::hover());
    ui.painter().rect_filled(rect, 6.0, theme.bg_light);

    let initial = card.title.chars().next().unwrap_or('?').to_string();
    ui.painter().text(
        rect.center(),
        egui::Align2::CENTER_CENTER,
        initial,
        egui::FontId::proportional(40.0),
        theme.text_muted,
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card(action: CardAction) -> CardView {
        CardView {
            id: 3,
            title: "Racing Masters 2024".to_string(),
            size: "35.7 GB".to_string(),
            image: None,
            premium: false,
            action,
        }
    }

    #[test]
    fn test_click_events_follow_variant() {
        let download = card(CardAction::Download);
        assert_eq!(click_event(&download, Variant::Simulated), Some(LibraryEvent::Start(3)));
        assert_eq!(
            click_event(&download, Variant::External),
            Some(LibraryEvent::OpenDownload(3))
        );

        let downloading = card(CardAction::Downloading {
            progress: 10,
            speed: 8.0,
            remaining: None,
        });
        assert_eq!(click_event(&downloading, Variant::Simulated), Some(LibraryEvent::Cancel(3)));

        for inert in [
            CardAction::Locked,
            CardAction::Downloaded,
            CardAction::DownloadStarted,
            CardAction::Unavailable,
        ] {
            assert_eq!(click_event(&card(inert), Variant::External), None);
        }
    }
}
