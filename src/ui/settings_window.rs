//! Settings window

use eframe::egui::{self, RichText, Vec2};

use crate::config::Config;
use crate::ui::components::section_frame;
use crate::ui::{Theme, ThemePreset};

/// Render the settings window while `open` is set.
///
/// Returns the preset the user picked, if any.
pub fn render_settings_window(
    ctx: &egui::Context,
    open: &mut bool,
    config: &Config,
    theme: &Theme,
) -> Option<ThemePreset> {
    let mut picked = None;

    egui::Window::new("Settings")
        .open(open)
        .collapsible(false)
        .resizable(false)
        .default_width(420.0)
        .show(ctx, |ui| {
            section_frame(ui, theme, "Appearance", |ui| {
                ui.horizontal(|ui| {
                    ui.label(RichText::new("Theme:").color(theme.text_muted));

                    egui::ComboBox::from_id_salt("theme_select")
                        .selected_text(config.launcher.theme.name())
                        .show_ui(ui, |ui| {
                            for preset in ThemePreset::all() {
                                let selected = config.launcher.theme == *preset;
                                if ui.selectable_label(selected, preset.name()).clicked()
                                    && !selected
                                {
                                    picked = Some(*preset);
                                }
                            }
                        });
                });

                ui.add_space(12.0);
                ui.horizontal(|ui| {
                    ui.label(RichText::new("Preview:").color(theme.text_muted));
                    ui.add_space(8.0);

                    let colors = [
                        ("Background", theme.bg_dark),
                        ("Accent", theme.accent),
                        ("Success", theme.success),
                        ("Premium", theme.premium),
                        ("Error", theme.error),
                    ];
                    for (label, color) in colors {
                        let (rect, response) =
                            ui.allocate_exact_size(Vec2::new(24.0, 24.0), egui::Sense::hover());
                        ui.painter().rect_filled(rect, 4.0, color);
                        response.on_hover_text(label);
                        ui.add_space(4.0);
                    }
                });
            });

            ui.add_space(12.0);

            section_frame(ui, theme, "Library", |ui| {
                egui::Grid::new("library_settings")
                    .num_columns(2)
                    .spacing([16.0, 6.0])
                    .show(ui, |ui| {
                        let rows = [
                            ("Variant", config.library.variant.name().to_string()),
                            ("Catalog", config.library.catalog_url.clone()),
                            (
                                "Tick interval",
                                format!("{} ms", config.simulator.tick_interval().as_millis()),
                            ),
                            (
                                "Speed range",
                                format!(
                                    "{:.1} - {:.1} MB/s",
                                    config.simulator.speed_range().0,
                                    config.simulator.speed_range().1
                                ),
                            ),
                        ];
                        for (label, value) in rows {
                            ui.label(RichText::new(label).color(theme.text_muted));
                            ui.label(RichText::new(value).color(theme.text_primary));
                            ui.end_row();
                        }
                    });

                ui.add_space(8.0);
                ui.label(
                    RichText::new("Edit these with `game-library config set` and restart.")
                        .color(theme.text_muted)
                        .size(11.0),
                );
            });
        });

    picked
}
