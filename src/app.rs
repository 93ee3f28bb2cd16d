use eframe::egui;

use crate::catalog::{CatalogClient, Variant};
use crate::config::Config;
use crate::library::LibraryState;
use crate::scheduler::{TickReceiver, TokioTicker, tokio_ticker};
use crate::simulator::RandomSpeed;
use crate::state::{
    CatalogState, CoverState, DownloadsState, StateEvent, UNAVAILABLE_STATUS, UiState,
};
use crate::ui;
use crate::view::{self, LibraryEvent};

/// Main application state
pub struct LibraryApp {
    /// Application configuration
    config: Config,
    /// Catalog, filter and download state
    library: LibraryState,
    /// Remote catalog fetch (external variant)
    catalog: CatalogState,
    /// Cover textures by game id
    covers: CoverState,
    /// Tickers for simulated downloads
    downloads: DownloadsState<TokioTicker>,
    /// Where ticker ids arrive
    ticks: TickReceiver,
    /// Theme and input state
    ui: UiState,
    /// Status message for the status bar
    status_message: String,
    /// Whether the settings window is open
    show_settings: bool,
}

impl LibraryApp {
    /// Create a new application instance
    pub fn new(_cc: &eframe::CreationContext<'_>, config: Config) -> Self {
        let variant = config.library.variant;
        let (scheduler, ticks) = tokio_ticker();
        let (min_speed, max_speed) = config.simulator.speed_range();
        let downloads = DownloadsState::new(
            scheduler,
            config.simulator.tick_interval(),
            Box::new(RandomSpeed::new(min_speed, max_speed)),
        );

        let mut app = Self {
            library: LibraryState::for_variant(variant),
            catalog: CatalogState::default(),
            covers: CoverState::new(),
            downloads,
            ticks,
            ui: UiState::new(config.launcher.theme),
            status_message: "Ready".to_string(),
            show_settings: false,
            config,
        };

        if variant == Variant::External {
            app.fetch_catalog();
        }

        app
    }

    /// Start the one-shot remote catalog fetch
    fn fetch_catalog(&mut self) {
        match CatalogClient::new(self.config.library.endpoints()) {
            Ok(client) => {
                if let Some(event) = self.catalog.fetch(&client) {
                    self.handle_state_event(event);
                }
            }
            Err(e) => {
                tracing::error!("Failed to create catalog client: {}", e);
                self.status_message = UNAVAILABLE_STATUS.to_string();
            }
        }
    }

    fn handle_state_event(&mut self, event: StateEvent) {
        match event {
            StateEvent::StatusMessage(msg) => self.status_message = msg,
            StateEvent::CatalogLoaded(records) => {
                let library = std::mem::take(&mut self.library);
                self.library = library.with_catalog(records);
                self.downloads.sync(&self.library);
            }
            StateEvent::LogError(msg) => tracing::error!("{}", msg),
            StateEvent::LogInfo(msg) => tracing::info!("{}", msg),
        }
    }

    fn handle_library_event(&mut self, event: LibraryEvent) {
        let library = std::mem::take(&mut self.library);
        self.library = match event {
            LibraryEvent::SearchChanged(term) => library.search(&term),
            LibraryEvent::CategorySelected(category) => library.select_category(category),
            LibraryEvent::Start(id) => self.downloads.start(library, id),
            LibraryEvent::Cancel(id) => self.downloads.cancel(library, id),
            LibraryEvent::OpenDownload(id) => {
                let (library, url) = library.open_download(id);
                if let (Some(url), Some(record)) = (url, library.record(id)) {
                    let title = record.title.clone();
                    self.open_link(&title, &url);
                }
                library
            }
        };
    }

    /// Navigate to a download link in the system browser
    fn open_link(&mut self, title: &str, url: &str) {
        match open::that(url) {
            Ok(()) => {
                tracing::info!("Opened download link for {}: {}", title, url);
                self.status_message = format!("Download started: {}", title);
            }
            Err(e) => {
                tracing::error!("Failed to open {}: {}", url, e);
                self.status_message = format!("Could not open download link: {}", e);
            }
        }
    }

    /// Apply every tick received since the last frame
    fn apply_ticks(&mut self) {
        let ticks = self.ticks.drain();
        if ticks.is_empty() {
            return;
        }
        let library = std::mem::take(&mut self.library);
        self.library = self.downloads.apply_ticks(library, ticks);
    }

    fn set_theme(&mut self, preset: ui::ThemePreset) {
        if self.ui.set_preset(preset) {
            self.config.launcher.theme = preset;
            self.save_config();
        }
    }

    fn save_config(&self) {
        if let Err(e) = self.config.save() {
            tracing::error!("Failed to save config: {}", e);
        }
    }
}

impl eframe::App for LibraryApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if self.ui.theme_dirty {
            self.ui.current_theme.apply(ctx);
            self.ui.theme_dirty = false;
        }

        // Poll async work
        for event in self.catalog.poll(ctx) {
            self.handle_state_event(event);
        }
        for event in self.covers.poll(ctx) {
            self.handle_state_event(event);
        }
        self.apply_ticks();

        let theme = self.ui.current_theme.clone();

        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::MenuBar::new().ui(ui, |ui| {
                ui.menu_button("File", |ui| {
                    if ui.button("Settings").clicked() {
                        self.show_settings = true;
                    }
                    if ui.button("Exit").clicked() {
                        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                    }
                });
            });
        });

        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(egui::RichText::new(&self.status_message).color(theme.text_secondary));
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let in_flight = self.downloads.active_timers();
                    if in_flight > 0 {
                        ui.label(
                            egui::RichText::new(format!("{} downloading", in_flight))
                                .color(theme.accent),
                        );
                    }
                    if self.catalog.loading {
                        ui.spinner();
                    }
                });
            });
        });

        let view = view::build(&self.library);
        for card in &view.cards {
            if let Some(url) = &card.image {
                self.covers.request(card.id, url);
            }
        }

        let events = egui::CentralPanel::default()
            .show(ctx, |ui| {
                ui::render_library(ui, &view, &theme, &self.covers, &mut self.ui.search_input)
            })
            .inner;

        for event in events {
            self.handle_library_event(event);
        }

        if self.show_settings {
            let mut open = true;
            let picked = ui::render_settings_window(ctx, &mut open, &self.config, &theme);
            self.show_settings = open;
            if let Some(preset) = picked {
                self.set_theme(preset);
            }
        }

        // Progress only moves on ticks, so keep frames coming while anything is in flight
        if self.library.in_flight_ids().next().is_some() {
            ctx.request_repaint_after(self.downloads.interval());
        }
    }
}
