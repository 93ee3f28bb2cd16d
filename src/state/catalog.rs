//! Remote catalog fetch state

use eframe::egui;
use tokio::task::JoinHandle;

use crate::catalog::{CatalogClient, CatalogError, GameRecord};
use crate::state::StateEvent;
use crate::task::{PollResult, poll_task};

/// Status bar text after a failed fetch; details only go to the log
pub const UNAVAILABLE_STATUS: &str = "Catalog unavailable";

/// One-shot catalog fetch
#[derive(Default)]
pub struct CatalogState {
    /// Async fetch task
    task: Option<JoinHandle<Result<Vec<GameRecord>, CatalogError>>>,
    /// Whether a fetch is running
    pub loading: bool,
    /// Error from the last fetch, if it failed
    pub error: Option<String>,
}

impl CatalogState {
    /// Start fetching the catalog. Does nothing while a fetch is running.
    pub fn fetch(&mut self, client: &CatalogClient) -> Option<StateEvent> {
        if self.loading {
            return None;
        }

        self.loading = true;
        self.error = None;

        let client = client.clone();
        self.task = Some(tokio::spawn(async move { client.fetch().await }));

        Some(StateEvent::StatusMessage("Loading games...".to_string()))
    }

    /// Poll the fetch task for completion
    pub fn poll(&mut self, ctx: &egui::Context) -> Vec<StateEvent> {
        let mut events = Vec::new();

        match poll_task(&mut self.task) {
            PollResult::Complete(Ok(Ok(records))) => {
                let count = records.len();
                events.push(StateEvent::StatusMessage(format!("Loaded {} games", count)));
                events.push(StateEvent::LogInfo(format!("Catalog loaded with {} games", count)));
                events.push(StateEvent::CatalogLoaded(records));
                self.loading = false;
            }
            PollResult::Complete(Ok(Err(e))) => {
                let msg = e.to_string();
                events.push(StateEvent::LogError(format!("Error fetching games: {}", msg)));
                events.push(StateEvent::StatusMessage(UNAVAILABLE_STATUS.to_string()));
                self.error = Some(msg);
                self.loading = false;
            }
            PollResult::Complete(Err(e)) => {
                let msg = e.to_string();
                events.push(StateEvent::LogError(format!("Catalog task panicked: {}", msg)));
                self.error = Some(msg);
                self.loading = false;
            }
            PollResult::Pending => ctx.request_repaint(),
            PollResult::NoTask => {}
        }

        events
    }
}
