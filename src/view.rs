//! View model: what the library grid shows for the current state.

use serde::Serialize;

use crate::catalog::{GameId, GameRecord, Variant};
use crate::filter::CategoryFilter;
use crate::library::LibraryState;
use crate::simulator::{DownloadPhase, remaining_size};

/// Shown instead of the grid when nothing matches
pub const EMPTY_MESSAGE: &str = "No games found matching your search criteria";

/// User input emitted by the renderer
#[derive(Debug, Clone, PartialEq)]
pub enum LibraryEvent {
    SearchChanged(String),
    CategorySelected(CategoryFilter),
    Start(GameId),
    Cancel(GameId),
    OpenDownload(GameId),
}

/// What the card's action area shows
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum CardAction {
    /// Start button (simulated) or download link (external)
    Download,
    /// Disabled, entitlement missing
    Locked,
    /// Progress bar with a cancel button
    Downloading {
        progress: u8,
        /// MB/s
        speed: f64,
        /// e.g. "17.9 GB", absent when the size has no numeric prefix
        remaining: Option<String>,
    },
    Downloaded,
    /// External link already opened
    DownloadStarted,
    /// External record without a download link
    Unavailable,
}

impl CardAction {
    pub fn label(&self) -> &'static str {
        match self {
            CardAction::Download => "Download",
            CardAction::Locked => "Locked",
            CardAction::Downloading { .. } => "Cancel",
            CardAction::Downloaded => "Downloaded",
            CardAction::DownloadStarted => "Download Started",
            CardAction::Unavailable => "Unavailable",
        }
    }
}

/// One game card
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CardView {
    pub id: GameId,
    pub title: String,
    pub size: String,
    pub image: Option<String>,
    pub premium: bool,
    pub action: CardAction,
}

/// Everything the renderer needs for one frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LibraryView {
    pub variant: Variant,
    pub cards: Vec<CardView>,
    /// Set when `cards` is empty
    pub empty_message: Option<&'static str>,
    /// Selector values, "all" first
    pub categories: Vec<&'static str>,
    pub selected_category: String,
    pub search_term: String,
}

/// Remaining-size label for a download at `progress` percent
pub fn remaining_label(size: &str, progress: u8) -> Option<String> {
    let parsed = crate::catalog::parse_size(size)?;
    Some(format!("{:.1} {}", remaining_size(&parsed, progress), parsed.unit))
}

/// Speed label as shown next to the size
pub fn speed_label(speed: f64) -> String {
    format!("{:.1} MB/s", speed)
}

fn card_action(state: &LibraryState, record: &GameRecord) -> CardAction {
    match state.variant() {
        Variant::Simulated => match state.phase(record.id) {
            Some(DownloadPhase::Downloaded) => CardAction::Downloaded,
            Some(DownloadPhase::Downloading(flight)) => CardAction::Downloading {
                progress: flight.progress,
                speed: flight.speed,
                remaining: remaining_label(&record.size, flight.progress),
            },
            _ if record.locked => CardAction::Locked,
            _ => CardAction::Download,
        },
        Variant::External => {
            if record.locked {
                CardAction::Locked
            } else if state.is_started(record.id) {
                CardAction::DownloadStarted
            } else if record.download_url.is_none() {
                CardAction::Unavailable
            } else {
                CardAction::Download
            }
        }
    }
}

/// Project the library state into cards
pub fn build(state: &LibraryState) -> LibraryView {
    let cards: Vec<CardView> = state
        .visible()
        .map(|record| CardView {
            id: record.id,
            title: record.title.clone(),
            size: record.size.clone(),
            image: record.image.clone(),
            premium: record.premium,
            action: card_action(state, record),
        })
        .collect();

    let empty_message = cards.is_empty().then_some(EMPTY_MESSAGE);

    let mut categories = vec!["all"];
    categories.extend_from_slice(state.variant().categories());

    LibraryView {
        variant: state.variant(),
        cards,
        empty_message,
        categories,
        selected_category: state.criteria().category.as_str().to_string(),
        search_term: state.criteria().search_term.clone(),
    }
}
