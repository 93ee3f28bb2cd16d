//! Application state of the game library.
//!
//! `LibraryState` is a plain, serializable record: catalog, filter criteria,
//! simulated downloads and started flags. Every transition consumes the
//! current state and returns the next one, so the UI and the CLI drive the
//! same logic and tests need no renderer.
//!
//! Transitions that do not apply (unknown id, locked game, wrong phase, or an
//! operation belonging to the other variant) return the state unchanged.

use serde::{Deserialize, Serialize};

use crate::catalog::{self, GameId, GameRecord, Variant};
use crate::filter::{self, CategoryFilter, FilterCriteria};
use crate::simulator::{DownloadPhase, Simulator, SpeedSource, TickOutcome};
use crate::tracker::StartedDownloads;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LibraryState {
    variant: Variant,
    catalog: Vec<GameRecord>,
    criteria: FilterCriteria,
    simulator: Simulator,
    started: StartedDownloads,
}

impl LibraryState {
    /// Create a library over `catalog`, dropping duplicate ids
    pub fn new(variant: Variant, catalog: Vec<GameRecord>) -> Self {
        Self {
            variant,
            catalog: catalog::ingest(catalog),
            ..Default::default()
        }
    }

    /// Library for `variant` before any catalog is available.
    ///
    /// The simulated variant starts with the seed catalog; the external one
    /// stays empty until its fetch completes.
    pub fn for_variant(variant: Variant) -> Self {
        match variant {
            Variant::Simulated => Self::new(variant, catalog::seed_catalog()),
            Variant::External => Self::new(variant, Vec::new()),
        }
    }

    pub fn variant(&self) -> Variant {
        self.variant
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    pub fn record(&self, id: GameId) -> Option<&GameRecord> {
        self.catalog.iter().find(|r| r.id == id)
    }

    /// Visible set for the current criteria, in catalog order
    pub fn visible(&self) -> impl Iterator<Item = &GameRecord> + '_ {
        filter::filter(&self.catalog, &self.criteria)
    }

    /// Download phase of a game, `None` for unknown ids
    pub fn phase(&self, id: GameId) -> Option<DownloadPhase> {
        self.record(id).map(|r| self.simulator.phase(r))
    }

    pub fn is_in_flight(&self, id: GameId) -> bool {
        self.simulator.is_in_flight(id)
    }

    pub fn in_flight_ids(&self) -> impl Iterator<Item = GameId> + '_ {
        self.simulator.in_flight_ids()
    }

    pub fn is_started(&self, id: GameId) -> bool {
        self.started.is_started(id)
    }

    /// Replace the catalog, e.g. when the remote fetch completes.
    ///
    /// Download state of games that disappeared is dropped.
    pub fn with_catalog(mut self, catalog: Vec<GameRecord>) -> Self {
        self.catalog = catalog::ingest(catalog);
        let ids: Vec<GameId> = self.catalog.iter().map(|r| r.id).collect();
        self.simulator.retain(|id| ids.contains(&id));
        self
    }

    pub fn search(mut self, term: &str) -> Self {
        self.criteria.search_term = term.to_string();
        self
    }

    pub fn select_category(mut self, category: CategoryFilter) -> Self {
        self.criteria.category = category;
        self
    }

    /// Start a simulated download
    pub fn start(mut self, id: GameId, speeds: &mut dyn SpeedSource) -> Self {
        if self.variant != Variant::Simulated {
            tracing::debug!("Ignoring start for game {} in {} library", id, self.variant.name());
            return self;
        }
        let Some(record) = self.catalog.iter().find(|r| r.id == id) else {
            tracing::debug!("Ignoring start for unknown game {}", id);
            return self;
        };

        if self.simulator.start(record, speeds) {
            tracing::info!("Download started: {} ({})", record.title, id);
        }
        self
    }

    /// Apply one timer tick to a simulated download
    pub fn tick(mut self, id: GameId, speeds: &mut dyn SpeedSource) -> Self {
        let Some(record) = self.catalog.iter_mut().find(|r| r.id == id) else {
            return self;
        };

        match self.simulator.tick(record, speeds) {
            TickOutcome::Completed => {
                tracing::info!("Download complete: {} ({})", record.title, id);
            }
            TickOutcome::Ignored => {
                tracing::debug!("Ignoring stale tick for game {}", id);
            }
            TickOutcome::Advanced(_) => {}
        }
        self
    }

    /// Cancel a simulated download
    pub fn cancel(mut self, id: GameId) -> Self {
        if self.simulator.cancel(id) {
            tracing::info!("Download cancelled: {}", id);
        }
        self
    }

    /// Record a click on an external download link.
    ///
    /// Returns the next state and the link to open, if navigation is allowed.
    pub fn open_download(mut self, id: GameId) -> (Self, Option<String>) {
        if self.variant != Variant::External {
            return (self, None);
        }
        let url = match self.catalog.iter().find(|r| r.id == id) {
            Some(record) => self.started.click(record),
            None => None,
        };
        (self, url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedSpeed(f64);

    impl SpeedSource for FixedSpeed {
        fn sample(&mut self) -> f64 {
            self.0
        }
    }

    fn external() -> LibraryState {
        let mut open = GameRecord::new(1, "Open World", "10 GB", "solo, multiplayer");
        open.download_url = Some("https://vmiguel.com/games/open.zip".to_string());
        let mut locked = GameRecord::new(2, "Locked Vault", "5 GB", "solo").locked();
        locked.download_url = Some("https://vmiguel.com/games/vault.zip".to_string());
        LibraryState::new(Variant::External, vec![open, locked])
    }

    #[test]
    fn test_simulated_starts_with_seed() {
        let state = LibraryState::for_variant(Variant::Simulated);
        assert_eq!(state.catalog.len(), 4);
        assert_eq!(state.visible().count(), 4);

        let state = LibraryState::for_variant(Variant::External);
        assert!(state.catalog.is_empty());
        assert_eq!(state.visible().count(), 0);
    }

    #[test]
    fn test_search_and_category() {
        let state = LibraryState::for_variant(Variant::Simulated).search("racing");
        let visible: Vec<GameId> = state.visible().map(|r| r.id).collect();
        assert_eq!(visible, vec![3]);

        let state = state.search("").select_category(CategoryFilter::parse("rpg"));
        let visible: Vec<GameId> = state.visible().map(|r| r.id).collect();
        assert_eq!(visible, vec![2]);
        assert_eq!(state.criteria().category.as_str(), "rpg");
    }

    #[test]
    fn test_download_lifecycle() {
        let mut speeds = FixedSpeed(9.0);
        let mut state = LibraryState::for_variant(Variant::Simulated).start(3, &mut speeds);
        assert!(state.is_in_flight(3));

        for _ in 0..99 {
            state = state.tick(3, &mut speeds);
        }
        assert!(matches!(
            state.phase(3),
            Some(DownloadPhase::Downloading(f)) if f.progress == 99
        ));

        state = state.tick(3, &mut speeds);
        assert_eq!(state.phase(3), Some(DownloadPhase::Downloaded));
        assert!(state.record(3).unwrap().downloaded);
        assert_eq!(state.in_flight_ids().count(), 0);

        let after = state.clone().tick(3, &mut speeds);
        assert_eq!(after, state);
    }

    #[test]
    fn test_locked_and_unknown_starts_are_noops() {
        let mut speeds = FixedSpeed(9.0);
        let state = LibraryState::for_variant(Variant::Simulated);
        let after = state.clone().start(2, &mut speeds).start(4, &mut speeds);
        assert_eq!(after, state);

        let after = state.clone().start(42, &mut speeds).tick(42, &mut speeds).cancel(42);
        assert_eq!(after, state);
    }

    #[test]
    fn test_cancel_returns_to_idle() {
        let mut speeds = FixedSpeed(9.0);
        let state = LibraryState::for_variant(Variant::Simulated)
            .start(1, &mut speeds)
            .tick(1, &mut speeds)
            .cancel(1);
        assert_eq!(state.phase(1), Some(DownloadPhase::Idle));

        // Idle cancel is a no-op
        let again = state.clone().cancel(1);
        assert_eq!(again, state);
    }

    #[test]
    fn test_variants_do_not_mix() {
        let mut speeds = FixedSpeed(9.0);
        let state = external();
        let after = state.clone().start(1, &mut speeds);
        assert_eq!(after, state);

        let (simulated, url) = LibraryState::for_variant(Variant::Simulated).open_download(1);
        assert!(url.is_none());
        assert!(!simulated.is_started(1));
    }

    #[test]
    fn test_open_download() {
        let (state, url) = external().open_download(1);
        assert_eq!(url.as_deref(), Some("https://vmiguel.com/games/open.zip"));
        assert!(state.is_started(1));

        let (twice, _) = state.clone().open_download(1);
        assert_eq!(twice, state);

        let (state, url) = state.open_download(2);
        assert!(url.is_none());
        assert!(!state.is_started(2));

        let (state, url) = state.open_download(99);
        assert!(url.is_none());
        assert!(!state.is_started(99));
    }

    #[test]
    fn test_with_catalog_replaces_records() {
        let mut speeds = FixedSpeed(9.0);
        let state = LibraryState::for_variant(Variant::Simulated)
            .start(1, &mut speeds)
            .start(3, &mut speeds);

        let catalog = vec![GameRecord::new(3, "Racing Masters 2024", "35.7 GB", "racing")];
        let state = state.with_catalog(catalog);
        assert_eq!(state.catalog.len(), 1);
        assert_eq!(state.in_flight_ids().collect::<Vec<_>>(), vec![3]);
    }

    #[test]
    fn test_state_serializes() {
        let mut speeds = FixedSpeed(9.0);
        let state = LibraryState::for_variant(Variant::Simulated)
            .search("a")
            .start(1, &mut speeds);
        let json = serde_json::to_string(&state).unwrap();
        let restored: LibraryState = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, state);
    }
}
