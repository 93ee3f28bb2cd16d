//! Timers for simulated downloads
//!
//! The library state decides which games are in flight; this struct keeps
//! exactly one running ticker for each of them. After every transition the
//! timers are reconciled against the new state, so completion, cancellation
//! and catalog replacement all stop their ticker the same way.

use std::collections::HashMap;
use std::time::Duration;

use crate::catalog::GameId;
use crate::library::LibraryState;
use crate::scheduler::{TickHandle, TickScheduler};
use crate::simulator::SpeedSource;

pub struct DownloadsState<S: TickScheduler> {
    scheduler: S,
    timers: HashMap<GameId, S::Handle>,
    interval: Duration,
    speeds: Box<dyn SpeedSource>,
}

impl<S: TickScheduler> DownloadsState<S> {
    pub fn new(scheduler: S, interval: Duration, speeds: Box<dyn SpeedSource>) -> Self {
        Self {
            scheduler,
            timers: HashMap::new(),
            interval,
            speeds,
        }
    }

    /// Tick period of new timers
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Start a download and its ticker
    pub fn start(&mut self, library: LibraryState, id: GameId) -> LibraryState {
        let library = library.start(id, self.speeds.as_mut());
        self.reconcile(&library);
        library
    }

    /// Cancel a download and stop its ticker
    pub fn cancel(&mut self, library: LibraryState, id: GameId) -> LibraryState {
        let library = library.cancel(id);
        self.reconcile(&library);
        library
    }

    /// Apply one tick for `id`
    pub fn tick(&mut self, library: LibraryState, id: GameId) -> LibraryState {
        let library = library.tick(id, self.speeds.as_mut());
        self.reconcile(&library);
        library
    }

    /// Apply a batch of received ticks in arrival order
    pub fn apply_ticks(
        &mut self,
        library: LibraryState,
        ticks: impl IntoIterator<Item = GameId>,
    ) -> LibraryState {
        ticks
            .into_iter()
            .fold(library, |library, id| self.tick(library, id))
    }

    /// Bring timers in line with `library` after an outside change such as a
    /// catalog replacement
    pub fn sync(&mut self, library: &LibraryState) {
        self.reconcile(library);
    }

    pub fn active_timers(&self) -> usize {
        self.timers.len()
    }

    /// Cancel every timer
    pub fn stop_all(&mut self) {
        for (id, handle) in self.timers.drain() {
            tracing::debug!("Stopping ticker for game {}", id);
            handle.cancel();
        }
    }

    fn reconcile(&mut self, library: &LibraryState) {
        let stale: Vec<GameId> = self
            .timers
            .keys()
            .copied()
            .filter(|id| !library.is_in_flight(*id))
            .collect();
        for id in stale {
            if let Some(handle) = self.timers.remove(&id) {
                tracing::debug!("Stopping ticker for game {}", id);
                handle.cancel();
            }
        }

        for id in library.in_flight_ids() {
            if let std::collections::hash_map::Entry::Vacant(slot) = self.timers.entry(id) {
                tracing::debug!("Scheduling ticker for game {} every {:?}", id, self.interval);
                slot.insert(self.scheduler.schedule(id, self.interval));
            }
        }
    }
}

impl<S: TickScheduler> Drop for DownloadsState<S> {
    fn drop(&mut self) {
        self.stop_all();
    }
}
