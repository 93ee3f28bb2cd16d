//! Simulated download progress.
//!
//! Each game moves through `Idle -> Downloading -> Downloaded`, or back to
//! `Idle` on cancel. Progress advances by one percent per tick and the
//! displayed speed is re-sampled on every tick; it is cosmetic only.
//!
//! The simulator only tracks games that are in flight. Completion is recorded
//! on the `GameRecord` itself (`downloaded = true`), so a game is never seen
//! at 100% progress.

use std::collections::BTreeMap;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::catalog::{GameId, GameRecord, ParsedSize};

/// Default speed bounds in MB/s, lower inclusive, upper exclusive
pub const MIN_SPEED: f64 = 5.0;
pub const MAX_SPEED: f64 = 15.0;

/// Progress of an in-flight download
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InFlight {
    /// 0..=99
    pub progress: u8,
    /// MB/s
    pub speed: f64,
}

/// Observable download state of one game
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DownloadPhase {
    Idle,
    Downloading(InFlight),
    Downloaded,
}

/// Result of a single tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The game was not downloading (stale or unknown tick)
    Ignored,
    /// Progress advanced to the given percentage
    Advanced(u8),
    /// The download finished and its timer must stop
    Completed,
}

/// Source of cosmetic download speeds
pub trait SpeedSource {
    fn sample(&mut self) -> f64;
}

/// Uniformly random speeds in `[min, max)`
pub struct RandomSpeed {
    rng: StdRng,
    min: f64,
    max: f64,
}

impl RandomSpeed {
    pub fn new(min: f64, max: f64) -> Self {
        Self {
            rng: StdRng::from_entropy(),
            min,
            max,
        }
    }

    /// Deterministic sequence, used by the CLI simulation with `--seed`
    pub fn seeded(min: f64, max: f64, seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            min,
            max,
        }
    }
}

impl SpeedSource for RandomSpeed {
    fn sample(&mut self) -> f64 {
        if !(self.max - self.min).is_finite() {
            MIN_SPEED
        } else if self.min < self.max {
            self.rng.gen_range(self.min..self.max)
        } else {
            self.min
        }
    }
}

/// In-flight downloads keyed by game id
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Simulator {
    in_flight: BTreeMap<GameId, InFlight>,
}

impl Simulator {
    /// Current phase of a game
    pub fn phase(&self, record: &GameRecord) -> DownloadPhase {
        if record.downloaded {
            DownloadPhase::Downloaded
        } else if let Some(flight) = self.in_flight.get(&record.id) {
            DownloadPhase::Downloading(*flight)
        } else {
            DownloadPhase::Idle
        }
    }

    pub fn is_in_flight(&self, id: GameId) -> bool {
        self.in_flight.contains_key(&id)
    }

    pub fn in_flight_ids(&self) -> impl Iterator<Item = GameId> + '_ {
        self.in_flight.keys().copied()
    }

    /// Begin downloading. Only valid from `Idle` on an unlocked game.
    ///
    /// Returns whether the game entered `Downloading`.
    pub fn start(&mut self, record: &GameRecord, speeds: &mut dyn SpeedSource) -> bool {
        if record.locked || record.downloaded || self.is_in_flight(record.id) {
            tracing::debug!("Ignoring start for game {} ({:?})", record.id, self.phase(record));
            return false;
        }

        self.in_flight.insert(
            record.id,
            InFlight {
                progress: 0,
                speed: speeds.sample(),
            },
        );
        true
    }

    /// Advance one percent, completing at 100.
    pub fn tick(&mut self, record: &mut GameRecord, speeds: &mut dyn SpeedSource) -> TickOutcome {
        let Some(flight) = self.in_flight.get_mut(&record.id) else {
            return TickOutcome::Ignored;
        };

        let next = flight.progress + 1;
        if next >= 100 {
            self.in_flight.remove(&record.id);
            record.downloaded = true;
            TickOutcome::Completed
        } else {
            flight.progress = next;
            flight.speed = speeds.sample();
            TickOutcome::Advanced(next)
        }
    }

    /// Abort an in-flight download. Returns whether anything was cancelled.
    pub fn cancel(&mut self, id: GameId) -> bool {
        self.in_flight.remove(&id).is_some()
    }

    /// Forget downloads for games no longer in the catalog
    pub fn retain(&mut self, mut keep: impl FnMut(GameId) -> bool) {
        self.in_flight.retain(|id, _| keep(*id));
    }
}

/// Size still to download at `progress` percent, rounded to one decimal.
pub fn remaining_size(size: &ParsedSize, progress: u8) -> f64 {
    let left = f64::from(100u8.saturating_sub(progress));
    let raw = size.value * left / 100.0;
    (raw * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::parse_size;

    /// Returns a fixed speed
    struct FixedSpeed(f64);

    impl SpeedSource for FixedSpeed {
        fn sample(&mut self) -> f64 {
            self.0
        }
    }

    fn racing() -> GameRecord {
        GameRecord::new(3, "Racing Masters 2024", "35.7 GB", "racing")
    }

    #[test]
    fn test_start_enters_downloading() {
        let mut sim = Simulator::default();
        let record = racing();
        assert_eq!(sim.phase(&record), DownloadPhase::Idle);

        assert!(sim.start(&record, &mut FixedSpeed(7.5)));
        assert_eq!(
            sim.phase(&record),
            DownloadPhase::Downloading(InFlight {
                progress: 0,
                speed: 7.5
            })
        );
    }

    #[test]
    fn test_start_is_idempotent() {
        let mut sim = Simulator::default();
        let mut record = racing();
        assert!(sim.start(&record, &mut FixedSpeed(7.5)));
        sim.tick(&mut record, &mut FixedSpeed(8.0));

        // A second start neither restarts nor resets progress
        assert!(!sim.start(&record, &mut FixedSpeed(9.0)));
        assert_eq!(
            sim.phase(&record),
            DownloadPhase::Downloading(InFlight {
                progress: 1,
                speed: 8.0
            })
        );
    }

    #[test]
    fn test_locked_game_rejects_start() {
        let mut sim = Simulator::default();
        let record = racing().locked();
        assert!(!sim.start(&record, &mut FixedSpeed(7.5)));
        assert_eq!(sim.phase(&record), DownloadPhase::Idle);
        assert_eq!(sim.in_flight_ids().count(), 0);
    }

    #[test]
    fn test_full_download_completes() {
        let mut sim = Simulator::default();
        let mut record = racing();
        sim.start(&record, &mut FixedSpeed(10.0));

        for expected in 1..=99u8 {
            assert_eq!(
                sim.tick(&mut record, &mut FixedSpeed(10.0)),
                TickOutcome::Advanced(expected)
            );
        }
        assert!(matches!(
            sim.phase(&record),
            DownloadPhase::Downloading(InFlight { progress: 99, .. })
        ));

        assert_eq!(
            sim.tick(&mut record, &mut FixedSpeed(10.0)),
            TickOutcome::Completed
        );
        assert!(record.downloaded);
        assert!(!sim.is_in_flight(record.id));
        assert_eq!(sim.phase(&record), DownloadPhase::Downloaded);

        // Further ticks are ignored
        assert_eq!(
            sim.tick(&mut record, &mut FixedSpeed(10.0)),
            TickOutcome::Ignored
        );
        assert_eq!(sim.phase(&record), DownloadPhase::Downloaded);

        // And a downloaded game cannot be restarted
        assert!(!sim.start(&record, &mut FixedSpeed(10.0)));
    }

    #[test]
    fn test_speed_resampled_each_tick() {
        struct Counting(f64);
        impl SpeedSource for Counting {
            fn sample(&mut self) -> f64 {
                self.0 += 1.0;
                self.0
            }
        }

        let mut sim = Simulator::default();
        let mut record = racing();
        let mut speeds = Counting(5.0);
        sim.start(&record, &mut speeds);
        sim.tick(&mut record, &mut speeds);
        sim.tick(&mut record, &mut speeds);
        assert_eq!(
            sim.phase(&record),
            DownloadPhase::Downloading(InFlight {
                progress: 2,
                speed: 8.0
            })
        );
    }

    #[test]
    fn test_cancel() {
        let mut sim = Simulator::default();
        let mut record = racing();

        // Idle: no-op
        assert!(!sim.cancel(record.id));

        sim.start(&record, &mut FixedSpeed(6.0));
        sim.tick(&mut record, &mut FixedSpeed(6.0));
        assert!(sim.cancel(record.id));
        assert_eq!(sim.phase(&record), DownloadPhase::Idle);

        // Stale tick after cancel does nothing
        assert_eq!(
            sim.tick(&mut record, &mut FixedSpeed(6.0)),
            TickOutcome::Ignored
        );
        assert_eq!(sim.phase(&record), DownloadPhase::Idle);
        assert!(!record.downloaded);

        // Downloaded: no-op
        record.downloaded = true;
        assert!(!sim.cancel(record.id));
        assert_eq!(sim.phase(&record), DownloadPhase::Downloaded);
    }

    #[test]
    fn test_random_speed_range() {
        let mut speeds = RandomSpeed::seeded(MIN_SPEED, MAX_SPEED, 42);
        for _ in 0..1000 {
            let speed = speeds.sample();
            assert!((MIN_SPEED..MAX_SPEED).contains(&speed), "speed {}", speed);
        }

        // Degenerate bounds fall back to the minimum
        let mut fixed = RandomSpeed::seeded(8.0, 8.0, 1);
        assert_eq!(fixed.sample(), 8.0);

        // Unbounded ranges never reach the sampler
        let mut unbounded = RandomSpeed::seeded(MIN_SPEED, f64::INFINITY, 1);
        assert_eq!(unbounded.sample(), MIN_SPEED);
        let mut nan = RandomSpeed::seeded(f64::NAN, MAX_SPEED, 1);
        assert_eq!(nan.sample(), MIN_SPEED);
    }

    #[test]
    fn test_remaining_size() {
        let size = parse_size("35.7 GB").unwrap();
        assert_eq!(remaining_size(&size, 0), 35.7);
        assert_eq!(remaining_size(&size, 50), 17.9);
        assert_eq!(remaining_size(&size, 99), 0.4);

        let size = parse_size("28.9 GB").unwrap();
        assert_eq!(remaining_size(&size, 10), 26.0);
    }

    #[test]
    fn test_retain() {
        let mut sim = Simulator::default();
        sim.start(&GameRecord::new(1, "A", "1 GB", ""), &mut FixedSpeed(5.0));
        sim.start(&GameRecord::new(2, "B", "1 GB", ""), &mut FixedSpeed(5.0));
        sim.retain(|id| id == 2);
        assert_eq!(sim.in_flight_ids().collect::<Vec<_>>(), vec![2]);
    }
}
