//! "Download started" flags for the external-link variant.
//!
//! Clicking a game's download link records that the download was started and
//! hands back the link to open. Flags only ever go from unset to set.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::catalog::{GameId, GameRecord};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartedDownloads {
    started: BTreeSet<GameId>,
}

impl StartedDownloads {
    pub fn is_started(&self, id: GameId) -> bool {
        self.started.contains(&id)
    }

    /// Handle a click on a game's download link.
    ///
    /// Locked games and games without a link are suppressed: nothing is
    /// recorded and `None` is returned. Otherwise the flag is set and the link
    /// to open is returned.
    pub fn click(&mut self, record: &GameRecord) -> Option<String> {
        if record.locked {
            tracing::debug!("Suppressed download click on locked game {}", record.id);
            return None;
        }
        let Some(url) = &record.download_url else {
            tracing::warn!("No download link for {} ({})", record.title, record.id);
            return None;
        };

        if self.started.insert(record.id) {
            tracing::info!("Download started for {} ({})", record.title, record.id);
        }
        Some(url.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn linked(id: GameId) -> GameRecord {
        let mut record = GameRecord::new(id, "Linked", "3 GB", "solo");
        record.download_url = Some(format!("https://example.com/games/{}.zip", id));
        record
    }

    #[test]
    fn test_click_marks_started() {
        let mut started = StartedDownloads::default();
        let record = linked(5);
        assert!(!started.is_started(5));

        let url = started.click(&record);
        assert_eq!(url.as_deref(), Some("https://example.com/games/5.zip"));
        assert!(started.is_started(5));
    }

    #[test]
    fn test_click_is_idempotent() {
        let mut once = StartedDownloads::default();
        once.click(&linked(5));

        let mut twice = StartedDownloads::default();
        twice.click(&linked(5));
        twice.click(&linked(5));

        assert_eq!(once, twice);
    }

    #[test]
    fn test_locked_click_is_suppressed() {
        let mut started = StartedDownloads::default();
        let record = linked(9).locked();
        assert_eq!(started.click(&record), None);
        assert!(!started.is_started(9));
        assert_eq!(started, StartedDownloads::default());
    }

    #[test]
    fn test_click_without_link_is_suppressed() {
        let mut started = StartedDownloads::default();
        let record = GameRecord::new(4, "No File", "2 GB", "solo");
        assert_eq!(started.click(&record), None);
        assert!(!started.is_started(4));
        assert_eq!(started, StartedDownloads::default());
    }
}
