//! Cover texture cache

use std::collections::HashMap;
use std::time::Duration;

use eframe::egui;
use tokio::sync::mpsc;

use crate::catalog::GameId;
use crate::covers::{self, CoverError, CoverImage};
use crate::state::StateEvent;

/// Textures uploaded per frame, so a burst of covers does not stall a frame
const UPLOADS_PER_FRAME: usize = 5;

/// Where a game's cover is
pub enum CoverSlot {
    Loading,
    Ready(egui::TextureHandle),
    /// The card keeps its placeholder
    Failed,
}

type CoverResult = (GameId, Result<CoverImage, CoverError>);

/// Fetches covers in the background and caches them as textures by game id
pub struct CoverState {
    client: Option<reqwest::Client>,
    slots: HashMap<GameId, CoverSlot>,
    tx: mpsc::UnboundedSender<CoverResult>,
    rx: mpsc::UnboundedReceiver<CoverResult>,
}

impl Default for CoverState {
    fn default() -> Self {
        Self::new()
    }
}

impl CoverState {
    pub fn new() -> Self {
        let client = covers::cover_client()
            .inspect_err(|e| tracing::warn!("Cover images disabled: {}", e))
            .ok();
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            client,
            slots: HashMap::new(),
            tx,
            rx,
        }
    }

    /// Start fetching the cover for `id` unless it was already requested
    pub fn request(&mut self, id: GameId, url: &str) {
        if self.slots.contains_key(&id) {
            return;
        }
        let Some(client) = self.client.clone() else {
            self.slots.insert(id, CoverSlot::Failed);
            return;
        };

        self.slots.insert(id, CoverSlot::Loading);
        let tx = self.tx.clone();
        let url = url.to_string();
        tokio::spawn(async move {
            let result = covers::fetch_cover(&client, &url).await;
            if let Err(e) = &result {
                tracing::debug!("Cover {} failed: {}", url, e);
            }
            // Receiver gone means the app is shutting down
            let _ = tx.send((id, result));
        });
    }

    /// Upload covers that arrived since the last frame
    pub fn poll(&mut self, ctx: &egui::Context) -> Vec<StateEvent> {
        let mut events = Vec::new();

        for _ in 0..UPLOADS_PER_FRAME {
            let Ok((id, result)) = self.rx.try_recv() else {
                break;
            };
            let slot = match result {
                Ok(cover) => {
                    let image = egui::ColorImage::from_rgba_unmultiplied(cover.size(), &cover.pixels);
                    let texture =
                        ctx.load_texture(format!("cover_{}", id), image, egui::TextureOptions::LINEAR);
                    CoverSlot::Ready(texture)
                }
                Err(e) => {
                    events.push(StateEvent::LogError(format!("Cover for game {} failed: {}", id, e)));
                    CoverSlot::Failed
                }
            };
            self.slots.insert(id, slot);
            ctx.request_repaint();
        }

        if self.is_loading() {
            ctx.request_repaint_after(Duration::from_millis(100));
        }

        events
    }

    pub fn texture(&self, id: GameId) -> Option<&egui::TextureHandle> {
        match self.slots.get(&id) {
            Some(CoverSlot::Ready(texture)) => Some(texture),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.slots.values().any(|slot| matches!(slot, CoverSlot::Loading))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::covers::tests::{png_bytes, serve_bytes};

    async fn poll_until_settled(state: &mut CoverState) -> Vec<StateEvent> {
        let ctx = egui::Context::default();
        let mut events = Vec::new();
        loop {
            events.extend(state.poll(&ctx));
            if !state.is_loading() {
                return events;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    }

    #[tokio::test]
    async fn test_cover_becomes_texture() {
        let url = serve_bytes("200 OK", png_bytes(6, 4)).await;

        let mut state = CoverState::new();
        state.request(1, &url);
        assert!(state.is_loading());
        assert!(state.texture(1).is_none());

        let events = poll_until_settled(&mut state).await;
        assert!(events.is_empty());
        let texture = state.texture(1).expect("cover should load");
        assert_eq!(texture.size(), [6, 4]);
    }

    #[tokio::test]
    async fn test_failed_cover_keeps_placeholder() {
        let url = serve_bytes("200 OK", b"not an image".to_vec()).await;

        let mut state = CoverState::new();
        state.request(2, &url);

        let events = poll_until_settled(&mut state).await;
        assert!(events.iter().any(|e| matches!(e, StateEvent::LogError(_))));
        assert!(state.texture(2).is_none());
        assert!(matches!(state.slots.get(&2), Some(CoverSlot::Failed)));
    }

    #[tokio::test]
    async fn test_each_cover_requested_once() {
        let url = serve_bytes("200 OK", png_bytes(2, 2)).await;

        let mut state = CoverState::new();
        state.request(3, &url);
        // A second fetch would find no listener and fail
        state.request(3, "http://127.0.0.1:1/unused.png");
        assert_eq!(state.slots.len(), 1);

        poll_until_settled(&mut state).await;
        assert!(state.texture(3).is_some());
    }
}
