//! Periodic tick scheduling for simulated downloads.
//!
//! A scheduled ticker never touches library state. It only sends the id of
//! its game over a channel; the UI thread drains the channel and applies each
//! tick to the state machine, which ignores ticks for games that are no
//! longer downloading.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::catalog::GameId;

/// Handle to a running ticker. Cancelling consumes it.
pub trait TickHandle {
    fn cancel(self);
}

/// Something that can start a periodic ticker for a game
pub trait TickScheduler {
    type Handle: TickHandle;

    fn schedule(&mut self, id: GameId, every: Duration) -> Self::Handle;
}

/// Tokio-backed scheduler: one task per ticker
pub struct TokioTicker {
    tx: mpsc::UnboundedSender<GameId>,
}

/// Receiving end of the tick channel
pub struct TickReceiver {
    rx: mpsc::UnboundedReceiver<GameId>,
}

/// Create a tokio scheduler and the receiver its ticks arrive on
pub fn tokio_ticker() -> (TokioTicker, TickReceiver) {
    let (tx, rx) = mpsc::unbounded_channel();
    (TokioTicker { tx }, TickReceiver { rx })
}

impl TickReceiver {
    /// Take every tick received so far without waiting
    pub fn drain(&mut self) -> Vec<GameId> {
        let mut ticks = Vec::new();
        while let Ok(id) = self.rx.try_recv() {
            ticks.push(id);
        }
        ticks
    }
}

pub struct TokioTickHandle {
    task: JoinHandle<()>,
}

impl TickHandle for TokioTickHandle {
    fn cancel(self) {
        self.task.abort();
    }
}

impl TickScheduler for TokioTicker {
    type Handle = TokioTickHandle;

    fn schedule(&mut self, id: GameId, every: Duration) -> TokioTickHandle {
        let tx = self.tx.clone();
        let task = tokio::spawn(async move {
            let mut interval = tokio::time::interval(every);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The first tick fires immediately; the first step is due one period after start
            interval.tick().await;
            loop {
                interval.tick().await;
                if tx.send(id).is_err() {
                    break;
                }
            }
        });
        TokioTickHandle { task }
    }
}
