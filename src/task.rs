//! Polling helper for tokio tasks driven from the UI loop.
//!
//! The egui frame loop cannot `.await`, so background work is spawned and then
//! checked once per frame until it finishes.

use futures::FutureExt;
use tokio::task::{JoinError, JoinHandle};

/// Outcome of checking an optional task
pub enum PollResult<T> {
    /// Nothing was spawned
    NoTask,
    /// Still running
    Pending,
    /// Finished; the slot has been cleared
    Complete(Result<T, JoinError>),
}

/// Check `task` without blocking, taking its output once it has finished.
pub fn poll_task<T>(task: &mut Option<JoinHandle<T>>) -> PollResult<T> {
    let Some(handle) = task else {
        return PollResult::NoTask;
    };
    if !handle.is_finished() {
        return PollResult::Pending;
    }

    let Some(handle) = task.take() else {
        return PollResult::NoTask;
    };
    match handle.now_or_never() {
        Some(result) => PollResult::Complete(result),
        None => {
            tracing::warn!("Task reported finished but was not ready");
            PollResult::Pending
        }
    }
}
