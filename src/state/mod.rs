//! Application state modules
//!
//! Grouped state structs owned by `LibraryApp`. Each one owns its fields and
//! background work, and reports results back through `StateEvent`s instead of
//! mutating the app directly.

mod catalog;
mod covers;
mod downloads;
mod ui;

pub use catalog::{CatalogState, UNAVAILABLE_STATUS};
pub use covers::CoverState;
pub use downloads::DownloadsState;
pub use ui::UiState;

use crate::catalog::GameRecord;

/// Events that state poll methods can return.
#[derive(Debug)]
pub enum StateEvent {
    /// Update the status message
    StatusMessage(String),

    /// The remote catalog arrived
    CatalogLoaded(Vec<GameRecord>),

    /// Log an error message
    LogError(String),

    /// Log an info message
    LogInfo(String),
}
