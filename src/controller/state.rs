//! Session state.

use crate::models::{RoomRecord, TimeWindow};
use serde::Serialize;

/// Where the controller is in its search cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchPhase {
    /// No search has been started.
    #[default]
    Idle,
    /// A search is in flight.
    Loading,
    /// The latest search returned rooms.
    Success,
    /// The latest search failed.
    Failed,
}

impl SearchPhase {
    /// Returns the phase as a string slice.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Loading => "loading",
            Self::Success => "success",
            Self::Failed => "failed",
        }
    }
}

/// Everything the room list screen shows.
///
/// Only [`super::SearchController`] mutates this; everyone else reads it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchState {
    /// Building filter; empty means all buildings.
    pub building: String,
    /// Selected window.
    pub window: TimeWindow,
    /// Rooms from the last successful search, in service order.
    pub rooms: Vec<RoomRecord>,
    /// Whether a search is in flight.
    pub loading: bool,
    /// Error from the last search, set while the phase is `Failed` and
    /// when a search is refused for an invalid window.
    pub error: Option<String>,
    /// Status message from the last successful action.
    pub message: Option<String>,
    /// Error from the last scrape request; kept apart from `error` so it
    /// never changes what the search phase reports.
    pub collection_error: Option<String>,
    /// Current phase.
    pub phase: SearchPhase,
}

impl SearchState {
    /// Fresh state for a session.
    #[must_use]
    pub const fn new(window: TimeWindow) -> Self {
        Self {
            building: String::new(),
            window,
            rooms: Vec::new(),
            loading: false,
            error: None,
            message: None,
            collection_error: None,
            phase: SearchPhase::Idle,
        }
    }
}
