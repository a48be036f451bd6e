//! Search session controller.
//!
//! Owns the [`SearchState`] for one session and moves it through
//! `Idle → Loading → Success | Failed`. Every search is stamped with a
//! generation number; a completion that does not carry the current
//! generation belongs to a superseded search and is dropped, so the latest
//! request always wins.

mod pending;
mod state;

pub use pending::PendingSearch;
pub use state::{SearchPhase, SearchState};

use crate::client::AvailabilityService;
use crate::models::{CollectionAck, DisplayRecord, RoomRecord, TimeWindow};
use crate::rendering::RoomDisplayMapper;
use crate::{Error, Result};
use chrono::NaiveDateTime;
use std::sync::Arc;

/// Reported when the window does not start before it ends.
pub const INVALID_WINDOW_MESSAGE: &str = "Start must be before End!";
/// Reported after a successful search.
pub const ROOMS_LOADED_MESSAGE: &str = "Rooms loaded successfully!";

/// A search that has been started and awaits its completion.
///
/// Carries the query that was issued so the request can run elsewhere.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTicket {
    generation: u64,
    building: String,
    window: TimeWindow,
}

impl SearchTicket {
    /// Generation the search was started under.
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// Building filter to query with (empty for all).
    #[must_use]
    pub fn building(&self) -> &str {
        &self.building
    }

    /// Window to query.
    #[must_use]
    pub const fn window(&self) -> &TimeWindow {
        &self.window
    }
}

/// Drives searches for a single session.
#[derive(Debug, Clone)]
pub struct SearchController {
    state: SearchState,
    generation: u64,
}

impl SearchController {
    /// Creates a controller with an empty building filter and the given window.
    #[must_use]
    pub fn new(window: TimeWindow) -> Self {
        Self {
            state: SearchState::new(window),
            generation: 0,
        }
    }

    /// Creates a controller with today's default window (12:00 to 14:00).
    #[must_use]
    pub fn for_today() -> Self {
        Self::new(TimeWindow::today())
    }

    /// Read-only view of the session state.
    #[must_use]
    pub const fn state(&self) -> &SearchState {
        &self.state
    }

    /// Generation of the most recently started search (0 before the first).
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// Sets the building filter. Empty means all buildings.
    pub fn set_building(&mut self, building: impl Into<String>) {
        self.state.building = building.into();
    }

    /// Replaces the window.
    pub const fn set_window(&mut self, window: TimeWindow) {
        self.state.window = window;
    }

    /// Moves the start of the window.
    pub fn set_start(&mut self, start: NaiveDateTime) {
        self.state.window = self.state.window.with_start(start);
    }

    /// Moves the end of the window.
    pub fn set_end(&mut self, end: NaiveDateTime) {
        self.state.window = self.state.window.with_end(end);
    }

    /// Starts a search for the current building and window.
    ///
    /// On success the state enters `Loading`, the error and message are
    /// cleared, and the returned ticket describes the request to issue.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] if the window does not start before it
    /// ends. The message is recorded as the state's error; the phase does not
    /// change and nothing should be sent.
    pub fn begin_search(&mut self) -> Result<SearchTicket> {
        if let Err(e) = self.validate_window() {
            self.state.error = Some(e.to_string());
            return Err(e);
        }

        self.generation += 1;
        self.state.phase = SearchPhase::Loading;
        self.state.loading = true;
        self.state.error = None;
        self.state.message = None;
        self.state.collection_error = None;

        tracing::info!(
            generation = self.generation,
            building = %self.state.building,
            start = %self.state.window.start(),
            end = %self.state.window.end(),
            "Search started"
        );

        Ok(SearchTicket {
            generation: self.generation,
            building: self.state.building.clone(),
            window: self.state.window,
        })
    }

    /// Applies the outcome of the search identified by `ticket`.
    ///
    /// Returns `false`, leaving the state untouched, when a newer search has
    /// been started since. A failure keeps the rooms from the last success.
    pub fn complete(&mut self, ticket: &SearchTicket, result: Result<Vec<RoomRecord>>) -> bool {
        if ticket.generation != self.generation {
            tracing::debug!(
                generation = ticket.generation,
                current = self.generation,
                "Discarding superseded search result"
            );
            metrics::counter!("studysphere_stale_responses_total").increment(1);
            return false;
        }

        self.state.loading = false;
        match result {
            Ok(rooms) => {
                tracing::info!(
                    generation = ticket.generation,
                    count = rooms.len(),
                    "Search succeeded"
                );
                self.state.rooms = rooms;
                self.state.error = None;
                self.state.message = Some(ROOMS_LOADED_MESSAGE.to_string());
                self.state.phase = SearchPhase::Success;
            },
            Err(e) => {
                tracing::warn!(generation = ticket.generation, error = %e, "Search failed");
                self.state.error = Some(e.to_string());
                self.state.phase = SearchPhase::Failed;
            },
        }
        true
    }

    /// Runs a search to completion on the calling thread.
    ///
    /// Request failures are recorded in the state, not returned; the phase
    /// afterwards is `Success` or `Failed`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] if the window is invalid, in which case no
    /// request is made.
    pub fn search<S>(&mut self, service: &S) -> Result<SearchPhase>
    where
        S: AvailabilityService + ?Sized,
    {
        let ticket = self.begin_search()?;
        let result = service.fetch_availability(ticket.building(), ticket.window());
        self.complete(&ticket, result);
        Ok(self.state.phase)
    }

    /// Starts a search and issues its request on a background thread.
    ///
    /// Hand the returned [`PendingSearch`] to [`Self::finish`] or
    /// [`Self::poll`] to apply the outcome.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] if the window is invalid, in which case no
    /// request is made.
    pub fn spawn_search<S>(&mut self, service: Arc<S>) -> Result<PendingSearch>
    where
        S: AvailabilityService + ?Sized + 'static,
    {
        let ticket = self.begin_search()?;
        Ok(PendingSearch::spawn(ticket, service))
    }

    /// Waits for a background search and applies its outcome.
    ///
    /// Returns whether the outcome was applied (see [`Self::complete`]).
    pub fn finish(&mut self, pending: PendingSearch) -> bool {
        let (ticket, result) = pending.wait();
        self.complete(&ticket, result)
    }

    /// Applies a background search's outcome if it has arrived.
    ///
    /// Returns `None` while the request is still running.
    pub fn poll(&mut self, pending: &mut PendingSearch) -> Option<bool> {
        let result = pending.try_result()?;
        Some(self.complete(pending.ticket(), result))
    }

    /// Asks the service to collect fresh data for the current window.
    ///
    /// The acknowledgement goes to the state's message; any failure, including
    /// an invalid window, goes to `collection_error`. Rooms, phase, the search
    /// error and the search generation are left alone.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] for an invalid window (no request made),
    /// otherwise the service error.
    pub fn collect<S>(&mut self, service: &S) -> Result<CollectionAck>
    where
        S: AvailabilityService + ?Sized,
    {
        let outcome = self
            .validate_window()
            .and_then(|()| service.trigger_collection(&self.state.window));

        match outcome {
            Ok(ack) => {
                tracing::info!(message = %ack.message, "Collection triggered");
                self.state.collection_error = None;
                self.state.message = Some(ack.message.clone());
                Ok(ack)
            },
            Err(e) => {
                tracing::warn!(error = %e, "Collection failed");
                self.state.collection_error = Some(e.to_string());
                Err(e)
            },
        }
    }

    /// Maps the current rooms for display.
    #[must_use]
    pub fn display_records(&self, mapper: &RoomDisplayMapper) -> Vec<DisplayRecord> {
        mapper.map_all(&self.state.rooms)
    }

    fn validate_window(&self) -> Result<()> {
        if self.state.window.is_valid() {
            return Ok(());
        }
        tracing::debug!(
            start = %self.state.window.start(),
            end = %self.state.window.end(),
            "Rejected search window"
        );
        Err(Error::Validation(INVALID_WINDOW_MESSAGE.to_string()))
    }
}

impl Default for SearchController {
    fn default() -> Self {
        Self::for_today()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

    /// Fake service that replays queued outcomes and counts calls.
    struct FakeService {
        outcomes: Mutex<Vec<Result<Vec<RoomRecord>>>>,
        fetches: AtomicU32,
        collections: AtomicU32,
        collection_fails: AtomicBool,
    }

    impl FakeService {
        fn new(outcomes: Vec<Result<Vec<RoomRecord>>>) -> Self {
            Self {
                outcomes: Mutex::new(outcomes),
                fetches: AtomicU32::new(0),
                collections: AtomicU32::new(0),
                collection_fails: AtomicBool::new(false),
            }
        }
    }

    impl AvailabilityService for FakeService {
        fn name(&self) -> &'static str {
            "fake"
        }

        fn fetch_availability(&self, _building: &str, _window: &TimeWindow) -> Result<Vec<RoomRecord>> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            let mut outcomes = self.outcomes.lock().unwrap();
            if outcomes.is_empty() {
                Ok(Vec::new())
            } else {
                outcomes.remove(0)
            }
        }

        fn trigger_collection(&self, _window: &TimeWindow) -> Result<CollectionAck> {
            self.collections.fetch_add(1, Ordering::SeqCst);
            if self.collection_fails.load(Ordering::SeqCst) {
                return Err(Error::QueryFailed {
                    status: 502,
                    body: "scraper offline".to_string(),
                });
            }
            Ok(CollectionAck {
                message: "Scrape completed!".to_string(),
            })
        }
    }

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 3, 15)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    fn koerner(num: &str) -> RoomRecord {
        RoomRecord {
            room_num: num.to_string(),
            group: "Koerner Group Study Rooms".to_string(),
            date: "2025-03-15".to_string(),
            start_time: "12:00".to_string(),
            end_time: "13:00".to_string(),
            url: "https://x".to_string(),
        }
    }

    fn controller() -> SearchController {
        SearchController::new(TimeWindow::new(at(12, 0), at(14, 0)))
    }

    #[test]
    fn test_initial_state() {
        let controller = controller();
        let state = controller.state();
        assert_eq!(state.phase, SearchPhase::Idle);
        assert_eq!(state.building, "");
        assert!(state.rooms.is_empty());
        assert!(!state.loading);
        assert!(state.error.is_none());
        assert!(state.message.is_none());
        assert_eq!(controller.generation(), 0);
    }

    #[test]
    fn test_begin_search_enters_loading() {
        let mut controller = controller();
        controller.set_building("Koerner");
        let ticket = controller.begin_search().unwrap();

        assert_eq!(ticket.generation(), 1);
        assert_eq!(ticket.building(), "Koerner");
        assert_eq!(ticket.window().start(), at(12, 0));
        assert_eq!(controller.state().phase, SearchPhase::Loading);
        assert!(controller.state().loading);
    }

    #[test]
    fn test_invalid_window_makes_no_call() {
        let service = FakeService::new(vec![]);
        let mut controller = controller();
        controller.set_end(at(12, 0));

        let err = controller.search(&service).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
        assert_eq!(service.fetches.load(Ordering::SeqCst), 0);
        assert_eq!(controller.state().phase, SearchPhase::Idle);
        assert!(!controller.state().loading);
        assert_eq!(controller.state().error.as_deref(), Some(INVALID_WINDOW_MESSAGE));
        assert_eq!(controller.generation(), 0);
    }

    #[test]
    fn test_success_stores_rooms() {
        let service = FakeService::new(vec![Ok(vec![koerner("201")])]);
        let mut controller = controller();

        let phase = controller.search(&service).unwrap();
        assert_eq!(phase, SearchPhase::Success);
        assert_eq!(controller.state().rooms, vec![koerner("201")]);
        assert_eq!(controller.state().message.as_deref(), Some(ROOMS_LOADED_MESSAGE));
        assert!(controller.state().error.is_none());
        assert!(!controller.state().loading);
    }

    #[test]
    fn test_failure_keeps_previous_rooms() {
        let service = FakeService::new(vec![
            Ok(vec![koerner("201"), koerner("202")]),
            Err(Error::QueryFailed {
                status: 500,
                body: "db down".to_string(),
            }),
        ]);
        let mut controller = controller();

        controller.search(&service).unwrap();
        let phase = controller.search(&service).unwrap();

        assert_eq!(phase, SearchPhase::Failed);
        let error = controller.state().error.clone().unwrap();
        assert!(error.contains("500"));
        assert!(error.contains("db down"));
        assert_eq!(controller.state().rooms.len(), 2);
        assert!(!controller.state().loading);
    }

    #[test]
    fn test_retry_after_failure_clears_error() {
        let service = FakeService::new(vec![
            Err(Error::Transport {
                cause: "connect error".to_string(),
            }),
            Ok(vec![koerner("201")]),
        ]);
        let mut controller = controller();

        assert_eq!(controller.search(&service).unwrap(), SearchPhase::Failed);
        assert_eq!(controller.search(&service).unwrap(), SearchPhase::Success);
        assert!(controller.state().error.is_none());
        assert_eq!(controller.generation(), 2);
    }

    #[test]
    fn test_validation_error_cleared_by_next_search() {
        let service = FakeService::new(vec![Ok(vec![])]);
        let mut controller = controller();
        controller.set_start(at(15, 0));
        assert!(controller.search(&service).is_err());

        controller.set_start(at(9, 0));
        assert_eq!(controller.search(&service).unwrap(), SearchPhase::Success);
        assert!(controller.state().error.is_none());
    }

    #[test]
    fn test_stale_completion_is_discarded() {
        let mut controller = controller();
        let first = controller.begin_search().unwrap();
        let second = controller.begin_search().unwrap();

        assert!(controller.complete(&second, Ok(vec![koerner("new")])));
        assert!(!controller.complete(
            &first,
            Err(Error::Transport {
                cause: "late".to_string()
            })
        ));

        assert_eq!(controller.state().phase, SearchPhase::Success);
        assert_eq!(controller.state().rooms, vec![koerner("new")]);
        assert!(controller.state().error.is_none());
    }

    #[test]
    fn test_stale_completion_does_not_end_loading() {
        let mut controller = controller();
        let first = controller.begin_search().unwrap();
        let _second = controller.begin_search().unwrap();

        assert!(!controller.complete(&first, Ok(vec![koerner("old")])));
        assert_eq!(controller.state().phase, SearchPhase::Loading);
        assert!(controller.state().loading);
        assert!(controller.state().rooms.is_empty());
    }

    #[test]
    fn test_spawn_and_finish() {
        let service = Arc::new(FakeService::new(vec![Ok(vec![koerner("201")])]));
        let mut controller = controller();

        let pending = controller.spawn_search(Arc::clone(&service)).unwrap();
        assert!(controller.state().loading);
        assert!(controller.finish(pending));
        assert_eq!(controller.state().phase, SearchPhase::Success);
        assert_eq!(service.fetches.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_poll_applies_once() {
        let service = Arc::new(FakeService::new(vec![Ok(vec![koerner("201")])]));
        let mut controller = controller();
        let mut pending = controller.spawn_search(service).unwrap();

        let applied = loop {
            if let Some(applied) = controller.poll(&mut pending) {
                break applied;
            }
            std::thread::sleep(std::time::Duration::from_millis(5));
        };
        assert!(applied);
        assert_eq!(controller.state().phase, SearchPhase::Success);
        assert!(controller.poll(&mut pending).is_none());
    }

    #[test]
    fn test_spawn_rejects_invalid_window() {
        let service = Arc::new(FakeService::new(vec![]));
        let mut controller = controller();
        controller.set_window(TimeWindow::new(at(14, 0), at(12, 0)));

        assert!(controller.spawn_search(Arc::clone(&service)).is_err());
        assert_eq!(service.fetches.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_collect_records_message() {
        let service = FakeService::new(vec![]);
        let mut controller = controller();

        let ack = controller.collect(&service).unwrap();
        assert_eq!(ack.message, "Scrape completed!");
        assert_eq!(controller.state().message.as_deref(), Some("Scrape completed!"));
        assert_eq!(controller.state().phase, SearchPhase::Idle);
        assert_eq!(controller.generation(), 0);
        assert_eq!(service.fetches.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_collect_rejects_invalid_window() {
        let service = FakeService::new(vec![]);
        let mut controller = controller();
        controller.set_end(at(11, 0));

        assert!(matches!(
            controller.collect(&service),
            Err(Error::Validation(_))
        ));
        assert_eq!(service.collections.load(Ordering::SeqCst), 0);
        assert_eq!(
            controller.state().collection_error.as_deref(),
            Some(INVALID_WINDOW_MESSAGE)
        );
        assert!(controller.state().error.is_none());
    }

    #[test]
    fn test_collect_after_failed_search_keeps_search_error() {
        let service = FakeService::new(vec![Err(Error::QueryFailed {
            status: 500,
            body: "db down".to_string(),
        })]);
        let mut controller = controller();
        assert_eq!(controller.search(&service).unwrap(), SearchPhase::Failed);

        controller.collect(&service).unwrap();

        let state = controller.state();
        assert_eq!(state.phase, SearchPhase::Failed);
        assert_eq!(state.error.as_deref(), Some("query failed: 500 - db down"));
        assert_eq!(state.message.as_deref(), Some("Scrape completed!"));
        assert!(state.collection_error.is_none());
    }

    #[test]
    fn test_collect_failure_leaves_successful_search_clean() {
        let service = FakeService::new(vec![Ok(vec![koerner("201")])]);
        let mut controller = controller();
        controller.search(&service).unwrap();
        service.collection_fails.store(true, Ordering::SeqCst);

        let err = controller.collect(&service).unwrap_err();

        let state = controller.state();
        assert!(matches!(err, Error::QueryFailed { status: 502, .. }));
        assert_eq!(state.phase, SearchPhase::Success);
        assert!(state.error.is_none());
        assert_eq!(
            state.collection_error.as_deref(),
            Some("query failed: 502 - scraper offline")
        );
        assert_eq!(state.rooms.len(), 1);
    }

    #[test]
    fn test_new_search_clears_collection_error() {
        let service = FakeService::new(vec![]);
        service.collection_fails.store(true, Ordering::SeqCst);
        let mut controller = controller();
        assert!(controller.collect(&service).is_err());

        controller.begin_search().unwrap();
        assert!(controller.state().collection_error.is_none());
    }

    #[test]
    fn test_display_records() {
        let service = FakeService::new(vec![Ok(vec![koerner("201"), koerner("202")])]);
        let mut controller = controller();
        controller.search(&service).unwrap();

        let records = controller.display_records(&RoomDisplayMapper::default());
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].label, "201 - Koerner Group Study Rooms");
        assert_eq!(records[0].image, "/images/koerner_building.jpg");
    }
}
