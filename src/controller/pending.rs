//! Searches running on a background thread.

use super::SearchTicket;
use crate::client::AvailabilityService;
use crate::models::RoomRecord;
use crate::{Error, Result};
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, TryRecvError};

/// A search whose request runs on its own thread.
///
/// There is no way to abort the request. Dropping the handle lets the thread
/// finish and throw its result away.
#[derive(Debug)]
pub struct PendingSearch {
    ticket: SearchTicket,
    receiver: Receiver<Result<Vec<RoomRecord>>>,
    delivered: bool,
}

impl PendingSearch {
    pub(super) fn spawn<S>(ticket: SearchTicket, service: Arc<S>) -> Self
    where
        S: AvailabilityService + ?Sized + 'static,
    {
        let (tx, rx) = mpsc::channel();
        let building = ticket.building().to_string();
        let window = *ticket.window();
        let generation = ticket.generation();
        let parent_span = tracing::Span::current();

        std::thread::spawn(move || {
            let _parent = parent_span.enter();
            let span = tracing::info_span!("search.fetch", generation, service = service.name());
            let _guard = span.enter();
            let result = service.fetch_availability(&building, &window);
            // Receiver may be gone if the caller stopped waiting
            let _ = tx.send(result);
        });

        Self {
            ticket,
            receiver: rx,
            delivered: false,
        }
    }

    /// The ticket of the search this request belongs to.
    #[must_use]
    pub const fn ticket(&self) -> &SearchTicket {
        &self.ticket
    }

    /// Blocks until the request finishes.
    #[must_use]
    pub fn wait(self) -> (SearchTicket, Result<Vec<RoomRecord>>) {
        let result = self.receiver.recv().unwrap_or_else(|_| Err(worker_gone()));
        (self.ticket, result)
    }

    /// Takes the result if the request has finished.
    ///
    /// Yields a result at most once; later calls return `None`.
    pub fn try_result(&mut self) -> Option<Result<Vec<RoomRecord>>> {
        if self.delivered {
            return None;
        }
        let result = match self.receiver.try_recv() {
            Ok(result) => result,
            Err(TryRecvError::Empty) => return None,
            Err(TryRecvError::Disconnected) => Err(worker_gone()),
        };
        self.delivered = true;
        Some(result)
    }
}

fn worker_gone() -> Error {
    Error::Transport {
        cause: "search worker stopped before responding".to_string(),
    }
}
