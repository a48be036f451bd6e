//! # Studysphere
//!
//! Finds study rooms that can be booked during a chosen time window.
//!
//! The crate turns a building filter and a wall-clock window into a query
//! against the room collection service, then maps the returned room records
//! into display records with a building thumbnail and an outbound booking link.
//!
//! ## Pipeline
//!
//! - [`codec`] encodes timestamps into the query formats the service expects
//! - [`client`] issues the availability and scrape requests
//! - [`rendering`] resolves building images and renders the room list
//! - [`controller`] owns the session state and discards superseded responses
//!
//! ## Example
//!
//! ```rust,ignore
//! use studysphere::client::AvailabilityClient;
//! use studysphere::controller::SearchController;
//! use studysphere::rendering::RoomDisplayMapper;
//!
//! let client = AvailabilityClient::new().with_base_url("http://localhost:5000");
//! let mut controller = SearchController::for_today();
//! controller.set_building("Koerner");
//! controller.search(&client)?;
//!
//! let mapper = RoomDisplayMapper::default();
//! for record in controller.display_records(&mapper) {
//!     println!("{} ({})", record.label, record.time);
//! }
//! ```

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![warn(missing_docs)]
#![forbid(unsafe_code)]
#![allow(clippy::multiple_crate_versions)]

use thiserror::Error as ThisError;

pub mod cli;
pub mod client;
pub mod codec;
pub mod config;
pub mod controller;
pub mod models;
pub mod observability;
pub mod rendering;

pub use client::{AvailabilityClient, AvailabilityService};
pub use config::StudySphereConfig;
pub use controller::{SearchController, SearchPhase, SearchState};
pub use models::{CollectionAck, DisplayRecord, RoomRecord, TimeWindow};
pub use rendering::{BuildingImageIndex, RoomDisplayMapper};

/// Error type for studysphere operations.
///
/// # Error Variant Triggers
///
/// | Variant | Raised When |
/// |---------|-------------|
/// | `Validation` | The selected window does not start before it ends |
/// | `QueryFailed` | The room service answered with a non-success status |
/// | `Transport` | The request never produced a response (DNS, connect, timeout) |
/// | `Decode` | A success response body could not be decoded |
/// | `InvalidInput` | Timestamp or option text could not be parsed |
/// | `OperationFailed` | Config files or logging could not be set up |
#[derive(Debug, ThisError)]
pub enum Error {
    /// The user's selection is not a valid query.
    ///
    /// No request is issued when this is raised.
    #[error("{0}")]
    Validation(String),

    /// The room service responded with a non-success status.
    #[error("query failed: {status} - {body}")]
    QueryFailed {
        /// HTTP status code.
        status: u16,
        /// Response body, treated as plain text.
        body: String,
    },

    /// The request could not complete.
    #[error("transport error: {cause}")]
    Transport {
        /// The underlying cause.
        cause: String,
    },

    /// A success response did not have the expected shape.
    #[error("failed to decode response: {cause}")]
    Decode {
        /// The underlying cause.
        cause: String,
    },

    /// Invalid input was provided.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A local operation failed.
    #[error("operation '{operation}' failed: {cause}")]
    OperationFailed {
        /// The operation that failed.
        operation: String,
        /// The underlying cause.
        cause: String,
    },
}

impl Error {
    /// Returns `true` for failures reported by, or on the way to, the room service.
    #[must_use]
    pub const fn is_remote(&self) -> bool {
        matches!(
            self,
            Self::QueryFailed { .. } | Self::Transport { .. } | Self::Decode { .. }
        )
    }
}

/// Result type alias for studysphere operations.
pub type Result<T> = std::result::Result<T, Error>;
