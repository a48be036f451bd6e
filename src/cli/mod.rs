//! CLI command implementations.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `search` | List rooms bookable in a window, optionally for one building |
//! | `scrape` | Ask the room service to collect fresh data for a window |
//! | `config` | Show the effective configuration |
//!
//! # Example Usage
//!
//! ```bash
//! # Today, 12:00 to 14:00, every building
//! studysphere search
//!
//! # One building, explicit window, JSON output
//! studysphere search --building Koerner --start 2025-03-15T09:00 --end 2025-03-15T11:00 --format json
//!
//! # Refresh the service's data first
//! studysphere scrape --start 2025-03-15T09:00 --end 2025-03-15T17:00
//! ```

mod config;
mod scrape;
mod search;

pub use config::cmd_config_show;
pub use scrape::{cmd_scrape, run_scrape};
pub use search::{LOADING_MESSAGE, SearchArgs, cmd_search, run_search};

use crate::Result;
use crate::client::AvailabilityClient;
use crate::codec::decode_local_date_time;
use crate::config::StudySphereConfig;
use crate::models::TimeWindow;
use chrono::NaiveDate;

/// Builds a window from optional `YYYY-MM-DDTHH:MM` arguments.
///
/// Missing ends fall back to the default window on `today` (12:00 to 14:00).
/// Ordering is not checked here.
///
/// # Errors
///
/// Returns [`crate::Error::InvalidInput`] if an argument does not parse.
pub fn parse_window(start: Option<&str>, end: Option<&str>, today: NaiveDate) -> Result<TimeWindow> {
    let mut window = TimeWindow::default_for(today);
    if let Some(start) = start {
        window = window.with_start(decode_local_date_time(start)?);
    }
    if let Some(end) = end {
        window = window.with_end(decode_local_date_time(end)?);
    }
    Ok(window)
}

/// Builds the room service client from configuration.
#[must_use]
pub fn build_client(config: &StudySphereConfig) -> AvailabilityClient {
    AvailabilityClient::from_config(&config.service)
}
