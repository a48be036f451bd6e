//! Room service client.
//!
//! Provides the [`AvailabilityService`] seam the controller drives, the
//! request shapes of the room service, and the `reqwest` implementation.

mod http;

pub use http::AvailabilityClient;

use crate::Result;
use crate::codec::{encode_date, encode_local_date_time, encode_time};
use crate::models::{CollectionAck, RoomRecord, TimeWindow};
use serde::Serialize;
use std::fmt::Write as _;
use std::time::Duration;

/// Path of the availability endpoint, relative to the service base URL.
pub const ROOMS_PATH: &str = "/api/rooms";
/// Path of the scrape endpoint, relative to the service base URL.
pub const SCRAPE_PATH: &str = "/api/scrape";

/// Operations offered by the room service.
pub trait AvailabilityService: Send + Sync {
    /// The service name, used in logs.
    fn name(&self) -> &'static str;

    /// Lists rooms bookable in `window`, optionally narrowed to `building`.
    ///
    /// An empty `building` means all buildings. The caller is responsible for
    /// checking that the window starts before it ends.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::QueryFailed`] on a non-success status,
    /// [`crate::Error::Transport`] when no response arrives, and
    /// [`crate::Error::Decode`] when the body is not a list of rooms.
    fn fetch_availability(&self, building: &str, window: &TimeWindow) -> Result<Vec<RoomRecord>>;

    /// Asks the service to collect fresh room data for `window`.
    ///
    /// Completion does not mean the next [`Self::fetch_availability`] sees the
    /// new data.
    ///
    /// # Errors
    ///
    /// Same failure taxonomy as [`Self::fetch_availability`].
    fn trigger_collection(&self, window: &TimeWindow) -> Result<CollectionAck>;
}

/// HTTP client configuration for the room service.
///
/// A value of zero disables the corresponding limit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HttpConfig {
    /// Request timeout in milliseconds (0 disables).
    pub timeout_ms: u64,
    /// Connect timeout in milliseconds (0 disables).
    pub connect_timeout_ms: u64,
}

impl HttpConfig {
    /// Loads HTTP configuration from environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    /// Loads HTTP configuration from config file settings.
    #[must_use]
    pub const fn from_config(config: &crate::config::ServiceConfig) -> Self {
        Self {
            timeout_ms: config.timeout_ms,
            connect_timeout_ms: config.connect_timeout_ms,
        }
    }

    /// Applies environment variable overrides.
    #[must_use]
    pub fn with_env_overrides(mut self) -> Self {
        if let Some(timeout_ms) = env_u64("STUDYSPHERE_TIMEOUT_MS") {
            self.timeout_ms = timeout_ms;
        }
        if let Some(connect_timeout_ms) = env_u64("STUDYSPHERE_CONNECT_TIMEOUT_MS") {
            self.connect_timeout_ms = connect_timeout_ms;
        }
        self
    }
}

fn env_u64(key: &str) -> Option<u64> {
    std::env::var(key).ok().and_then(|v| v.trim().parse().ok())
}

/// Builds a blocking HTTP client with configured timeouts.
#[must_use]
pub fn build_http_client(config: HttpConfig) -> reqwest::blocking::Client {
    reqwest::blocking::Client::builder()
        .user_agent(format!("studysphere/{}", env!("CARGO_PKG_VERSION")))
        .timeout(millis(config.timeout_ms))
        .connect_timeout(millis(config.connect_timeout_ms))
        .build()
        .unwrap_or_else(|err| {
            tracing::warn!("Failed to build room service HTTP client: {err}");
            reqwest::blocking::Client::new()
        })
}

/// Zero means no limit.
fn millis(ms: u64) -> Option<Duration> {
    (ms > 0).then(|| Duration::from_millis(ms))
}

/// Builds the availability path and query string for a search.
///
/// `building` is always present, empty when unfiltered. Start and end are
/// inserted in their `YYYY-MM-DDTHH:MM` form without further escaping.
#[must_use]
pub fn rooms_query(building: &str, window: &TimeWindow) -> String {
    format!(
        "{ROOMS_PATH}?building={}&start={}&end={}",
        encode_uri_component(building),
        encode_local_date_time(&window.start()),
        encode_local_date_time(&window.end()),
    )
}

/// Body of `POST /api/scrape`.
///
/// The collector expects the date and time split, not the combined form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScrapeRequest {
    /// Window start as `HH:MM`.
    pub start_time: String,
    /// Window end as `HH:MM`.
    pub end_time: String,
    /// Window start as `YYYY-MM-DD`.
    pub start_date: String,
    /// Window end as `YYYY-MM-DD`.
    pub end_date: String,
}

impl ScrapeRequest {
    /// Encodes a window into the scrape request fields.
    #[must_use]
    pub fn from_window(window: &TimeWindow) -> Self {
        Self {
            start_time: encode_time(&window.start()),
            end_time: encode_time(&window.end()),
            start_date: encode_date(&window.start()),
            end_date: encode_date(&window.end()),
        }
    }
}

/// Percent-encodes a query value the way `encodeURIComponent` does.
///
/// Everything outside `A-Z a-z 0-9 - _ . ! ~ * ' ( )` is escaped as UTF-8
/// bytes, so spaces become `%20` rather than `+`.
#[must_use]
pub fn encode_uri_component(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for byte in value.bytes() {
        match byte {
            b'A'..=b'Z'
            | b'a'..=b'z'
            | b'0'..=b'9'
            | b'-'
            | b'_'
            | b'.'
            | b'!'
            | b'~'
            | b'*'
            | b'\''
            | b'('
            | b')' => out.push(char::from(byte)),
            _ => {
                let _ = write!(out, "%{byte:02X}");
            },
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use test_case::test_case;

    fn window(day: u32, from: (u32, u32), to: (u32, u32)) -> TimeWindow {
        let date = NaiveDate::from_ymd_opt(2025, 3, day).unwrap();
        TimeWindow::new(
            date.and_hms_opt(from.0, from.1, 0).unwrap(),
            date.and_hms_opt(to.0, to.1, 0).unwrap(),
        )
    }

    #[test]
    fn test_rooms_query_all_buildings() {
        let query = rooms_query("", &window(15, (12, 0), (14, 0)));
        assert_eq!(
            query,
            "/api/rooms?building=&start=2025-03-15T12:00&end=2025-03-15T14:00"
        );
    }

    #[test]
    fn test_rooms_query_encodes_building() {
        let query = rooms_query("Koerner Group", &window(15, (9, 30), (10, 0)));
        assert_eq!(
            query,
            "/api/rooms?building=Koerner%20Group&start=2025-03-15T09:30&end=2025-03-15T10:00"
        );
    }

    #[test_case("Koerner", "Koerner" ; "plain")]
    #[test_case("MAA Library - Digital", "MAA%20Library%20-%20Digital" ; "spaces and dash")]
    #[test_case("a&b=c", "a%26b%3Dc" ; "query delimiters")]
    #[test_case("Research/Commons?", "Research%2FCommons%3F" ; "path delimiters")]
    #[test_case("(it's)*!~._", "(it's)*!~._" ; "unreserved marks")]
    #[test_case("Café", "Caf%C3%A9" ; "utf8")]
    #[test_case("", "" ; "empty")]
    fn test_encode_uri_component(input: &str, expected: &str) {
        assert_eq!(encode_uri_component(input), expected);
    }

    #[test]
    fn test_scrape_request_body() {
        let request = ScrapeRequest::from_window(&TimeWindow::new(
            NaiveDate::from_ymd_opt(2025, 4, 1)
                .unwrap()
                .and_hms_opt(9, 0, 0)
                .unwrap(),
            NaiveDate::from_ymd_opt(2025, 4, 1)
                .unwrap()
                .and_hms_opt(17, 0, 0)
                .unwrap(),
        ));

        assert_eq!(
            serde_json::to_string(&request).unwrap(),
            r#"{"start_time":"09:00","end_time":"17:00","start_date":"2025-04-01","end_date":"2025-04-01"}"#
        );
    }

    #[test]
    fn test_scrape_request_spanning_days() {
        let start = NaiveDate::from_ymd_opt(2025, 3, 31)
            .unwrap()
            .and_hms_opt(22, 0, 0)
            .unwrap();
        let end = NaiveDate::from_ymd_opt(2025, 4, 1)
            .unwrap()
            .and_hms_opt(1, 30, 0)
            .unwrap();
        let request = ScrapeRequest::from_window(&TimeWindow::new(start, end));

        assert_eq!(request.start_date, "2025-03-31");
        assert_eq!(request.end_date, "2025-04-01");
        assert_eq!(request.start_time, "22:00");
        assert_eq!(request.end_time, "01:30");
    }

    #[test]
    fn test_http_config_default_has_no_limits() {
        let config = HttpConfig::default();
        assert_eq!(config.timeout_ms, 0);
        assert_eq!(config.connect_timeout_ms, 0);
        assert_eq!(millis(config.timeout_ms), None);
        assert_eq!(millis(250), Some(Duration::from_millis(250)));
    }

    #[test]
    fn test_http_config_from_service_config() {
        let service = crate::config::ServiceConfig {
            base_url: "http://rooms.test".to_string(),
            timeout_ms: 1_500,
            connect_timeout_ms: 250,
        };
        let config = HttpConfig::from_config(&service);
        assert_eq!(config.timeout_ms, 1_500);
        assert_eq!(config.connect_timeout_ms, 250);
    }
}
