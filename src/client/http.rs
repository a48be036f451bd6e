//! `reqwest` client for the room service.

use super::{
    AvailabilityService, HttpConfig, SCRAPE_PATH, ScrapeRequest, build_http_client, rooms_query,
};
use crate::models::{CollectionAck, RoomRecord, TimeWindow};
use crate::{Error, Result};
use serde::de::DeserializeOwned;

/// Blocking HTTP client for the room service.
///
/// Cheap to share behind an `Arc`; the underlying `reqwest` client pools
/// connections.
pub struct AvailabilityClient {
    /// Service base URL, without a trailing slash.
    base_url: String,
    /// HTTP client.
    client: reqwest::blocking::Client,
}

impl AvailabilityClient {
    /// Default base URL of a locally running room service.
    pub const DEFAULT_BASE_URL: &'static str = "http://localhost:5000";

    /// Creates a client from environment variables.
    ///
    /// `STUDYSPHERE_BASE_URL` overrides [`Self::DEFAULT_BASE_URL`].
    #[must_use]
    pub fn new() -> Self {
        let base_url = std::env::var("STUDYSPHERE_BASE_URL")
            .unwrap_or_else(|_| Self::DEFAULT_BASE_URL.to_string());

        Self {
            base_url: normalize_base_url(&base_url),
            client: build_http_client(HttpConfig::from_env()),
        }
    }

    /// Creates a client from loaded configuration.
    #[must_use]
    pub fn from_config(config: &crate::config::ServiceConfig) -> Self {
        Self {
            base_url: normalize_base_url(&config.base_url),
            client: build_http_client(HttpConfig::from_config(config)),
        }
    }

    /// Sets the service base URL.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = normalize_base_url(&base_url.into());
        self
    }

    /// Sets HTTP client timeouts.
    #[must_use]
    pub fn with_http_config(mut self, config: HttpConfig) -> Self {
        self.client = build_http_client(config);
        self
    }

    /// The configured base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Sends a prepared request, decodes a success body as JSON and counts
    /// the outcome.
    fn execute<T: DeserializeOwned>(
        &self,
        endpoint: &'static str,
        request: reqwest::blocking::RequestBuilder,
    ) -> Result<T> {
        let result = self.send(endpoint, request);
        metrics::counter!(
            "studysphere_requests_total",
            "endpoint" => endpoint,
            "status" => outcome_label(&result)
        )
        .increment(1);
        result
    }

    fn send<T: DeserializeOwned>(
        &self,
        endpoint: &'static str,
        request: reqwest::blocking::RequestBuilder,
    ) -> Result<T> {
        let response = request.send().map_err(|e| {
            let error_kind = if e.is_timeout() {
                "timeout"
            } else if e.is_connect() {
                "connect"
            } else if e.is_request() {
                "request"
            } else {
                "unknown"
            };
            tracing::error!(
                endpoint,
                base_url = %self.base_url,
                error = %e,
                error_kind,
                is_timeout = e.is_timeout(),
                is_connect = e.is_connect(),
                "Room service request failed"
            );
            Error::Transport {
                cause: format!("{error_kind} error: {e}"),
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            tracing::error!(
                endpoint,
                status = %status,
                body = %body,
                "Room service returned error status"
            );
            return Err(Error::QueryFailed {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().map_err(|e| {
            tracing::error!(endpoint, error = %e, "Failed to read room service response");
            Error::Transport {
                cause: format!("body error: {e}"),
            }
        })?;

        serde_json::from_str(&body).map_err(|e| {
            tracing::error!(endpoint, error = %e, body = %body, "Failed to parse room service response");
            Error::Decode {
                cause: format!("{endpoint}: {e}"),
            }
        })
    }
}

impl Default for AvailabilityClient {
    fn default() -> Self {
        Self::new()
    }
}

impl AvailabilityService for AvailabilityClient {
    fn name(&self) -> &'static str {
        "http"
    }

    #[tracing::instrument(skip(self, window), fields(start = %window.start(), end = %window.end()))]
    fn fetch_availability(&self, building: &str, window: &TimeWindow) -> Result<Vec<RoomRecord>> {
        let url = format!("{}{}", self.base_url, rooms_query(building, window));
        tracing::debug!(url = %url, "Fetching room availability");

        let rooms: Vec<RoomRecord> = self.execute("rooms", self.client.get(url))?;
        tracing::debug!(count = rooms.len(), "Fetched room availability");
        Ok(rooms)
    }

    #[tracing::instrument(skip(self, window), fields(start = %window.start(), end = %window.end()))]
    fn trigger_collection(&self, window: &TimeWindow) -> Result<CollectionAck> {
        let body = ScrapeRequest::from_window(window);
        let url = format!("{}{SCRAPE_PATH}", self.base_url);
        tracing::debug!(url = %url, ?body, "Triggering room collection");

        self.execute("scrape", self.client.post(url).json(&body))
    }
}

/// Value of the `status` label on `studysphere_requests_total`.
fn outcome_label<T>(result: &Result<T>) -> &'static str {
    match result {
        Ok(_) => "success",
        Err(Error::QueryFailed { .. }) => "error",
        Err(Error::Decode { .. }) => "decode_error",
        Err(_) => "transport_error",
    }
}

fn normalize_base_url(base_url: &str) -> String {
    base_url.trim().trim_end_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = AvailabilityClient::new();
        assert_eq!(client.name(), "http");
    }

    #[test]
    fn test_client_configuration() {
        let client = AvailabilityClient::new()
            .with_base_url("http://rooms.test:8080/")
            .with_http_config(HttpConfig {
                timeout_ms: 1_000,
                connect_timeout_ms: 100,
            });

        assert_eq!(client.base_url(), "http://rooms.test:8080");
    }

    #[test]
    fn test_from_config() {
        let config = crate::config::ServiceConfig {
            base_url: " http://rooms.test/ ".to_string(),
            timeout_ms: 0,
            connect_timeout_ms: 0,
        };
        let client = AvailabilityClient::from_config(&config);
        assert_eq!(client.base_url(), "http://rooms.test");
    }

    #[test]
    fn test_unreachable_service_is_transport_error() {
        // Port 9 (discard) is not expected to accept HTTP connections.
        let client = AvailabilityClient::new()
            .with_base_url("http://127.0.0.1:9")
            .with_http_config(HttpConfig {
                timeout_ms: 2_000,
                connect_timeout_ms: 500,
            });

        let window = TimeWindow::today();
        let err = client.fetch_availability("", &window).unwrap_err();
        assert!(matches!(err, Error::Transport { .. }), "got {err:?}");
    }

    #[test]
    fn test_outcome_label_separates_decode_failures() {
        let ok: Result<()> = Ok(());
        let decode: Result<()> = Err(Error::Decode {
            cause: "rooms: expected a sequence".to_string(),
        });
        let status: Result<()> = Err(Error::QueryFailed {
            status: 500,
            body: "db down".to_string(),
        });
        let transport: Result<()> = Err(Error::Transport {
            cause: "connect error: refused".to_string(),
        });

        assert_eq!(outcome_label(&ok), "success");
        assert_eq!(outcome_label(&decode), "decode_error");
        assert_eq!(outcome_label(&status), "error");
        assert_eq!(outcome_label(&transport), "transport_error");
    }
}
