//! Timestamp encodings used by the room service.
//!
//! The availability query takes combined `YYYY-MM-DDTHH:MM` values while the
//! scrape request takes the date and time split into `YYYY-MM-DD` and `HH:MM`.
//! All encoders read the wall-clock fields as-is; no zone shift is applied.

use crate::{Error, Result};
use chrono::NaiveDateTime;

/// Combined date-time format, as produced by an HTML `datetime-local` input.
pub const LOCAL_DATE_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M";
/// 24-hour time format.
pub const TIME_FORMAT: &str = "%H:%M";
/// Calendar date format.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Accepted when decoding user input, in addition to [`LOCAL_DATE_TIME_FORMAT`].
const SPACED_DATE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Encodes a timestamp as `YYYY-MM-DDTHH:MM`.
#[must_use]
pub fn encode_local_date_time(ts: &NaiveDateTime) -> String {
    ts.format(LOCAL_DATE_TIME_FORMAT).to_string()
}

/// Encodes a timestamp's time of day as `HH:MM`.
#[must_use]
pub fn encode_time(ts: &NaiveDateTime) -> String {
    ts.format(TIME_FORMAT).to_string()
}

/// Encodes a timestamp's calendar date as `YYYY-MM-DD`.
#[must_use]
pub fn encode_date(ts: &NaiveDateTime) -> String {
    ts.format(DATE_FORMAT).to_string()
}

/// Decodes `YYYY-MM-DDTHH:MM` (or `YYYY-MM-DD HH:MM`) into a timestamp.
///
/// # Errors
///
/// Returns [`Error::InvalidInput`] if the text matches neither format.
pub fn decode_local_date_time(s: &str) -> Result<NaiveDateTime> {
    let trimmed = s.trim();
    NaiveDateTime::parse_from_str(trimmed, LOCAL_DATE_TIME_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(trimmed, SPACED_DATE_TIME_FORMAT))
        .map_err(|e| {
            Error::InvalidInput(format!(
                "'{s}' is not a local date-time (expected YYYY-MM-DDTHH:MM): {e}"
            ))
        })
}
