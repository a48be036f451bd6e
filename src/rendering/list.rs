//! Text and JSON rendering of the room list.

use crate::models::DisplayRecord;
use crate::{Error, Result};
use std::fmt::Write;

/// Shown instead of a list when there is nothing to book.
const EMPTY_LIST: &str = "No rooms available";

/// Output format for the room list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable list (default).
    #[default]
    Text,
    /// Pretty-printed JSON array.
    Json,
}

impl OutputFormat {
    /// Parses output format from string.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "json" => Self::Json,
            _ => Self::Text,
        }
    }
}

/// Renders display records in the requested format.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn render(records: &[DisplayRecord], format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(render_text(records)),
        OutputFormat::Json => render_json(records),
    }
}

/// Renders one block per room: label, time, thumbnail and booking link.
#[must_use]
pub fn render_text(records: &[DisplayRecord]) -> String {
    if records.is_empty() {
        return EMPTY_LIST.to_string();
    }

    let mut out = String::new();
    for (i, record) in records.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        let _ = writeln!(out, "{}", record.label);
        let _ = writeln!(out, "  {}", record.time);
        let _ = writeln!(out, "  [{}] {}", record.alt, record.image);
        let _ = writeln!(out, "  Book this room: {}", record.url);
    }
    out
}

/// Renders the records as a pretty-printed JSON array.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn render_json(records: &[DisplayRecord]) -> Result<String> {
    serde_json::to_string_pretty(records).map_err(|e| Error::OperationFailed {
        operation: "render_json".to_string(),
        cause: e.to_string(),
    })
}
