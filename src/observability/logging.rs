//! Logging configuration.

use crate::config::LoggingSettings;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Filter used when neither config nor environment supplies one.
const DEFAULT_FILTER: &str = "warn";
/// Filter used with `--verbose`.
const VERBOSE_FILTER: &str = "studysphere=debug,info";

/// Log line format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable multi-line output.
    #[default]
    Pretty,
    /// One JSON object per event.
    Json,
}

impl LogFormat {
    /// Parses a format name; anything other than `json` is pretty.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "json" => Self::Json,
            _ => Self::Pretty,
        }
    }
}

/// Resolved logging configuration.
#[derive(Debug)]
pub struct LoggingConfig {
    /// Output format.
    pub format: LogFormat,
    /// File to append to; stderr when `None`.
    pub file: Option<PathBuf>,
    /// Event filter.
    pub filter: EnvFilter,
}

impl LoggingConfig {
    /// Resolves logging from config settings with env overrides.
    ///
    /// Filter precedence: `--verbose`, `STUDYSPHERE_LOG`, `RUST_LOG`, the
    /// config file, then `warn`.
    #[must_use]
    pub fn from_settings(settings: Option<&LoggingSettings>, verbose: bool) -> Self {
        let directives = if verbose {
            VERBOSE_FILTER.to_string()
        } else {
            std::env::var("STUDYSPHERE_LOG")
                .or_else(|_| std::env::var("RUST_LOG"))
                .ok()
                .or_else(|| settings.and_then(|s| s.filter.clone()))
                .unwrap_or_else(|| DEFAULT_FILTER.to_string())
        };

        Self {
            format: settings
                .and_then(|s| s.format.as_deref())
                .map_or(LogFormat::Pretty, LogFormat::parse),
            file: settings.and_then(|s| s.file.clone()),
            filter: parse_filter(&directives),
        }
    }
}

fn parse_filter(directives: &str) -> EnvFilter {
    EnvFilter::try_new(directives).unwrap_or_else(|e| {
        eprintln!("Invalid log filter '{directives}': {e}; using '{DEFAULT_FILTER}'");
        EnvFilter::new(DEFAULT_FILTER)
    })
}
