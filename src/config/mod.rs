//! Configuration management.
//!
//! Settings come from, in increasing priority: built-in defaults, a TOML
//! config file, and `STUDYSPHERE_*` environment variables (a `.env` file in
//! the working directory is loaded by the binary before this runs).

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Main configuration for studysphere.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StudySphereConfig {
    /// Room service connection.
    pub service: ServiceConfig,
    /// Building thumbnails.
    pub images: ImageConfig,
    /// Logging output.
    pub logging: LoggingSettings,
}

/// Room service connection settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceConfig {
    /// Base URL; the `/api/...` paths are appended to it.
    pub base_url: String,
    /// Request timeout in milliseconds (0 disables).
    pub timeout_ms: u64,
    /// Connect timeout in milliseconds (0 disables).
    pub connect_timeout_ms: u64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: crate::client::AvailabilityClient::DEFAULT_BASE_URL.to_string(),
            timeout_ms: 0,
            connect_timeout_ms: 0,
        }
    }
}

/// Building thumbnail overrides, layered over the built-in index.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImageConfig {
    /// Replacement for the default thumbnail.
    #[serde(rename = "default")]
    pub default_image: Option<String>,
    /// Extra or replacement entries keyed by exact group label.
    pub buildings: BTreeMap<String, String>,
}

/// Logging settings (see `observability::LoggingConfig`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LoggingSettings {
    /// `pretty` or `json`.
    pub format: Option<String>,
    /// Log file to append to instead of stderr.
    pub file: Option<PathBuf>,
    /// `EnvFilter` directives, e.g. `studysphere=debug`.
    pub filter: Option<String>,
}

/// Configuration file structure (for TOML parsing).
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    /// Service section.
    pub service: Option<ConfigFileService>,
    /// Images section.
    pub images: Option<ConfigFileImages>,
    /// Logging section.
    pub logging: Option<ConfigFileLogging>,
}

/// Service section in config file.
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFileService {
    /// Base URL.
    pub base_url: Option<String>,
    /// Request timeout.
    pub timeout_ms: Option<u64>,
    /// Connect timeout.
    pub connect_timeout_ms: Option<u64>,
}

/// Images section in config file.
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFileImages {
    /// Default thumbnail.
    pub default: Option<String>,
    /// Group label to thumbnail.
    pub buildings: Option<BTreeMap<String, String>>,
}

/// Logging section in config file.
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFileLogging {
    /// Output format.
    pub format: Option<String>,
    /// Log file.
    pub file: Option<String>,
    /// Filter directives.
    pub filter: Option<String>,
}

impl StudySphereConfig {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid TOML for this schema.
    pub fn from_toml(contents: &str) -> crate::Result<Self> {
        let file: ConfigFile =
            toml::from_str(contents).map_err(|e| crate::Error::OperationFailed {
                operation: "parse_config_file".to_string(),
                cause: e.to_string(),
            })?;

        Ok(Self::from_config_file(file))
    }

    /// Loads configuration from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_from_file(path: &Path) -> crate::Result<Self> {
        let contents =
            std::fs::read_to_string(path).map_err(|e| crate::Error::OperationFailed {
                operation: "read_config_file".to_string(),
                cause: format!("{}: {e}", path.display()),
            })?;

        Self::from_toml(&contents)
    }

    /// Loads configuration from the default location.
    ///
    /// Checks the platform config dir, then `~/.config/studysphere/`, and
    /// returns defaults if neither holds a readable `config.toml`.
    #[must_use]
    pub fn load_default() -> Self {
        let Some(base_dirs) = directories::BaseDirs::new() else {
            return Self::default();
        };

        let platform_config = base_dirs
            .config_dir()
            .join("studysphere")
            .join("config.toml");
        let xdg_config = base_dirs
            .home_dir()
            .join(".config")
            .join("studysphere")
            .join("config.toml");

        for candidate in [platform_config, xdg_config] {
            if !candidate.exists() {
                continue;
            }
            match Self::load_from_file(&candidate) {
                Ok(config) => return config,
                Err(e) => tracing::warn!(path = %candidate.display(), error = %e, "Ignoring config file"),
            }
        }

        Self::default()
    }

    /// Converts a `ConfigFile` to `StudySphereConfig`.
    fn from_config_file(file: ConfigFile) -> Self {
        let mut config = Self::default();

        if let Some(service) = file.service {
            if let Some(base_url) = service.base_url {
                config.service.base_url = base_url;
            }
            if let Some(v) = service.timeout_ms {
                config.service.timeout_ms = v;
            }
            if let Some(v) = service.connect_timeout_ms {
                config.service.connect_timeout_ms = v;
            }
        }
        if let Some(images) = file.images {
            config.images.default_image = images.default;
            config.images.buildings = images.buildings.unwrap_or_default();
        }
        if let Some(logging) = file.logging {
            config.logging.format = logging.format;
            config.logging.file = logging.file.map(PathBuf::from);
            config.logging.filter = logging.filter;
        }

        config
    }

    /// Applies `STUDYSPHERE_*` environment variable overrides.
    #[must_use]
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides_from(|key| std::env::var(key).ok())
    }

    /// Applies overrides from an arbitrary variable lookup.
    #[must_use]
    pub fn with_overrides_from(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(base_url) = lookup("STUDYSPHERE_BASE_URL") {
            self.service.base_url = base_url;
        }
        if let Some(v) = lookup("STUDYSPHERE_TIMEOUT_MS").and_then(|v| v.trim().parse().ok()) {
            self.service.timeout_ms = v;
        }
        if let Some(v) =
            lookup("STUDYSPHERE_CONNECT_TIMEOUT_MS").and_then(|v| v.trim().parse().ok())
        {
            self.service.connect_timeout_ms = v;
        }
        if let Some(format) = lookup("STUDYSPHERE_LOG_FORMAT") {
            self.logging.format = Some(format);
        }
        if let Some(file) = lookup("STUDYSPHERE_LOG_FILE") {
            self.logging.file = Some(PathBuf::from(file));
        }
        self
    }

    /// Sets the service base URL.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.service.base_url = base_url.into();
        self
    }

    /// Renders the effective configuration as TOML.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_toml(&self) -> crate::Result<String> {
        toml::to_string_pretty(self).map_err(|e| crate::Error::OperationFailed {
            operation: "serialize_config".to_string(),
            cause: e.to_string(),
        })
    }
}
