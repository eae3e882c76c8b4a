//! # Configuration
//!
//! Client settings loaded from a TOML file. A missing file yields the
//! defaults; a present but invalid file is an error.
//!
//! ```toml
//! [server]
//! base_url = "http://127.0.0.1:5000"
//! timeout_secs = 30
//!
//! [reports]
//! output_dir = "."
//!
//! [logging]
//! filter = "info"
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::errors::{ThermalError, ThermalResult};

/// Default configuration file, looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "thermalsim.toml";

/// Environment variable that overrides `server.base_url`.
pub const BASE_URL_ENV: &str = "THERMALSIM_BASE_URL";

/// Calculation backend connection settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Scheme, host and port of the backend, without a trailing path
    pub base_url: String,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            base_url: "http://127.0.0.1:5000".to_string(),
            timeout_secs: 30,
        }
    }
}

/// Where exported reports are written
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    pub output_dir: PathBuf,
}

impl Default for ReportConfig {
    fn default() -> Self {
        ReportConfig {
            output_dir: PathBuf::from("."),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `tracing_subscriber::EnvFilter` directive, e.g. "info" or "thermal_core=debug"
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            filter: "info".to_string(),
        }
    }
}

/// Complete client configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThermalConfig {
    pub server: ServerConfig,
    pub reports: ReportConfig,
    pub logging: LoggingConfig,
}

impl ThermalConfig {
    /// Parse a configuration from TOML text.
    pub fn from_toml(text: &str) -> ThermalResult<Self> {
        toml::from_str(text).map_err(|e| ThermalError::config(e.to_string()))
    }

    /// Serialize to TOML text.
    pub fn to_toml(&self) -> ThermalResult<String> {
        toml::to_string_pretty(self).map_err(|e| ThermalError::config(e.to_string()))
    }

    /// Load `path`, or the defaults if it does not exist.
    pub fn load_or_default(path: &Path) -> ThermalResult<Self> {
        if !path.exists() {
            return Ok(ThermalConfig::default());
        }
        let text = fs::read_to_string(path).map_err(|e| {
            ThermalError::file_error("read config", path.display().to_string(), e.to_string())
        })?;
        Self::from_toml(&text).map_err(|e| match e {
            ThermalError::Config { reason } => {
                ThermalError::config(format!("{}: {}", path.display(), reason))
            }
            other => other,
        })
    }

    /// Apply `THERMALSIM_BASE_URL` if set and non-empty.
    pub fn apply_env(&mut self) {
        self.apply_base_url_override(std::env::var(BASE_URL_ENV).ok());
    }

    fn apply_base_url_override(&mut self, value: Option<String>) {
        if let Some(url) = value.filter(|v| !v.trim().is_empty()) {
            self.server.base_url = url.trim().to_string();
        }
    }
}
