//! Configuration for the dashboard.
//!
//! Values come from built-in defaults, then an optional JSON file
//! (`<config_dir>/paperdash/config.json`), then the `PAPERDASH_API_URL`
//! environment variable. CLI flags are applied last by the binary.

use crate::error::{PaperdashError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

/// Environment variable overriding the API base URL
pub const API_URL_ENV: &str = "PAPERDASH_API_URL";

pub const DEFAULT_BASE_URL: &str = "https://easydash.enago.com";
pub const DEFAULT_ENDPOINT: &str = "/acceptedpapers";

/// en-US short date, e.g. `3/10/2024`
pub const DEFAULT_DATE_FORMAT: &str = "%-m/%-d/%Y";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// API base URL
    pub base_url: String,
    /// Path of the record list below `base_url`
    pub endpoint: String,
    /// Request deadline in seconds
    pub timeout_secs: u64,
    pub page_size: usize,
    /// Search debounce delay in milliseconds
    pub debounce_ms: u64,
    /// chrono format string for dates in exports and cards
    pub date_format: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout_secs: 10,
            page_size: crate::query::DEFAULT_PAGE_SIZE,
            debounce_ms: 300,
            date_format: DEFAULT_DATE_FORMAT.to_string(),
        }
    }
}

/// Default config file path: `<config_dir>/paperdash/config.json`
pub fn default_config_path() -> Result<PathBuf> {
    dirs::config_dir()
        .map(|p| p.join("paperdash").join("config.json"))
        .ok_or_else(|| PaperdashError::Config("Cannot determine config directory".to_string()))
}

impl Config {
    /// Load from `path`; a missing file yields defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!("Config file not found: {:?}", path);
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;
        info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Load from `path` (or the default location), then apply the environment.
    pub fn resolve(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(p) => Self::load(p)?,
            None => match default_config_path() {
                Ok(p) => Self::load(&p)?,
                Err(_) => Self::default(),
            },
        };
        config.apply_env();
        Ok(config)
    }

    pub fn apply_env(&mut self) {
        if let Ok(url) = std::env::var(API_URL_ENV) {
            if !url.trim().is_empty() {
                debug!(url = %url, "Base URL from environment");
                self.base_url = url.trim().to_string();
            }
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        info!("Saved config to {:?}", path);
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        let url = self.records_url()?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(PaperdashError::Config(format!(
                "base_url must be http or https, got '{}'",
                url.scheme()
            )));
        }
        if self.page_size == 0 {
            return Err(PaperdashError::Config("page_size must be at least 1".to_string()));
        }
        if self.timeout_secs == 0 {
            return Err(PaperdashError::Config("timeout_secs must be at least 1".to_string()));
        }
        Ok(())
    }

    /// Full URL of the record list.
    pub fn records_url(&self) -> Result<Url> {
        let endpoint = self.endpoint.trim();
        let joined = if endpoint.is_empty() || endpoint.starts_with('/') {
            format!("{}{}", self.base_url.trim_end_matches('/'), endpoint)
        } else {
            format!("{}/{}", self.base_url.trim_end_matches('/'), endpoint)
        };
        Url::parse(&joined)
            .map_err(|e| PaperdashError::Config(format!("Invalid URL '{}': {}", joined, e)))
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}
