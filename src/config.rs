// src/config.rs

//! Application configuration structures.
//!
//! Feed endpoints, HTTP behavior, and sync scheduling knobs, loaded
//! from a TOML file with per-field defaults so a missing or partial
//! config never blocks startup.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{AppError, Result};

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Feed endpoint settings
    #[serde(default)]
    pub feeds: FeedConfig,

    /// HTTP client settings
    #[serde(default)]
    pub http: HttpConfig,

    /// Sync scheduling and retry settings
    #[serde(default)]
    pub sync: SyncConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        Url::parse(&self.feeds.problems_url)
            .map_err(|e| AppError::validation(format!("feeds.problems_url: {e}")))?;
        Url::parse(&self.feeds.metadata_url)
            .map_err(|e| AppError::validation(format!("feeds.metadata_url: {e}")))?;
        if self.http.user_agent.trim().is_empty() {
            return Err(AppError::validation("http.user_agent is empty"));
        }
        if self.http.timeout_secs == 0 {
            return Err(AppError::validation("http.timeout_secs must be > 0"));
        }
        if self.sync.refresh_interval_secs == 0 {
            return Err(AppError::validation("sync.refresh_interval_secs must be > 0"));
        }
        if self.sync.max_attempts == 0 {
            return Err(AppError::validation("sync.max_attempts must be > 0"));
        }
        Ok(())
    }
}

/// Remote CSV feed endpoints.
///
/// Both default to the published spreadsheet of the Jom archive: one
/// tab holds problem rows, the other a single row of site text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedConfig {
    /// Problem records feed (CSV with header row)
    #[serde(default = "defaults::problems_url")]
    pub problems_url: String,

    /// Site text/metadata feed (CSV with header row, first data row wins)
    #[serde(default = "defaults::metadata_url")]
    pub metadata_url: String,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            problems_url: defaults::problems_url(),
            metadata_url: defaults::metadata_url(),
        }
    }
}

/// HTTP client settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
        }
    }
}

/// Sync scheduling and retry settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Seconds between unconditional periodic re-syncs
    #[serde(default = "defaults::refresh_interval")]
    pub refresh_interval_secs: u64,

    /// Total fetch attempts per sync cycle
    #[serde(default = "defaults::max_attempts")]
    pub max_attempts: u32,

    /// Base backoff in milliseconds; attempt N waits N * base
    #[serde(default = "defaults::backoff_base")]
    pub backoff_base_ms: u64,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            refresh_interval_secs: defaults::refresh_interval(),
            max_attempts: defaults::max_attempts(),
            backoff_base_ms: defaults::backoff_base(),
        }
    }
}

mod defaults {
    // Feed defaults
    pub fn problems_url() -> String {
        "https://docs.google.com/spreadsheets/d/e/2PACX-1vTFlR4Ae4g548TTVfH8d59V53zqNIiAmCKeEthXGk5Gb6KaC6vwaFmOCJoT0d0nqpwnhfRNrQKLiL6l/pub?gid=0&single=true&output=csv".into()
    }
    pub fn metadata_url() -> String {
        "https://docs.google.com/spreadsheets/d/e/2PACX-1vTFlR4Ae4g548TTVfH8d59V53zqNIiAmCKeEthXGk5Gb6KaC6vwaFmOCJoT0d0nqpwnhfRNrQKLiL6l/pub?gid=2106173947&single=true&output=csv".into()
    }

    // HTTP defaults
    pub fn user_agent() -> String {
        "Mozilla/5.0 (compatible; IntegralArchive/1.0)".into()
    }
    pub fn timeout() -> u64 {
        30
    }

    // Sync defaults
    pub fn refresh_interval() -> u64 {
        30
    }
    pub fn max_attempts() -> u32 {
        3
    }
    pub fn backoff_base() -> u64 {
        1000
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn validate_default_config_ok() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn validate_rejects_bad_feed_url() {
        let mut config = Config::default();
        config.feeds.problems_url = "not a url".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_zero_attempts() {
        let mut config = Config::default();
        config.sync.max_attempts = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn load_partial_toml_fills_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[sync]\nrefresh_interval_secs = 60").unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.sync.refresh_interval_secs, 60);
        assert_eq!(config.sync.max_attempts, 3);
        assert!(config.feeds.problems_url.contains("output=csv"));
    }

    #[test]
    fn load_or_default_on_missing_file() {
        let config = Config::load_or_default("/nonexistent/archive.toml");
        assert_eq!(config.sync.refresh_interval_secs, 30);
    }
}
