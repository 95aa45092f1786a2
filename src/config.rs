//! Centralized configuration management for cortex-explore

use std::path::PathBuf;
use std::time::Duration;
use anyhow::{Result, Context};

pub const DEFAULT_DATA_URL: &str = "http://localhost:5173/data/processed_files.json";
const DEFAULT_USER_AGENT: &str = "cortex-explore/0.1.0";
const DEFAULT_LOG_FILE: &str = "cortex.log";

/// Where the document collection is read from
#[derive(Debug, Clone, PartialEq)]
pub enum DataLocation {
    /// Fixed HTTP resource fetched with a single GET
    Url(String),
    /// Local JSON file in the same shape as the HTTP resource
    File(PathBuf),
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Document collection location
    pub data: DataLocation,
    /// HTTP client configuration
    pub http: HttpConfig,
    /// Periodic refresh interval in seconds (disabled when `None`)
    pub refresh_seconds: Option<u64>,
    /// Also match the search query against record summaries
    pub search_summary: bool,
    /// Log file used by the interactive explorer
    pub log_file: PathBuf,
}

/// HTTP client configuration
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// Request timeout in seconds
    pub timeout_seconds: u64,
    /// User agent string
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: 30,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data: DataLocation::Url(DEFAULT_DATA_URL.to_string()),
            http: HttpConfig::default(),
            refresh_seconds: None,
            search_summary: false,
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
        }
    }
}

impl Config {
    /// Load configuration from environment variables and defaults
    pub fn from_env() -> Result<Self> {
        let data = match std::env::var("CORTEX_DATA_FILE") {
            Ok(path) if !path.trim().is_empty() => DataLocation::File(path.into()),
            _ => DataLocation::Url(
                std::env::var("CORTEX_DATA_URL")
                    .unwrap_or_else(|_| DEFAULT_DATA_URL.to_string()),
            ),
        };

        let http = HttpConfig {
            timeout_seconds: parse_env_var("CORTEX_HTTP_TIMEOUT_SECONDS")?.unwrap_or(30),
            user_agent: std::env::var("CORTEX_USER_AGENT")
                .unwrap_or_else(|_| DEFAULT_USER_AGENT.to_string()),
        };

        let log_file = std::env::var("CORTEX_LOG_FILE")
            .unwrap_or_else(|_| DEFAULT_LOG_FILE.to_string())
            .into();

        Ok(Config {
            data,
            http,
            refresh_seconds: parse_env_var("CORTEX_REFRESH_SECONDS")?,
            search_summary: parse_env_var("CORTEX_SEARCH_SUMMARY")?.unwrap_or(false),
            log_file,
        })
    }

    /// Replace the data location, e.g. from a command line override
    pub fn with_data(mut self, data: DataLocation) -> Self {
        self.data = data;
        self
    }

    /// Get HTTP timeout as Duration
    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http.timeout_seconds)
    }

    /// Get the periodic refresh interval, if enabled
    pub fn refresh_interval(&self) -> Option<Duration> {
        self.refresh_seconds.map(Duration::from_secs)
    }

    /// Human readable description of the data location
    pub fn data_description(&self) -> String {
        match &self.data {
            DataLocation::Url(url) => url.clone(),
            DataLocation::File(path) => path.display().to_string(),
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.http.timeout_seconds == 0 {
            return Err(anyhow::anyhow!("HTTP timeout must be greater than zero"));
        }

        if self.refresh_seconds == Some(0) {
            return Err(anyhow::anyhow!("Refresh interval must be greater than zero"));
        }

        if let DataLocation::File(path) = &self.data {
            if !path.exists() {
                return Err(anyhow::anyhow!(
                    "Data file does not exist: {}",
                    path.display()
                ));
            }
        }

        Ok(())
    }
}

/// Helper function to parse environment variable as a specific type
fn parse_env_var<T>(var_name: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display + Send + Sync + std::error::Error + 'static,
{
    match std::env::var(var_name) {
        Ok(val) => val.trim().parse().map(Some).with_context(|| {
            format!("Failed to parse environment variable {} = '{}'", var_name, val)
        }),
        Err(_) => Ok(None),
    }
}
