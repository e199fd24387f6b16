use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

use crate::error::{AppError, AppResult};

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// TMDB API key
    #[serde(default)]
    pub tmdb_api_key: Option<String>,

    /// TMDB API base URL
    #[serde(default = "default_tmdb_api_url")]
    pub tmdb_api_url: String,

    /// Optional path of the persistent memo store
    #[serde(default)]
    pub cache_file: Option<PathBuf>,

    /// Maximum number of memoized facts kept before LRU eviction
    #[serde(default = "default_cache_max_items")]
    pub cache_max_items: usize,

    /// Per-request timeout in seconds
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Number of title detail fetches kept in flight
    #[serde(default = "default_fetch_concurrency")]
    pub fetch_concurrency: usize,
}

fn default_tmdb_api_url() -> String {
    "https://api.themoviedb.org/3".to_string()
}

fn default_cache_max_items() -> usize {
    1000
}

fn default_request_timeout_secs() -> u64 {
    10
}

fn default_fetch_concurrency() -> usize {
    4
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tmdb_api_key: None,
            tmdb_api_url: default_tmdb_api_url(),
            cache_file: None,
            cache_max_items: default_cache_max_items(),
            request_timeout_secs: default_request_timeout_secs(),
            fetch_concurrency: default_fetch_concurrency(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    /// Applies command line overrides on top of the environment values
    pub fn with_overrides(mut self, api_key: Option<String>, cache_file: Option<PathBuf>) -> Self {
        if api_key.is_some() {
            self.tmdb_api_key = api_key;
        }
        if cache_file.is_some() {
            self.cache_file = cache_file;
        }
        self
    }

    /// Returns the API key, failing if neither the environment nor the CLI supplied one
    pub fn api_key(&self) -> AppResult<&str> {
        self.tmdb_api_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| AppError::Config("TMDB_API_KEY is not set".to_string()))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
