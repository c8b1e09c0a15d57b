//! Runtime configuration
//!
//! The only externally supplied secret is the API key. Everything else has a
//! default: the public API base URL, the per-list page sizes, and the
//! platform cache directory.

use std::path::PathBuf;
use thiserror::Error;

use crate::cli::Cli;
use crate::data::DEFAULT_BASE_URL;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("No API key given. Pass --api-key or set RECIPEBOX_API_KEY")]
    MissingApiKey,
}

/// Number of recipes requested per list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageSizes {
    pub trending: u32,
    pub vegetarian: u32,
    pub cuisine: u32,
}

impl Default for PageSizes {
    fn default() -> Self {
        Self {
            trending: 10,
            vegetarian: 15,
            cuisine: 15,
        }
    }
}

/// Everything the application needs to talk to the API and cache results
#[derive(Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub api_key: String,
    pub base_url: String,
    pub page_sizes: PageSizes,
    /// Overrides the platform cache directory when set
    pub cache_dir: Option<PathBuf>,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("page_sizes", &self.page_sizes)
            .field("cache_dir", &self.cache_dir)
            .finish()
    }
}

impl AppConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            page_sizes: PageSizes::default(),
            cache_dir: None,
        }
    }

    /// Builds the configuration from parsed CLI arguments
    ///
    /// The API key must be present and non-blank.
    pub fn from_cli(cli: &Cli) -> Result<Self, ConfigError> {
        let api_key = cli
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .ok_or(ConfigError::MissingApiKey)?;

        Ok(Self {
            api_key: api_key.to_string(),
            base_url: cli.base_url.clone(),
            page_sizes: PageSizes {
                trending: cli.trending_count,
                vegetarian: cli.vegetarian_count,
                cuisine: cli.cuisine_count,
            },
            cache_dir: cli.cache_dir.clone(),
        })
    }
}
