use std::time::Duration;

use crate::errors::{CatalogError, Result};

pub const DEFAULT_BASE_URL: &str = "https://api.rawg.io/api";

/// Client configuration. The API key is injected here at construction time;
/// a blank key is rejected up front rather than surfacing as a failed request
/// later.
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    pub api_key: String,
    pub base_url: String,
    /// Metacritic score window applied to every list request.
    pub min_score: u8,
    pub max_score: u8,
    /// Platform filter applied to every list request (4 = PC).
    pub platform: u32,
    /// Upper bound on concurrent detail fetches per refresh cycle.
    pub prefetch_concurrency: usize,
    pub request_timeout: Duration,
    pub connect_timeout: Duration,
}

impl CatalogConfig {
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(CatalogError::Config("catalog API key is empty".to_string()));
        }

        Ok(Self {
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            min_score: 75,
            max_score: 100,
            platform: 4,
            prefetch_concurrency: 8,
            request_timeout: Duration::from_secs(20),
            connect_timeout: Duration::from_secs(6),
        })
    }

    /// Build a configuration from `CATALOG_*` environment variables.
    /// `CATALOG_API_KEY` is required; everything else falls back to defaults.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("CATALOG_API_KEY")
            .ok()
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .ok_or_else(|| CatalogError::Config("CATALOG_API_KEY is not set".to_string()))?;

        let mut config = Self::new(api_key)?;
        if let Some(base_url) = std::env::var("CATALOG_BASE_URL")
            .ok()
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
        {
            config.base_url = base_url;
        }
        config.prefetch_concurrency = read_env_usize("CATALOG_PREFETCH_CONCURRENCY", 8, 1, 32);
        Ok(config)
    }
}

fn read_env_usize(key: &str, default: usize, min: usize, max: usize) -> usize {
    let parsed = std::env::var(key)
        .ok()
        .and_then(|value| value.parse::<usize>().ok())
        .unwrap_or(default);
    parsed.clamp(min, max)
}
