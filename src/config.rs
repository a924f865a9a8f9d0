use std::path::PathBuf;
use std::time::Duration;

use crate::error::{MarketError, Result};

/// Daily commodity prices from various markets (data.gov.in, Agmarknet feed).
pub const DEFAULT_BASE_URL: &str =
    "https://api.data.gov.in/resource/9ef84268-d588-465a-a308-a864a43d0070";

pub const API_KEY_ENV: &str = "DATA_GOV_API_KEY";
pub const BASE_URL_ENV: &str = "AGRIMARKET_BASE_URL";

pub const DEFAULT_LIMIT: usize = 20;
pub const DEFAULT_RADIUS_KM: f64 = 50.0;
pub const FILTER_OPTIONS_LIMIT: usize = 1000;

/// Connection settings for the market-price registry.
///
/// Passed to the SDK at construction time; nothing here is global.
#[derive(Debug, Clone, PartialEq)]
pub struct MarketConfig {
    pub api_key: String,
    pub base_url: String,
    /// `None` means no request timeout.
    pub timeout: Option<Duration>,
}

impl MarketConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: None,
        }
    }

    /// Load settings from the process environment, reading a `.env` file
    /// first if one exists.
    ///
    /// `DATA_GOV_API_KEY` is required; `AGRIMARKET_BASE_URL` overrides the
    /// registry endpoint.
    pub fn from_env() -> Result<Self> {
        let _ = dotenvy::dotenv();
        let api_key = std::env::var(API_KEY_ENV)
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| {
                MarketError::InvalidArgument(format!("{} is not set", API_KEY_ENV))
            })?;
        let mut config = Self::new(api_key);
        if let Ok(url) = std::env::var(BASE_URL_ENV) {
            if !url.trim().is_empty() {
                config.base_url = url;
            }
        }
        Ok(config)
    }
}

pub fn default_cache_dir() -> PathBuf {
    if let Some(cache) = dirs::cache_dir() {
        cache.join("agrimarket-sdk")
    } else {
        PathBuf::from(".agrimarket-sdk-cache")
    }
}
