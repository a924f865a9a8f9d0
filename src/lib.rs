//! Agricultural market price SDK for Rust.
//!
//! Fetches daily commodity price quotations from the public market-price
//! registry, narrows them by free text and distance from the user, and
//! extracts the distinct states, districts, markets and commodities needed
//! to populate dependent selectors.
//!
//! # Quick start
//!
//! ```no_run
//! use agrimarket_sdk::{FilterCriteria, LocationFilter, MarketSdk};
//!
//! let sdk = MarketSdk::builder().api_key("my-key").build().unwrap();
//!
//! // Onion prices within 50 km of Pune
//! let criteria = FilterCriteria::new()
//!     .commodity("Onion")
//!     .near(LocationFilter::new(18.52, 73.85));
//! let records = sdk.fetch_market_data(&criteria).unwrap();
//! ```

#[cfg(feature = "async")]
pub mod async_client;
pub mod cache;
pub mod config;
pub mod error;
pub mod facets;
pub mod fetcher;
pub mod filter;
pub mod geo;
pub mod models;
pub mod queries;
pub mod query_builder;
pub mod session;

#[cfg(feature = "async")]
pub use async_client::AsyncMarketSdk;
pub use cache::SnapshotCache;
pub use config::MarketConfig;
pub use error::{MarketError, Result};
pub use fetcher::Fetcher;
pub use geo::{FixedLocation, GeoPoint, LocationFilter, LocationSource};
pub use models::{
    Facets, FilterCriteria, MarketField, MarketInsights, MarketPage, MarketRecord,
};
pub use query_builder::QueryBuilder;
pub use session::{FetchTicket, MarketSession};

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

// ---------------------------------------------------------------------------
// MarketSdkBuilder
// ---------------------------------------------------------------------------

/// Builder for configuring and constructing a [`MarketSdk`] instance.
///
/// Use [`MarketSdk::builder()`] to obtain a builder, chain configuration
/// methods, and call [`build()`](MarketSdkBuilder::build) to create the SDK.
pub struct MarketSdkBuilder {
    config: MarketConfig,
    cache_dir: Option<PathBuf>,
    snapshots: bool,
    offline: bool,
}

impl Default for MarketSdkBuilder {
    fn default() -> Self {
        Self {
            config: MarketConfig::new(""),
            cache_dir: None,
            snapshots: false,
            offline: false,
        }
    }
}

impl MarketSdkBuilder {
    /// Replace the whole registry configuration.
    pub fn config(mut self, config: MarketConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the registry API key.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.config.api_key = key.into();
        self
    }

    /// Override the registry endpoint (resource URL).
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = url.into();
        self
    }

    /// Set an HTTP request timeout. By default requests never time out.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = Some(timeout);
        self
    }

    /// Store page snapshots in a custom directory. Implies `snapshots(true)`.
    pub fn cache_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.cache_dir = Some(path.as_ref().to_path_buf());
        self.snapshots = true;
        self
    }

    /// Enable or disable page snapshots.
    ///
    /// Without a [`cache_dir`](Self::cache_dir), snapshots live in the
    /// platform cache directory (e.g. `~/.cache/agrimarket-sdk` on Linux).
    pub fn snapshots(mut self, enabled: bool) -> Self {
        self.snapshots = enabled;
        self
    }

    /// Enable or disable offline mode.
    ///
    /// When offline, the SDK never calls the registry and only serves
    /// previously stored snapshots. Implies `snapshots(true)`. Defaults to
    /// `false`.
    pub fn offline(mut self, offline: bool) -> Self {
        self.offline = offline;
        if offline {
            self.snapshots = true;
        }
        self
    }

    /// Build the SDK.
    ///
    /// Fails with `InvalidArgument` when no API key is configured and the
    /// SDK is not offline.
    pub fn build(self) -> Result<MarketSdk> {
        let snapshots = if self.snapshots {
            Some(SnapshotCache::new(self.cache_dir)?)
        } else {
            None
        };
        let fetcher = Fetcher::new(self.config, snapshots, self.offline)?;
        Ok(MarketSdk { fetcher })
    }
}

// ---------------------------------------------------------------------------
// MarketSdk
// ---------------------------------------------------------------------------

/// The main entry point for the market SDK.
///
/// Wraps a [`Fetcher`] and exposes query interfaces as lightweight borrowing
/// wrappers.
pub struct MarketSdk {
    fetcher: Fetcher,
}

impl MarketSdk {
    /// Create a new builder for configuring the SDK.
    pub fn builder() -> MarketSdkBuilder {
        MarketSdkBuilder::default()
    }

    /// Build an SDK from `DATA_GOV_API_KEY` / `AGRIMARKET_BASE_URL`.
    pub fn from_env() -> Result<Self> {
        Self::builder().config(MarketConfig::from_env()?).build()
    }

    /// Access the market query interface.
    pub fn markets(&self) -> queries::markets::MarketQuery<'_> {
        queries::markets::MarketQuery::new(&self.fetcher)
    }

    /// Fetch market records matching `criteria`.
    ///
    /// Shorthand for `self.markets().fetch(criteria)`.
    pub fn fetch_market_data(&self, criteria: &FilterCriteria) -> Result<Vec<MarketRecord>> {
        self.markets().fetch(criteria)
    }

    /// Run one fetch for `session` and apply the result.
    ///
    /// Returns whether the result was applied (it always is when nothing
    /// else touches the session in between).
    pub fn refresh_session(&self, session: &mut MarketSession) -> bool {
        let ticket = session.begin_fetch();
        let result = self.markets().insights(ticket.criteria());
        session.complete(ticket, result)
    }

    /// Remove all stored snapshots. No-op when snapshots are disabled.
    pub fn clear_snapshots(&self) -> Result<()> {
        match self.fetcher.snapshots() {
            Some(cache) => cache.clear(),
            None => Ok(()),
        }
    }

    /// Return a reference to the underlying [`Fetcher`] for advanced usage.
    pub fn fetcher(&self) -> &Fetcher {
        &self.fetcher
    }
}

// ---------------------------------------------------------------------------
// Display
// ---------------------------------------------------------------------------

impl fmt::Display for MarketSdk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let snapshots = self
            .fetcher
            .snapshots()
            .map(|c| c.cache_dir.display().to_string())
            .unwrap_or_else(|| "disabled".to_string());
        write!(
            f,
            "MarketSdk(base_url={}, snapshots={}, offline={})",
            self.fetcher.config.base_url, snapshots, self.fetcher.offline
        )
    }
}
