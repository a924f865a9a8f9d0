//! Async wrapper around [`MarketSdk`] for use in async runtimes (Tokio, etc.).
//!
//! Runs all SDK operations on a blocking thread pool via
//! [`tokio::task::spawn_blocking`], keeping the async event loop free.
//!
//! # Example
//!
//! ```no_run
//! use agrimarket_sdk::{AsyncMarketSdk, FilterCriteria};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let sdk = AsyncMarketSdk::builder().api_key("my-key").build().await.unwrap();
//!
//!     let records = sdk
//!         .fetch_market_data(FilterCriteria::new().state("Maharashtra"))
//!         .await
//!         .unwrap();
//! }
//! ```

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::config::MarketConfig;
use crate::error::{MarketError, Result};
use crate::models::{FilterCriteria, MarketField, MarketInsights, MarketRecord};
use crate::session::MarketSession;
use crate::MarketSdk;

// ---------------------------------------------------------------------------
// AsyncMarketSdkBuilder
// ---------------------------------------------------------------------------

/// Builder for configuring and constructing an [`AsyncMarketSdk`] instance.
pub struct AsyncMarketSdkBuilder {
    config: MarketConfig,
    cache_dir: Option<PathBuf>,
    snapshots: bool,
    offline: bool,
}

impl Default for AsyncMarketSdkBuilder {
    fn default() -> Self {
        Self {
            config: MarketConfig::new(""),
            cache_dir: None,
            snapshots: false,
            offline: false,
        }
    }
}

impl AsyncMarketSdkBuilder {
    pub fn config(mut self, config: MarketConfig) -> Self {
        self.config = config;
        self
    }

    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.config.api_key = key.into();
        self
    }

    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = url.into();
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = Some(timeout);
        self
    }

    pub fn cache_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.cache_dir = Some(path.as_ref().to_path_buf());
        self
    }

    pub fn snapshots(mut self, enabled: bool) -> Self {
        self.snapshots = enabled;
        self
    }

    pub fn offline(mut self, offline: bool) -> Self {
        self.offline = offline;
        self
    }

    /// Build the async SDK.
    ///
    /// The blocking HTTP client is created on the blocking thread pool so it
    /// won't block the async event loop.
    pub async fn build(self) -> Result<AsyncMarketSdk> {
        tokio::task::spawn_blocking(move || {
            let mut builder = MarketSdk::builder()
                .config(self.config)
                .snapshots(self.snapshots)
                .offline(self.offline);
            if let Some(dir) = self.cache_dir {
                builder = builder.cache_dir(dir);
            }
            let sdk = builder.build()?;
            Ok(AsyncMarketSdk {
                inner: Arc::new(sdk),
            })
        })
        .await
        .map_err(|e| MarketError::InvalidArgument(format!("Task join error: {e}")))?
    }
}

// ---------------------------------------------------------------------------
// AsyncMarketSdk
// ---------------------------------------------------------------------------

/// Async wrapper around [`MarketSdk`].
///
/// All operations are dispatched to a blocking thread pool via
/// [`tokio::task::spawn_blocking`]. Calls are not serialized: a slow request
/// never holds up a later one. Results of superseded requests should be
/// routed through a [`MarketSession`] (see [`fetch_for`](Self::fetch_for)).
///
/// Clones share one underlying SDK.
#[derive(Clone)]
pub struct AsyncMarketSdk {
    inner: Arc<MarketSdk>,
}

impl AsyncMarketSdk {
    /// Create a new builder for configuring the async SDK.
    pub fn builder() -> AsyncMarketSdkBuilder {
        AsyncMarketSdkBuilder::default()
    }

    /// Run a sync SDK operation on the blocking thread pool.
    pub async fn run<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&MarketSdk) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let sdk = self.inner.clone();
        tokio::task::spawn_blocking(move || f(&sdk))
        .await
        .map_err(|e| MarketError::InvalidArgument(format!("Task join error: {e}")))?
    }

    /// Fetch market records matching `criteria`.
    pub async fn fetch_market_data(&self, criteria: FilterCriteria) -> Result<Vec<MarketRecord>> {
        self.run(move |s| s.fetch_market_data(&criteria)).await
    }

    /// Fetch, filter and compute facets for `criteria`.
    pub async fn insights(&self, criteria: FilterCriteria) -> Result<MarketInsights> {
        self.run(move |s| s.markets().insights(&criteria)).await
    }

    /// Distinct values of one field across an unfiltered sample.
    pub async fn filter_options(&self, field: MarketField) -> Result<Vec<String>> {
        self.run(move |s| Ok(s.markets().filter_options(field))).await
    }

    /// Fetch for the session's current state and apply the result if no
    /// newer fetch was started meanwhile.
    ///
    /// The session lock is only held to issue the ticket and to apply the
    /// result, never across the request.
    pub async fn fetch_for(&self, session: &Mutex<MarketSession>) -> Result<bool> {
        let ticket = {
            let mut guard = session
                .lock()
                .map_err(|_| MarketError::InvalidArgument("session lock poisoned".into()))?;
            guard.begin_fetch()
        };
        let result = self.insights(ticket.criteria().clone()).await;
        let mut guard = session
            .lock()
            .map_err(|_| MarketError::InvalidArgument("session lock poisoned".into()))?;
        Ok(guard.complete(ticket, result))
    }

    /// Close this handle. The SDK is released once every clone is closed.
    ///
    /// The handle is dropped on the blocking pool, since the blocking HTTP
    /// client must not be dropped inside an async context.
    pub async fn close(self) -> Result<()> {
        tokio::task::spawn_blocking(move || {
            drop(self.inner);
            Ok(())
        })
        .await
        .map_err(|e| MarketError::InvalidArgument(format!("Task join error: {e}")))?
    }
}
