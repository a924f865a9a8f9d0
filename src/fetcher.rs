//! HTTP fetcher for the market-price registry.
//!
//! One GET per query, no retry. Successful pages are optionally written to
//! the [`SnapshotCache`]; in offline mode pages are served from it instead.

use reqwest::blocking::Client;
use serde_json::Value;

use crate::cache::SnapshotCache;
use crate::config::MarketConfig;
use crate::error::{MarketError, Result};
use crate::models::{FilterCriteria, MarketPage, MarketRecord};
use crate::query_builder::QueryBuilder;

/// Owns the HTTP client, registry configuration and optional snapshot cache.
pub struct Fetcher {
    pub config: MarketConfig,
    /// If true, never call the registry (serve snapshots only).
    pub offline: bool,
    client: Client,
    snapshots: Option<SnapshotCache>,
}

impl Fetcher {
    /// Create a fetcher. Offline mode requires a snapshot cache.
    pub fn new(
        config: MarketConfig,
        snapshots: Option<SnapshotCache>,
        offline: bool,
    ) -> Result<Self> {
        if offline && snapshots.is_none() {
            return Err(MarketError::InvalidArgument(
                "offline mode requires a snapshot cache".to_string(),
            ));
        }
        if !offline && config.api_key.trim().is_empty() {
            return Err(MarketError::InvalidArgument(
                "an API key is required to query the registry".to_string(),
            ));
        }
        let mut builder = Client::builder()
            .timeout(config.timeout)
            .redirect(reqwest::redirect::Policy::limited(10));
        // Loopback endpoints (local mirrors, test stubs) never go through a proxy.
        if is_loopback(&config.base_url) {
            builder = builder.no_proxy();
        }
        let client = builder.build()?;
        Ok(Self {
            config,
            offline,
            client,
            snapshots,
        })
    }

    pub fn snapshots(&self) -> Option<&SnapshotCache> {
        self.snapshots.as_ref()
    }

    /// Fetch one unfiltered page for `criteria`.
    ///
    /// Validates the criteria, then issues a single request. A non-success
    /// status becomes [`MarketError::Status`]; transport failures become
    /// [`MarketError::Http`].
    pub fn fetch_page(&self, criteria: &FilterCriteria) -> Result<MarketPage> {
        criteria.validate()?;
        let qb = QueryBuilder::from_criteria(&self.config.api_key, criteria);
        let key = qb.cache_key();

        if self.offline {
            return self.load_snapshot(&key);
        }

        let url = qb.to_url(&self.config.base_url)?;
        eprintln!("Fetching {}?{}", self.config.base_url, key);

        let resp = self.client.get(url).send()?;
        let status = resp.status();
        if !status.is_success() {
            return Err(MarketError::Status {
                status: status.as_u16(),
            });
        }
        let body: Value = serde_json::from_str(&resp.text()?)?;
        let page = parse_page(&body, criteria.limit, criteria.offset);

        if let Some(cache) = &self.snapshots {
            if let Err(e) = cache.store(&key, &page) {
                eprintln!("Failed to write market snapshot: {}", e);
            }
        }

        Ok(page)
    }

    fn load_snapshot(&self, key: &str) -> Result<MarketPage> {
        let cache = self.snapshots.as_ref().ok_or_else(|| {
            MarketError::NotFound("no snapshot cache configured".to_string())
        })?;
        cache.load(key)?.ok_or_else(|| {
            MarketError::NotFound(format!(
                "No snapshot for query '{}' and offline mode is enabled",
                key
            ))
        })
    }
}

fn is_loopback(base_url: &str) -> bool {
    reqwest::Url::parse(base_url)
        .ok()
        .and_then(|u| u.host_str().map(|h| h.to_string()))
        .map(|h| h == "localhost" || h == "127.0.0.1" || h == "[::1]")
        .unwrap_or(false)
}

/// Convert a registry response body into a page.
///
/// A missing `records` array yields an empty page; non-object entries are
/// skipped.
pub fn parse_page(body: &Value, limit: usize, offset: usize) -> MarketPage {
    let mut records = Vec::new();
    if let Some(Value::Array(rows)) = body.get("records") {
        records.reserve(rows.len());
        for row in rows {
            match MarketRecord::from_json(row) {
                Some(rec) => records.push(rec),
                None => eprintln!("Skipping malformed market record: {}", row),
            }
        }
    }
    let total = body.get("total").and_then(|t| match t {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse::<u64>().ok(),
        _ => None,
    });
    MarketPage {
        records,
        total,
        limit,
        offset,
    }
}
