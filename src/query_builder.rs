//! Registry query-string builder.
//!
//! Produces the ordered `(name, value)` pairs for a registry GET. Values are
//! percent-encoded by the URL layer, never by hand. Builder methods return
//! `&mut Self` for chaining.
//!
//! # Example
//!
//! ```rust
//! use agrimarket_sdk::QueryBuilder;
//! let params = QueryBuilder::new("my-key")
//!     .filter("state", "Maharashtra")
//!     .filter("commodity", "Onion")
//!     .limit(20)
//!     .build();
//! assert_eq!(params[0], ("api-key".to_string(), "my-key".to_string()));
//! ```

use reqwest::Url;

use crate::error::{MarketError, Result};
use crate::models::FilterCriteria;

/// Builds registry query parameters.
///
/// Always emits `api-key`, `format`, `limit` and `offset`, followed by one
/// `filters[<field>]` pair per non-empty filter in insertion order.
pub struct QueryBuilder {
    api_key: String,
    format: String,
    limit_val: usize,
    offset_val: usize,
    filters: Vec<(String, String)>,
}

impl QueryBuilder {
    pub fn new(api_key: &str) -> Self {
        Self {
            api_key: api_key.to_string(),
            format: "json".to_string(),
            limit_val: crate::config::DEFAULT_LIMIT,
            offset_val: 0,
            filters: Vec::new(),
        }
    }

    /// Start from a criteria's pagination and server-side filters.
    pub fn from_criteria(api_key: &str, criteria: &FilterCriteria) -> Self {
        let mut qb = Self::new(api_key);
        qb.limit(criteria.limit).offset(criteria.offset);
        for (field, value) in criteria.server_filters() {
            qb.filter(field.as_str(), value);
        }
        qb
    }

    /// Response format; defaults to `json`.
    pub fn format(&mut self, format: &str) -> &mut Self {
        self.format = format.to_string();
        self
    }

    pub fn limit(&mut self, n: usize) -> &mut Self {
        self.limit_val = n;
        self
    }

    pub fn offset(&mut self, n: usize) -> &mut Self {
        self.offset_val = n;
        self
    }

    /// Add an exact-match filter. Empty values are skipped.
    pub fn filter(&mut self, field: &str, value: &str) -> &mut Self {
        if !value.is_empty() {
            self.filters
                .push((format!("filters[{}]", field), value.to_string()));
        }
        self
    }

    /// Build the full ordered parameter list.
    pub fn build(&self) -> Vec<(String, String)> {
        let mut params = vec![("api-key".to_string(), self.api_key.clone())];
        params.extend(self.cache_params());
        params
    }

    /// Every parameter except the API key, so the same query under a
    /// different key maps to the same snapshot.
    pub fn cache_params(&self) -> Vec<(String, String)> {
        let mut params = vec![
            ("format".to_string(), self.format.clone()),
            ("limit".to_string(), self.limit_val.to_string()),
            ("offset".to_string(), self.offset_val.to_string()),
        ];
        params.extend(self.filters.iter().cloned());
        params
    }

    /// Stable key for the snapshot cache.
    pub fn cache_key(&self) -> String {
        self.cache_params()
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join("&")
    }

    /// Append the parameters to `base_url`.
    pub fn to_url(&self, base_url: &str) -> Result<Url> {
        Url::parse_with_params(base_url, self.build()).map_err(|e| {
            MarketError::InvalidArgument(format!("invalid base URL {}: {}", base_url, e))
        })
    }
}
