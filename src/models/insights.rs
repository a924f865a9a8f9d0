use serde::{Deserialize, Serialize};

use crate::models::MarketRecord;

// ---------------------------------------------------------------------------
// MarketPage — one page as returned by the registry
// ---------------------------------------------------------------------------

/// Unfiltered page of registry rows plus pagination metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MarketPage {
    pub records: Vec<MarketRecord>,
    /// Total matching rows reported by the registry, when it reports one.
    pub total: Option<u64>,
    pub limit: usize,
    pub offset: usize,
}

impl MarketPage {
    /// Whether the registry has rows beyond this page.
    pub fn has_more(&self) -> bool {
        match self.total {
            Some(total) => (self.offset.saturating_add(self.limit) as u64) < total,
            None => self.records.len() >= self.limit,
        }
    }
}

// ---------------------------------------------------------------------------
// Facets — distinct values for dependent selection controls
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Facets {
    pub states: Vec<String>,
    pub districts: Vec<String>,
    pub markets: Vec<String>,
    pub commodities: Vec<String>,
}

// ---------------------------------------------------------------------------
// MarketInsights — result of one successful fetch
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MarketInsights {
    /// Records after text and location filtering.
    pub records: Vec<MarketRecord>,
    pub facets: Facets,
    pub total: Option<u64>,
    pub limit: usize,
    pub offset: usize,
}

impl MarketInsights {
    /// Wrap already-filtered records, computing their facets.
    pub fn from_records(records: Vec<MarketRecord>, limit: usize, offset: usize) -> Self {
        let facets = crate::facets::extract_facets(&records);
        Self {
            records,
            facets,
            total: None,
            limit,
            offset,
        }
    }
}
