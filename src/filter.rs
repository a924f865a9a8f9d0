//! In-memory refinement of fetched records.
//!
//! Both filters are pure and order-preserving: the output is the input
//! sequence with non-matching records removed.

use crate::geo::LocationFilter;
use crate::models::{FilterCriteria, MarketRecord};

/// Apply the text filter and then the location filter from `criteria`.
pub fn post_filter(records: Vec<MarketRecord>, criteria: &FilterCriteria) -> Vec<MarketRecord> {
    let mut records = records;
    if let Some(query) = criteria.active_search() {
        records = filter_by_text(records, query);
    }
    if let Some(location) = &criteria.location {
        records = filter_by_location(records, location);
    }
    records
}

/// Keep records where `query` (case-insensitive) occurs in the market,
/// commodity, district or state. An empty query keeps everything.
pub fn filter_by_text(records: Vec<MarketRecord>, query: &str) -> Vec<MarketRecord> {
    if query.is_empty() {
        return records;
    }
    let query = query.to_lowercase();
    records
        .into_iter()
        .filter(|r| matches_text(r, &query))
        .collect()
}

/// `query` must already be lower-cased.
pub fn matches_text(record: &MarketRecord, query: &str) -> bool {
    [
        &record.market,
        &record.commodity,
        &record.district,
        &record.state,
    ]
    .iter()
    .any(|field| !field.is_empty() && field.to_lowercase().contains(query))
}

/// Keep records with parseable coordinates within the radius. Records
/// without coordinates are dropped.
pub fn filter_by_location(records: Vec<MarketRecord>, location: &LocationFilter) -> Vec<MarketRecord> {
    records
        .into_iter()
        .filter(|r| matches_location(r, location))
        .collect()
}

pub fn matches_location(record: &MarketRecord, location: &LocationFilter) -> bool {
    record
        .coordinates()
        .map(|p| location.contains(p))
        .unwrap_or(false)
}
