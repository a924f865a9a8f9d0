//! Distinct filter values present in a result set.

use std::collections::BTreeSet;

use crate::models::{Facets, MarketField, MarketRecord};

/// Sorted, duplicate-free, non-empty values of `field` across `records`.
pub fn distinct_values(records: &[MarketRecord], field: MarketField) -> Vec<String> {
    records
        .iter()
        .map(|r| field.value_of(r))
        .filter(|v| !v.is_empty())
        .collect::<BTreeSet<&str>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}

/// Facet lists for the state, district, market and commodity selectors.
pub fn extract_facets(records: &[MarketRecord]) -> Facets {
    Facets {
        states: distinct_values(records, MarketField::State),
        districts: distinct_values(records, MarketField::District),
        markets: distinct_values(records, MarketField::Market),
        commodities: distinct_values(records, MarketField::Commodity),
    }
}
