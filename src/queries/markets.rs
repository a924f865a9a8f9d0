//! Market price queries: registry fetch followed by in-memory refinement.

use crate::config::FILTER_OPTIONS_LIMIT;
use crate::error::Result;
use crate::facets::distinct_values;
use crate::fetcher::Fetcher;
use crate::filter::post_filter;
use crate::models::{FilterCriteria, MarketField, MarketInsights, MarketPage, MarketRecord};

// ---------------------------------------------------------------------------
// MarketQuery
// ---------------------------------------------------------------------------

/// Query interface for market price records backed by the registry fetcher.
pub struct MarketQuery<'a> {
    fetcher: &'a Fetcher,
}

impl<'a> MarketQuery<'a> {
    /// Create a new `MarketQuery` bound to the given fetcher.
    pub fn new(fetcher: &'a Fetcher) -> Self {
        Self { fetcher }
    }

    /// Fetch records matching `criteria`.
    ///
    /// Exact-match fields and pagination go to the registry; the search
    /// query and location radius are applied to the returned page.
    pub fn fetch(&self, criteria: &FilterCriteria) -> Result<Vec<MarketRecord>> {
        let page = self.fetcher.fetch_page(criteria)?;
        Ok(post_filter(page.records, criteria))
    }

    /// Fetch the raw registry page without in-memory filtering.
    pub fn page(&self, criteria: &FilterCriteria) -> Result<MarketPage> {
        self.fetcher.fetch_page(criteria)
    }

    /// Fetch, filter and compute facets in one call.
    pub fn insights(&self, criteria: &FilterCriteria) -> Result<MarketInsights> {
        let page = self.fetcher.fetch_page(criteria)?;
        let total = page.total;
        let records = post_filter(page.records, criteria);
        let mut insights = MarketInsights::from_records(records, page.limit, page.offset);
        insights.total = total;
        Ok(insights)
    }

    /// Distinct values of `field` across an unfiltered sample of the
    /// registry.
    ///
    /// Returns an empty list if the fetch fails.
    pub fn filter_options(&self, field: MarketField) -> Vec<String> {
        let criteria = FilterCriteria::new().limit(FILTER_OPTIONS_LIMIT);
        match self.fetcher.fetch_page(&criteria) {
            Ok(page) => distinct_values(&page.records, field),
            Err(e) => {
                eprintln!("Error getting {} options: {}", field, e);
                Vec::new()
            }
        }
    }
}
