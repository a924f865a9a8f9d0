//! Dashboard filter state with superseding-request protection.
//!
//! A [`MarketSession`] holds what the market-insights screen is showing:
//! the selected filters, search text, page, optional user location and the
//! last successful result. Every fetch is tagged with a generation number;
//! only the result for the most recently issued fetch is applied, so a slow
//! response to an old request can never overwrite a newer one.

use crate::config::DEFAULT_RADIUS_KM;
use crate::error::{MarketError, Result};
use crate::geo::{GeoPoint, LocationFilter, LocationSource};
use crate::models::{FilterCriteria, MarketField, MarketInsights};

/// Handle for one in-flight fetch.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchTicket {
    generation: u64,
    criteria: FilterCriteria,
}

impl FetchTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Criteria snapshot the fetch must be issued with.
    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }
}

pub struct MarketSession {
    criteria: FilterCriteria,
    user_location: Option<GeoPoint>,
    use_location: bool,
    radius_km: f64,
    issued: u64,
    loading: bool,
    insights: Option<MarketInsights>,
    error: Option<String>,
}

impl Default for MarketSession {
    fn default() -> Self {
        Self::new()
    }
}

impl MarketSession {
    pub fn new() -> Self {
        Self {
            criteria: FilterCriteria::new(),
            user_location: None,
            use_location: false,
            radius_km: DEFAULT_RADIUS_KM,
            issued: 0,
            loading: false,
            insights: None,
            error: None,
        }
    }

    // -- Filter edits ------------------------------------------------------

    /// Select a value for an exact-match field (empty clears it).
    ///
    /// Changing the state clears district and market; changing the district
    /// clears market. Always returns to the first page.
    pub fn set_filter(&mut self, field: MarketField, value: &str) {
        self.criteria.set(field, Some(value.to_string()));
        match field {
            MarketField::State => {
                self.criteria.set(MarketField::District, None);
                self.criteria.set(MarketField::Market, None);
            }
            MarketField::District => {
                self.criteria.set(MarketField::Market, None);
            }
            _ => {}
        }
        self.criteria.offset = 0;
    }

    pub fn set_search_query(&mut self, query: &str) {
        self.criteria.search_query = if query.is_empty() {
            None
        } else {
            Some(query.to_string())
        };
        self.criteria.offset = 0;
    }

    pub fn set_limit(&mut self, limit: usize) {
        self.criteria.limit = limit;
        self.criteria.offset = 0;
    }

    pub fn set_offset(&mut self, offset: usize) {
        self.criteria.offset = offset;
    }

    pub fn next_page(&mut self) {
        self.criteria.offset = self.criteria.offset.saturating_add(self.criteria.limit);
    }

    pub fn previous_page(&mut self) {
        self.criteria.offset = self.criteria.offset.saturating_sub(self.criteria.limit);
    }

    /// Back to the first page with the current filters.
    pub fn refresh(&mut self) {
        self.criteria.offset = 0;
    }

    /// Drop every filter, the search text and location usage.
    pub fn reset(&mut self) {
        let limit = self.criteria.limit;
        self.criteria = FilterCriteria::new().limit(limit);
        self.use_location = false;
    }

    // -- Location ----------------------------------------------------------

    /// Ask `source` for the user's position and turn location filtering on.
    ///
    /// On failure location filtering stays off and the message is kept as
    /// the session error.
    pub fn enable_location(&mut self, source: &dyn LocationSource) -> Result<GeoPoint> {
        match source.current_location() {
            Ok(point) => {
                self.user_location = Some(point);
                self.use_location = true;
                self.criteria.offset = 0;
                Ok(point)
            }
            Err(e) => {
                self.use_location = false;
                let reason = match &e {
                    MarketError::GeolocationUnavailable(reason) => reason.clone(),
                    other => other.to_string(),
                };
                self.error = Some(format!("Unable to retrieve your location: {}", reason));
                Err(MarketError::GeolocationUnavailable(reason))
            }
        }
    }

    /// Flip location filtering, locating the user first if no position is
    /// known yet. Returns whether location filtering is now on.
    pub fn toggle_location(&mut self, source: &dyn LocationSource) -> Result<bool> {
        if !self.use_location && self.user_location.is_none() {
            self.enable_location(source)?;
        } else {
            self.use_location = !self.use_location;
            self.criteria.offset = 0;
        }
        Ok(self.location_enabled())
    }

    pub fn set_radius_km(&mut self, radius_km: f64) {
        self.radius_km = radius_km;
        self.criteria.offset = 0;
    }

    pub fn location_enabled(&self) -> bool {
        self.use_location && self.user_location.is_some()
    }

    pub fn user_location(&self) -> Option<GeoPoint> {
        self.user_location
    }

    // -- Fetch lifecycle ---------------------------------------------------

    /// Criteria for the next fetch, with the location radius attached when
    /// location filtering is on.
    pub fn criteria(&self) -> FilterCriteria {
        let mut criteria = self.criteria.clone();
        criteria.location = match (self.use_location, self.user_location) {
            (true, Some(point)) => Some(LocationFilter::around(point).with_radius(self.radius_km)),
            _ => None,
        };
        criteria
    }

    /// Start a fetch. Any ticket issued earlier becomes stale.
    pub fn begin_fetch(&mut self) -> FetchTicket {
        self.issued += 1;
        self.loading = true;
        FetchTicket {
            generation: self.issued,
            criteria: self.criteria(),
        }
    }

    pub fn is_current(&self, ticket: &FetchTicket) -> bool {
        ticket.generation == self.issued
    }

    /// Apply the outcome of a fetch.
    ///
    /// Returns `false` (and changes nothing) when a newer fetch has been
    /// issued since `ticket`. A failure keeps the last good insights.
    pub fn complete(&mut self, ticket: FetchTicket, result: Result<MarketInsights>) -> bool {
        if !self.is_current(&ticket) {
            return false;
        }
        self.loading = false;
        match result {
            Ok(insights) => {
                self.insights = Some(insights);
                self.error = None;
            }
            Err(e) => {
                eprintln!("Error fetching market data: {}", e);
                self.error = Some(if e.is_network() {
                    "Failed to load market data. Please try again.".to_string()
                } else {
                    e.to_string()
                });
            }
        }
        true
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn insights(&self) -> Option<&MarketInsights> {
        self.insights.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}
