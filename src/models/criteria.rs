use std::fmt;

use crate::config::DEFAULT_LIMIT;
use crate::error::{MarketError, Result};
use crate::geo::LocationFilter;
use crate::models::MarketRecord;

// ---------------------------------------------------------------------------
// MarketField — filterable text columns of a record
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MarketField {
    State,
    District,
    Market,
    Commodity,
    Variety,
    Grade,
}

impl MarketField {
    /// Order in which server-side filters are sent.
    pub const ALL: [MarketField; 6] = [
        MarketField::State,
        MarketField::District,
        MarketField::Market,
        MarketField::Commodity,
        MarketField::Variety,
        MarketField::Grade,
    ];

    /// Column name used by the registry (`filters[<name>]`).
    pub fn as_str(&self) -> &'static str {
        match self {
            MarketField::State => "state",
            MarketField::District => "district",
            MarketField::Market => "market",
            MarketField::Commodity => "commodity",
            MarketField::Variety => "variety",
            MarketField::Grade => "grade",
        }
    }

    pub fn value_of<'r>(&self, record: &'r MarketRecord) -> &'r str {
        match self {
            MarketField::State => &record.state,
            MarketField::District => &record.district,
            MarketField::Market => &record.market,
            MarketField::Commodity => &record.commodity,
            MarketField::Variety => &record.variety,
            MarketField::Grade => &record.grade,
        }
    }
}

impl fmt::Display for MarketField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// FilterCriteria
// ---------------------------------------------------------------------------

/// Query state for one fetch.
///
/// Exact-match fields are sent to the registry as server-side filters;
/// `search_query` and `location` are applied in memory afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterCriteria {
    pub state: Option<String>,
    pub district: Option<String>,
    pub market: Option<String>,
    pub commodity: Option<String>,
    pub variety: Option<String>,
    pub grade: Option<String>,
    pub search_query: Option<String>,
    pub location: Option<LocationFilter>,
    pub limit: usize,
    pub offset: usize,
}

impl Default for FilterCriteria {
    fn default() -> Self {
        Self {
            state: None,
            district: None,
            market: None,
            commodity: None,
            variety: None,
            grade: None,
            search_query: None,
            location: None,
            limit: DEFAULT_LIMIT,
            offset: 0,
        }
    }
}

impl FilterCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(mut self, value: impl Into<String>) -> Self {
        self.state = Some(value.into());
        self
    }

    pub fn district(mut self, value: impl Into<String>) -> Self {
        self.district = Some(value.into());
        self
    }

    pub fn market(mut self, value: impl Into<String>) -> Self {
        self.market = Some(value.into());
        self
    }

    pub fn commodity(mut self, value: impl Into<String>) -> Self {
        self.commodity = Some(value.into());
        self
    }

    pub fn variety(mut self, value: impl Into<String>) -> Self {
        self.variety = Some(value.into());
        self
    }

    pub fn grade(mut self, value: impl Into<String>) -> Self {
        self.grade = Some(value.into());
        self
    }

    pub fn search(mut self, query: impl Into<String>) -> Self {
        self.search_query = Some(query.into());
        self
    }

    pub fn near(mut self, location: LocationFilter) -> Self {
        self.location = Some(location);
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    pub fn offset(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }

    /// Current value of an exact-match field.
    pub fn get(&self, field: MarketField) -> Option<&str> {
        let slot = match field {
            MarketField::State => &self.state,
            MarketField::District => &self.district,
            MarketField::Market => &self.market,
            MarketField::Commodity => &self.commodity,
            MarketField::Variety => &self.variety,
            MarketField::Grade => &self.grade,
        };
        slot.as_deref()
    }

    /// Set an exact-match field. An empty value clears it.
    pub fn set(&mut self, field: MarketField, value: Option<String>) {
        let value = value.filter(|v| !v.is_empty());
        let slot = match field {
            MarketField::State => &mut self.state,
            MarketField::District => &mut self.district,
            MarketField::Market => &mut self.market,
            MarketField::Commodity => &mut self.commodity,
            MarketField::Variety => &mut self.variety,
            MarketField::Grade => &mut self.grade,
        };
        *slot = value;
    }

    /// Non-empty exact-match fields, in registry filter order.
    pub fn server_filters(&self) -> Vec<(MarketField, &str)> {
        MarketField::ALL
            .iter()
            .filter_map(|f| self.get(*f).filter(|v| !v.is_empty()).map(|v| (*f, v)))
            .collect()
    }

    /// The search query, if it is set and non-empty.
    pub fn active_search(&self) -> Option<&str> {
        self.search_query.as_deref().filter(|q| !q.is_empty())
    }

    pub fn validate(&self) -> Result<()> {
        if self.limit == 0 {
            return Err(MarketError::InvalidArgument(
                "limit must be at least 1".to_string(),
            ));
        }
        if let Some(loc) = &self.location {
            loc.validate()?;
        }
        Ok(())
    }
}
