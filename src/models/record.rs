use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::geo::GeoPoint;

// ---------------------------------------------------------------------------
// MarketRecord — one observed price quotation
// ---------------------------------------------------------------------------

/// A single price quotation for a commodity at a market on a given date.
///
/// Prices are in rupees per quintal. Text fields default to the empty string
/// when the registry omits them or sends `null`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarketRecord {
    #[serde(deserialize_with = "lenient_text")]
    pub state: String,
    #[serde(deserialize_with = "lenient_text")]
    pub district: String,
    #[serde(deserialize_with = "lenient_text")]
    pub market: String,
    #[serde(deserialize_with = "lenient_text")]
    pub commodity: String,
    #[serde(deserialize_with = "lenient_text")]
    pub variety: String,
    #[serde(deserialize_with = "lenient_text")]
    pub grade: String,
    #[serde(alias = "minPrice", deserialize_with = "lenient_price")]
    pub min_price: Option<f64>,
    #[serde(alias = "maxPrice", deserialize_with = "lenient_price")]
    pub max_price: Option<f64>,
    #[serde(alias = "modalPrice", deserialize_with = "lenient_price")]
    pub modal_price: Option<f64>,
    #[serde(
        alias = "arrival_date",
        alias = "priceDate",
        alias = "arrivalDate",
        deserialize_with = "lenient_text"
    )]
    pub price_date: String,
    #[serde(deserialize_with = "lenient_coordinate")]
    pub latitude: Option<String>,
    #[serde(deserialize_with = "lenient_coordinate")]
    pub longitude: Option<String>,
}

impl MarketRecord {
    /// Build a record from one element of the registry's `records` array.
    ///
    /// Returns `None` when the element is not a JSON object, or when it
    /// spells the same field twice (e.g. `min_price` and `minPrice`).
    pub fn from_json(value: &Value) -> Option<Self> {
        if !value.is_object() {
            return None;
        }
        Self::deserialize(value).ok()
    }

    /// The record's parsed coordinate, if both components are present and
    /// finite.
    pub fn coordinates(&self) -> Option<GeoPoint> {
        let lat = parse_coord(self.latitude.as_deref()?)?;
        let lon = parse_coord(self.longitude.as_deref()?)?;
        Some(GeoPoint::new(lat, lon))
    }
}

fn parse_coord(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

fn lenient_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => String::new(),
    })
}

fn lenient_price<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_f64(),
        // Agmarknet sends prices as strings, sometimes with thousands separators.
        Value::String(s) => s.trim().replace(',', "").parse::<f64>().ok(),
        _ => None,
    })
}

fn lenient_coordinate<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<String>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) if !s.trim().is_empty() => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}
