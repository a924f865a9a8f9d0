//! Great-circle distance and the user-location seam.

use crate::config::DEFAULT_RADIUS_KM;
use crate::error::{MarketError, Result};

pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// A latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// Haversine distance to `other`, in kilometres.
    pub fn distance_km(&self, other: &GeoPoint) -> f64 {
        haversine_km(*self, *other)
    }
}

/// Great-circle distance between two points on a sphere of radius
/// [`EARTH_RADIUS_KM`].
pub fn haversine_km(a: GeoPoint, b: GeoPoint) -> f64 {
    let d_lat = (b.latitude - a.latitude).to_radians();
    let d_lon = (b.longitude - a.longitude).to_radians();
    let h = (d_lat / 2.0).sin().powi(2)
        + a.latitude.to_radians().cos()
            * b.latitude.to_radians().cos()
            * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());
    EARTH_RADIUS_KM * c
}

// ---------------------------------------------------------------------------
// LocationFilter
// ---------------------------------------------------------------------------

/// Radius query around a coordinate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocationFilter {
    pub latitude: f64,
    pub longitude: f64,
    pub radius_km: f64,
}

impl LocationFilter {
    /// Radius defaults to 50 km.
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            radius_km: DEFAULT_RADIUS_KM,
        }
    }

    pub fn around(point: GeoPoint) -> Self {
        Self::new(point.latitude, point.longitude)
    }

    pub fn with_radius(mut self, radius_km: f64) -> Self {
        self.radius_km = radius_km;
        self
    }

    pub fn center(&self) -> GeoPoint {
        GeoPoint::new(self.latitude, self.longitude)
    }

    /// True when `point` lies within the radius (inclusive).
    pub fn contains(&self, point: GeoPoint) -> bool {
        haversine_km(self.center(), point) <= self.radius_km
    }

    pub fn validate(&self) -> Result<()> {
        if !self.latitude.is_finite() || !(-90.0..=90.0).contains(&self.latitude) {
            return Err(MarketError::InvalidArgument(format!(
                "latitude must be within [-90, 90], got {}",
                self.latitude
            )));
        }
        if !self.longitude.is_finite() || !(-180.0..=180.0).contains(&self.longitude) {
            return Err(MarketError::InvalidArgument(format!(
                "longitude must be within [-180, 180], got {}",
                self.longitude
            )));
        }
        if !self.radius_km.is_finite() || self.radius_km < 0.0 {
            return Err(MarketError::InvalidArgument(format!(
                "radius_km must be a non-negative number, got {}",
                self.radius_km
            )));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// LocationSource
// ---------------------------------------------------------------------------

/// Supplies the user's current coordinate (browser geolocation, GPS, a
/// saved farm address, ...).
///
/// Implementations return [`MarketError::GeolocationUnavailable`] when the
/// platform declines to provide a position.
pub trait LocationSource {
    fn current_location(&self) -> Result<GeoPoint>;
}

/// A `LocationSource` that always answers with the same coordinate, or
/// always declines when constructed with [`FixedLocation::unavailable`].
#[derive(Debug, Clone)]
pub struct FixedLocation {
    point: Option<GeoPoint>,
    reason: String,
}

impl FixedLocation {
    pub fn new(point: GeoPoint) -> Self {
        Self {
            point: Some(point),
            reason: String::new(),
        }
    }

    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self {
            point: None,
            reason: reason.into(),
        }
    }
}

impl LocationSource for FixedLocation {
    fn current_location(&self) -> Result<GeoPoint> {
        self.point
            .ok_or_else(|| MarketError::GeolocationUnavailable(self.reason.clone()))
    }
}
