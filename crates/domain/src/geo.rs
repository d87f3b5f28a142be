//! Geographic positions and great-circle distance.

use serde::{Deserialize, Serialize};

use crate::DomainError;

/// Mean Earth radius in metres (IUGG).
pub const EARTH_RADIUS_M: f64 = 6_371_008.8;

/// A WGS84 coordinate in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub lat: f64,
    pub lng: f64,
}

impl Position {
    /// Create a position, rejecting non-finite or out-of-range coordinates.
    pub fn new(lat: f64, lng: f64) -> Result<Self, DomainError> {
        let position = Self { lat, lng };
        position.validate()?;
        Ok(position)
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if !self.lat.is_finite() || !(-90.0..=90.0).contains(&self.lat) {
            return Err(DomainError::validation(format!(
                "latitude out of range: {}",
                self.lat
            )));
        }
        if !self.lng.is_finite() || !(-180.0..=180.0).contains(&self.lng) {
            return Err(DomainError::validation(format!(
                "longitude out of range: {}",
                self.lng
            )));
        }
        Ok(())
    }

    /// Great-circle distance to `other` in metres.
    pub fn distance_to(&self, other: &Position) -> f64 {
        haversine_distance_m(self, other)
    }

    /// Position displaced by the given metres north and east.
    ///
    /// Uses a local flat-earth approximation, accurate for the short hops
    /// a trail deals in.
    pub fn offset_m(&self, north_m: f64, east_m: f64) -> Position {
        let dlat = (north_m / EARTH_RADIUS_M).to_degrees();
        let dlng = (east_m / (EARTH_RADIUS_M * self.lat.to_radians().cos())).to_degrees();
        Position {
            lat: self.lat + dlat,
            lng: self.lng + dlng,
        }
    }
}

/// Haversine distance between two positions in metres.
pub fn haversine_distance_m(a: &Position, b: &Position) -> f64 {
    let phi1 = a.lat.to_radians();
    let phi2 = b.lat.to_radians();
    let dphi = (b.lat - a.lat).to_radians();
    let dlambda = (b.lng - a.lng).to_radians();

    let h = (dphi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (dlambda / 2.0).sin().powi(2);
    // Clamp guards asin against rounding just above 1.0 for antipodal points
    2.0 * EARTH_RADIUS_M * h.sqrt().min(1.0).asin()
}
