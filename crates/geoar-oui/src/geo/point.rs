//! Geographic point representation

use serde::{Deserialize, Serialize};

/// A latitude/longitude pair in degrees
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    /// Null Island (0, 0)
    pub const ORIGIN: Self = Self { lat: 0.0, lng: 0.0 };

    /// Create a new point
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Both coordinates are finite numbers
    pub fn is_finite(&self) -> bool {
        self.lat.is_finite() && self.lng.is_finite()
    }
}

impl From<(f64, f64)> for GeoPoint {
    fn from((lat, lng): (f64, f64)) -> Self {
        Self { lat, lng }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_origin() {
        let p = GeoPoint::ORIGIN;
        assert_eq!(p.lat, 0.0);
        assert_eq!(p.lng, 0.0);
        assert_eq!(p, GeoPoint::default());
    }

    #[test]
    fn test_from_tuple() {
        let p: GeoPoint = (52.52, 13.405).into();
        assert_eq!(p, GeoPoint::new(52.52, 13.405));
    }

    #[test]
    fn test_is_finite() {
        assert!(GeoPoint::new(1.0, 2.0).is_finite());
        assert!(!GeoPoint::new(f64::NAN, 2.0).is_finite());
    }
}
