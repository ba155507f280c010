//! Geographic primitives for the overlay
//!
//! Coordinates are WGS84 degrees. Distances are meters on a spherical Earth,
//! bearings are compass degrees (0 = north, 90 = east) normalized to [0, 360).

mod geodesic;
mod point;
mod proximity;

pub use geodesic::{bearing, destination, distance, EARTH_RADIUS_M};
pub(crate) use geodesic::normalize_degrees;
pub use point::GeoPoint;
pub use proximity::{filter_nearby, Author, CandidateMessage, ProximityItem};
