//! Movement detection
//!
//! Decides whether the observer has moved far enough to warrant refiltering
//! and resending, so GPS jitter does not cause churn.

use geoar_oui::{distance, GeoPoint};

/// Reference displacement that counts as movement
pub const DEFAULT_MOVEMENT_THRESHOLD_M: f64 = 150.0;

/// `distance(last, current) >= 150 m`
pub fn has_moved_significantly(last: GeoPoint, current: GeoPoint) -> bool {
    has_moved_beyond(last, current, DEFAULT_MOVEMENT_THRESHOLD_M)
}

/// `distance(last, current) >= threshold_m`
pub fn has_moved_beyond(last: GeoPoint, current: GeoPoint, threshold_m: f64) -> bool {
    distance(last, current) >= threshold_m
}

/// Tracks the position of the last sync
#[derive(Debug, Clone, PartialEq)]
pub struct MovementMonitor {
    threshold_m: f64,
    last: Option<GeoPoint>,
}

impl Default for MovementMonitor {
    fn default() -> Self {
        Self::new(DEFAULT_MOVEMENT_THRESHOLD_M)
    }
}

impl MovementMonitor {
    pub fn new(threshold_m: f64) -> Self {
        Self {
            threshold_m,
            last: None,
        }
    }

    pub fn threshold_m(&self) -> f64 {
        self.threshold_m
    }

    /// Position recorded by the last sync, if any
    pub fn last(&self) -> Option<GeoPoint> {
        self.last
    }

    /// True with no baseline, otherwise when displaced past the threshold
    pub fn has_moved(&self, current: GeoPoint) -> bool {
        match self.last {
            Some(last) => has_moved_beyond(last, current, self.threshold_m),
            None => true,
        }
    }

    pub fn record(&mut self, position: GeoPoint) {
        self.last = Some(position);
    }

    pub fn reset(&mut self) {
        self.last = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geoar_oui::geo::destination;

    #[test]
    fn test_threshold_boundaries() {
        let start = GeoPoint::new(52.52, 13.405);
        assert!(!has_moved_significantly(start, start));
        assert!(!has_moved_significantly(start, destination(start, 45.0, 149.0)));
        assert!(has_moved_significantly(start, destination(start, 45.0, 151.0)));
    }

    #[test]
    fn test_monitor_without_baseline_reports_movement() {
        let monitor = MovementMonitor::default();
        assert!(monitor.has_moved(GeoPoint::ORIGIN));
    }

    #[test]
    fn test_monitor_uses_recorded_position() {
        let mut monitor = MovementMonitor::new(100.0);
        let start = GeoPoint::new(-33.86, 151.21);
        monitor.record(start);

        assert!(!monitor.has_moved(destination(start, 180.0, 99.0)));
        assert!(monitor.has_moved(destination(start, 180.0, 101.0)));

        monitor.reset();
        assert_eq!(monitor.last(), None);
        assert!(monitor.has_moved(start));
    }
}
