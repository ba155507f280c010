//! In-process stand-in for a paired wearable

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use geoar_oui::geo::destination;
use geoar_oui::{GeoPoint, ProximityItem};
use geoar_sync::{BridgeError, DeviceBridge};
use tracing::{debug, info};

/// Device bridge that serializes batches to JSON and logs them
pub struct LoggingBridge {
    connected: AtomicBool,
    ar_mode: AtomicBool,
    location: Mutex<GeoPoint>,
    batches: AtomicUsize,
}

impl LoggingBridge {
    pub fn new(location: GeoPoint) -> Self {
        Self {
            connected: AtomicBool::new(true),
            ar_mode: AtomicBool::new(true),
            location: Mutex::new(location),
            batches: AtomicUsize::new(0),
        }
    }

    pub fn set_connected(&self, connected: bool) {
        self.connected.store(connected, Ordering::SeqCst);
    }

    /// Move the simulated device
    pub fn walk(&self, bearing_deg: f64, meters: f64) -> Option<GeoPoint> {
        let mut location = self.location.lock().ok()?;
        *location = destination(*location, bearing_deg, meters);
        Some(*location)
    }

    /// Batches delivered so far
    pub fn batches_received(&self) -> usize {
        self.batches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DeviceBridge for LoggingBridge {
    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    fn is_ar_mode_active(&self) -> bool {
        self.ar_mode.load(Ordering::SeqCst)
    }

    async fn device_location(&self) -> Result<Option<GeoPoint>, BridgeError> {
        self.location
            .lock()
            .map(|location| Some(*location))
            .map_err(|e| BridgeError::Location(e.to_string()))
    }

    async fn send_batch(&self, items: &[ProximityItem]) -> Result<(), BridgeError> {
        if !self.is_connected() {
            return Err(BridgeError::NotConnected);
        }

        let payload =
            serde_json::to_string(items).map_err(|e| BridgeError::Transport(e.to_string()))?;
        self.batches.fetch_add(1, Ordering::SeqCst);

        info!("Device <- {} items ({} bytes)", items.len(), payload.len());
        debug!("Payload: {}", payload);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geoar_oui::Author;

    fn item() -> ProximityItem {
        ProximityItem {
            id: "m1".into(),
            content: "hi".into(),
            author: Author::new("ana"),
            distance_meters: 12.0,
            bearing_degrees: 90.0,
        }
    }

    #[tokio::test]
    async fn test_send_counts_batches() {
        let bridge = LoggingBridge::new(GeoPoint::ORIGIN);
        bridge.send_batch(&[item()]).await.unwrap();
        bridge.send_batch(&[]).await.unwrap();
        assert_eq!(bridge.batches_received(), 2);
    }

    #[tokio::test]
    async fn test_disconnected_send_fails() {
        let bridge = LoggingBridge::new(GeoPoint::ORIGIN);
        bridge.set_connected(false);
        assert_eq!(bridge.send_batch(&[item()]).await, Err(BridgeError::NotConnected));
        assert_eq!(bridge.batches_received(), 0);
    }

    #[tokio::test]
    async fn test_walk_moves_device() {
        let bridge = LoggingBridge::new(GeoPoint::ORIGIN);
        let moved = bridge.walk(90.0, 100.0).unwrap();
        let reported = bridge.device_location().await.unwrap().unwrap();
        assert_eq!(moved, reported);
        assert!((geoar_oui::distance(GeoPoint::ORIGIN, reported) - 100.0).abs() < 0.01);
    }
}
