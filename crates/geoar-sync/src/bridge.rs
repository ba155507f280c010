//! Paired-device bridge
//!
//! The connection to the wearable is owned by the host application and
//! outlives any single AR session. The sync driver only borrows it through an
//! `Arc<dyn DeviceBridge>`.

use async_trait::async_trait;
use geoar_oui::{GeoPoint, ProximityItem};

/// Errors reported by a device bridge
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BridgeError {
    #[error("Device not connected")]
    NotConnected,

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Device rejected batch: {0}")]
    Rejected(String),

    #[error("Location query failed: {0}")]
    Location(String),
}

/// Connection to a paired AR wearable
#[async_trait]
pub trait DeviceBridge: Send + Sync {
    fn is_connected(&self) -> bool;

    /// True while the wearable is showing its AR view
    fn is_ar_mode_active(&self) -> bool;

    /// Position reported by the device, `None` when it has no fix yet
    async fn device_location(&self) -> Result<Option<GeoPoint>, BridgeError>;

    /// Deliver a batch of items. The bridge owns serialization.
    async fn send_batch(&self, items: &[ProximityItem]) -> Result<(), BridgeError>;
}
