//! Paired-device synchronization for geoar.
//!
//! Keeps a connected AR wearable supplied with the messages near it:
//!
//! - **Movement Monitor**: ignores GPS jitter below a displacement threshold.
//! - **Batch Sync Queue**: single pending slot with id-set change detection,
//!   so overlapping triggers never cause duplicate sends.
//! - **Device Sync driver**: tokio task flushing the queue on a fixed
//!   interval while the device is connected and in AR mode.
//!
//! # Usage
//!
//! ```ignore
//! use geoar_sync::{DeviceSync, SyncSettings};
//!
//! let handle = DeviceSync::spawn(bridge.clone(), SyncSettings::default());
//! handle.update_messages(snapshot);
//! if handle.is_active() {
//!     handle.sync_now();
//! }
//! ```

pub mod bridge;
pub mod driver;
pub mod movement;
pub mod queue;
pub mod settings;

// Re-export main types for convenience
pub use bridge::{BridgeError, DeviceBridge};
pub use driver::{DeviceSync, SyncHandle, SyncStatus};
pub use movement::{has_moved_beyond, has_moved_significantly, MovementMonitor};
pub use queue::{BatchSyncQueue, PrepareOutcome, SyncBatch, SyncState, Transition};
pub use settings::SyncSettings;
