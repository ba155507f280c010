//! geoar: proximity AR overlay engine with paired-device synchronization
//!
//! Facade over the workspace crates:
//! - [`oui`]: geodesy, proximity filtering, orientation, projection, rendering
//! - [`sync`]: batched delivery of nearby items to a paired wearable
//! - [`config`]: `geoar.toml` settings

pub use geoar_config as config;
pub use geoar_oui as oui;
pub use geoar_sync as sync;

pub use geoar_config::GeoArConfig;
pub use geoar_oui::{
    bearing, distance, filter_nearby, ArProjector, ArSession, Author, CandidateMessage, GeoPoint,
    OrientationSample, OverlayRenderer, ProjectedItem, ProximityItem,
};
pub use geoar_sync::{DeviceBridge, DeviceSync, SyncHandle};
