//! AR session state and host capabilities

mod capability;
mod state;

pub use capability::{
    CameraStream, Capabilities, CapabilityNotice, LocationProvider, MessageSource,
    OrientationProvider, Subscription,
};
pub use state::{ArSession, SessionSettings};
