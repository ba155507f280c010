//! geoar-oui: proximity AR overlay engine
//!
//! This crate turns a snapshot of geotagged messages into an on-screen overlay:
//! - Haversine geodesy and proximity filtering
//! - Orientation tracking with optional smoothing
//! - AR projection of bearings into screen space
//! - Glass message bubbles drawn through an abstract renderer backend
//!   (terminal simulation + display-list recording)
//! - A session runner that ties host capabilities to the render loop

pub mod app;
pub mod geo;
pub mod input;
pub mod overlay;
pub mod projection;
pub mod renderer;
pub mod session;
pub mod theme;

// Re-export commonly used types
pub use app::{OverlayRunner, SessionError};
pub use geo::{bearing, distance, filter_nearby, Author, CandidateMessage, GeoPoint, ProximityItem};
pub use input::{ObserverState, OrientationSample, OrientationSource, OrientationTracker, SessionEvent};
pub use overlay::{FrameOutcome, OverlayRenderer};
pub use projection::{ArProjector, ProjectedItem, Viewport, VisibleItem};
pub use renderer::{Color, RenderBackend, RenderError, SurfaceCapabilities};
pub use session::{ArSession, Capabilities, CapabilityNotice};
pub use theme::GlassTheme;
