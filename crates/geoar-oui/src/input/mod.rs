//! Input abstraction for the overlay
//!
//! Provides:
//! - Orientation tracking with optional smoothing
//! - Session events from location, orientation and feed collaborators
//! - Keyboard simulation for terminal development

mod event;
mod orientation;
mod simulator;
mod smoothing;

pub use event::{event_channel, EventSink, EventStream, SessionEvent};
pub use orientation::{ObserverState, OrientationSample, OrientationSource, OrientationTracker};
pub use simulator::InputSimulator;
pub use smoothing::{SmoothedTracker, Smoothing};
