//! Host capabilities consumed by an AR session
//!
//! Location, orientation and the camera may be denied or missing on a given
//! platform. Providers report that by returning `None`; the session turns it
//! into a [`CapabilityNotice`] and carries on without the feature.

use std::fmt;

use crate::input::EventSink;

/// Active provider registration, cancelled on drop
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce() + Send>>,
}

impl Subscription {
    /// Guard that runs `cancel` exactly once when dropped or cancelled
    pub fn new<F>(cancel: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    /// Guard with nothing to clean up
    pub fn detached() -> Self {
        Self { cancel: None }
    }

    /// Stop the subscription now
    pub fn cancel(mut self) {
        self.run_cancel();
    }

    fn run_cancel(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.run_cancel();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.cancel.is_some())
            .finish()
    }
}

/// Yields the observer's position as `SessionEvent::Location` /
/// `SessionEvent::LocationLost`
pub trait LocationProvider: Send {
    /// Start delivering positions, or `None` if access was denied
    fn subscribe(&mut self, sink: EventSink) -> Option<Subscription>;
}

/// Yields `SessionEvent::Orientation` samples
pub trait OrientationProvider: Send {
    /// Start delivering samples, or `None` on platforms without a sensor
    fn subscribe(&mut self, sink: EventSink) -> Option<Subscription>;
}

/// Pushes `SessionEvent::Messages` snapshots whenever the feed refreshes
pub trait MessageSource: Send {
    fn subscribe(&mut self, sink: EventSink) -> Subscription;
}

/// An acquired camera stream shown behind the overlay
pub trait CameraStream: Send {
    /// Release the device. Must be safe to call more than once.
    fn release(&mut self);

    fn is_active(&self) -> bool;
}

/// Collaborators handed to a session at start
pub struct Capabilities {
    pub location: Box<dyn LocationProvider>,
    pub orientation: Box<dyn OrientationProvider>,
    pub messages: Box<dyn MessageSource>,
    /// `None` when camera access was denied or no camera exists
    pub camera: Option<Box<dyn CameraStream>>,
}

/// A capability the session is running without
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CapabilityNotice {
    CameraUnavailable,
    OrientationUnavailable,
    LocationUnavailable,
}

impl fmt::Display for CapabilityNotice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = match self {
            CapabilityNotice::CameraUnavailable => "Camera unavailable, showing overlay only",
            CapabilityNotice::OrientationUnavailable => {
                "Orientation sensor unavailable, messages cannot be placed"
            }
            CapabilityNotice::LocationUnavailable => {
                "Location unavailable, nearby messages cannot be found"
            }
        };
        f.write_str(message)
    }
}
