//! Session events delivered to the overlay loop

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::geo::{CandidateMessage, GeoPoint};
use super::OrientationSample;

/// Everything that can change what the overlay shows.
///
/// Location, orientation and feed updates arrive independently and in no
/// particular order; each one simply replaces the previous value.
#[derive(Debug, Clone)]
pub enum SessionEvent {
    /// New observer position
    Location(GeoPoint),

    /// Position is no longer available (permission revoked, signal lost)
    LocationLost,

    /// New orientation reading
    Orientation(OrientationSample),

    /// Fresh snapshot of candidate messages from the feed
    Messages(Arc<[CandidateMessage]>),

    /// Close the overlay
    Quit,
}

impl SessionEvent {
    /// Check if this event asks the loop to stop
    pub fn is_quit(&self) -> bool {
        matches!(self, SessionEvent::Quit)
    }
}

/// Sending half used by collaborators to push events into a session
pub type EventSink = mpsc::UnboundedSender<SessionEvent>;

/// Receiving half drained by the overlay loop
pub type EventStream = mpsc::UnboundedReceiver<SessionEvent>;

/// Create a connected sink/stream pair
pub fn event_channel() -> (EventSink, EventStream) {
    mpsc::unbounded_channel()
}
