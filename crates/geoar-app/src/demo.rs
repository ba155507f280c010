//! Simulated collaborators for the demos

use std::sync::Arc;

use geoar_oui::geo::destination;
use geoar_oui::input::{EventSink, OrientationSample};
use geoar_oui::session::{LocationProvider, MessageSource, OrientationProvider, Subscription};
use geoar_oui::{Author, CandidateMessage, GeoPoint, SessionEvent};
use tracing::debug;

/// (bearing, meters, author, content)
const DEMO_MESSAGES: &[(f64, f64, &str, &str)] = &[
    (10.0, 45.0, "mira", "Best espresso on the block, ask for the oat flat white"),
    (95.0, 180.0, "jonas", "Street musicians here every evening"),
    (200.0, 320.0, "leah", "Free bike pump at the corner shop"),
    (265.0, 480.0, "tomás", "Rooftop bar has a great view of the TV tower at sunset"),
    (300.0, 850.0, "ana", "Farmers market on Saturdays"),
    (150.0, 1400.0, "kai", "Too far away to show up"),
];

/// Demo feed placed around `origin`
pub fn demo_messages(origin: GeoPoint) -> Vec<CandidateMessage> {
    DEMO_MESSAGES
        .iter()
        .enumerate()
        .map(|(i, (bearing, meters, author, content))| {
            CandidateMessage::new(
                format!("msg-{}", i + 1),
                *content,
                destination(origin, *bearing, *meters),
                Author::new(*author),
            )
        })
        .collect()
}

/// Location provider with a fixed starting fix; keyboard walking moves it
pub struct SimulatedLocation {
    position: GeoPoint,
}

impl SimulatedLocation {
    pub fn new(position: GeoPoint) -> Self {
        Self { position }
    }
}

impl LocationProvider for SimulatedLocation {
    fn subscribe(&mut self, sink: EventSink) -> Option<Subscription> {
        debug!("Simulated location at {:?}", self.position);
        sink.send(SessionEvent::Location(self.position)).ok()?;
        Some(Subscription::detached())
    }
}

/// Orientation provider reporting one initial sample
pub struct SimulatedCompass {
    initial: OrientationSample,
}

impl SimulatedCompass {
    pub fn new(initial: OrientationSample) -> Self {
        Self { initial }
    }
}

impl OrientationProvider for SimulatedCompass {
    fn subscribe(&mut self, sink: EventSink) -> Option<Subscription> {
        sink.send(SessionEvent::Orientation(self.initial)).ok()?;
        Some(Subscription::detached())
    }
}

/// Message source that publishes one snapshot
pub struct StaticFeed {
    messages: Arc<[CandidateMessage]>,
}

impl StaticFeed {
    pub fn new(messages: Vec<CandidateMessage>) -> Self {
        Self {
            messages: messages.into(),
        }
    }
}

impl MessageSource for StaticFeed {
    fn subscribe(&mut self, sink: EventSink) -> Subscription {
        if sink.send(SessionEvent::Messages(self.messages.clone())).is_err() {
            debug!("Session closed before the feed was delivered");
        }
        Subscription::detached()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geoar_oui::filter_nearby;

    #[test]
    fn test_demo_messages_spread_around_origin() {
        let origin = GeoPoint::new(52.52, 13.405);
        let messages = demo_messages(origin);
        assert_eq!(messages.len(), DEMO_MESSAGES.len());

        let on_screen = filter_nearby(origin, &messages, 1000.0, None);
        assert_eq!(on_screen.len(), 5);
        assert_eq!(on_screen[0].author.name, "mira");

        let synced = filter_nearby(origin, &messages, 500.0, None);
        assert_eq!(synced.len(), 4);
    }
}
