//! Per-session observer state
//!
//! An [`ArSession`] owns everything one open AR view needs: the latest
//! observer position and orientation, the candidate snapshot, the filtered
//! proximity items and the capability handles. It is mutated only from the
//! session loop; the render tick reads it and never writes.

use std::sync::Arc;

use geoar_config::GeoArConfig;
use tracing::{debug, info, warn};

use super::capability::{Capabilities, CameraStream, CapabilityNotice, Subscription};
use crate::geo::{filter_nearby, CandidateMessage, GeoPoint, ProximityItem};
use crate::input::{
    EventSink, ObserverState, OrientationSource, OrientationTracker, SessionEvent, SmoothedTracker,
    Smoothing,
};
use crate::projection::{ArProjector, Viewport, VisibleItem};

/// On-screen session settings
#[derive(Debug, Clone)]
pub struct SessionSettings {
    pub radius_m: f64,
    pub max_items: Option<usize>,
    pub hide_when_heading_unknown: bool,
    pub projector: ArProjector,
    pub smoothing: Smoothing,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self::from(&GeoArConfig::default())
    }
}

impl From<&GeoArConfig> for SessionSettings {
    fn from(config: &GeoArConfig) -> Self {
        Self {
            radius_m: config.overlay.radius_m,
            max_items: config.overlay.max_items,
            hide_when_heading_unknown: config.overlay.hide_when_heading_unknown,
            projector: ArProjector::from(&config.overlay),
            smoothing: config.orientation.smoothing.into(),
        }
    }
}

/// State of one open AR view
pub struct ArSession {
    settings: SessionSettings,
    tracker: SmoothedTracker,
    location: Option<GeoPoint>,
    candidates: Arc<[CandidateMessage]>,
    items: Arc<[ProximityItem]>,
    notices: Vec<CapabilityNotice>,
    subscriptions: Vec<Subscription>,
    camera: Option<Box<dyn CameraStream>>,
    closed: bool,
}

impl ArSession {
    /// Session with no collaborators attached
    pub fn new(settings: SessionSettings) -> Self {
        let tracker = SmoothedTracker::new(OrientationTracker::new(), settings.smoothing);
        Self {
            settings,
            tracker,
            location: None,
            candidates: Arc::from(Vec::new()),
            items: Arc::from(Vec::new()),
            notices: Vec::new(),
            subscriptions: Vec::new(),
            camera: None,
            closed: false,
        }
    }

    /// Create a session and subscribe every collaborator to `sink`.
    ///
    /// Missing capabilities are recorded as notices, never as errors.
    pub fn start(settings: SessionSettings, capabilities: Capabilities, sink: EventSink) -> Self {
        let Capabilities {
            mut location,
            mut orientation,
            mut messages,
            camera,
        } = capabilities;

        let mut session = Self::new(settings);

        match camera {
            Some(stream) => session.camera = Some(stream),
            None => session.notify(CapabilityNotice::CameraUnavailable),
        }

        match orientation.subscribe(sink.clone()) {
            Some(sub) => session.subscriptions.push(sub),
            None => {
                session.tracker.set_supported(false);
                session.notify(CapabilityNotice::OrientationUnavailable);
            }
        }

        match location.subscribe(sink.clone()) {
            Some(sub) => session.subscriptions.push(sub),
            None => session.notify(CapabilityNotice::LocationUnavailable),
        }

        session.subscriptions.push(messages.subscribe(sink));

        info!(
            "AR session started ({} subscriptions, camera: {})",
            session.subscriptions.len(),
            session.has_camera()
        );
        session
    }

    fn notify(&mut self, notice: CapabilityNotice) {
        if !self.notices.contains(&notice) {
            warn!("{}", notice);
            self.notices.push(notice);
        }
    }

    /// Apply one event. Returns `false` once the session should stop.
    pub fn apply(&mut self, event: SessionEvent) -> bool {
        if self.closed {
            return false;
        }

        match event {
            SessionEvent::Location(point) if !point.is_finite() => {
                warn!("Ignoring non-finite location fix {:?}", point);
            }
            SessionEvent::Location(point) => {
                self.location = Some(point);
                self.refilter();
            }
            SessionEvent::LocationLost => {
                if self.location.take().is_some() {
                    debug!("Observer location lost");
                }
                self.refilter();
            }
            SessionEvent::Orientation(sample) => {
                self.tracker.on_sample(sample);
            }
            SessionEvent::Messages(candidates) => {
                debug!("Received {} candidate messages", candidates.len());
                self.candidates = candidates;
                self.refilter();
            }
            SessionEvent::Quit => {
                self.close();
                return false;
            }
        }
        true
    }

    fn refilter(&mut self) {
        self.items = match self.location {
            Some(observer) => filter_nearby(
                observer,
                &self.candidates,
                self.settings.radius_m,
                self.settings.max_items,
            )
            .into(),
            None => Arc::from(Vec::new()),
        };
        debug!("{} messages within {}m", self.items.len(), self.settings.radius_m);
    }

    pub fn settings(&self) -> &SessionSettings {
        &self.settings
    }

    /// Latest observer state
    pub fn observer(&self) -> ObserverState {
        ObserverState {
            location: self.location,
            orientation: self.tracker.current(),
            orientation_known: self.tracker.is_known(),
        }
    }

    /// Proximity items for the current location, closest first
    pub fn items(&self) -> Arc<[ProximityItem]> {
        self.items.clone()
    }

    /// Items inside the field of view for this frame.
    ///
    /// Empty while the heading is unknown if the session is configured to
    /// hide bearing-dependent overlays.
    pub fn visible_items(&self, viewport: Viewport) -> Vec<VisibleItem<'_>> {
        if self.settings.hide_when_heading_unknown && !self.tracker.is_known() {
            return Vec::new();
        }
        self.settings
            .projector
            .project_visible(&self.items, self.tracker.current(), viewport)
    }

    /// Capabilities this session is running without
    pub fn notices(&self) -> &[CapabilityNotice] {
        &self.notices
    }

    pub fn has_camera(&self) -> bool {
        self.camera.as_ref().is_some_and(|c| c.is_active())
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Release the camera and every subscription. Safe to call repeatedly.
    pub fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;

        if let Some(mut camera) = self.camera.take() {
            camera.release();
        }
        let count = self.subscriptions.len();
        self.subscriptions.clear();
        info!("AR session closed, released {} subscriptions", count);
    }
}

impl Drop for ArSession {
    fn drop(&mut self) {
        self.close();
    }
}
