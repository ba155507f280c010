//! Overlay application framework
//!
//! The runner owns one [`ArSession`], a renderer and a backend. A single task
//! selects over the frame ticker and the session event stream, so the session
//! is only ever touched from one place. Frames pull whatever state is current
//! at tick time.

use std::io;
use std::time::Duration;

use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info};

use crate::input::{EventStream, SessionEvent};
use crate::overlay::{FrameOutcome, OverlayRenderer};
use crate::projection::Viewport;
use crate::renderer::{RenderBackend, RenderError};
use crate::session::ArSession;

/// Errors that end an overlay run
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("Terminal error: {0}")]
    Terminal(#[from] io::Error),

    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    #[error("Invalid frame rate: {0}")]
    InvalidFrameRate(u32),
}

/// What happened during a run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub frames_drawn: u64,
    pub frames_skipped: u64,
    pub events: u64,
}

/// Application runner for the overlay
pub struct OverlayRunner<B: RenderBackend> {
    session: ArSession,
    renderer: OverlayRenderer,
    backend: B,
    events: EventStream,
    frame_interval: Duration,
    summary: RunSummary,
}

impl<B: RenderBackend> OverlayRunner<B> {
    /// Create a new runner ticking at `frame_rate` frames per second
    pub fn new(
        session: ArSession,
        renderer: OverlayRenderer,
        backend: B,
        events: EventStream,
        frame_rate: u32,
    ) -> Result<Self, SessionError> {
        if frame_rate == 0 {
            return Err(SessionError::InvalidFrameRate(frame_rate));
        }

        Ok(Self {
            session,
            renderer,
            backend,
            events,
            frame_interval: Duration::from_secs(1) / frame_rate,
            summary: RunSummary::default(),
        })
    }

    pub fn session(&self) -> &ArSession {
        &self.session
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn frame_interval(&self) -> Duration {
        self.frame_interval
    }

    /// Project the current state and draw it
    pub fn render_frame(&mut self) -> FrameOutcome {
        let viewport = Viewport::from(&self.backend.capabilities());
        let visible = self.session.visible_items(viewport);
        let outcome = self.renderer.render_frame(&mut self.backend, &visible);

        match outcome {
            FrameOutcome::Drawn(_) => self.summary.frames_drawn += 1,
            FrameOutcome::Skipped => self.summary.frames_skipped += 1,
        }
        outcome
    }

    /// Apply one event, return false to quit
    pub fn handle_event(&mut self, event: SessionEvent) -> bool {
        self.summary.events += 1;
        self.session.apply(event)
    }

    /// Run until a quit event arrives or every event source is gone
    pub async fn run(mut self) -> Result<RunSummary, SessionError> {
        let mut ticker = interval(self.frame_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        info!("Overlay loop started at {:?} per frame", self.frame_interval);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.render_frame();
                }
                event = self.events.recv() => match event {
                    Some(event) => {
                        if !self.handle_event(event) {
                            debug!("Quit requested");
                            break;
                        }
                    }
                    None => {
                        debug!("Event stream closed");
                        break;
                    }
                },
            }
        }

        self.session.close();
        info!(
            "Overlay loop stopped: {} frames drawn, {} skipped",
            self.summary.frames_drawn, self.summary.frames_skipped
        );
        Ok(self.summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::{Author, CandidateMessage, GeoPoint};
    use crate::input::{event_channel, OrientationSample};
    use crate::renderer::RecordingBackend;
    use crate::session::SessionSettings;

    fn runner() -> (OverlayRunner<RecordingBackend>, crate::input::EventSink) {
        let (sink, stream) = event_channel();
        let runner = OverlayRunner::new(
            ArSession::new(SessionSettings::default()),
            OverlayRenderer::default(),
            RecordingBackend::new(1200, 800),
            stream,
            60,
        )
        .unwrap();
        (runner, sink)
    }

    fn feed() -> SessionEvent {
        SessionEvent::Messages(
            vec![CandidateMessage::new(
                "m1",
                "over here",
                GeoPoint::new(0.0, 0.0089),
                Author::new("sam"),
            )]
            .into(),
        )
    }

    #[test]
    fn test_rejects_zero_frame_rate() {
        let (_, stream) = event_channel();
        let result = OverlayRunner::new(
            ArSession::new(SessionSettings::default()),
            OverlayRenderer::default(),
            RecordingBackend::new(10, 10),
            stream,
            0,
        );
        assert!(matches!(result, Err(SessionError::InvalidFrameRate(0))));
    }

    #[test]
    fn test_frame_pulls_latest_state() {
        let (mut runner, _sink) = runner();
        assert_eq!(runner.render_frame(), FrameOutcome::Drawn(0));

        runner.handle_event(SessionEvent::Location(GeoPoint::ORIGIN));
        runner.handle_event(feed());
        runner.handle_event(SessionEvent::Orientation(OrientationSample::new(270.0, 90.0, 0.0)));

        assert_eq!(runner.render_frame(), FrameOutcome::Drawn(1));
        assert!(runner.backend().texts().contains(&"over here"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_stops_on_quit_and_closes_session() {
        let (runner, sink) = runner();
        sink.send(SessionEvent::Location(GeoPoint::ORIGIN)).unwrap();
        sink.send(feed()).unwrap();

        let task = tokio::spawn(runner.run());
        tokio::time::sleep(Duration::from_millis(100)).await;
        sink.send(SessionEvent::Quit).unwrap();

        let summary = task.await.unwrap().unwrap();
        assert!(summary.frames_drawn >= 5);
        assert_eq!(summary.events, 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_ends_when_sources_drop() {
        let (runner, sink) = runner();
        drop(sink);
        let summary = runner.run().await.unwrap();
        assert_eq!(summary.events, 0);
    }
}
