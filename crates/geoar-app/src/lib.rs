//! geoar-app: demos for the geoar overlay engine
//!
//! - `overlay`: terminal AR view. Arrow keys turn and tilt, WASD walks,
//!   q quits. Location, orientation and the message feed are simulated.
//! - `sync`: headless paired-device sync against a logging bridge that walks
//!   the simulated wearable east.

pub mod bridge;
pub mod demo;
pub mod logging;

use std::sync::Arc;
use std::time::Duration;

use geoar_config::GeoArConfig;
use geoar_oui::app::{spawn_keyboard, RunSummary, TerminalGuard};
use geoar_oui::input::{event_channel, InputSimulator};
use geoar_oui::renderer::terminal::TerminalBackend;
use geoar_oui::session::{ArSession, Capabilities, SessionSettings};
use geoar_oui::{GeoPoint, GlassTheme, OverlayRenderer, OverlayRunner};
use geoar_sync::{DeviceSync, SyncSettings};
use tokio::time;
use tracing::info;

use bridge::LoggingBridge;
use demo::{demo_messages, SimulatedCompass, SimulatedLocation, StaticFeed};

/// Distance the simulated wearable walks per step in the sync demo
const WALK_STEP_M: f64 = 60.0;

/// Time between walking steps in the sync demo
const WALK_INTERVAL: Duration = Duration::from_secs(10);

/// Run the terminal AR view until the user quits
pub async fn run_overlay(config: &GeoArConfig, origin: GeoPoint) -> anyhow::Result<RunSummary> {
    let (sink, events) = event_channel();
    let simulator = InputSimulator::new(origin);

    let capabilities = Capabilities {
        location: Box::new(SimulatedLocation::new(origin)),
        orientation: Box::new(SimulatedCompass::new(simulator.orientation())),
        messages: Box::new(StaticFeed::new(demo_messages(origin))),
        // No camera in a terminal
        camera: None,
    };
    let session = ArSession::start(SessionSettings::from(config), capabilities, sink.clone());
    let renderer = OverlayRenderer::new(config.bubble.clone(), GlassTheme::from(&config.overlay));

    let _terminal = TerminalGuard::enter()?;
    let backend = TerminalBackend::new()?;
    let _keyboard = spawn_keyboard(simulator, sink);

    let runner = OverlayRunner::new(session, renderer, backend, events, config.overlay.frame_rate)?;
    Ok(runner.run().await?)
}

/// Outcome of the headless sync demo
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncReport {
    pub batches_sent: usize,
    pub steps_walked: usize,
}

/// Run the device-sync path for `duration`
pub async fn run_sync(
    config: &GeoArConfig,
    origin: GeoPoint,
    duration: Duration,
) -> anyhow::Result<SyncReport> {
    let bridge = Arc::new(LoggingBridge::new(origin));
    let handle = DeviceSync::spawn(bridge.clone(), SyncSettings::from(&config.sync));
    handle.update_messages(demo_messages(origin).into());

    let deadline = time::sleep(duration);
    tokio::pin!(deadline);
    let mut walk = time::interval_at(time::Instant::now() + WALK_INTERVAL, WALK_INTERVAL);
    let mut steps = 0;

    loop {
        tokio::select! {
            _ = &mut deadline => break,
            _ = walk.tick() => {
                if let Some(position) = bridge.walk(90.0, WALK_STEP_M) {
                    steps += 1;
                    info!(
                        "Device walked to ({:.5}, {:.5}), sync active: {}",
                        position.lat,
                        position.lng,
                        handle.is_active()
                    );
                }
            }
        }
    }

    handle.shutdown().await;
    let report = SyncReport {
        batches_sent: bridge.batches_received(),
        steps_walked: steps,
    };
    info!(
        "Sync demo finished: {} batches over {} steps",
        report.batches_sent, report.steps_walked
    );
    Ok(report)
}
