//! Background device sync driver
//!
//! [`DeviceSync::spawn`] starts one tokio task that owns a [`BatchSyncQueue`]
//! and selects over the flush timer, the movement timer and commands from
//! the [`SyncHandle`]. The timers exist only while the device is actively
//! syncing; leaving that state drops them along with any pending batch.

use std::sync::Arc;
use std::time::Duration;

use geoar_oui::CandidateMessage;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, Interval, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::bridge::DeviceBridge;
use crate::queue::{BatchSyncQueue, PrepareOutcome, SyncState, Transition};
use crate::settings::SyncSettings;

/// Status exposed to the host UI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SyncStatus {
    pub is_active: bool,
    pub state: SyncState,
}

impl From<SyncState> for SyncStatus {
    fn from(state: SyncState) -> Self {
        Self {
            is_active: state.is_active(),
            state,
        }
    }
}

/// Commands sent from the handle to the driver task
#[derive(Debug)]
enum SyncCommand {
    SyncNow,
    Messages(Arc<[CandidateMessage]>),
    ConnectionChanged,
    Shutdown,
}

/// Why a sync is being computed
#[derive(Debug, Clone, Copy)]
enum Trigger {
    Activation,
    Messages,
    Explicit,
    Movement,
}

/// Entry point for the device sync path
pub struct DeviceSync;

impl DeviceSync {
    /// Start syncing through `bridge`. Must be called inside a tokio runtime.
    pub fn spawn(bridge: Arc<dyn DeviceBridge>, settings: SyncSettings) -> SyncHandle {
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (status_tx, status_rx) = watch::channel(SyncStatus::default());

        let worker = SyncWorker {
            queue: BatchSyncQueue::new(settings.clone()),
            bridge,
            settings,
            candidates: Arc::from(Vec::new()),
            status: status_tx,
        };
        let task = tokio::spawn(worker.run(command_rx));

        SyncHandle {
            commands: command_tx,
            status: status_rx,
            task: Some(task),
        }
    }
}

/// Host-side handle to a running sync driver.
///
/// Dropping the handle stops the driver.
pub struct SyncHandle {
    commands: mpsc::UnboundedSender<SyncCommand>,
    status: watch::Receiver<SyncStatus>,
    task: Option<JoinHandle<()>>,
}

impl SyncHandle {
    pub fn is_active(&self) -> bool {
        self.status.borrow().is_active
    }

    pub fn status(&self) -> SyncStatus {
        *self.status.borrow()
    }

    /// Watch status changes
    pub fn subscribe(&self) -> watch::Receiver<SyncStatus> {
        self.status.clone()
    }

    /// Recompute and queue a batch now
    pub fn sync_now(&self) {
        self.send(SyncCommand::SyncNow);
    }

    /// Replace the candidate snapshot and resync
    pub fn update_messages(&self, candidates: Arc<[CandidateMessage]>) {
        self.send(SyncCommand::Messages(candidates));
    }

    /// Re-read the bridge's connection and AR-mode flags
    pub fn connection_changed(&self) {
        self.send(SyncCommand::ConnectionChanged);
    }

    /// Stop the driver and wait for it to finish
    pub async fn shutdown(mut self) {
        self.send(SyncCommand::Shutdown);
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                warn!("Device sync task ended abnormally: {}", e);
            }
        }
    }

    fn send(&self, command: SyncCommand) {
        if self.commands.send(command).is_err() {
            debug!("Device sync driver already stopped");
        }
    }
}

impl Drop for SyncHandle {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

struct SyncWorker {
    bridge: Arc<dyn DeviceBridge>,
    queue: BatchSyncQueue,
    settings: SyncSettings,
    candidates: Arc<[CandidateMessage]>,
    status: watch::Sender<SyncStatus>,
}

/// Timers that run only while actively syncing
#[derive(Default)]
struct Timers {
    flush: Option<Interval>,
    movement: Option<Interval>,
}

impl Timers {
    fn start(&mut self, settings: &SyncSettings) {
        self.flush = periodic(settings.flush_interval);
        self.movement = periodic(settings.movement_check_interval);
    }

    fn stop(&mut self) {
        self.flush = None;
        self.movement = None;
    }
}

/// Interval whose first tick is one period from now; `None` for a zero period
fn periodic(period: Duration) -> Option<Interval> {
    if period.is_zero() {
        return None;
    }
    let mut interval = time::interval_at(Instant::now() + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    Some(interval)
}

/// Wait for the next tick, or forever when the timer is stopped
async fn next_tick(timer: &mut Option<Interval>) {
    match timer {
        Some(interval) => {
            interval.tick().await;
        }
        None => std::future::pending::<()>().await,
    }
}

impl SyncWorker {
    async fn run(mut self, mut commands: mpsc::UnboundedReceiver<SyncCommand>) {
        info!(
            "Starting device sync (flush every {:?}, movement check every {:?})",
            self.settings.flush_interval, self.settings.movement_check_interval
        );

        let mut timers = Timers::default();
        self.refresh_connection(&mut timers).await;

        loop {
            tokio::select! {
                _ = next_tick(&mut timers.flush) => {
                    self.flush(&mut timers).await;
                }
                _ = next_tick(&mut timers.movement) => {
                    self.sync(Trigger::Movement).await;
                }
                command = commands.recv() => match command {
                    Some(SyncCommand::SyncNow) => self.sync(Trigger::Explicit).await,
                    Some(SyncCommand::Messages(candidates)) => {
                        self.candidates = candidates;
                        self.sync(Trigger::Messages).await;
                    }
                    Some(SyncCommand::ConnectionChanged) => {
                        self.refresh_connection(&mut timers).await;
                    }
                    Some(SyncCommand::Shutdown) | None => break,
                },
            }
        }

        timers.stop();
        self.queue.reset();
        self.publish();
        info!("Device sync stopped");
    }

    async fn refresh_connection(&mut self, timers: &mut Timers) {
        let connected = self.bridge.is_connected();
        let ar_mode_active = self.bridge.is_ar_mode_active();
        self.apply_transition(connected, ar_mode_active, timers).await;
    }

    async fn apply_transition(&mut self, connected: bool, ar_mode_active: bool, timers: &mut Timers) {
        match self.queue.update_connection(connected, ar_mode_active) {
            Transition::Activated => {
                timers.start(&self.settings);
                self.publish();
                self.sync(Trigger::Activation).await;
            }
            Transition::Deactivated => {
                timers.stop();
                self.publish();
            }
            Transition::Changed(_) => self.publish(),
            Transition::Unchanged => {}
        }
    }

    fn publish(&self) {
        self.status.send_replace(SyncStatus::from(self.queue.state()));
    }

    /// Compute a batch from the device's current position
    async fn sync(&mut self, trigger: Trigger) {
        if !self.queue.is_active() {
            debug!("Ignoring {:?} sync trigger while inactive", trigger);
            return;
        }

        let location = match self.bridge.device_location().await {
            Ok(Some(location)) => location,
            Ok(None) => {
                debug!("Device location not ready, skipping {:?} sync", trigger);
                return;
            }
            Err(e) => {
                warn!("Failed to read device location: {}", e);
                return;
            }
        };

        if matches!(trigger, Trigger::Movement) && !self.queue.needs_movement_sync(location) {
            debug!("Device has not moved significantly");
            return;
        }

        match self.queue.prepare(location, &self.candidates) {
            PrepareOutcome::Queued(count) => {
                debug!("{:?} sync queued {} items", trigger, count);
            }
            PrepareOutcome::Unchanged => {
                debug!("{:?} sync found no changes", trigger);
            }
            PrepareOutcome::Inactive => {}
        }
    }

    /// Send the pending batch, if any
    async fn flush(&mut self, timers: &mut Timers) {
        let connected = self.bridge.is_connected();
        let ar_mode_active = self.bridge.is_ar_mode_active();
        if !(connected && ar_mode_active) {
            warn!(
                "Device left sync before flush (connected: {}, ar mode: {})",
                connected, ar_mode_active
            );
            self.apply_transition(connected, ar_mode_active, timers).await;
            return;
        }

        let Some(batch) = self.queue.take_pending() else {
            return;
        };

        match self.bridge.send_batch(&batch.items).await {
            Ok(()) => {
                info!("Sent {} nearby items to device", batch.len());
                self.queue.mark_sent(&batch);
            }
            Err(e) => {
                warn!("Failed to send batch of {} items: {}", batch.len(), e);
                self.queue.mark_failed();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge::BridgeError;
    use async_trait::async_trait;
    use geoar_oui::geo::destination;
    use geoar_oui::{Author, GeoPoint, ProximityItem};
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Mutex;

    #[derive(Default)]
    struct MockBridge {
        connected: AtomicBool,
        ar_mode: AtomicBool,
        fail_sends: AtomicBool,
        location: Mutex<Option<GeoPoint>>,
        attempts: Mutex<Vec<Vec<String>>>,
        delivered: Mutex<Vec<Vec<String>>>,
    }

    impl MockBridge {
        fn active_at(location: GeoPoint) -> Arc<Self> {
            let bridge = Self::default();
            bridge.connected.store(true, Ordering::SeqCst);
            bridge.ar_mode.store(true, Ordering::SeqCst);
            *bridge.location.lock().unwrap() = Some(location);
            Arc::new(bridge)
        }

        fn delivered(&self) -> Vec<Vec<String>> {
            self.delivered.lock().unwrap().clone()
        }

        fn attempts(&self) -> usize {
            self.attempts.lock().unwrap().len()
        }

        fn move_to(&self, location: Option<GeoPoint>) {
            *self.location.lock().unwrap() = location;
        }
    }

    #[async_trait]
    impl DeviceBridge for MockBridge {
        fn is_connected(&self) -> bool {
            self.connected.load(Ordering::SeqCst)
        }

        fn is_ar_mode_active(&self) -> bool {
            self.ar_mode.load(Ordering::SeqCst)
        }

        async fn device_location(&self) -> Result<Option<GeoPoint>, BridgeError> {
            Ok(*self.location.lock().unwrap())
        }

        async fn send_batch(&self, items: &[ProximityItem]) -> Result<(), BridgeError> {
            let ids: Vec<String> = items.iter().map(|i| i.id.clone()).collect();
            self.attempts.lock().unwrap().push(ids.clone());
            if self.fail_sends.load(Ordering::SeqCst) {
                return Err(BridgeError::Transport("link dropped".into()));
            }
            self.delivered.lock().unwrap().push(ids);
            Ok(())
        }
    }

    fn messages(ids: &[&str]) -> Arc<[CandidateMessage]> {
        ids.iter()
            .map(|id| {
                CandidateMessage::new(*id, "hi", GeoPoint::new(0.0, 0.001), Author::new("a"))
            })
            .collect::<Vec<_>>()
            .into()
    }

    fn spawn(bridge: &Arc<MockBridge>) -> SyncHandle {
        DeviceSync::spawn(bridge.clone(), SyncSettings::default())
    }

    async fn advance(secs: u64) {
        time::sleep(Duration::from_secs(secs)).await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_sends_once_per_flush() {
        let bridge = MockBridge::active_at(GeoPoint::ORIGIN);
        let handle = spawn(&bridge);

        handle.update_messages(messages(&["a"]));
        handle.update_messages(messages(&["a", "b"]));
        advance(6).await;

        assert!(handle.is_active());
        assert_eq!(bridge.delivered(), vec![vec!["a".to_string(), "b".to_string()]]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_unchanged_set_not_resent() {
        let bridge = MockBridge::active_at(GeoPoint::ORIGIN);
        let handle = spawn(&bridge);

        handle.update_messages(messages(&["a"]));
        advance(6).await;
        assert_eq!(bridge.attempts(), 1);

        handle.update_messages(messages(&["a"]));
        handle.sync_now();
        advance(10).await;
        assert_eq!(bridge.attempts(), 1);

        handle.update_messages(messages(&["a", "c"]));
        advance(5).await;
        assert_eq!(bridge.attempts(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_inactive_device_gets_nothing() {
        let bridge = MockBridge::active_at(GeoPoint::ORIGIN);
        bridge.ar_mode.store(false, Ordering::SeqCst);
        let handle = spawn(&bridge);

        handle.update_messages(messages(&["a"]));
        handle.sync_now();
        advance(40).await;

        assert!(!handle.is_active());
        assert_eq!(handle.status().state, SyncState::ConnectedInactive);
        assert_eq!(bridge.attempts(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_activation_triggers_sync() {
        let bridge = MockBridge::active_at(GeoPoint::ORIGIN);
        bridge.ar_mode.store(false, Ordering::SeqCst);
        let handle = spawn(&bridge);
        handle.update_messages(messages(&["a"]));
        advance(1).await;

        bridge.ar_mode.store(true, Ordering::SeqCst);
        handle.connection_changed();
        advance(6).await;

        assert!(handle.is_active());
        assert_eq!(bridge.delivered(), vec![vec!["a".to_string()]]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_missing_location_skips_sync() {
        let bridge = MockBridge::active_at(GeoPoint::ORIGIN);
        bridge.move_to(None);
        let handle = spawn(&bridge);

        handle.update_messages(messages(&["a"]));
        advance(6).await;
        assert_eq!(bridge.attempts(), 0);

        bridge.move_to(Some(GeoPoint::ORIGIN));
        handle.sync_now();
        advance(5).await;
        assert_eq!(bridge.attempts(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_send_retried_by_movement_check() {
        let bridge = MockBridge::active_at(GeoPoint::ORIGIN);
        bridge.fail_sends.store(true, Ordering::SeqCst);
        let handle = spawn(&bridge);

        handle.update_messages(messages(&["a"]));
        advance(6).await;
        assert_eq!(bridge.attempts(), 1);
        assert!(bridge.delivered().is_empty());

        // No retry layer: the next flushes have nothing pending
        bridge.fail_sends.store(false, Ordering::SeqCst);
        advance(20).await;
        assert_eq!(bridge.attempts(), 1);

        // The 30s movement check recomputes, the 35s flush delivers
        advance(10).await;
        assert_eq!(bridge.delivered(), vec![vec!["a".to_string()]]);
        assert!(handle.is_active());
    }

    #[tokio::test(start_paused = true)]
    async fn test_movement_resyncs_new_neighbourhood() {
        let bridge = MockBridge::active_at(GeoPoint::ORIGIN);
        let handle = spawn(&bridge);
        handle.update_messages(messages(&["a"]));
        advance(6).await;
        assert_eq!(bridge.delivered().len(), 1);

        // Walk 2 km north: the message falls outside the 500 m radius
        bridge.move_to(Some(destination(GeoPoint::ORIGIN, 0.0, 2000.0)));
        advance(30).await;

        assert_eq!(bridge.delivered(), vec![vec!["a".to_string()], vec![]]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_jitter_does_not_resync() {
        let bridge = MockBridge::active_at(GeoPoint::ORIGIN);
        let handle = spawn(&bridge);
        handle.update_messages(messages(&["a"]));
        advance(6).await;

        bridge.move_to(Some(destination(GeoPoint::ORIGIN, 90.0, 20.0)));
        advance(60).await;
        assert_eq!(bridge.attempts(), 1);
        drop(handle);
    }

    #[tokio::test(start_paused = true)]
    async fn test_disconnect_drops_pending_and_baseline() {
        let bridge = MockBridge::active_at(GeoPoint::ORIGIN);
        let handle = spawn(&bridge);
        handle.update_messages(messages(&["a"]));
        advance(6).await;

        handle.update_messages(messages(&["b"]));
        bridge.connected.store(false, Ordering::SeqCst);
        handle.connection_changed();
        advance(10).await;
        assert!(!handle.is_active());
        assert_eq!(handle.status().state, SyncState::Idle);
        assert_eq!(bridge.attempts(), 1);

        // Reconnecting resends the full set even though "b" is unchanged
        bridge.connected.store(true, Ordering::SeqCst);
        handle.connection_changed();
        advance(6).await;
        assert_eq!(bridge.delivered(), vec![vec!["a".to_string()], vec!["b".to_string()]]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_flush_notices_silent_disconnect() {
        let bridge = MockBridge::active_at(GeoPoint::ORIGIN);
        let handle = spawn(&bridge);
        handle.update_messages(messages(&["a"]));
        advance(1).await;
        assert!(handle.is_active());

        bridge.connected.store(false, Ordering::SeqCst);
        advance(5).await;

        assert!(!handle.is_active());
        assert_eq!(bridge.attempts(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_flush_notices_ar_mode_exit() {
        let bridge = MockBridge::active_at(GeoPoint::ORIGIN);
        let handle = spawn(&bridge);
        handle.update_messages(messages(&["a"]));
        advance(1).await;
        assert!(handle.is_active());

        bridge.ar_mode.store(false, Ordering::SeqCst);
        advance(5).await;

        assert!(!handle.is_active());
        assert_eq!(bridge.attempts(), 0);

        // Later changes are ignored until AR mode comes back
        handle.update_messages(messages(&["a", "b"]));
        advance(10).await;
        assert_eq!(bridge.attempts(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_marks_inactive() {
        let bridge = MockBridge::active_at(GeoPoint::ORIGIN);
        let handle = spawn(&bridge);
        let mut status = handle.subscribe();
        advance(1).await;
        assert!(status.borrow_and_update().is_active);

        handle.shutdown().await;
        assert!(!status.borrow().is_active);
    }
}
