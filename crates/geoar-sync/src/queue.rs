//! Batch sync queue
//!
//! State machine for sending nearby items to a paired device:
//!
//! ```text
//! Idle -> ConnectedInactive -> ActiveSyncing -> Idle
//! ```
//!
//! Sync triggers compute a fresh [`SyncBatch`] into a single pending slot
//! (last write wins). A flush hands the pending batch to the transport. A
//! batch whose id set equals the last successfully sent one is never queued,
//! which makes overlapping triggers harmless.

use geoar_oui::{filter_nearby, CandidateMessage, GeoPoint, ProximityItem};
use tracing::{debug, info};

use crate::movement::MovementMonitor;
use crate::settings::SyncSettings;

/// Connection state of the sync path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SyncState {
    /// No device connected
    #[default]
    Idle,
    /// Device connected but not showing its AR view
    ConnectedInactive,
    /// Device connected with AR mode on; batches are sent
    ActiveSyncing,
}

impl SyncState {
    pub fn from_flags(connected: bool, ar_mode_active: bool) -> Self {
        match (connected, ar_mode_active) {
            (false, _) => SyncState::Idle,
            (true, false) => SyncState::ConnectedInactive,
            (true, true) => SyncState::ActiveSyncing,
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, SyncState::ActiveSyncing)
    }
}

/// Items to send plus their sorted id set
#[derive(Debug, Clone, PartialEq)]
pub struct SyncBatch {
    pub items: Vec<ProximityItem>,
    /// Sorted, deduplicated ids of `items`
    pub ids: Vec<String>,
}

impl SyncBatch {
    pub fn new(items: Vec<ProximityItem>) -> Self {
        let mut ids: Vec<String> = items.iter().map(|item| item.id.clone()).collect();
        ids.sort_unstable();
        ids.dedup();
        Self { items, ids }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Effect of a connection update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Just entered `ActiveSyncing`; sync immediately
    Activated,
    /// Left `ActiveSyncing`; pending work and baseline were dropped
    Deactivated,
    /// State changed without touching `ActiveSyncing`
    Changed(SyncState),
    Unchanged,
}

/// Result of computing a batch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrepareOutcome {
    /// Batch of this many items placed in the pending slot
    Queued(usize),
    /// Same id set as the last sent batch; nothing to do
    Unchanged,
    /// Not in `ActiveSyncing`
    Inactive,
}

/// Pending-slot batch queue
#[derive(Debug, Clone)]
pub struct BatchSyncQueue {
    settings: SyncSettings,
    state: SyncState,
    pending: Option<SyncBatch>,
    last_sent_ids: Option<Vec<String>>,
    movement: MovementMonitor,
    last_send_failed: bool,
}

impl Default for BatchSyncQueue {
    fn default() -> Self {
        Self::new(SyncSettings::default())
    }
}

impl BatchSyncQueue {
    pub fn new(settings: SyncSettings) -> Self {
        let movement = MovementMonitor::new(settings.movement_threshold_m);
        Self {
            settings,
            state: SyncState::Idle,
            pending: None,
            last_sent_ids: None,
            movement,
            last_send_failed: false,
        }
    }

    pub fn state(&self) -> SyncState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state.is_active()
    }

    pub fn pending(&self) -> Option<&SyncBatch> {
        self.pending.as_ref()
    }

    /// Id set of the last batch the device acknowledged
    pub fn last_sent_ids(&self) -> Option<&[String]> {
        self.last_sent_ids.as_deref()
    }

    /// Apply the bridge's connection flags
    pub fn update_connection(&mut self, connected: bool, ar_mode_active: bool) -> Transition {
        let next = SyncState::from_flags(connected, ar_mode_active);
        let previous = self.state;
        if next == previous {
            return Transition::Unchanged;
        }

        self.state = next;
        info!("Device sync state {:?} -> {:?}", previous, next);

        if next.is_active() {
            Transition::Activated
        } else if previous.is_active() {
            self.reset();
            Transition::Deactivated
        } else {
            Transition::Changed(next)
        }
    }

    /// Filter `candidates` around `location` and queue the result unless the
    /// device already has the same set.
    pub fn prepare(&mut self, location: GeoPoint, candidates: &[CandidateMessage]) -> PrepareOutcome {
        if !self.is_active() {
            return PrepareOutcome::Inactive;
        }

        let items = filter_nearby(
            location,
            candidates,
            self.settings.radius_m,
            self.settings.max_items,
        );
        let batch = SyncBatch::new(items);
        self.movement.record(location);

        if self.last_sent_ids.as_deref() == Some(batch.ids.as_slice()) {
            // A stale pending batch would undo what the device already shows
            self.pending = None;
            debug!("Nearby set unchanged ({} items), skipping", batch.ids.len());
            return PrepareOutcome::Unchanged;
        }

        let count = batch.len();
        if self.pending.replace(batch).is_some() {
            debug!("Replaced pending batch with {} items", count);
        } else {
            debug!("Queued batch with {} items", count);
        }
        PrepareOutcome::Queued(count)
    }

    /// Take the pending batch for sending
    pub fn take_pending(&mut self) -> Option<SyncBatch> {
        if !self.is_active() {
            return None;
        }
        self.pending.take()
    }

    /// Record a successful send as the new baseline
    pub fn mark_sent(&mut self, batch: &SyncBatch) {
        self.last_sent_ids = Some(batch.ids.clone());
        self.last_send_failed = false;
    }

    /// Record a failed send; the baseline stays as it was
    pub fn mark_failed(&mut self) {
        self.last_send_failed = true;
    }

    /// Whether the periodic movement check should recompute.
    ///
    /// True after significant movement, with no recorded sync position, or
    /// when the last send failed and needs fresh data.
    pub fn needs_movement_sync(&self, current: GeoPoint) -> bool {
        self.is_active() && (self.last_send_failed || self.movement.has_moved(current))
    }

    /// Drop pending work and forget what the device has
    pub fn reset(&mut self) {
        self.pending = None;
        self.last_sent_ids = None;
        self.last_send_failed = false;
        self.movement.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geoar_oui::geo::destination;
    use geoar_oui::Author;

    fn message(id: &str, lat: f64, lng: f64) -> CandidateMessage {
        CandidateMessage::new(id, "hi", GeoPoint::new(lat, lng), Author::new("a"))
    }

    fn active_queue() -> BatchSyncQueue {
        let mut queue = BatchSyncQueue::default();
        assert_eq!(queue.update_connection(true, true), Transition::Activated);
        queue
    }

    #[test]
    fn test_state_from_flags() {
        assert_eq!(SyncState::from_flags(false, true), SyncState::Idle);
        assert_eq!(SyncState::from_flags(true, false), SyncState::ConnectedInactive);
        assert_eq!(SyncState::from_flags(true, true), SyncState::ActiveSyncing);
    }

    #[test]
    fn test_transitions() {
        let mut queue = BatchSyncQueue::default();
        assert_eq!(
            queue.update_connection(true, false),
            Transition::Changed(SyncState::ConnectedInactive)
        );
        assert_eq!(queue.update_connection(true, false), Transition::Unchanged);
        assert_eq!(queue.update_connection(true, true), Transition::Activated);
        assert_eq!(queue.update_connection(false, true), Transition::Deactivated);
        assert_eq!(queue.state(), SyncState::Idle);
    }

    #[test]
    fn test_inactive_queue_ignores_triggers() {
        let mut queue = BatchSyncQueue::default();
        queue.update_connection(true, false);
        let outcome = queue.prepare(GeoPoint::ORIGIN, &[message("a", 0.0, 0.001)]);
        assert_eq!(outcome, PrepareOutcome::Inactive);
        assert!(queue.take_pending().is_none());
    }

    #[test]
    fn test_batch_uses_sync_radius() {
        let mut queue = active_queue();
        // ~111 m and ~1.1 km north
        let candidates = [message("near", 0.001, 0.0), message("far", 0.01, 0.0)];
        assert_eq!(queue.prepare(GeoPoint::ORIGIN, &candidates), PrepareOutcome::Queued(1));
        assert_eq!(queue.pending().map(|b| b.ids.clone()), Some(vec!["near".to_string()]));
    }

    #[test]
    fn test_pending_slot_last_write_wins() {
        let mut queue = active_queue();
        queue.prepare(GeoPoint::ORIGIN, &[message("a", 0.001, 0.0)]);
        queue.prepare(GeoPoint::ORIGIN, &[message("b", 0.001, 0.0)]);

        let batch = queue.take_pending().unwrap();
        assert_eq!(batch.ids, vec!["b"]);
        assert!(queue.take_pending().is_none());
    }

    #[test]
    fn test_unchanged_set_is_skipped() {
        let mut queue = active_queue();
        let candidates = [message("b", 0.001, 0.0), message("a", 0.002, 0.0)];
        queue.prepare(GeoPoint::ORIGIN, &candidates);
        let batch = queue.take_pending().unwrap();
        queue.mark_sent(&batch);

        // Same ids in a different order
        let reordered = [message("a", 0.002, 0.0), message("b", 0.001, 0.0)];
        assert_eq!(queue.prepare(GeoPoint::ORIGIN, &reordered), PrepareOutcome::Unchanged);
        assert!(queue.take_pending().is_none());
    }

    #[test]
    fn test_failed_send_keeps_baseline() {
        let mut queue = active_queue();
        queue.prepare(GeoPoint::ORIGIN, &[message("a", 0.001, 0.0)]);
        let first = queue.take_pending().unwrap();
        queue.mark_sent(&first);

        queue.prepare(GeoPoint::ORIGIN, &[message("b", 0.001, 0.0)]);
        queue.take_pending().unwrap();
        queue.mark_failed();

        assert_eq!(queue.last_sent_ids(), Some(&["a".to_string()][..]));
        assert!(queue.needs_movement_sync(GeoPoint::ORIGIN));
    }

    #[test]
    fn test_movement_check_after_sync() {
        let mut queue = active_queue();
        assert!(queue.needs_movement_sync(GeoPoint::ORIGIN));

        queue.prepare(GeoPoint::ORIGIN, &[]);
        assert!(!queue.needs_movement_sync(destination(GeoPoint::ORIGIN, 0.0, 149.0)));
        assert!(queue.needs_movement_sync(destination(GeoPoint::ORIGIN, 0.0, 151.0)));
    }

    #[test]
    fn test_deactivation_clears_everything() {
        let mut queue = active_queue();
        queue.prepare(GeoPoint::ORIGIN, &[message("a", 0.001, 0.0)]);
        let batch = queue.take_pending().unwrap();
        queue.mark_sent(&batch);
        queue.prepare(GeoPoint::ORIGIN, &[message("b", 0.001, 0.0)]);

        queue.update_connection(false, false);
        assert!(queue.pending().is_none());
        assert!(queue.last_sent_ids().is_none());

        // Reconnect forces a fresh full sync of the same set
        queue.update_connection(true, true);
        assert_eq!(
            queue.prepare(GeoPoint::ORIGIN, &[message("a", 0.001, 0.0)]),
            PrepareOutcome::Queued(1)
        );
    }

    #[test]
    fn test_empty_batch_is_sent_once() {
        let mut queue = active_queue();
        assert_eq!(queue.prepare(GeoPoint::ORIGIN, &[]), PrepareOutcome::Queued(0));
        let batch = queue.take_pending().unwrap();
        queue.mark_sent(&batch);
        assert_eq!(queue.prepare(GeoPoint::ORIGIN, &[]), PrepareOutcome::Unchanged);
    }
}
