//! Last-seen snapshot state per router.
//!
//! The [`SnapshotStore`] holds the most recent observation of every router
//! the monitor has seen. Both trigger paths (subscription reconciler and
//! poll scheduler) feed it concurrently, so the read-diff-write sequence is
//! executed as one critical section: two concurrent observations of the
//! same router serialize, and neither diffs against a stale previous
//! snapshot (a lost update would suppress a real change or double-report
//! one).
//!
//! The store starts empty; the first observation of any router is stored
//! without being diffed. Entries are pruned when the document is removed
//! remotely and the whole store is cleared on service shutdown.

use std::collections::BTreeMap;

use routerwatch_types::{RouterId, RouterRecord};
use tokio::sync::Mutex;

use crate::diff::{ChangeDescription, detect_changes};

/// Mapping from router id to its most recent snapshot.
///
/// Owned exclusively by the monitor; a single async mutex serializes all
/// observations (per-id exclusion is the requirement, whole-store exclusion
/// the implementation).
#[derive(Debug, Default)]
pub struct SnapshotStore {
    entries: Mutex<BTreeMap<RouterId, RouterRecord>>,
}

impl SnapshotStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one observation: diff against the stored snapshot (empty
    /// description when this is the first observation), then overwrite the
    /// entry unconditionally. The whole sequence is atomic with respect to
    /// other observations.
    pub async fn observe(&self, incoming: &RouterRecord) -> ChangeDescription {
        let mut entries = self.entries.lock().await;
        let description = entries
            .get(&incoming.id)
            .map_or_else(ChangeDescription::default, |previous| {
                detect_changes(previous, incoming)
            });
        entries.insert(incoming.id.clone(), incoming.clone());
        description
    }

    /// Return the stored snapshot for `id`, if one exists.
    pub async fn get(&self, id: &RouterId) -> Option<RouterRecord> {
        self.entries.lock().await.get(id).cloned()
    }

    /// Store a snapshot without diffing (baseline insertion).
    pub async fn put(&self, record: RouterRecord) {
        self.entries.lock().await.insert(record.id.clone(), record);
    }

    /// Drop the stored snapshot for `id`, returning it if present.
    pub async fn remove(&self, id: &RouterId) -> Option<RouterRecord> {
        self.entries.lock().await.remove(id)
    }

    /// Number of routers with a stored snapshot.
    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    /// Whether no snapshot is stored.
    pub async fn is_empty(&self) -> bool {
        self.entries.lock().await.is_empty()
    }

    /// Drop all stored snapshots.
    pub async fn clear(&self) {
        self.entries.lock().await.clear();
    }
}
