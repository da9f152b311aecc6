//! Change events delivered by the document store's subscription feed.
//!
//! A live subscription delivers [`ChangeBatch`]es: the store groups the
//! document changes it observed at one instant and pushes them to every
//! subscriber whose owner filter matches. The monitor's reconciler consumes
//! these batches; the poll path never sees them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::record::RouterRecord;

/// What happened to a document in the remote collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    /// The document was created.
    Added,
    /// An existing document's fields were updated.
    Modified,
    /// The document was deleted; the carried record is its last stored state.
    Removed,
}

/// One document change inside a batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeEvent {
    /// The kind of change.
    pub kind: ChangeKind,
    /// The document snapshot after the change (last stored state for
    /// [`ChangeKind::Removed`]).
    pub record: RouterRecord,
}

/// A batch of document changes delivered in one subscription callback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeBatch {
    /// The changes, in the order the store observed them.
    pub events: Vec<ChangeEvent>,
    /// Delivery instant.
    pub observed_at: DateTime<Utc>,
}

impl ChangeBatch {
    /// Create a batch stamped with the current instant.
    pub fn now(events: Vec<ChangeEvent>) -> Self {
        Self {
            events,
            observed_at: Utc::now(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::ids::{RouterId, UserId};

    #[test]
    fn change_kind_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&ChangeKind::Modified).unwrap(),
            "\"modified\""
        );
    }

    #[test]
    fn batch_round_trips_through_json() {
        let record = RouterRecord::new(RouterId::from("r-1"), UserId::from("u-1"));
        let batch = ChangeBatch::now(vec![ChangeEvent {
            kind: ChangeKind::Added,
            record,
        }]);

        let json = serde_json::to_string(&batch).unwrap();
        let back: ChangeBatch = serde_json::from_str(&json).unwrap();
        assert_eq!(back, batch);
    }
}
