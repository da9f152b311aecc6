//! Subscription reconciler: the push-style trigger path.
//!
//! Drains the document store's live change stream for the monitor's
//! lifetime. Every added/modified record is observed through the snapshot
//! store (atomic diff-then-overwrite) and any non-empty change description
//! is handed to the notification emitter. Removed records prune their
//! snapshot entry -- never diffed, never notified.
//!
//! Error items on the stream are logged and skipped; transport retry is the
//! store collaborator's concern. Processing one record never aborts the
//! rest of its batch, and an in-flight batch is always finished before the
//! shutdown signal is honored.

use std::sync::Arc;

use futures::StreamExt as _;
use futures::stream::BoxStream;
use routerwatch_types::{ChangeBatch, ChangeKind, RouterRecord};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::error::StoreError;
use crate::notify::NotificationEmitter;
use crate::service::stop_requested;
use crate::snapshot::SnapshotStore;

/// Drain `changes` until shutdown is signalled or the stream closes.
pub(crate) async fn run_reconciler(
    mut changes: BoxStream<'static, Result<ChangeBatch, StoreError>>,
    snapshots: Arc<SnapshotStore>,
    emitter: Arc<NotificationEmitter>,
    mut shutdown: watch::Receiver<bool>,
) {
    info!("subscription reconciler started");

    loop {
        let batch = tokio::select! {
            () = stop_requested(&mut shutdown) => break,
            item = changes.next() => match item {
                Some(Ok(batch)) => batch,
                Some(Err(error)) => {
                    warn!(error = %error, "subscription error, waiting for the store to recover");
                    continue;
                }
                None => {
                    info!("subscription stream closed");
                    break;
                }
            },
        };

        // Not cancelled mid-batch: shutdown is only honored between batches.
        apply_batch(&batch, &snapshots, &emitter).await;
    }

    info!("subscription reconciler stopped");
}

/// Apply one change batch to the snapshot store.
pub(crate) async fn apply_batch(
    batch: &ChangeBatch,
    snapshots: &SnapshotStore,
    emitter: &NotificationEmitter,
) {
    debug!(
        events = batch.events.len(),
        observed_at = %batch.observed_at,
        "processing change batch"
    );

    for event in &batch.events {
        match event.kind {
            ChangeKind::Added | ChangeKind::Modified => {
                observe_and_notify(&event.record, snapshots, emitter).await;
            }
            ChangeKind::Removed => {
                // Resolution of the removal open question: prune, so a
                // later re-creation baselines fresh instead of diffing
                // against a deleted document's state.
                if snapshots.remove(&event.record.id).await.is_some() {
                    debug!(id = %event.record.id, "pruned snapshot for removed router");
                }
            }
        }
    }
}

/// Observe one record and emit a notification when fields changed.
///
/// Shared by both trigger paths; the poll cycle runs each fetched record
/// through exactly this sequence.
pub(crate) async fn observe_and_notify(
    record: &RouterRecord,
    snapshots: &SnapshotStore,
    emitter: &NotificationEmitter,
) {
    let description = snapshots.observe(record).await;
    if description.is_empty() {
        return;
    }

    // A non-empty description implies the current record has a name (the
    // detector suppresses nameless records), so this branch always runs.
    if let Some(name) = record.name.as_deref() {
        emitter.emit(name, &description);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use routerwatch_types::{ChangeEvent, RouterId, UserId};

    use super::*;
    use crate::collaborators::MemoryNotificationSink;
    use crate::notify::identity_key;

    fn record(id: &str, name: Option<&str>, model: &str) -> RouterRecord {
        RouterRecord {
            name: name.map(str::to_owned),
            model: Some(model.to_owned()),
            ..RouterRecord::new(RouterId::from(id), UserId::from("u-1"))
        }
    }

    fn batch(events: Vec<ChangeEvent>) -> ChangeBatch {
        ChangeBatch::now(events)
    }

    fn harness() -> (SnapshotStore, Arc<MemoryNotificationSink>, NotificationEmitter) {
        let sink = Arc::new(MemoryNotificationSink::new());
        let emitter = NotificationEmitter::new(Arc::clone(&sink) as _);
        (SnapshotStore::new(), sink, emitter)
    }

    #[tokio::test]
    async fn added_event_establishes_baseline_without_notifying() {
        let (snapshots, sink, emitter) = harness();

        let added = batch(vec![ChangeEvent {
            kind: ChangeKind::Added,
            record: record("r-1", Some("R1"), "A"),
        }]);
        apply_batch(&added, &snapshots, &emitter).await;

        assert_eq!(snapshots.len().await, 1);
        assert!(sink.is_empty());
    }

    #[tokio::test]
    async fn modified_event_diffs_and_notifies() {
        let (snapshots, sink, emitter) = harness();

        apply_batch(
            &batch(vec![ChangeEvent {
                kind: ChangeKind::Added,
                record: record("r-1", Some("R1"), "A"),
            }]),
            &snapshots,
            &emitter,
        )
        .await;
        apply_batch(
            &batch(vec![ChangeEvent {
                kind: ChangeKind::Modified,
                record: record("r-1", Some("R1"), "B"),
            }]),
            &snapshots,
            &emitter,
        )
        .await;

        let shown = sink.get(identity_key("R1")).unwrap();
        assert_eq!(shown.body, "Model changed from A to B");
    }

    #[tokio::test]
    async fn removed_event_prunes_without_notifying() {
        let (snapshots, sink, emitter) = harness();

        let router = record("r-1", Some("R1"), "A");
        apply_batch(
            &batch(vec![ChangeEvent {
                kind: ChangeKind::Added,
                record: router.clone(),
            }]),
            &snapshots,
            &emitter,
        )
        .await;
        apply_batch(
            &batch(vec![ChangeEvent {
                kind: ChangeKind::Removed,
                record: router,
            }]),
            &snapshots,
            &emitter,
        )
        .await;

        assert!(snapshots.is_empty().await);
        assert!(sink.is_empty());
    }

    #[tokio::test]
    async fn nameless_record_does_not_abort_the_rest_of_the_batch() {
        let (snapshots, sink, emitter) = harness();

        // Baselines for both routers.
        apply_batch(
            &batch(vec![
                ChangeEvent {
                    kind: ChangeKind::Added,
                    record: record("r-1", Some("R1"), "A"),
                },
                ChangeEvent {
                    kind: ChangeKind::Added,
                    record: record("r-2", Some("R2"), "A"),
                },
            ]),
            &snapshots,
            &emitter,
        )
        .await;

        // r-1 loses its name (suppressed), r-2 changes model (notified).
        apply_batch(
            &batch(vec![
                ChangeEvent {
                    kind: ChangeKind::Modified,
                    record: record("r-1", None, "B"),
                },
                ChangeEvent {
                    kind: ChangeKind::Modified,
                    record: record("r-2", Some("R2"), "B"),
                },
            ]),
            &snapshots,
            &emitter,
        )
        .await;

        assert_eq!(sink.len(), 1);
        assert_eq!(
            sink.get(identity_key("R2")).unwrap().body,
            "Model changed from A to B"
        );
    }

    #[tokio::test]
    async fn stream_errors_are_skipped_and_draining_continues() {
        let sink = Arc::new(MemoryNotificationSink::new());
        let emitter = Arc::new(NotificationEmitter::new(Arc::clone(&sink) as _));
        let snapshots = Arc::new(SnapshotStore::new());
        let (_shutdown_tx, shutdown_rx) = watch::channel(false);

        let items: Vec<Result<ChangeBatch, StoreError>> = vec![
            Ok(batch(vec![ChangeEvent {
                kind: ChangeKind::Added,
                record: record("r-1", Some("R1"), "A"),
            }])),
            Err(StoreError::Transport {
                message: "connection reset".to_owned(),
            }),
            Ok(batch(vec![ChangeEvent {
                kind: ChangeKind::Modified,
                record: record("r-1", Some("R1"), "B"),
            }])),
        ];
        let changes: BoxStream<'static, Result<ChangeBatch, StoreError>> =
            Box::pin(futures::stream::iter(items));

        run_reconciler(changes, Arc::clone(&snapshots), emitter, shutdown_rx).await;

        assert_eq!(
            sink.get(identity_key("R1")).unwrap().body,
            "Model changed from A to B"
        );
    }
}
