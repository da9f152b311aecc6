//! Poll scheduler: the pull-style trigger path.
//!
//! A fallback for when the live subscription cannot deliver timely events
//! (the host process was woken from a terminated state, the push transport
//! is degraded). One cycle runs eagerly at service start; afterwards
//! exactly one wake is outstanding at a time, armed for "now + interval"
//! through the [`WakeScheduler`] collaborator.
//!
//! The timer is intentionally self-rescheduling rather than periodic: the
//! next wake is armed only after the current cycle's work completes, so a
//! crash between fire and re-arm drops exactly one future cycle instead of
//! double-firing. A failed fetch drops that cycle's diff (no mid-interval
//! retry) and still re-arms.
//!
//! [`WakeScheduler`]: crate::collaborators::WakeScheduler

use std::sync::Arc;
use std::time::Duration;

use routerwatch_types::UserId;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::collaborators::{DocumentStore, WakeScheduler};
use crate::notify::NotificationEmitter;
use crate::reconciler::observe_and_notify;
use crate::service::stop_requested;
use crate::snapshot::SnapshotStore;

/// Run poll cycles until shutdown is signalled.
pub(crate) async fn run_poller(
    documents: Arc<dyn DocumentStore>,
    owner: UserId,
    snapshots: Arc<SnapshotStore>,
    emitter: Arc<NotificationEmitter>,
    scheduler: Arc<dyn WakeScheduler>,
    interval: Duration,
    mut shutdown: watch::Receiver<bool>,
) {
    info!(interval_secs = interval.as_secs(), "poll scheduler started");

    loop {
        // A cycle in flight completes; shutdown is honored between cycles.
        run_poll_cycle(&*documents, &owner, &snapshots, &emitter).await;

        let wake = scheduler.arm_once(interval);
        tokio::select! {
            () = stop_requested(&mut shutdown) => break,
            () = wake => {}
        }
    }

    info!("poll scheduler stopped");
}

/// One poll cycle: bulk-fetch the owner's records and run each through the
/// same observe-and-notify sequence the subscription path uses.
pub(crate) async fn run_poll_cycle(
    documents: &dyn DocumentStore,
    owner: &UserId,
    snapshots: &SnapshotStore,
    emitter: &NotificationEmitter,
) {
    match documents.query(owner).await {
        Ok(records) => {
            debug!(count = records.len(), "poll cycle fetched records");
            for record in &records {
                observe_and_notify(record, snapshots, emitter).await;
            }
        }
        Err(error) => {
            warn!(error = %error, "poll fetch failed, dropping this cycle");
        }
    }
}
