//! The monitor service: one owned instance wiring both trigger paths.
//!
//! [`MonitorService::start`] resolves the signed-in user, opens the change
//! subscription, and spawns the two trigger tasks around one shared
//! [`SnapshotStore`]. [`MonitorService::stop`] signals both tasks through a
//! watch channel, waits for them to finish their in-flight work, and clears
//! the store. Subscription and pending wake are released together: the
//! reconciler drops its stream on exit (unsubscribing) and the poller drops
//! its armed wake (cancelling it).
//!
//! There is no ambient global state: everything the monitor owns lives in
//! this struct, and dropping it without calling `stop` aborts nothing but
//! leaks nothing either (the tasks end when the shutdown sender drops).

use std::sync::Arc;

use routerwatch_types::UserId;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::collaborators::{DocumentStore, IdentityProvider, NotificationSink, WakeScheduler};
use crate::config::MonitorConfig;
use crate::error::MonitorError;
use crate::notify::NotificationEmitter;
use crate::poller::run_poller;
use crate::reconciler::run_reconciler;
use crate::snapshot::SnapshotStore;

/// Running router status monitor.
#[derive(Debug)]
pub struct MonitorService {
    user: UserId,
    snapshots: Arc<SnapshotStore>,
    shutdown: watch::Sender<bool>,
    reconciler: JoinHandle<()>,
    poller: JoinHandle<()>,
}

impl MonitorService {
    /// Start monitoring for the currently signed-in user.
    ///
    /// Must be called from within a tokio runtime. The subscription opens
    /// immediately and the first poll cycle runs eagerly; afterwards the
    /// poll path re-arms itself every configured interval.
    ///
    /// # Errors
    ///
    /// Returns [`MonitorError::NoAuthenticatedUser`] when the identity
    /// provider reports no session. This is fatal: the caller must not
    /// retry, monitoring is simply unavailable until a user signs in.
    pub fn start(
        documents: Arc<dyn DocumentStore>,
        identity: &dyn IdentityProvider,
        scheduler: Arc<dyn WakeScheduler>,
        sink: Arc<dyn NotificationSink>,
        config: &MonitorConfig,
    ) -> Result<Self, MonitorError> {
        let user = identity
            .current_user_id()
            .ok_or(MonitorError::NoAuthenticatedUser)?;

        info!(
            user = %user,
            poll_interval_secs = config.poll_interval_secs,
            "starting router status monitor"
        );

        let snapshots = Arc::new(SnapshotStore::new());
        let emitter = Arc::new(NotificationEmitter::new(sink));
        let (shutdown, shutdown_rx) = watch::channel(false);

        let changes = documents.subscribe(&user);
        let reconciler = tokio::spawn(run_reconciler(
            changes,
            Arc::clone(&snapshots),
            Arc::clone(&emitter),
            shutdown_rx.clone(),
        ));

        let poller = tokio::spawn(run_poller(
            documents,
            user.clone(),
            Arc::clone(&snapshots),
            emitter,
            scheduler,
            config.poll_interval(),
            shutdown_rx,
        ));

        Ok(Self {
            user,
            snapshots,
            shutdown,
            reconciler,
            poller,
        })
    }

    /// The user this monitor watches.
    pub const fn user(&self) -> &UserId {
        &self.user
    }

    /// Number of routers with a stored last-seen snapshot.
    pub async fn snapshot_count(&self) -> usize {
        self.snapshots.len().await
    }

    /// Stop monitoring: signal both tasks, wait for in-flight work to
    /// complete, release subscription and pending wake, clear the store.
    pub async fn stop(self) {
        info!(user = %self.user, "stopping router status monitor");
        let _ = self.shutdown.send(true);

        if let Err(error) = self.reconciler.await {
            warn!(error = %error, "reconciler task ended abnormally");
        }
        if let Err(error) = self.poller.await {
            warn!(error = %error, "poller task ended abnormally");
        }

        self.snapshots.clear().await;
        info!("router status monitor stopped");
    }
}

/// Resolve once the shutdown flag is set (or the service was dropped).
pub(crate) async fn stop_requested(shutdown: &mut watch::Receiver<bool>) {
    // wait_for errors when the sender is gone, which also means stop.
    let _ = shutdown.wait_for(|stop| *stop).await;
}
