//! Collaborator contracts the monitor is designed against.
//!
//! The monitor core owns no I/O of its own: the remote document store, the
//! authentication session, the wake timer, and the notification surface are
//! all reached through the traits in this module. Async operations are
//! returned as boxed futures/streams so the traits stay object-safe and the
//! service can hold `Arc<dyn ...>` handles.
//!
//! Production-grade implementations that need nothing beyond this crate
//! live here as well ([`TokioWakeScheduler`], [`FixedIdentityProvider`],
//! [`TracingNotificationSink`], [`MemoryNotificationSink`]); the in-process
//! document store emulation lives in `routerwatch-store`.

use std::collections::BTreeMap;
use std::sync::Mutex;
use std::time::Duration;

use futures::future::BoxFuture;
use futures::stream::BoxStream;
use routerwatch_types::{ChangeBatch, RouterRecord, UserId};
use tracing::info;

use crate::error::StoreError;

/// The remote document store holding router records.
pub trait DocumentStore: Send + Sync {
    /// One-shot fetch of all current records owned by `owner`.
    fn query(&self, owner: &UserId)
    -> BoxFuture<'static, Result<Vec<RouterRecord>, StoreError>>;

    /// Open a live change subscription scoped to `owner`.
    ///
    /// `Ok` items are change batches, delivered repeatedly for the stream's
    /// lifetime; `Err` items are transport errors surfaced in-band (the
    /// collaborator retries on its own). Dropping the stream unsubscribes.
    fn subscribe(&self, owner: &UserId) -> BoxStream<'static, Result<ChangeBatch, StoreError>>;
}

/// The authentication session.
pub trait IdentityProvider: Send + Sync {
    /// The signed-in user, if any. `None` is fatal to starting monitoring.
    fn current_user_id(&self) -> Option<UserId>;
}

/// An identity provider holding a fixed, pre-resolved user.
///
/// The host binary resolves its user from configuration and hands the
/// result to the monitor through this; tests use it for both the signed-in
/// and the signed-out case.
#[derive(Debug, Clone)]
pub struct FixedIdentityProvider {
    user: Option<UserId>,
}

impl FixedIdentityProvider {
    /// Create a provider with the given (possibly absent) user.
    pub const fn new(user: Option<UserId>) -> Self {
        Self { user }
    }

    /// Create a provider with a signed-in user.
    pub const fn signed_in(user: UserId) -> Self {
        Self { user: Some(user) }
    }

    /// Create a provider with no session.
    pub const fn signed_out() -> Self {
        Self { user: None }
    }
}

impl IdentityProvider for FixedIdentityProvider {
    fn current_user_id(&self) -> Option<UserId> {
        self.user.clone()
    }
}

/// One-shot wake timer that fires through device idle states.
pub trait WakeScheduler: Send + Sync {
    /// Arm a single wake. The returned future resolves at least `delay`
    /// after arming (best-effort timing, never early); dropping the future
    /// cancels the pending wake. There is no repeating primitive: callers
    /// re-arm after each cycle's work completes.
    fn arm_once(&self, delay: Duration) -> BoxFuture<'static, ()>;
}

/// Wake scheduler backed by the tokio timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioWakeScheduler;

impl WakeScheduler for TokioWakeScheduler {
    fn arm_once(&self, delay: Duration) -> BoxFuture<'static, ()> {
        Box::pin(tokio::time::sleep(delay))
    }
}

/// The user-visible notification surface.
///
/// Emission is fire-and-forget: implementations swallow render failures
/// rather than surfacing them back into the pipeline. The last `show` for a
/// given `identity` is the one visible; re-using an identity replaces the
/// prior alert instead of stacking a new one.
pub trait NotificationSink: Send + Sync {
    /// Show (or replace) the alert stored under `identity`.
    fn show(&self, identity: i32, title: &str, body: &str);
}

/// Notification sink that emits structured log records.
///
/// Used by the host binary, where no platform notification surface exists.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotificationSink;

impl NotificationSink for TracingNotificationSink {
    fn show(&self, identity: i32, title: &str, body: &str) {
        info!(identity, title, body, "notification");
    }
}

/// A notification as last shown for one identity slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShownNotification {
    /// Alert title.
    pub title: String,
    /// Alert body.
    pub body: String,
}

/// In-memory, last-write-wins notification sink.
///
/// Holds the currently visible alert per identity, the way a platform
/// notification tray would. A host UI can render [`visible`](Self::visible);
/// tests assert on it.
#[derive(Debug, Default)]
pub struct MemoryNotificationSink {
    shown: Mutex<BTreeMap<i32, ShownNotification>>,
}

impl MemoryNotificationSink {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// The currently visible alerts, ordered by identity.
    pub fn visible(&self) -> Vec<(i32, ShownNotification)> {
        self.shown.lock().map_or_else(
            |_| Vec::new(),
            |shown| {
                shown
                    .iter()
                    .map(|(identity, alert)| (*identity, alert.clone()))
                    .collect()
            },
        )
    }

    /// The visible alert for one identity slot, if any.
    pub fn get(&self, identity: i32) -> Option<ShownNotification> {
        self.shown
            .lock()
            .ok()
            .and_then(|shown| shown.get(&identity).cloned())
    }

    /// Number of visible alerts.
    pub fn len(&self) -> usize {
        self.shown.lock().map_or(0, |shown| shown.len())
    }

    /// Whether no alert is visible.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl NotificationSink for MemoryNotificationSink {
    fn show(&self, identity: i32, title: &str, body: &str) {
        // A poisoned lock means a render failure; swallowed, not surfaced.
        if let Ok(mut shown) = self.shown.lock() {
            shown.insert(
                identity,
                ShownNotification {
                    title: title.to_owned(),
                    body: body.to_owned(),
                },
            );
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use futures::FutureExt as _;

    use super::*;

    #[test]
    fn fixed_identity_provider_reports_its_user() {
        let signed_in = FixedIdentityProvider::signed_in(UserId::from("u-1"));
        assert_eq!(signed_in.current_user_id(), Some(UserId::from("u-1")));

        let signed_out = FixedIdentityProvider::signed_out();
        assert_eq!(signed_out.current_user_id(), None);
    }

    #[test]
    fn memory_sink_replaces_on_same_identity() {
        let sink = MemoryNotificationSink::new();
        sink.show(7, "first", "body one");
        sink.show(7, "second", "body two");
        sink.show(8, "other", "body three");

        assert_eq!(sink.len(), 2);
        assert_eq!(sink.get(7).unwrap().title, "second");
        assert_eq!(sink.get(8).unwrap().body, "body three");
    }

    #[tokio::test(start_paused = true)]
    async fn tokio_wake_fires_no_earlier_than_the_delay() {
        let scheduler = TokioWakeScheduler;
        let mut wake = scheduler.arm_once(Duration::from_secs(900));

        assert!((&mut wake).now_or_never().is_none());
        tokio::time::advance(Duration::from_secs(899)).await;
        assert!((&mut wake).now_or_never().is_none());
        tokio::time::advance(Duration::from_secs(2)).await;
        assert!(wake.now_or_never().is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_the_wake_cancels_it() {
        let scheduler = TokioWakeScheduler;
        let wake = scheduler.arm_once(Duration::from_secs(900));
        drop(wake);
        // Nothing to assert beyond "no stray timer fires"; advancing time
        // past the deadline must not panic or leak a wake.
        tokio::time::advance(Duration::from_secs(1000)).await;
    }
}
