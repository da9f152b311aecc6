//! Error types for the monitor core and its collaborators.
//!
//! [`MonitorError`] covers fatal initialization failures; everything that
//! happens after a successful start is either logged and skipped (transient
//! transport trouble, a malformed record) or swallowed (notification render
//! failures), never propagated as an error.

use routerwatch_types::RouterId;

/// Fatal failures when starting the monitor.
#[derive(Debug, thiserror::Error)]
pub enum MonitorError {
    /// No user is signed in; monitoring must not start and must not retry.
    #[error("no authenticated user, refusing to start monitoring")]
    NoAuthenticatedUser,
}

/// Errors surfaced by a [`DocumentStore`] collaborator.
///
/// `Transport` and `Lagged` are transient: the monitor logs them and lets
/// the collaborator's own retry handle recovery. `UnknownRouter` is a
/// store-side precondition failure on mutation.
///
/// [`DocumentStore`]: crate::collaborators::DocumentStore
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The transport to the remote store failed.
    #[error("transport error: {message}")]
    Transport {
        /// Description of the transport failure.
        message: String,
    },

    /// A mutation referenced a router document that does not exist.
    #[error("unknown router: {id}")]
    UnknownRouter {
        /// The missing document's identifier.
        id: RouterId,
    },

    /// A subscriber fell behind the change feed and missed batches.
    #[error("subscription lagged, skipped {skipped} change batches")]
    Lagged {
        /// Number of batches dropped before delivery resumed.
        skipped: u64,
    },
}
