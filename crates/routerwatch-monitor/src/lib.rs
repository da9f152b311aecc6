//! Router status monitor core.
//!
//! Watches a user's router records in a remote document store, detects
//! field-level changes between observations, and raises deduplicated user
//! notifications. Two independent trigger paths feed one pipeline: a live
//! change subscription (push) and a self-rescheduling poll timer (pull),
//! both reconciling against the same last-seen [`SnapshotStore`].
//!
//! The crate owns no I/O: the document store, identity session, wake timer,
//! and notification surface are collaborators behind the traits in
//! [`collaborators`]. Everything is wired by [`MonitorService`], a single
//! owned instance with explicit `start`/`stop`.
//!
//! # Modules
//!
//! - [`snapshot`] -- last-seen state per router, one critical section per
//!   observation
//! - [`diff`] -- pure field-level change detection
//! - `reconciler` / `poller` -- the two trigger paths (internal tasks
//!   spawned by the service)
//! - [`notify`] -- deduplicated alert emission
//! - [`service`] -- lifecycle wiring
//! - [`collaborators`] -- external interface traits and stock
//!   implementations
//! - [`config`] / [`error`] -- tunables and failure taxonomy

pub mod collaborators;
pub mod config;
pub mod diff;
pub mod error;
pub mod notify;
mod poller;
mod reconciler;
pub mod service;
pub mod snapshot;

// Re-export the main surface at crate root for convenience.
pub use collaborators::{
    DocumentStore, FixedIdentityProvider, IdentityProvider, MemoryNotificationSink,
    NotificationSink, ShownNotification, TokioWakeScheduler, TracingNotificationSink,
    WakeScheduler,
};
pub use config::MonitorConfig;
pub use diff::{ChangeDescription, FieldChange, detect_changes};
pub use error::{MonitorError, StoreError};
pub use notify::{NotificationEmitter, identity_key};
pub use service::MonitorService;
pub use snapshot::SnapshotStore;
