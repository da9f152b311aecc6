//! Turning change descriptions into deduplicated user alerts.
//!
//! The notification identity is a 32-bit hash of the router *name*, not its
//! document id: two routers sharing a name collapse into one notification
//! slot and the later write wins. This is a deliberate, observable product
//! behavior, kept as-is (a corrected design would key by document id).
//! Emitting with an already-used identity replaces the visible alert
//! instead of stacking a new one.

use std::sync::Arc;

use tracing::debug;

use crate::collaborators::NotificationSink;
use crate::diff::ChangeDescription;

/// Compute the notification identity for a router name.
///
/// The classic 31-multiplier string hash over UTF-16 code units,
/// wrapping on overflow: `h = 31 * h + unit`. Deterministic across runs,
/// so a restart re-targets the same notification slots.
pub fn identity_key(name: &str) -> i32 {
    name.encode_utf16()
        .fold(0_i32, |hash, unit| {
            hash.wrapping_mul(31).wrapping_add(i32::from(unit))
        })
}

/// Emits deduplicated alerts through a [`NotificationSink`].
pub struct NotificationEmitter {
    sink: Arc<dyn NotificationSink>,
}

impl NotificationEmitter {
    /// Create an emitter writing to `sink`.
    pub fn new(sink: Arc<dyn NotificationSink>) -> Self {
        Self { sink }
    }

    /// Show an alert for a non-empty change description.
    ///
    /// Fire-and-forget: an empty description is ignored and sink failures
    /// never propagate back into the pipeline.
    pub fn emit(&self, router_name: &str, description: &ChangeDescription) {
        if description.is_empty() {
            return;
        }

        let identity = identity_key(router_name);
        let title = format!("Router changes: {router_name}");
        let body = description.to_string();

        debug!(identity, router_name, changes = description.len(), "emitting notification");
        self.sink.show(identity, &title, &body);
    }
}

impl core::fmt::Debug for NotificationEmitter {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("NotificationEmitter").finish_non_exhaustive()
    }
}
