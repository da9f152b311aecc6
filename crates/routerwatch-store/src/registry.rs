//! Owner-filtered router registry with a broadcast change feed.
//!
//! Documents live in a [`BTreeMap`] behind an async `RwLock`; every
//! mutation publishes a single-event [`ChangeBatch`] on a broadcast
//! channel. Subscribers receive only the batches whose records match their
//! owner filter; a subscriber that falls behind gets an in-band
//! [`StoreError::Lagged`] item and then resumes with the newest batches,
//! mirroring how a real push transport degrades.

use std::collections::BTreeMap;
use std::sync::Arc;

use futures::future::BoxFuture;
use futures::stream::BoxStream;
use routerwatch_monitor::{DocumentStore, StoreError};
use routerwatch_types::{ChangeBatch, ChangeEvent, ChangeKind, RouterId, RouterRecord, UserId};
use tokio::sync::{RwLock, broadcast};
use tracing::debug;

/// Broadcast capacity before slow subscribers start lagging.
const CHANGE_CAPACITY: usize = 256;

struct Inner {
    records: RwLock<BTreeMap<RouterId, RouterRecord>>,
    changes: broadcast::Sender<ChangeBatch>,
}

/// In-memory remote document store.
///
/// Cheap to clone; clones share the same registry and change feed.
#[derive(Clone)]
pub struct MemoryDocumentStore {
    inner: Arc<Inner>,
}

impl MemoryDocumentStore {
    /// Create an empty registry.
    pub fn new() -> Self {
        let (changes, _) = broadcast::channel(CHANGE_CAPACITY);
        Self {
            inner: Arc::new(Inner {
                records: RwLock::new(BTreeMap::new()),
                changes,
            }),
        }
    }

    /// Create a router document. The store assigns a fresh id (any id on
    /// the passed record is replaced) and publishes an `Added` change.
    pub async fn create(&self, record: RouterRecord) -> RouterId {
        let id = RouterId::generate();
        let record = RouterRecord {
            id: id.clone(),
            ..record
        };

        {
            let mut records = self.inner.records.write().await;
            records.insert(id.clone(), record.clone());
        }

        debug!(id = %id, owner = %record.owner_id, "router created");
        self.publish(ChangeKind::Added, record);
        id
    }

    /// Fetch one document by id.
    pub async fn get(&self, id: &RouterId) -> Option<RouterRecord> {
        self.inner.records.read().await.get(id).cloned()
    }

    /// All documents owned by `owner`, in id order.
    pub async fn list(&self, owner: &UserId) -> Vec<RouterRecord> {
        self.inner
            .records
            .read()
            .await
            .values()
            .filter(|record| &record.owner_id == owner)
            .cloned()
            .collect()
    }

    /// Overwrite an existing document and publish a `Modified` change.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::UnknownRouter`] when no document with the
    /// record's id exists.
    pub async fn update(&self, record: RouterRecord) -> Result<(), StoreError> {
        {
            let mut records = self.inner.records.write().await;
            if !records.contains_key(&record.id) {
                return Err(StoreError::UnknownRouter {
                    id: record.id.clone(),
                });
            }
            records.insert(record.id.clone(), record.clone());
        }

        debug!(id = %record.id, "router updated");
        self.publish(ChangeKind::Modified, record);
        Ok(())
    }

    /// Delete a document and publish a `Removed` change carrying its last
    /// stored state.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::UnknownRouter`] when no document with `id`
    /// exists.
    pub async fn delete(&self, id: &RouterId) -> Result<RouterRecord, StoreError> {
        let removed = {
            let mut records = self.inner.records.write().await;
            records
                .remove(id)
                .ok_or_else(|| StoreError::UnknownRouter { id: id.clone() })?
        };

        debug!(id = %id, "router deleted");
        self.publish(ChangeKind::Removed, removed.clone());
        Ok(removed)
    }

    /// Number of documents in the registry, across all owners.
    pub async fn len(&self) -> usize {
        self.inner.records.read().await.len()
    }

    /// Whether the registry holds no documents.
    pub async fn is_empty(&self) -> bool {
        self.inner.records.read().await.is_empty()
    }

    fn publish(&self, kind: ChangeKind, record: RouterRecord) {
        let batch = ChangeBatch::now(vec![ChangeEvent { kind, record }]);
        // No subscribers is fine; the feed is fire-and-forget.
        let _ = self.inner.changes.send(batch);
    }
}

impl Default for MemoryDocumentStore {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Debug for MemoryDocumentStore {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("MemoryDocumentStore").finish_non_exhaustive()
    }
}

impl DocumentStore for MemoryDocumentStore {
    fn query(
        &self,
        owner: &UserId,
    ) -> BoxFuture<'static, Result<Vec<RouterRecord>, StoreError>> {
        let store = self.clone();
        let owner = owner.clone();
        Box::pin(async move { Ok(store.list(&owner).await) })
    }

    fn subscribe(&self, owner: &UserId) -> BoxStream<'static, Result<ChangeBatch, StoreError>> {
        let receiver = self.inner.changes.subscribe();
        let owner = owner.clone();

        Box::pin(futures::stream::unfold(receiver, move |mut receiver| {
            let owner = owner.clone();
            async move {
                loop {
                    match receiver.recv().await {
                        Ok(batch) => {
                            let events: Vec<ChangeEvent> = batch
                                .events
                                .into_iter()
                                .filter(|event| event.record.owner_id == owner)
                                .collect();
                            if events.is_empty() {
                                continue;
                            }
                            let filtered = ChangeBatch {
                                events,
                                observed_at: batch.observed_at,
                            };
                            return Some((Ok(filtered), receiver));
                        }
                        Err(broadcast::error::RecvError::Lagged(skipped)) => {
                            return Some((Err(StoreError::Lagged { skipped }), receiver));
                        }
                        Err(broadcast::error::RecvError::Closed) => return None,
                    }
                }
            }
        }))
    }
}
