//! Realtime document store capability.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;

use crate::result::AppResult;
use crate::types::id::DocumentId;

/// A document as held by the store: its key plus a flat JSON body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredDocument {
    /// Store-assigned key.
    pub id: DocumentId,
    /// Document fields.
    pub data: serde_json::Value,
}

/// The full document set of one collection at one point in time.
pub type CollectionSnapshot = Arc<Vec<StoredDocument>>;

/// A live subscription to one collection.
///
/// The first call to [`Subscription::next`] yields the collection as it
/// was when the subscription was opened; later calls yield the full set
/// after every change, in the order the store published them. Dropping
/// the subscription unsubscribes.
#[derive(Debug)]
pub struct Subscription {
    collection: String,
    initial: Option<CollectionSnapshot>,
    receiver: broadcast::Receiver<CollectionSnapshot>,
}

impl Subscription {
    /// Build a subscription from the current contents and a change feed.
    pub fn new(
        collection: impl Into<String>,
        initial: CollectionSnapshot,
        receiver: broadcast::Receiver<CollectionSnapshot>,
    ) -> Self {
        Self {
            collection: collection.into(),
            initial: Some(initial),
            receiver,
        }
    }

    /// Wait for the next snapshot. Returns `None` once the store closes
    /// the collection feed.
    pub async fn next(&mut self) -> Option<CollectionSnapshot> {
        if let Some(initial) = self.initial.take() {
            return Some(initial);
        }

        loop {
            match self.receiver.recv().await {
                Ok(snapshot) => return Some(snapshot),
                // Every message is a full snapshot, so skipping ahead loses nothing.
                Err(RecvError::Lagged(skipped)) => {
                    tracing::debug!(
                        collection = %self.collection,
                        skipped,
                        "Subscription lagged, resuming from newest snapshot"
                    );
                }
                Err(RecvError::Closed) => return None,
            }
        }
    }
}

/// A document store that pushes full collection snapshots on change.
///
/// Implementations own durability and ordering. The engine only mirrors
/// what it is sent and never reads the store synchronously.
#[async_trait]
pub trait DocumentStore: Send + Sync + std::fmt::Debug + 'static {
    /// Open a live subscription to a collection.
    async fn subscribe(&self, collection: &str) -> AppResult<Subscription>;

    /// Durably store a new document and return its key.
    async fn append(&self, collection: &str, document: serde_json::Value)
    -> AppResult<DocumentId>;

    /// Store a document under a caller-chosen key, replacing any document
    /// already held there.
    async fn put(&self, collection: &str, id: &DocumentId, document: serde_json::Value)
    -> AppResult<()>;

    /// Mark a document as accepted (`status = "accepted"`).
    async fn mark_accepted(&self, collection: &str, id: &DocumentId) -> AppResult<()>;

    /// Delete a document.
    async fn remove(&self, collection: &str, id: &DocumentId) -> AppResult<()>;
}
