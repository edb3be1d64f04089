//! In-memory document store for single-process deployments and tests.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use serde_json::Value;
use tokio::sync::broadcast;
use tracing::debug;
use uuid::Uuid;

use roombook_core::error::AppError;
use roombook_core::result::AppResult;
use roombook_core::traits::store::{CollectionSnapshot, DocumentStore, StoredDocument, Subscription};
use roombook_core::types::id::DocumentId;

/// One named collection and its change feed.
#[derive(Debug)]
struct CollectionState {
    /// Document key → body.
    documents: BTreeMap<DocumentId, Value>,
    /// Full-snapshot feed.
    sender: broadcast::Sender<CollectionSnapshot>,
}

impl CollectionState {
    fn new(buffer_size: usize) -> Self {
        Self {
            documents: BTreeMap::new(),
            sender: broadcast::channel(buffer_size).0,
        }
    }

    fn snapshot(&self) -> CollectionSnapshot {
        Arc::new(
            self.documents
                .iter()
                .map(|(id, data)| StoredDocument {
                    id: id.clone(),
                    data: data.clone(),
                })
                .collect(),
        )
    }

    fn publish(&self) {
        // Nobody listening is fine.
        let _ = self.sender.send(self.snapshot());
    }
}

/// A [`DocumentStore`] held entirely in memory.
///
/// Every mutation publishes the complete collection to its subscribers
/// while the collection entry is still locked, so subscribers observe
/// changes in the order they were applied.
#[derive(Debug)]
pub struct MemoryDocumentStore {
    /// Collection name → state.
    collections: DashMap<String, CollectionState>,
    /// Broadcast capacity per collection.
    buffer_size: usize,
}

impl MemoryDocumentStore {
    /// Create an empty store.
    pub fn new(buffer_size: usize) -> Self {
        Self {
            collections: DashMap::new(),
            buffer_size: buffer_size.max(1),
        }
    }

    /// Insert documents without going through the async API. A string
    /// `id` field becomes the document key and is removed from the body;
    /// other documents get a fresh key. Returns the keys in input order.
    pub fn seed(&self, collection: &str, documents: impl IntoIterator<Item = Value>) -> Vec<DocumentId> {
        let mut state = self
            .collections
            .entry(collection.to_string())
            .or_insert_with(|| CollectionState::new(self.buffer_size));
        let ids: Vec<DocumentId> = documents
            .into_iter()
            .map(|mut data| {
                let id = match data.as_object_mut().and_then(|fields| fields.remove("id")) {
                    Some(Value::String(key)) => DocumentId::new(key),
                    Some(other) => {
                        if let Some(fields) = data.as_object_mut() {
                            fields.insert("id".to_string(), other);
                        }
                        next_key()
                    }
                    None => next_key(),
                };
                state.documents.insert(id.clone(), data);
                id
            })
            .collect();
        state.publish();
        ids
    }

    /// Current contents of a collection.
    pub fn documents(&self, collection: &str) -> Vec<StoredDocument> {
        self.collections
            .get(collection)
            .map(|state| state.snapshot().as_ref().clone())
            .unwrap_or_default()
    }

    /// Number of open subscriptions on a collection.
    pub fn subscriber_count(&self, collection: &str) -> usize {
        self.collections
            .get(collection)
            .map(|state| state.sender.receiver_count())
            .unwrap_or(0)
    }

    /// End every open subscription on a collection. Documents are kept.
    pub fn close(&self, collection: &str) {
        if let Some(mut state) = self.collections.get_mut(collection) {
            state.sender = broadcast::channel(self.buffer_size).0;
            debug!(collection, "Closed collection feed");
        }
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn subscribe(&self, collection: &str) -> AppResult<Subscription> {
        let state = self
            .collections
            .entry(collection.to_string())
            .or_insert_with(|| CollectionState::new(self.buffer_size));
        let receiver = state.sender.subscribe();
        debug!(collection, documents = state.documents.len(), "Subscribed to collection");
        Ok(Subscription::new(collection, state.snapshot(), receiver))
    }

    async fn append(&self, collection: &str, document: Value) -> AppResult<DocumentId> {
        if !document.is_object() {
            return Err(AppError::validation("Documents must be JSON objects"));
        }
        let mut state = self
            .collections
            .entry(collection.to_string())
            .or_insert_with(|| CollectionState::new(self.buffer_size));
        let id = next_key();
        state.documents.insert(id.clone(), document);
        state.publish();
        debug!(collection, document_id = %id, "Document appended");
        Ok(id)
    }

    async fn put(&self, collection: &str, id: &DocumentId, document: Value) -> AppResult<()> {
        if !document.is_object() {
            return Err(AppError::validation("Documents must be JSON objects"));
        }
        let mut state = self
            .collections
            .entry(collection.to_string())
            .or_insert_with(|| CollectionState::new(self.buffer_size));
        let replaced = state.documents.insert(id.clone(), document).is_some();
        state.publish();
        debug!(collection, document_id = %id, replaced, "Document stored");
        Ok(())
    }

    async fn mark_accepted(&self, collection: &str, id: &DocumentId) -> AppResult<()> {
        let mut state = self
            .collections
            .get_mut(collection)
            .ok_or_else(|| AppError::not_found(format!("Collection '{collection}' not found")))?;
        let document = state
            .documents
            .get_mut(id)
            .ok_or_else(|| AppError::not_found(format!("Document '{id}' not found")))?;
        if let Some(fields) = document.as_object_mut() {
            fields.insert("status".to_string(), Value::from("accepted"));
        }
        state.publish();
        Ok(())
    }

    async fn remove(&self, collection: &str, id: &DocumentId) -> AppResult<()> {
        let mut state = self
            .collections
            .get_mut(collection)
            .ok_or_else(|| AppError::not_found(format!("Collection '{collection}' not found")))?;
        if state.documents.remove(id).is_none() {
            return Err(AppError::not_found(format!("Document '{id}' not found")));
        }
        state.publish();
        debug!(collection, document_id = %id, "Document removed");
        Ok(())
    }
}

fn next_key() -> DocumentId {
    DocumentId::new(Uuid::now_v7().simple().to_string())
}
