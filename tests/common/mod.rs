//! Shared test helpers for integration tests.

#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use roombook_core::config::AppConfig;
use roombook_core::error::AppError;
use roombook_core::result::AppResult;
use roombook_core::traits::notifier::{Notifier, TemplateParams};
use roombook_core::traits::store::{DocumentStore, Subscription};
use roombook_core::types::id::DocumentId;
use roombook_engine::{BookingEngine, SubmitRequest};
use roombook_entity::day::Day;
use roombook_entity::requester::Requester;
use roombook_entity::slot::Slot;
use roombook_realtime::MemoryDocumentStore;

/// Collection used by the default configuration.
pub const PENDING: &str = "reservas-pendientes";

/// A store whose appends start failing after a given number of successes.
#[derive(Debug)]
pub struct FlakyStore {
    /// The real store underneath.
    pub inner: MemoryDocumentStore,
    appends: AtomicUsize,
    fail_from: AtomicUsize,
    /// Remaining `mark_accepted` calls to fail.
    failing_marks: AtomicUsize,
}

impl FlakyStore {
    /// Appends succeed `successes` times, then fail.
    pub fn failing_after(successes: usize) -> Self {
        Self {
            inner: MemoryDocumentStore::new(16),
            appends: AtomicUsize::new(0),
            fail_from: AtomicUsize::new(successes),
            failing_marks: AtomicUsize::new(0),
        }
    }

    /// Fail the next `count` calls to `mark_accepted`.
    pub fn fail_marks(&self, count: usize) {
        self.failing_marks.store(count, Ordering::SeqCst);
    }

    /// Let every later append succeed.
    pub fn recover(&self) {
        self.fail_from.store(usize::MAX, Ordering::SeqCst);
    }
}

#[async_trait]
impl DocumentStore for FlakyStore {
    async fn subscribe(&self, collection: &str) -> AppResult<Subscription> {
        self.inner.subscribe(collection).await
    }

    async fn append(&self, collection: &str, document: serde_json::Value) -> AppResult<DocumentId> {
        let n = self.appends.fetch_add(1, Ordering::SeqCst);
        if n >= self.fail_from.load(Ordering::SeqCst) {
            return Err(AppError::storage("store unreachable"));
        }
        self.inner.append(collection, document).await
    }

    async fn put(
        &self,
        collection: &str,
        id: &DocumentId,
        document: serde_json::Value,
    ) -> AppResult<()> {
        self.inner.put(collection, id, document).await
    }

    async fn mark_accepted(&self, collection: &str, id: &DocumentId) -> AppResult<()> {
        let failing = self
            .failing_marks
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if failing {
            return Err(AppError::storage("store unreachable"));
        }
        self.inner.mark_accepted(collection, id).await
    }

    async fn remove(&self, collection: &str, id: &DocumentId) -> AppResult<()> {
        self.inner.remove(collection, id).await
    }
}

/// Records every message it is asked to deliver.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    /// Delivered (address, params) pairs.
    pub sent: Mutex<Vec<(String, TemplateParams)>>,
    /// Fail every delivery.
    pub fail: bool,
}

impl RecordingNotifier {
    /// A notifier that always fails.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    /// Number of recorded deliveries.
    pub async fn count(&self) -> usize {
        self.sent.lock().await.len()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, address: &str, params: &TemplateParams) -> AppResult<()> {
        if self.fail {
            return Err(AppError::external_service("gateway down"));
        }
        self.sent
            .lock()
            .await
            .push((address.to_string(), params.clone()));
        Ok(())
    }
}

/// Build an engine with the default configuration.
pub fn engine(store: Arc<dyn DocumentStore>, notifier: Arc<dyn Notifier>) -> BookingEngine {
    BookingEngine::new(&AppConfig::default(), store, notifier).expect("default config is valid")
}

/// Tuesday 14 January 2025, a regular school day.
pub fn tuesday() -> Day {
    Day::from_ymd(2025, 1, 14).expect("valid date")
}

/// A requester identity.
pub fn requester(id: &str) -> Requester {
    Requester::new(id, format!("User {id}"), format!("{id}@example.org"))
}

/// A request for `room` on [`tuesday`].
pub fn request(room: &str, slots: &[&str], participants: &[&str], who: &str) -> SubmitRequest {
    SubmitRequest {
        room: room.to_string(),
        day: tuesday(),
        slots: slots.iter().map(|s| Slot::from(*s)).collect(),
        requester: requester(who),
        participants: participants.iter().map(|p| p.to_string()).collect(),
    }
}
