//! The assembled booking engine.

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::NaiveDate;
use tokio::sync::{RwLock, broadcast, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info};

use roombook_core::config::AppConfig;
use roombook_core::events::DomainEvent;
use roombook_core::result::AppResult;
use roombook_core::traits::notifier::Notifier;
use roombook_core::traits::store::{DocumentStore, StoredDocument};
use roombook_core::types::id::RequesterId;
use roombook_entity::day::{Day, DayInfo, HolidayCalendar};
use roombook_entity::slot::Slot;

use crate::availability::{AvailabilityResolver, DayAvailability, SlotAvailability};
use crate::calendar::CalendarGenerator;
use crate::catalog::SlotCatalog;
use crate::coordinator::{ReservationBatch, ReservationCoordinator, SubmitRequest};
use crate::notify::NotificationDispatcher;
use crate::rejection::RejectionReason;
use crate::review::ReviewService;
use crate::snapshot::{ApplyOutcome, ReservationSnapshot, SnapshotMirror};

/// Domain events buffered per subscriber.
const EVENT_BUFFER: usize = 256;

/// Calendar, catalog, resolver, coordinator and reviewer actions wired
/// over one document store and one notifier.
#[derive(Debug, Clone)]
pub struct BookingEngine {
    calendar: CalendarGenerator,
    catalog: Arc<SlotCatalog>,
    holidays: Arc<HolidayCalendar>,
    resolver: AvailabilityResolver,
    mirror: Arc<RwLock<SnapshotMirror>>,
    coordinator: ReservationCoordinator,
    review: ReviewService,
    store: Arc<dyn DocumentStore>,
    pending_collection: String,
    events: broadcast::Sender<DomainEvent>,
}

impl BookingEngine {
    /// Build the engine from configuration.
    pub fn new(
        config: &AppConfig,
        store: Arc<dyn DocumentStore>,
        notifier: Arc<dyn Notifier>,
    ) -> AppResult<Self> {
        let holidays = Arc::new(HolidayCalendar::from_config(&config.holidays)?);
        let catalog = Arc::new(SlotCatalog::from_config(&config.catalog)?);
        let mirror = Arc::new(RwLock::new(SnapshotMirror::new(
            config.store.max_unechoed_snapshots,
        )));
        let (events, _) = broadcast::channel(EVENT_BUFFER);

        let coordinator = ReservationCoordinator::new(
            Arc::clone(&catalog),
            Arc::clone(&holidays),
            Arc::clone(&mirror),
            Arc::clone(&store),
            config.store.pending_collection.clone(),
            NotificationDispatcher::new(notifier, config.notifications.clone()),
            events.clone(),
        );
        let review = ReviewService::new(
            Arc::clone(&mirror),
            Arc::clone(&store),
            config.store.pending_collection.clone(),
            config.store.accepted_collection.clone(),
            events.clone(),
        );

        info!(
            slots = catalog.slots().len(),
            rooms = catalog.rooms().len(),
            holidays = holidays.len(),
            collection = %config.store.pending_collection,
            "Booking engine initialized"
        );

        Ok(Self {
            calendar: CalendarGenerator::new(&config.calendar, Arc::clone(&holidays)),
            resolver: AvailabilityResolver::new(Arc::clone(&catalog)),
            catalog,
            holidays,
            mirror,
            coordinator,
            review,
            store,
            pending_collection: config.store.pending_collection.clone(),
            events,
        })
    }

    /// The booking-week generator.
    pub fn calendar(&self) -> &CalendarGenerator {
        &self.calendar
    }

    /// The slot catalog.
    pub fn catalog(&self) -> &SlotCatalog {
        &self.catalog
    }

    /// Reviewer actions.
    pub fn review(&self) -> &ReviewService {
        &self.review
    }

    /// The booking week seen from `today`.
    pub fn booking_week(&self, today: NaiveDate) -> Vec<DayInfo> {
        self.calendar.booking_week(today)
    }

    /// Attributes of an arbitrary day.
    pub fn day_info(&self, day: Day) -> DayInfo {
        DayInfo::new(day, &self.holidays)
    }

    /// A copy of the current merged reservation view.
    pub async fn snapshot(&self) -> ReservationSnapshot {
        self.mirror.read().await.current().clone()
    }

    /// Bookable rooms for one slot against the current view.
    pub async fn available_rooms(&self, day: Day, slot: &Slot) -> BTreeSet<String> {
        let mirror = self.mirror.read().await;
        self.resolver.available_rooms(day, slot, mirror.current())
    }

    /// Classification of one slot against the current view.
    pub async fn classify(&self, day: Day, slot: &Slot) -> SlotAvailability {
        let mirror = self.mirror.read().await;
        self.resolver.classify(day, slot, mirror.current())
    }

    /// Every slot of a day against the current view.
    pub async fn day_view(&self, day: Day, requester: Option<&RequesterId>) -> DayAvailability {
        let info = self.day_info(day);
        let mirror = self.mirror.read().await;
        self.resolver.day_view(&info, mirror.current(), requester)
    }

    /// Submit a reservation request.
    pub async fn submit(&self, request: SubmitRequest) -> Result<ReservationBatch, RejectionReason> {
        self.coordinator.submit(request).await
    }

    /// Wait for confirmation messages that are still being delivered.
    pub async fn drain_notifications(&self) {
        self.coordinator.drain_notifications().await;
    }

    /// Apply one full snapshot of the pending collection.
    pub async fn apply_snapshot(&self, documents: &[StoredDocument]) -> ApplyOutcome {
        self.mirror.write().await.apply_snapshot(documents)
    }

    /// Subscribe, apply the initial snapshot and unsubscribe.
    pub async fn sync_once(&self) -> AppResult<ApplyOutcome> {
        let mut subscription = self.store.subscribe(&self.pending_collection).await?;
        let documents = subscription.next().await.unwrap_or_default();
        Ok(self.apply_snapshot(&documents).await)
    }

    /// Number of optimistic records not yet confirmed by the store.
    pub async fn pending_patches(&self) -> usize {
        self.mirror.read().await.pending_patches()
    }

    /// Receive domain events from now on.
    pub fn subscribe_events(&self) -> broadcast::Receiver<DomainEvent> {
        self.events.subscribe()
    }

    /// Mirror the pending collection in the background.
    ///
    /// The subscription is opened before this returns, so no change made
    /// afterwards can be missed. The task applies snapshots in delivery
    /// order until the store closes the feed or `shutdown` flips to true.
    pub async fn spawn_listener(
        &self,
        mut shutdown: watch::Receiver<bool>,
    ) -> AppResult<JoinHandle<()>> {
        let mut subscription = self.store.subscribe(&self.pending_collection).await?;
        let mirror = Arc::clone(&self.mirror);
        let collection = self.pending_collection.clone();

        Ok(tokio::spawn(async move {
            info!(collection = %collection, "Snapshot listener started");
            loop {
                tokio::select! {
                    changed = shutdown.changed() => {
                        if changed.is_err() || *shutdown.borrow() {
                            info!(collection = %collection, "Snapshot listener received shutdown signal");
                            break;
                        }
                    }
                    next = subscription.next() => {
                        let Some(documents) = next else {
                            info!(collection = %collection, "Snapshot feed closed");
                            break;
                        };
                        let outcome = mirror.write().await.apply_snapshot(&documents);
                        debug!(collection = %collection, documents = documents.len(), reconciled = outcome.reconciled, "Snapshot applied");
                    }
                }
            }
        }))
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use roombook_entity::requester::Requester;
    use roombook_realtime::notification::log::LogNotifier;
    use roombook_realtime::store::memory::MemoryDocumentStore;

    use super::*;

    fn engine(store: Arc<MemoryDocumentStore>) -> BookingEngine {
        BookingEngine::new(&AppConfig::default(), store, Arc::new(LogNotifier::new())).unwrap()
    }

    fn tuesday() -> Day {
        Day::from_ymd(2025, 1, 14).unwrap()
    }

    #[tokio::test]
    async fn test_listener_reconciles_optimistic_patch() {
        let store = Arc::new(MemoryDocumentStore::new(16));
        let engine = engine(store.clone());
        let (stop, shutdown) = watch::channel(false);
        let listener = engine.spawn_listener(shutdown).await.unwrap();

        engine
            .submit(SubmitRequest {
                room: "Espectacle".to_string(),
                day: tuesday(),
                slots: vec![Slot::from("11:20 - 12:20")],
                requester: Requester::new("uid-1", "Marta", "marta@example.org"),
                participants: vec!["Ana".to_string()],
            })
            .await
            .unwrap();

        tokio::time::timeout(Duration::from_secs(1), async {
            while engine.pending_patches().await > 0 {
                tokio::task::yield_now().await;
            }
        })
        .await
        .unwrap();

        assert_eq!(engine.snapshot().await.len(), 1);
        assert!(engine
            .available_rooms(tuesday(), &Slot::from("11:20 - 12:20"))
            .await
            .is_empty());

        stop.send(true).unwrap();
        listener.await.unwrap();
    }

    #[tokio::test]
    async fn test_sync_once_loads_existing_documents() {
        let store = Arc::new(MemoryDocumentStore::new(16));
        let seeded = engine(store.clone());
        seeded
            .submit(SubmitRequest {
                room: "A24".to_string(),
                day: tuesday(),
                slots: vec![Slot::from("8:00 - 9:00")],
                requester: Requester::new("uid-1", "Marta", "marta@example.org"),
                participants: vec!["Ana".to_string()],
            })
            .await
            .unwrap();

        let fresh = engine(store);
        let outcome = fresh.sync_once().await.unwrap();
        assert_eq!(outcome.decoded, 1);
        assert_eq!(
            fresh.classify(tuesday(), &Slot::from("8:00 - 9:00")).await,
            SlotAvailability::Bookable {
                rooms: BTreeSet::from(["Espectacle".to_string()])
            }
        );
    }
}
