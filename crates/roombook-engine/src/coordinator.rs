//! Submission validation and persistence.
//!
//! A submission is checked in a fixed order (participants, slot selection,
//! holiday, per-slot availability). Once it passes, its records are
//! patched into the local mirror under the same write lock that guarded
//! the availability check, so a second submission from this session can
//! never observe the slot as free. Only then is the write handed to the
//! store. A failed write rolls the patch back.

use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tokio::sync::{RwLock, broadcast};
use tracing::{debug, error, info};

use roombook_core::error::AppError;
use roombook_core::events::{DomainEvent, ReservationEvent};
use roombook_core::traits::store::DocumentStore;
use roombook_core::types::id::{BatchId, DocumentId};
use roombook_entity::day::{Day, HolidayCalendar};
use roombook_entity::requester::Requester;
use roombook_entity::reservation::Reservation;
use roombook_entity::slot::Slot;

use crate::availability::AvailabilityResolver;
use crate::catalog::SlotCatalog;
use crate::notify::NotificationDispatcher;
use crate::rejection::{ConflictKind, RejectionReason};
use crate::snapshot::SnapshotMirror;

/// A reservation request for one room, one day and one or more slots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitRequest {
    /// Room name.
    pub room: String,
    /// Requested day.
    pub day: Day,
    /// Requested slots, in any order.
    pub slots: Vec<Slot>,
    /// Who is asking.
    pub requester: Requester,
    /// Participant names as entered.
    pub participants: Vec<String>,
}

/// The records created by one successful submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReservationBatch {
    /// Submission identifier shared by every record.
    pub batch_id: BatchId,
    /// One record per slot, in schedule order, each with its store key.
    pub reservations: Vec<Reservation>,
}

impl ReservationBatch {
    /// Store keys of the created documents.
    pub fn document_ids(&self) -> Vec<DocumentId> {
        self.reservations.iter().filter_map(|r| r.id.clone()).collect()
    }
}

/// Validates submissions and hands them to the store.
#[derive(Debug, Clone)]
pub struct ReservationCoordinator {
    catalog: Arc<SlotCatalog>,
    holidays: Arc<HolidayCalendar>,
    resolver: AvailabilityResolver,
    mirror: Arc<RwLock<SnapshotMirror>>,
    store: Arc<dyn DocumentStore>,
    collection: String,
    dispatcher: NotificationDispatcher,
    events: broadcast::Sender<DomainEvent>,
}

impl ReservationCoordinator {
    /// Create a coordinator.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        catalog: Arc<SlotCatalog>,
        holidays: Arc<HolidayCalendar>,
        mirror: Arc<RwLock<SnapshotMirror>>,
        store: Arc<dyn DocumentStore>,
        collection: impl Into<String>,
        dispatcher: NotificationDispatcher,
        events: broadcast::Sender<DomainEvent>,
    ) -> Self {
        Self {
            resolver: AvailabilityResolver::new(Arc::clone(&catalog)),
            catalog,
            holidays,
            mirror,
            store,
            collection: collection.into(),
            dispatcher,
            events,
        }
    }

    /// Validate and persist a submission.
    pub async fn submit(&self, request: SubmitRequest) -> Result<ReservationBatch, RejectionReason> {
        let SubmitRequest {
            room,
            day,
            slots,
            requester,
            participants,
        } = request;

        let participants: Vec<String> = participants
            .iter()
            .map(|name| name.trim())
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .collect();
        if participants.is_empty() {
            return Err(self.rejected(&requester, &room, day, RejectionReason::EmptyParticipantList));
        }

        let slots = self.catalog.normalize_selection(slots);
        if slots.is_empty() {
            return Err(self.rejected(&requester, &room, day, RejectionReason::NoSlotsSelected));
        }

        if self.holidays.contains(day) {
            return Err(self.rejected(&requester, &room, day, RejectionReason::HolidayBlocked { day }));
        }
        if day.is_weekend() {
            return Err(self.rejected(&requester, &room, day, RejectionReason::WeekendBlocked { day }));
        }

        let batch_id = BatchId::new();
        let created_at = Utc::now();
        let mut reservations = Vec::with_capacity(slots.len());
        {
            let mut mirror = self.mirror.write().await;
            for slot in &slots {
                let conflict = if !self.catalog.is_eligible(&room, day, slot) {
                    Some(ConflictKind::NotOffered)
                } else if !self
                    .resolver
                    .available_rooms(day, slot, mirror.current())
                    .contains(&room)
                {
                    Some(ConflictKind::AlreadyReserved)
                } else {
                    None
                };
                if let Some(conflict) = conflict {
                    let reason = RejectionReason::SlotConflict {
                        slot: slot.clone(),
                        conflict,
                    };
                    return Err(self.rejected(&requester, &room, day, reason));
                }

                let reservation = Reservation::pending(
                    room.as_str(),
                    day,
                    slot.clone(),
                    &requester,
                    participants.clone(),
                    created_at,
                )
                .map_err(|_| {
                    self.rejected(
                        &requester,
                        &room,
                        day,
                        RejectionReason::SlotConflict {
                            slot: slot.clone(),
                            conflict: ConflictKind::NotOffered,
                        },
                    )
                })?;
                reservations.push(reservation);
            }
            mirror.patch(batch_id, reservations.clone());
        }
        debug!(%batch_id, room = %room, %day, slots = slots.len(), "Optimistic reservations patched");

        let mut stored = Vec::with_capacity(reservations.len());
        for reservation in &mut reservations {
            match self.persist(reservation).await {
                Ok(id) => {
                    self.mirror
                        .write()
                        .await
                        .assign_id(batch_id, &reservation.key(), id.clone());
                    reservation.id = Some(id.clone());
                    stored.push(id);
                }
                Err(source) => {
                    return Err(self
                        .fail_persistence(&requester, batch_id, &room, day, &stored, source)
                        .await);
                }
            }
        }

        let batch = ReservationBatch {
            batch_id,
            reservations,
        };

        info!(
            %batch_id,
            requester_id = %requester.id,
            room = %room,
            %day,
            slots = batch.reservations.len(),
            "Reservation request submitted"
        );
        self.publish(
            &requester,
            ReservationEvent::Submitted {
                batch_id,
                room,
                day: day.date(),
                slots: slots.iter().map(|s| s.label().to_string()).collect(),
                documents: stored,
            },
        );

        self.dispatcher.dispatch_confirmation(&requester, &batch);
        Ok(batch)
    }

    /// Wait for confirmation messages that are still being delivered.
    pub async fn drain_notifications(&self) {
        self.dispatcher.drain().await;
    }

    async fn persist(
        &self,
        reservation: &Reservation,
    ) -> Result<DocumentId, AppError> {
        let document = reservation.to_document()?;
        self.store.append(&self.collection, document).await
    }

    /// Undo a partially persisted submission and build the rejection.
    async fn fail_persistence(
        &self,
        requester: &Requester,
        batch_id: BatchId,
        room: &str,
        day: Day,
        stored: &[DocumentId],
        source: AppError,
    ) -> RejectionReason {
        let removed = self.mirror.write().await.rollback(batch_id);
        error!(
            %batch_id,
            room = %room,
            %day,
            rolled_back = removed,
            error = %source,
            "Reservation write failed, optimistic records rolled back"
        );

        for id in stored {
            if let Err(e) = self.store.remove(&self.collection, id).await {
                error!(%batch_id, document_id = %id, error = %e, "Failed to remove partially stored reservation");
            }
        }

        self.publish(
            requester,
            ReservationEvent::PersistenceFailed {
                batch_id,
                room: room.to_string(),
                day: day.date(),
                error: source.to_string(),
            },
        );
        RejectionReason::PersistenceFailure { source }
    }

    fn rejected(
        &self,
        requester: &Requester,
        room: &str,
        day: Day,
        reason: RejectionReason,
    ) -> RejectionReason {
        info!(
            requester_id = %requester.id,
            room = %room,
            %day,
            code = reason.code(),
            "Reservation request rejected: {reason}"
        );
        self.publish(
            requester,
            ReservationEvent::Rejected {
                room: room.to_string(),
                day: day.date(),
                reason: reason.to_string(),
            },
        );
        reason
    }

    fn publish(&self, requester: &Requester, payload: ReservationEvent) {
        // No subscribers is fine.
        let _ = self
            .events
            .send(DomainEvent::new(Some(requester.id.clone()), payload));
    }
}

#[cfg(test)]
mod tests {
    use roombook_core::config::AppConfig;
    use roombook_realtime::notification::log::LogNotifier;
    use roombook_realtime::store::memory::MemoryDocumentStore;

    use super::*;

    const COLLECTION: &str = "reservas-pendientes";

    struct Fixture {
        coordinator: ReservationCoordinator,
        mirror: Arc<RwLock<SnapshotMirror>>,
        store: Arc<MemoryDocumentStore>,
    }

    fn fixture(holidays: HolidayCalendar) -> Fixture {
        let config = AppConfig::default();
        let catalog = Arc::new(SlotCatalog::from_config(&config.catalog).unwrap());
        let mirror = Arc::new(RwLock::new(SnapshotMirror::new(3)));
        let store = Arc::new(MemoryDocumentStore::new(16));
        let dispatcher = NotificationDispatcher::new(
            Arc::new(LogNotifier::new()),
            config.notifications.clone(),
        );
        let (events, _) = broadcast::channel(16);
        let coordinator = ReservationCoordinator::new(
            catalog,
            Arc::new(holidays),
            Arc::clone(&mirror),
            store.clone(),
            COLLECTION,
            dispatcher,
            events,
        );
        Fixture {
            coordinator,
            mirror,
            store,
        }
    }

    fn tuesday() -> Day {
        Day::from_ymd(2025, 1, 14).unwrap()
    }

    fn request(room: &str, slots: &[&str], participants: &[&str]) -> SubmitRequest {
        SubmitRequest {
            room: room.to_string(),
            day: tuesday(),
            slots: slots.iter().map(|s| Slot::from(*s)).collect(),
            requester: Requester::new("uid-1", "Marta", "marta@example.org"),
            participants: participants.iter().map(|p| p.to_string()).collect(),
        }
    }

    #[tokio::test]
    async fn test_blank_participants_rejected_first() {
        let fx = fixture(HolidayCalendar::new([tuesday()]));
        let err = fx
            .coordinator
            .submit(request("Espectacle", &["11:20 - 12:20"], &["", "   "]))
            .await
            .unwrap_err();
        assert!(matches!(err, RejectionReason::EmptyParticipantList));
    }

    #[tokio::test]
    async fn test_no_slots_rejected() {
        let fx = fixture(HolidayCalendar::default());
        let err = fx
            .coordinator
            .submit(request("Espectacle", &[], &["Ana"]))
            .await
            .unwrap_err();
        assert!(matches!(err, RejectionReason::NoSlotsSelected));
    }

    #[tokio::test]
    async fn test_holiday_blocks_free_slot() {
        let fx = fixture(HolidayCalendar::new([tuesday()]));
        let err = fx
            .coordinator
            .submit(request("Espectacle", &["11:20 - 12:20"], &["Ana"]))
            .await
            .unwrap_err();
        assert!(matches!(err, RejectionReason::HolidayBlocked { .. }));
        assert_eq!(fx.store.documents(COLLECTION).len(), 0);
    }

    #[tokio::test]
    async fn test_weekend_rejected_before_slot_checks() {
        let fx = fixture(HolidayCalendar::default());
        let saturday = Day::from_ymd(2025, 1, 18).unwrap();
        let mut req = request("A24", &["8:00 - 9:00"], &["Ana"]);
        req.day = saturday;

        let err = fx.coordinator.submit(req).await.unwrap_err();
        assert!(matches!(err, RejectionReason::WeekendBlocked { day } if day == saturday));
        assert!(fx.store.documents(COLLECTION).is_empty());
        assert_eq!(fx.mirror.read().await.pending_patches(), 0);
    }

    #[tokio::test]
    async fn test_not_offered_names_first_offending_slot() {
        let fx = fixture(HolidayCalendar::default());
        let err = fx
            .coordinator
            .submit(request("A24", &["12:20 - 13:15", "8:00 - 9:00", "11:20 - 12:20"], &["Ana"]))
            .await
            .unwrap_err();
        match err {
            RejectionReason::SlotConflict { slot, conflict } => {
                assert_eq!(slot, Slot::from("11:20 - 12:20"));
                assert_eq!(conflict, ConflictKind::NotOffered);
            }
            other => panic!("unexpected rejection: {other:?}"),
        }
        assert_eq!(fx.mirror.read().await.pending_patches(), 0);
    }

    #[tokio::test]
    async fn test_success_persists_one_document_per_slot() {
        let fx = fixture(HolidayCalendar::default());
        let batch = fx
            .coordinator
            .submit(request("A24", &["9:00 - 9:55", "8:00 - 9:00", "8:00 - 9:00"], &[" Ana "]))
            .await
            .unwrap();

        assert_eq!(batch.reservations.len(), 2);
        assert_eq!(batch.reservations[0].slot, Slot::from("8:00 - 9:00"));
        assert_eq!(batch.reservations[0].participants, vec!["Ana".to_string()]);
        assert_eq!(batch.document_ids().len(), 2);
        assert_eq!(fx.store.documents(COLLECTION).len(), 2);

        let mirror = fx.mirror.read().await;
        assert!(mirror.current().is_reserved("A24", tuesday(), &Slot::from("9:00 - 9:55")));
    }

    #[tokio::test]
    async fn test_second_submission_sees_optimistic_patch() {
        let fx = fixture(HolidayCalendar::default());
        fx.coordinator
            .submit(request("Espectacle", &["11:20 - 12:20"], &["Ana"]))
            .await
            .unwrap();
        let err = fx
            .coordinator
            .submit(request("Espectacle", &["11:20 - 12:20"], &["Luis"]))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            RejectionReason::SlotConflict {
                conflict: ConflictKind::AlreadyReserved,
                ..
            }
        ));
        assert_eq!(fx.store.documents(COLLECTION).len(), 1);
    }
}
