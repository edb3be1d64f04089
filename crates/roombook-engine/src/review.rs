//! Reviewer actions on pending reservations.

use std::sync::Arc;

use chrono::NaiveTime;

use tokio::sync::{RwLock, broadcast};
use tracing::info;

use roombook_core::error::AppError;
use roombook_core::events::{DomainEvent, ReservationEvent};
use roombook_core::result::AppResult;
use roombook_core::traits::store::DocumentStore;
use roombook_core::types::id::{DocumentId, RequesterId};
use roombook_entity::reservation::{Reservation, ReservationStatus};

use crate::snapshot::SnapshotMirror;

/// Lists pending requests and applies reviewer decisions.
///
/// Decisions are written to the store only. The local mirror picks them
/// up from the next snapshot like any other change.
#[derive(Debug, Clone)]
pub struct ReviewService {
    mirror: Arc<RwLock<SnapshotMirror>>,
    store: Arc<dyn DocumentStore>,
    pending_collection: String,
    accepted_collection: String,
    events: broadcast::Sender<DomainEvent>,
}

impl ReviewService {
    /// Create a review service.
    pub fn new(
        mirror: Arc<RwLock<SnapshotMirror>>,
        store: Arc<dyn DocumentStore>,
        pending_collection: impl Into<String>,
        accepted_collection: impl Into<String>,
        events: broadcast::Sender<DomainEvent>,
    ) -> Self {
        Self {
            mirror,
            store,
            pending_collection: pending_collection.into(),
            accepted_collection: accepted_collection.into(),
            events,
        }
    }

    /// Confirmed reservations still awaiting a decision, most recent day
    /// first.
    pub async fn pending(&self) -> Vec<Reservation> {
        let mirror = self.mirror.read().await;
        let mut pending: Vec<Reservation> = mirror
            .confirmed()
            .iter()
            .filter(|r| r.status.is_pending())
            .cloned()
            .collect();
        pending.sort_by(|a, b| {
            b.day
                .cmp(&a.day)
                .then_with(|| starts_at(a).cmp(&starts_at(b)))
                .then_with(|| a.room.cmp(&b.room))
        });
        pending
    }

    /// Accept a pending reservation.
    ///
    /// The record is copied into the accepted collection under its own
    /// key and then marked accepted in place, so it keeps blocking its
    /// slot. Retrying after a failed mark overwrites the earlier copy.
    pub async fn accept(&self, id: &DocumentId, reviewer: &RequesterId) -> AppResult<Reservation> {
        let mut reservation = self.find(id).await?;
        if reservation.status == ReservationStatus::Accepted {
            return Err(AppError::conflict(format!(
                "Reservation '{id}' is already accepted"
            )));
        }

        reservation.status = ReservationStatus::Accepted;
        self.store
            .put(&self.accepted_collection, id, reservation.to_document()?)
            .await?;
        self.store.mark_accepted(&self.pending_collection, id).await?;

        info!(document_id = %id, reviewer_id = %reviewer, room = %reservation.room, day = %reservation.day, "Reservation accepted");
        self.publish(
            reviewer,
            ReservationEvent::Accepted {
                document_id: id.clone(),
            },
        );
        Ok(reservation)
    }

    /// Reject a pending reservation by removing it.
    pub async fn reject(&self, id: &DocumentId, reviewer: &RequesterId) -> AppResult<Reservation> {
        let reservation = self.find(id).await?;
        if reservation.status == ReservationStatus::Accepted {
            return Err(AppError::conflict(format!(
                "Reservation '{id}' was already accepted"
            )));
        }

        self.store.remove(&self.pending_collection, id).await?;

        info!(document_id = %id, reviewer_id = %reviewer, room = %reservation.room, day = %reservation.day, "Reservation rejected");
        self.publish(
            reviewer,
            ReservationEvent::Removed {
                document_id: id.clone(),
            },
        );
        Ok(reservation)
    }

    /// Number of accepted reservations held by a requester.
    pub async fn accepted_count(&self, requester: &RequesterId) -> usize {
        self.mirror
            .read()
            .await
            .confirmed()
            .iter()
            .filter(|r| &r.requester_id == requester && r.status == ReservationStatus::Accepted)
            .count()
    }

    async fn find(&self, id: &DocumentId) -> AppResult<Reservation> {
        self.mirror
            .read()
            .await
            .confirmed()
            .get(id)
            .cloned()
            .ok_or_else(|| AppError::not_found(format!("Reservation '{id}' not found")))
    }

    fn publish(&self, reviewer: &RequesterId, payload: ReservationEvent) {
        let _ = self
            .events
            .send(DomainEvent::new(Some(reviewer.clone()), payload));
    }
}

/// Start time of a record, read from the slot label when the stored
/// document has none.
fn starts_at(reservation: &Reservation) -> Option<NaiveTime> {
    reservation
        .start
        .map(|start| start.time())
        .or_else(|| reservation.slot.bounds().ok().map(|(start, _)| start))
}
