//! Reservation lifecycle events.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::types::id::{BatchId, DocumentId};

/// Events related to reservation requests and reviews.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ReservationEvent {
    /// A submission passed validation and every record was persisted.
    Submitted {
        /// The submission batch.
        batch_id: BatchId,
        /// Room name.
        room: String,
        /// Booked day.
        day: NaiveDate,
        /// Booked slot labels in catalog order.
        slots: Vec<String>,
        /// Store keys of the created documents.
        documents: Vec<DocumentId>,
    },
    /// A submission failed validation.
    Rejected {
        /// Room name.
        room: String,
        /// Requested day.
        day: NaiveDate,
        /// Human-readable rejection reason.
        reason: String,
    },
    /// The store refused a write and the optimistic records were rolled back.
    PersistenceFailed {
        /// The submission batch.
        batch_id: BatchId,
        /// Room name.
        room: String,
        /// Requested day.
        day: NaiveDate,
        /// Error reported by the store.
        error: String,
    },
    /// A reviewer accepted a pending reservation.
    Accepted {
        /// Store key of the reservation.
        document_id: DocumentId,
    },
    /// A reviewer rejected (removed) a pending reservation.
    Removed {
        /// Store key of the reservation.
        document_id: DocumentId,
    },
}
