//! Domain events emitted by the booking engine.
//!
//! Events are published on an in-process broadcast bus and consumed by
//! the CLI, logs and tests. They are informational: nothing in the engine
//! depends on an event being received.

pub mod reservation;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use reservation::ReservationEvent;

use crate::types::id::{EventId, RequesterId};

/// Wrapper for all domain events with metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomainEvent {
    /// Unique event ID.
    pub id: EventId,
    /// When the event occurred.
    pub timestamp: DateTime<Utc>,
    /// The requester or reviewer who caused the event (if known).
    pub actor_id: Option<RequesterId>,
    /// The event payload.
    pub payload: ReservationEvent,
}

impl DomainEvent {
    /// Create a new domain event.
    pub fn new(actor_id: Option<RequesterId>, payload: ReservationEvent) -> Self {
        Self {
            id: EventId::new(),
            timestamp: Utc::now(),
            actor_id,
            payload,
        }
    }
}
