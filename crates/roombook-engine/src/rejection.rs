//! Reasons a submission is refused.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use roombook_core::error::{AppError, ErrorKind};
use roombook_entity::day::Day;
use roombook_entity::slot::Slot;

/// Why a requested slot cannot be given to the requested room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictKind {
    /// The room's rule never admits this slot on this day (or the slot
    /// or room is unknown).
    NotOffered,
    /// The room is eligible but a live reservation already holds it.
    AlreadyReserved,
}

impl fmt::Display for ConflictKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotOffered => f.write_str("not offered for this room"),
            Self::AlreadyReserved => f.write_str("already reserved"),
        }
    }
}

/// A refused submission.
///
/// Everything except [`RejectionReason::PersistenceFailure`] is a
/// user-correctable validation result; retrying unchanged will fail again.
#[derive(Debug, Error)]
pub enum RejectionReason {
    /// No participant name remained after trimming.
    #[error("At least one participant name is required")]
    EmptyParticipantList,
    /// The request named no slot.
    #[error("At least one slot must be selected")]
    NoSlotsSelected,
    /// The day is in the holiday table.
    #[error("{day} is a holiday, no reservations can be made")]
    HolidayBlocked {
        /// The requested day.
        day: Day,
    },
    /// The day falls on a Saturday or Sunday.
    #[error("{day} is a weekend, no reservations can be made")]
    WeekendBlocked {
        /// The requested day.
        day: Day,
    },
    /// One of the requested slots is not available for the room.
    #[error("Slot '{slot}' is {conflict}")]
    SlotConflict {
        /// The first offending slot in schedule order.
        slot: Slot,
        /// Why it is unavailable.
        conflict: ConflictKind,
    },
    /// The store refused the write; the optimistic records were rolled back.
    #[error("The reservation could not be stored: {source}")]
    PersistenceFailure {
        /// Error reported by the store.
        #[source]
        source: AppError,
    },
}

impl RejectionReason {
    /// Whether the same submission may succeed if retried later.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::PersistenceFailure { .. })
    }

    /// Short machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::EmptyParticipantList => "empty_participant_list",
            Self::NoSlotsSelected => "no_slots_selected",
            Self::HolidayBlocked { .. } => "holiday_blocked",
            Self::WeekendBlocked { .. } => "weekend_blocked",
            Self::SlotConflict { .. } => "slot_conflict",
            Self::PersistenceFailure { .. } => "persistence_failure",
        }
    }
}

impl From<RejectionReason> for AppError {
    fn from(reason: RejectionReason) -> Self {
        let message = reason.to_string();
        match reason {
            RejectionReason::EmptyParticipantList
            | RejectionReason::NoSlotsSelected
            | RejectionReason::HolidayBlocked { .. }
            | RejectionReason::WeekendBlocked { .. } => AppError::validation(message),
            RejectionReason::SlotConflict { .. } => AppError::conflict(message),
            RejectionReason::PersistenceFailure { source } => {
                AppError::with_source(ErrorKind::Storage, message, source)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_persistence_is_retryable() {
        assert!(!RejectionReason::EmptyParticipantList.is_retryable());
        assert!(
            RejectionReason::PersistenceFailure {
                source: AppError::storage("offline")
            }
            .is_retryable()
        );
    }

    #[test]
    fn test_conversion_kinds() {
        let conflict = RejectionReason::SlotConflict {
            slot: Slot::from("8:00 - 9:00"),
            conflict: ConflictKind::AlreadyReserved,
        };
        let err = AppError::from(conflict);
        assert_eq!(err.kind, ErrorKind::Conflict);
        assert_eq!(err.message, "Slot '8:00 - 9:00' is already reserved");

        let holiday = RejectionReason::HolidayBlocked {
            day: Day::from_ymd(2025, 5, 1).unwrap(),
        };
        assert_eq!(AppError::from(holiday).kind, ErrorKind::Validation);

        let weekend = RejectionReason::WeekendBlocked {
            day: Day::from_ymd(2025, 1, 18).unwrap(),
        };
        assert_eq!(weekend.code(), "weekend_blocked");
        assert_eq!(AppError::from(weekend).kind, ErrorKind::Validation);

        let storage = AppError::from(RejectionReason::PersistenceFailure {
            source: AppError::storage("offline"),
        });
        assert!(storage.is_retryable());
    }
}
