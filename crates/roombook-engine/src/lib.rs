//! # roombook-engine
//!
//! Availability and reservation engine for Roombook. Provides:
//!
//! - Booking-week generation with a configurable weekend policy
//! - The static slot catalog and per-room eligibility rules
//! - Per-slot room availability over the latest reservation snapshot
//! - Submission validation with an optimistic local patch and rollback
//! - Reviewer accept/reject actions
//!
//! The engine talks to the outside world only through the
//! [`DocumentStore`](roombook_core::traits::DocumentStore) and
//! [`Notifier`](roombook_core::traits::Notifier) capabilities.

pub mod availability;
pub mod calendar;
pub mod catalog;
pub mod coordinator;
pub mod engine;
pub mod notify;
pub mod rejection;
pub mod review;
pub mod snapshot;

pub use availability::{AvailabilityResolver, DayAvailability, SlotAvailability, SlotView};
pub use calendar::CalendarGenerator;
pub use catalog::SlotCatalog;
pub use coordinator::{ReservationBatch, ReservationCoordinator, SubmitRequest};
pub use engine::BookingEngine;
pub use rejection::{ConflictKind, RejectionReason};
pub use review::ReviewService;
pub use snapshot::{ReservationSnapshot, SnapshotMirror};
