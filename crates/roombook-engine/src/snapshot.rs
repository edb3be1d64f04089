//! The locally mirrored reservation set.
//!
//! [`SnapshotMirror`] holds the last collection snapshot received from the
//! store plus the records this session submitted that the store has not
//! echoed back yet. [`ReservationSnapshot`] is the merged, read-only view
//! availability is computed against.

use std::collections::HashSet;

use tracing::{debug, warn};

use roombook_core::traits::store::StoredDocument;
use roombook_core::types::id::{BatchId, DocumentId};
use roombook_entity::day::Day;
use roombook_entity::reservation::{Reservation, ReservationKey};
use roombook_entity::slot::Slot;

/// An unordered set of live (pending or accepted) reservations.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReservationSnapshot {
    reservations: Vec<Reservation>,
}

impl ReservationSnapshot {
    /// Wrap already decoded reservations.
    pub fn new(reservations: Vec<Reservation>) -> Self {
        Self { reservations }
    }

    /// Decode store documents, skipping the ones that do not decode.
    pub fn from_documents(documents: &[StoredDocument]) -> (Self, usize) {
        let mut skipped = 0;
        let reservations = documents
            .iter()
            .filter_map(|doc| match Reservation::from_document(doc) {
                Ok(reservation) => Some(reservation),
                Err(e) => {
                    skipped += 1;
                    warn!(document_id = %doc.id, error = %e, "Skipping undecodable reservation document");
                    None
                }
            })
            .collect();
        (Self { reservations }, skipped)
    }

    /// Whether some live reservation occupies `room` for `slot` on `day`.
    pub fn is_reserved(&self, room: &str, day: Day, slot: &Slot) -> bool {
        self.reservations.iter().any(|r| r.occupies(room, day, slot))
    }

    /// Iterate over all reservations.
    pub fn iter(&self) -> impl Iterator<Item = &Reservation> {
        self.reservations.iter()
    }

    /// Number of reservations.
    pub fn len(&self) -> usize {
        self.reservations.len()
    }

    /// Whether the snapshot is empty.
    pub fn is_empty(&self) -> bool {
        self.reservations.is_empty()
    }

    /// Find a reservation by store key.
    pub fn get(&self, id: &DocumentId) -> Option<&Reservation> {
        self.reservations.iter().find(|r| r.id.as_ref() == Some(id))
    }
}

/// One optimistic record awaiting its echo.
#[derive(Debug, Clone)]
struct PatchEntry {
    batch_id: BatchId,
    reservation: Reservation,
    unechoed_snapshots: u32,
}

/// Result of applying one store snapshot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ApplyOutcome {
    /// Reservations decoded from the snapshot.
    pub decoded: usize,
    /// Documents that failed to decode.
    pub skipped: usize,
    /// Optimistic records confirmed by this snapshot.
    pub reconciled: usize,
    /// Optimistic records dropped because their echo never arrived.
    pub expired: usize,
}

/// The confirmed snapshot plus the optimistic local patch.
#[derive(Debug)]
pub struct SnapshotMirror {
    confirmed: ReservationSnapshot,
    patches: Vec<PatchEntry>,
    merged: ReservationSnapshot,
    max_unechoed_snapshots: u32,
}

impl SnapshotMirror {
    /// Create an empty mirror.
    pub fn new(max_unechoed_snapshots: u32) -> Self {
        Self {
            confirmed: ReservationSnapshot::default(),
            patches: Vec::new(),
            merged: ReservationSnapshot::default(),
            max_unechoed_snapshots,
        }
    }

    /// The view availability is computed against.
    pub fn current(&self) -> &ReservationSnapshot {
        &self.merged
    }

    /// The last snapshot received from the store, without local patches.
    pub fn confirmed(&self) -> &ReservationSnapshot {
        &self.confirmed
    }

    /// Number of optimistic records not yet echoed.
    pub fn pending_patches(&self) -> usize {
        self.patches.len()
    }

    /// Replace the confirmed set with a new store snapshot and reconcile
    /// the optimistic patch against it.
    pub fn apply_snapshot(&mut self, documents: &[StoredDocument]) -> ApplyOutcome {
        let (confirmed, skipped) = ReservationSnapshot::from_documents(documents);
        let ids: HashSet<&DocumentId> = documents.iter().map(|d| &d.id).collect();

        let mut outcome = ApplyOutcome {
            decoded: confirmed.len(),
            skipped,
            ..ApplyOutcome::default()
        };

        let max = self.max_unechoed_snapshots;
        self.patches.retain_mut(|entry| {
            let Some(id) = entry.reservation.id.as_ref() else {
                // Append still in flight.
                return true;
            };
            if ids.contains(id) {
                outcome.reconciled += 1;
                return false;
            }
            entry.unechoed_snapshots += 1;
            if entry.unechoed_snapshots > max {
                warn!(
                    document_id = %id,
                    batch_id = %entry.batch_id,
                    "Optimistic reservation never echoed, dropping it"
                );
                outcome.expired += 1;
                return false;
            }
            true
        });

        self.confirmed = confirmed;
        self.rebuild();

        debug!(
            decoded = outcome.decoded,
            skipped = outcome.skipped,
            reconciled = outcome.reconciled,
            expired = outcome.expired,
            "Applied reservation snapshot"
        );
        outcome
    }

    /// Add optimistic records for a submission.
    pub fn patch(&mut self, batch_id: BatchId, reservations: Vec<Reservation>) {
        self.patches
            .extend(reservations.into_iter().map(|reservation| PatchEntry {
                batch_id,
                reservation,
                unechoed_snapshots: 0,
            }));
        self.rebuild();
    }

    /// Record the store key assigned to one optimistic record.
    pub fn assign_id(&mut self, batch_id: BatchId, key: &ReservationKey, id: DocumentId) {
        let already_echoed = self.confirmed.get(&id).is_some();
        if already_echoed {
            self.patches
                .retain(|e| !(e.batch_id == batch_id && &e.reservation.key() == key));
        } else if let Some(entry) = self
            .patches
            .iter_mut()
            .find(|e| e.batch_id == batch_id && &e.reservation.key() == key)
        {
            entry.reservation.id = Some(id);
        }
        self.rebuild();
    }

    /// Remove every optimistic record of a submission. Returns how many
    /// were removed.
    pub fn rollback(&mut self, batch_id: BatchId) -> usize {
        let before = self.patches.len();
        self.patches.retain(|e| e.batch_id != batch_id);
        let removed = before - self.patches.len();
        self.rebuild();
        removed
    }

    fn rebuild(&mut self) {
        let mut merged = self.confirmed.reservations.clone();
        merged.extend(
            self.patches
                .iter()
                .filter(|e| {
                    e.reservation
                        .id
                        .as_ref()
                        .is_none_or(|id| self.confirmed.get(id).is_none())
                })
                .map(|e| e.reservation.clone()),
        );
        self.merged = ReservationSnapshot::new(merged);
    }
}
