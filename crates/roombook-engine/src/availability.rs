//! Room availability per day and slot.

use std::collections::BTreeSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use roombook_core::types::id::RequesterId;
use roombook_entity::day::{Day, DayInfo};
use roombook_entity::slot::Slot;

use crate::catalog::SlotCatalog;
use crate::snapshot::ReservationSnapshot;

/// What a requester sees for one slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SlotAvailability {
    /// No room is ever offered in this slot on this day.
    Invalid,
    /// Rooms are offered, but every one of them is already reserved.
    Unavailable,
    /// These rooms can be booked.
    Bookable {
        /// Names of the bookable rooms.
        rooms: BTreeSet<String>,
    },
}

/// One row of the day view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotView {
    /// The slot.
    pub slot: Slot,
    /// Its classification.
    pub availability: SlotAvailability,
    /// Whether the viewing requester holds a live reservation in this slot.
    pub reserved_by_requester: bool,
}

/// Availability of a whole day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DayAvailability {
    /// Holidays accept no reservation at all.
    Holiday {
        /// The day.
        day: DayInfo,
    },
    /// Per-slot rows in schedule order.
    Slots {
        /// The day.
        day: DayInfo,
        /// One row per catalog slot.
        slots: Vec<SlotView>,
    },
}

/// Computes bookable rooms from the catalog and a reservation snapshot.
///
/// Pure: no I/O, and identical inputs give identical results.
#[derive(Debug, Clone)]
pub struct AvailabilityResolver {
    catalog: Arc<SlotCatalog>,
}

impl AvailabilityResolver {
    /// Create a resolver over a catalog.
    pub fn new(catalog: Arc<SlotCatalog>) -> Self {
        Self { catalog }
    }

    /// Rooms that are eligible for `slot` on `day` and not reserved in
    /// `snapshot`.
    pub fn available_rooms(
        &self,
        day: Day,
        slot: &Slot,
        snapshot: &ReservationSnapshot,
    ) -> BTreeSet<String> {
        self.catalog
            .eligible_rooms(day, slot)
            .filter(|room| !snapshot.is_reserved(&room.name, day, slot))
            .map(|room| room.name.clone())
            .collect()
    }

    /// Classify a slot as invalid, unavailable or bookable.
    pub fn classify(&self, day: Day, slot: &Slot, snapshot: &ReservationSnapshot) -> SlotAvailability {
        if self.catalog.eligible_rooms(day, slot).next().is_none() {
            return SlotAvailability::Invalid;
        }
        let rooms = self.available_rooms(day, slot, snapshot);
        if rooms.is_empty() {
            SlotAvailability::Unavailable
        } else {
            SlotAvailability::Bookable { rooms }
        }
    }

    /// Every slot of a day, classified. Holidays short-circuit.
    pub fn day_view(
        &self,
        day: &DayInfo,
        snapshot: &ReservationSnapshot,
        requester: Option<&RequesterId>,
    ) -> DayAvailability {
        if day.is_holiday {
            return DayAvailability::Holiday { day: day.clone() };
        }

        let slots = self
            .catalog
            .slots()
            .iter()
            .map(|slot| SlotView {
                slot: slot.clone(),
                availability: self.classify(day.day, slot, snapshot),
                reserved_by_requester: requester.is_some_and(|id| {
                    snapshot
                        .iter()
                        .any(|r| &r.requester_id == id && r.day == day.day && &r.slot == slot)
                }),
            })
            .collect();

        DayAvailability::Slots {
            day: day.clone(),
            slots,
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use roombook_core::config::catalog::CatalogConfig;
    use roombook_entity::day::HolidayCalendar;
    use roombook_entity::requester::Requester;
    use roombook_entity::reservation::Reservation;

    use super::*;

    fn resolver() -> AvailabilityResolver {
        let catalog = SlotCatalog::from_config(&CatalogConfig::default()).unwrap();
        AvailabilityResolver::new(Arc::new(catalog))
    }

    fn tuesday() -> Day {
        Day::from_ymd(2025, 1, 14).unwrap()
    }

    fn booked(room: &str, day: Day, slot: &str, requester: &str) -> Reservation {
        Reservation::pending(
            room,
            day,
            Slot::from(slot),
            &Requester::new(requester, "Someone", "someone@example.org"),
            vec!["Alumno".to_string()],
            Utc::now(),
        )
        .unwrap()
    }

    #[test]
    fn test_offered_rooms_are_always_eligible() {
        let resolver = resolver();
        let catalog = SlotCatalog::from_config(&CatalogConfig::default()).unwrap();
        let empty = ReservationSnapshot::default();
        for offset in 0..7 {
            let day = Day::from_ymd(2025, 1, 13 + offset).unwrap();
            for slot in catalog.slots() {
                for room in resolver.available_rooms(day, slot, &empty) {
                    assert!(catalog.is_eligible(&room, day, slot));
                }
            }
        }
    }

    #[test]
    fn test_idempotent() {
        let resolver = resolver();
        let snapshot =
            ReservationSnapshot::new(vec![booked("A24", tuesday(), "8:00 - 9:00", "u1")]);
        let slot = Slot::from("8:00 - 9:00");
        let first = resolver.available_rooms(tuesday(), &slot, &snapshot);
        let second = resolver.available_rooms(tuesday(), &slot, &snapshot);
        assert_eq!(first, second);
        assert_eq!(first, BTreeSet::from(["Espectacle".to_string()]));
    }

    #[test]
    fn test_invalid_versus_unavailable() {
        let resolver = resolver();
        let thursday = Day::from_ymd(2025, 1, 16).unwrap();
        let midday = Slot::from("11:20 - 12:20");
        let empty = ReservationSnapshot::default();
        assert_eq!(
            resolver.classify(thursday, &midday, &empty),
            SlotAvailability::Invalid
        );

        let snapshot =
            ReservationSnapshot::new(vec![booked("Espectacle", tuesday(), "11:20 - 12:20", "u1")]);
        assert_eq!(
            resolver.classify(tuesday(), &midday, &snapshot),
            SlotAvailability::Unavailable
        );
    }

    #[test]
    fn test_day_view_marks_own_reservations() {
        let resolver = resolver();
        let snapshot =
            ReservationSnapshot::new(vec![booked("A24", tuesday(), "8:00 - 9:00", "me")]);
        let info = DayInfo::new(tuesday(), &HolidayCalendar::default());
        let me = RequesterId::new("me");

        let DayAvailability::Slots { slots, .. } = resolver.day_view(&info, &snapshot, Some(&me))
        else {
            panic!("expected slot rows");
        };
        assert_eq!(slots.len(), 12);
        assert!(slots[0].reserved_by_requester);
        assert!(!slots[1].reserved_by_requester);
        assert_eq!(
            slots[0].availability,
            SlotAvailability::Bookable {
                rooms: BTreeSet::from(["Espectacle".to_string()])
            }
        );
    }

    #[test]
    fn test_day_view_holiday() {
        let resolver = resolver();
        let holidays = HolidayCalendar::new([tuesday()]);
        let info = DayInfo::new(tuesday(), &holidays);
        let view = resolver.day_view(&info, &ReservationSnapshot::default(), None);
        assert!(matches!(view, DayAvailability::Holiday { .. }));
    }
}
