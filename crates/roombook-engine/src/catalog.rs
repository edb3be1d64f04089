//! The static slot catalog and room rules.

use std::collections::HashMap;

use roombook_core::config::catalog::CatalogConfig;
use roombook_core::error::AppError;
use roombook_entity::day::Day;
use roombook_entity::room::RoomRule;
use roombook_entity::slot::Slot;

/// Ordered slots plus the rooms that can be booked in them.
///
/// Loaded once from configuration and never mutated afterwards.
#[derive(Debug, Clone)]
pub struct SlotCatalog {
    slots: Vec<Slot>,
    positions: HashMap<Slot, usize>,
    rooms: Vec<RoomRule>,
}

impl SlotCatalog {
    /// Build a catalog from explicit slots and rooms.
    pub fn new(slots: Vec<Slot>, rooms: Vec<RoomRule>) -> Result<Self, AppError> {
        let mut positions = HashMap::with_capacity(slots.len());
        for (index, slot) in slots.iter().enumerate() {
            slot.bounds()?;
            if positions.insert(slot.clone(), index).is_some() {
                return Err(AppError::configuration(format!("Duplicate slot '{slot}'")));
            }
        }
        Ok(Self {
            slots,
            positions,
            rooms,
        })
    }

    /// Build a catalog from the configured tables.
    pub fn from_config(config: &CatalogConfig) -> Result<Self, AppError> {
        Self::new(
            config.slots.iter().map(|s| Slot::new(s.as_str())).collect(),
            config.rooms.iter().map(RoomRule::from).collect(),
        )
    }

    /// All slots in schedule order.
    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    /// All rooms in configuration order.
    pub fn rooms(&self) -> &[RoomRule] {
        &self.rooms
    }

    /// Look up a room by name.
    pub fn room(&self, name: &str) -> Option<&RoomRule> {
        self.rooms.iter().find(|r| r.name == name)
    }

    /// Position of a slot in the schedule.
    pub fn position(&self, slot: &Slot) -> Option<usize> {
        self.positions.get(slot).copied()
    }

    /// Whether the slot belongs to the schedule.
    pub fn contains(&self, slot: &Slot) -> bool {
        self.positions.contains_key(slot)
    }

    /// Rooms whose rule admits `slot` on `day`. Empty for unknown slots.
    pub fn eligible_rooms<'a>(
        &'a self,
        day: Day,
        slot: &'a Slot,
    ) -> impl Iterator<Item = &'a RoomRule> + 'a {
        let known = self.contains(slot);
        self.rooms
            .iter()
            .filter(move |room| known && room.eligible(day, slot))
    }

    /// Whether `room` may ever be booked for `slot` on `day`.
    pub fn is_eligible(&self, room: &str, day: Day, slot: &Slot) -> bool {
        self.contains(slot) && self.room(room).is_some_and(|r| r.eligible(day, slot))
    }

    /// Deduplicate a selection and sort it in schedule order.
    /// Unknown slots keep their relative order after the known ones.
    pub fn normalize_selection(&self, selection: Vec<Slot>) -> Vec<Slot> {
        let mut unique: Vec<Slot> = Vec::with_capacity(selection.len());
        for slot in selection {
            if !unique.contains(&slot) {
                unique.push(slot);
            }
        }
        unique.sort_by_key(|slot| self.position(slot).unwrap_or(usize::MAX));
        unique
    }
}

#[cfg(test)]
mod tests {
    use roombook_core::config::catalog::CatalogConfig;

    use super::*;

    fn catalog() -> SlotCatalog {
        SlotCatalog::from_config(&CatalogConfig::default()).unwrap()
    }

    #[test]
    fn test_default_catalog() {
        let catalog = catalog();
        assert_eq!(catalog.slots().len(), 12);
        assert_eq!(catalog.rooms().len(), 3);
        assert_eq!(catalog.position(&Slot::from("8:00 - 9:00")), Some(0));
        assert_eq!(catalog.position(&Slot::from("20:15 - 21:10")), Some(11));
    }

    #[test]
    fn test_duplicate_slot_rejected() {
        let slots = vec![Slot::from("8:00 - 9:00"), Slot::from("8:00 - 9:00")];
        assert!(SlotCatalog::new(slots, Vec::new()).is_err());
    }

    #[test]
    fn test_normalize_selection() {
        let catalog = catalog();
        let normalized = catalog.normalize_selection(vec![
            Slot::from("12:20 - 13:15"),
            Slot::from("7:00 - 7:30"),
            Slot::from("8:00 - 9:00"),
            Slot::from("12:20 - 13:15"),
        ]);
        assert_eq!(
            normalized,
            vec![
                Slot::from("8:00 - 9:00"),
                Slot::from("12:20 - 13:15"),
                Slot::from("7:00 - 7:30"),
            ]
        );
    }

    #[test]
    fn test_unknown_slot_has_no_eligible_rooms() {
        let catalog = catalog();
        let tuesday = Day::from_ymd(2025, 1, 14).unwrap();
        let unknown = Slot::from("7:00 - 7:30");
        assert_eq!(catalog.eligible_rooms(tuesday, &unknown).count(), 0);
        assert!(!catalog.is_eligible("A24", tuesday, &unknown));
    }

    #[test]
    fn test_eligible_rooms_tuesday_midday() {
        let catalog = catalog();
        let tuesday = Day::from_ymd(2025, 1, 14).unwrap();
        let slot = Slot::from("11:20 - 12:20");
        let names: Vec<&str> = catalog
            .eligible_rooms(tuesday, &slot)
            .map(|r| r.name.as_str())
            .collect();
        assert_eq!(names, vec!["Espectacle"]);
    }
}
