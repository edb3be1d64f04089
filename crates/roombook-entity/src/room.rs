//! Rooms and their eligibility predicates.

use serde::{Deserialize, Serialize};

use roombook_core::config::catalog::{Eligibility, RoomConfig};

use crate::day::Day;
use crate::slot::Slot;

/// A bookable room and the fixed rule saying when it can be booked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomRule {
    /// Room name.
    pub name: String,
    /// Calendar-shape constraint.
    pub rule: Eligibility,
}

impl RoomRule {
    /// Create a room rule.
    pub fn new(name: impl Into<String>, rule: Eligibility) -> Self {
        Self {
            name: name.into(),
            rule,
        }
    }

    /// Whether the room may ever be booked for `slot` on `day`,
    /// ignoring existing reservations.
    pub fn eligible(&self, day: Day, slot: &Slot) -> bool {
        self.rule.allows(day.weekday(), slot.label())
    }
}

impl From<&RoomConfig> for RoomRule {
    fn from(config: &RoomConfig) -> Self {
        Self::new(config.name.clone(), config.rule.clone())
    }
}
