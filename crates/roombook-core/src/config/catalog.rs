//! Slot catalog and room eligibility configuration.

use chrono::{NaiveTime, Weekday};
use serde::{Deserialize, Serialize};

/// Static slot and room tables.
///
/// Slots are listed in display order; the order is used to sort
/// multi-slot selections.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Ordered hour ranges, e.g. `"8:00 - 9:00"`.
    #[serde(default = "default_slots")]
    pub slots: Vec<String>,
    /// Bookable rooms with their fixed eligibility rules.
    #[serde(default = "default_rooms")]
    pub rooms: Vec<RoomConfig>,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            slots: default_slots(),
            rooms: default_rooms(),
        }
    }
}

/// One bookable room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomConfig {
    /// Display name; also the `location` field of stored reservations.
    pub name: String,
    /// When the room may ever be booked.
    #[serde(default)]
    pub rule: Eligibility,
}

/// A boolean combination of calendar-shape constraints.
///
/// Rules are evaluated against the weekday of the requested day and the
/// slot label. They never look at existing reservations.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Eligibility {
    /// Bookable on every day and slot.
    #[default]
    Always,
    /// Bookable only on the listed weekdays.
    Weekdays {
        /// Allowed weekdays.
        days: Vec<Weekday>,
    },
    /// Not bookable during `slots` on any of `days`.
    ExceptSlotsOn {
        /// Weekdays the restriction applies to.
        days: Vec<Weekday>,
        /// Slot labels blocked on those weekdays.
        slots: Vec<String>,
    },
    /// Every nested rule must hold.
    All {
        /// Nested rules.
        rules: Vec<Eligibility>,
    },
    /// At least one nested rule must hold.
    Any {
        /// Nested rules.
        rules: Vec<Eligibility>,
    },
    /// The nested rule must not hold.
    Not {
        /// Negated rule.
        rule: Box<Eligibility>,
    },
}

impl Eligibility {
    /// Evaluate the rule for a weekday and slot label.
    pub fn allows(&self, weekday: Weekday, slot: &str) -> bool {
        match self {
            Self::Always => true,
            Self::Weekdays { days } => days.contains(&weekday),
            Self::ExceptSlotsOn { days, slots } => {
                !(days.contains(&weekday) && slots.iter().any(|s| s == slot))
            }
            Self::All { rules } => rules.iter().all(|r| r.allows(weekday, slot)),
            Self::Any { rules } => rules.iter().any(|r| r.allows(weekday, slot)),
            Self::Not { rule } => !rule.allows(weekday, slot),
        }
    }

    /// Slot labels referenced anywhere in the rule tree.
    pub fn referenced_slots(&self) -> Vec<&str> {
        match self {
            Self::Always | Self::Weekdays { .. } => Vec::new(),
            Self::ExceptSlotsOn { slots, .. } => slots.iter().map(String::as_str).collect(),
            Self::All { rules } | Self::Any { rules } => {
                rules.iter().flat_map(Eligibility::referenced_slots).collect()
            }
            Self::Not { rule } => rule.referenced_slots(),
        }
    }
}

/// Parse a slot label such as `"11:20 - 12:20"` into its clock bounds.
///
/// Returns `None` when the label is malformed or the range is empty.
pub fn parse_slot_range(label: &str) -> Option<(NaiveTime, NaiveTime)> {
    let (start, end) = label.split_once('-')?;
    let start = NaiveTime::parse_from_str(start.trim(), "%H:%M").ok()?;
    let end = NaiveTime::parse_from_str(end.trim(), "%H:%M").ok()?;
    (start < end).then_some((start, end))
}

fn default_slots() -> Vec<String> {
    [
        "8:00 - 9:00",
        "9:00 - 9:55",
        "9:55 - 10:50",
        "11:20 - 12:20",
        "12:20 - 13:15",
        "13:15 - 14:10",
        "15:00 - 16:00",
        "16:00 - 16:55",
        "16:55 - 17:50",
        "18:20 - 19:20",
        "19:20 - 20:15",
        "20:15 - 21:10",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

fn default_rooms() -> Vec<RoomConfig> {
    vec![
        RoomConfig {
            name: "Aula Podcast".to_string(),
            rule: Eligibility::Weekdays {
                days: vec![Weekday::Wed, Weekday::Fri],
            },
        },
        RoomConfig {
            name: "Espectacle".to_string(),
            rule: Eligibility::Weekdays {
                days: vec![Weekday::Tue],
            },
        },
        RoomConfig {
            name: "A24".to_string(),
            rule: Eligibility::ExceptSlotsOn {
                days: vec![Weekday::Tue, Weekday::Thu],
                slots: vec![
                    "11:20 - 12:20".to_string(),
                    "12:20 - 13:15".to_string(),
                    "13:15 - 14:10".to_string(),
                ],
            },
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_slot_range() {
        let (start, end) = parse_slot_range("8:00 - 9:00").expect("valid label");
        assert_eq!(start, NaiveTime::from_hms_opt(8, 0, 0).unwrap());
        assert_eq!(end, NaiveTime::from_hms_opt(9, 0, 0).unwrap());
        assert!(parse_slot_range("9:00 - 8:00").is_none());
        assert!(parse_slot_range("morning").is_none());
    }

    #[test]
    fn test_default_slots_parse() {
        for slot in default_slots() {
            assert!(parse_slot_range(&slot).is_some(), "{slot} should parse");
        }
    }

    #[test]
    fn test_except_slots_on() {
        let rule = &default_rooms()[2].rule;
        assert!(!rule.allows(Weekday::Tue, "11:20 - 12:20"));
        assert!(rule.allows(Weekday::Tue, "8:00 - 9:00"));
        assert!(rule.allows(Weekday::Wed, "11:20 - 12:20"));
    }

    #[test]
    fn test_combinators() {
        let rule = Eligibility::All {
            rules: vec![
                Eligibility::Weekdays {
                    days: vec![Weekday::Mon, Weekday::Tue],
                },
                Eligibility::Not {
                    rule: Box::new(Eligibility::ExceptSlotsOn {
                        days: vec![Weekday::Mon],
                        slots: vec!["8:00 - 9:00".to_string()],
                    }),
                },
            ],
        };
        assert!(rule.allows(Weekday::Mon, "8:00 - 9:00"));
        assert!(!rule.allows(Weekday::Tue, "8:00 - 9:00"));
        assert!(!rule.allows(Weekday::Wed, "8:00 - 9:00"));
        assert_eq!(rule.referenced_slots(), vec!["8:00 - 9:00"]);
    }

    #[test]
    fn test_rule_from_json() {
        let json = r#"{"kind":"weekdays","days":["Wed","Fri"]}"#;
        let rule: Eligibility = serde_json::from_str(json).expect("deserialize");
        assert_eq!(rule, default_rooms()[0].rule);
    }
}
