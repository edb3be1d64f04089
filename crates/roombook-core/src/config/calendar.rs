//! Booking window configuration.

use chrono::Weekday;
use serde::{Deserialize, Serialize};

/// How the booking week is derived from "today".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarConfig {
    /// Number of weeks between the current week and the bookable week.
    #[serde(default = "default_lead_weeks")]
    pub lead_weeks: u32,
    /// First day of a calendar week.
    #[serde(default = "default_week_start")]
    pub week_start: Weekday,
    /// What to do when "today" is a Saturday or Sunday.
    #[serde(default)]
    pub weekend_policy: WeekendPolicy,
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            lead_weeks: default_lead_weeks(),
            week_start: default_week_start(),
            weekend_policy: WeekendPolicy::default(),
        }
    }
}

/// Weekend handling for the booking window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeekendPolicy {
    /// On Saturday or Sunday, start counting from next week's Monday.
    #[default]
    JumpToNextWeek,
    /// Count the lead time from today regardless of weekday.
    None,
}

fn default_lead_weeks() -> u32 {
    2
}

fn default_week_start() -> Weekday {
    Weekday::Mon
}
