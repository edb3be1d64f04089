//! Booking-week generation.

use std::sync::Arc;

use chrono::{Datelike, Days, NaiveDate, Weekday};

use roombook_core::config::calendar::{CalendarConfig, WeekendPolicy};
use roombook_entity::day::{Day, DayInfo, HolidayCalendar};

/// Number of days in a booking window.
pub const WEEK_LENGTH: u64 = 7;

/// Produces the seven bookable days for a given "today".
///
/// Pure: the same `today` always yields the same week.
#[derive(Debug, Clone)]
pub struct CalendarGenerator {
    lead_weeks: u32,
    week_start: Weekday,
    weekend_policy: WeekendPolicy,
    holidays: Arc<HolidayCalendar>,
}

impl CalendarGenerator {
    /// Create a generator from configuration.
    pub fn new(config: &CalendarConfig, holidays: Arc<HolidayCalendar>) -> Self {
        Self {
            lead_weeks: config.lead_weeks,
            week_start: config.week_start,
            weekend_policy: config.weekend_policy,
            holidays,
        }
    }

    /// The booking week as seen from `today`.
    pub fn booking_week(&self, today: NaiveDate) -> Vec<DayInfo> {
        let start = self.week_start_for(today);
        (0..WEEK_LENGTH)
            .filter_map(|offset| start.checked_add_days(Days::new(offset)))
            .map(|date| DayInfo::new(Day::new(date), &self.holidays))
            .collect()
    }

    /// The day preselected when the booking screen opens: the first
    /// selectable day of the week, or its first day when none is.
    pub fn default_selection(&self, today: NaiveDate) -> Option<DayInfo> {
        let week = self.booking_week(today);
        week.iter()
            .find(|info| info.is_selectable())
            .or_else(|| week.first())
            .cloned()
    }

    fn week_start_for(&self, today: NaiveDate) -> NaiveDate {
        let anchor = match self.weekend_policy {
            WeekendPolicy::JumpToNextWeek if matches!(today.weekday(), Weekday::Sat | Weekday::Sun) => {
                let to_monday = 7 - u64::from(today.weekday().num_days_from_monday());
                today.checked_add_days(Days::new(to_monday)).unwrap_or(today)
            }
            _ => today,
        };

        let target = anchor
            .checked_add_days(Days::new(u64::from(self.lead_weeks) * WEEK_LENGTH))
            .unwrap_or(anchor);

        let back = (target.weekday().num_days_from_monday() + 7
            - self.week_start.num_days_from_monday())
            % 7;
        target
            .checked_sub_days(Days::new(u64::from(back)))
            .unwrap_or(target)
    }
}
