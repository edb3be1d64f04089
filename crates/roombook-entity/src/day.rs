//! Calendar days and the holiday table.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use roombook_core::config::holidays::HolidayConfig;
use roombook_core::error::AppError;

/// A calendar date, serialized as `YYYY-MM-DD`.
///
/// Parsing also accepts a full RFC 3339 timestamp and keeps only its
/// date, so documents written with a time component still compare equal
/// on the day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Day(NaiveDate);

impl Day {
    /// Wrap a date.
    pub fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    /// Build from year/month/day, returning `None` for impossible dates.
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(Self)
    }

    /// The underlying date.
    pub fn date(&self) -> NaiveDate {
        self.0
    }

    /// Day of the week.
    pub fn weekday(&self) -> Weekday {
        self.0.weekday()
    }

    /// Saturday or Sunday.
    pub fn is_weekend(&self) -> bool {
        matches!(self.weekday(), Weekday::Sat | Weekday::Sun)
    }

    /// Display label such as `"Tuesday 14"`.
    pub fn label(&self) -> String {
        self.0.format("%A %d").to_string()
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

impl FromStr for Day {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
            return Ok(Self(date));
        }
        DateTime::parse_from_rfc3339(s)
            .map(|ts| Self(ts.date_naive()))
            .map_err(|_| AppError::validation(format!("Invalid day '{s}', expected YYYY-MM-DD")))
    }
}

impl TryFrom<String> for Day {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Day> for String {
    fn from(day: Day) -> Self {
        day.to_string()
    }
}

impl From<NaiveDate> for Day {
    fn from(date: NaiveDate) -> Self {
        Self(date)
    }
}

/// The static set of dates on which nothing can be booked.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HolidayCalendar {
    dates: BTreeSet<Day>,
}

impl HolidayCalendar {
    /// Build a calendar from explicit days.
    pub fn new(dates: impl IntoIterator<Item = Day>) -> Self {
        Self {
            dates: dates.into_iter().collect(),
        }
    }

    /// Build a calendar from the configured ISO date table.
    pub fn from_config(config: &HolidayConfig) -> Result<Self, AppError> {
        let dates = config
            .dates
            .iter()
            .map(|d| d.parse::<Day>())
            .collect::<Result<BTreeSet<_>, _>>()?;
        Ok(Self { dates })
    }

    /// Whether the day is a holiday.
    pub fn contains(&self, day: Day) -> bool {
        self.dates.contains(&day)
    }

    /// Number of holidays in the table.
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }
}

/// A day of the booking week with its derived attributes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayInfo {
    /// The date.
    pub day: Day,
    /// Day of the week.
    pub weekday: Weekday,
    /// Display label.
    pub label: String,
    /// Listed in the holiday table.
    pub is_holiday: bool,
    /// Saturday or Sunday.
    pub is_weekend: bool,
}

impl DayInfo {
    /// Derive the attributes of `day`.
    pub fn new(day: Day, holidays: &HolidayCalendar) -> Self {
        Self {
            day,
            weekday: day.weekday(),
            label: day.label(),
            is_holiday: holidays.contains(day),
            is_weekend: day.is_weekend(),
        }
    }

    /// Whether a requester may pick this day at all.
    pub fn is_selectable(&self) -> bool {
        !self.is_holiday && !self.is_weekend
    }
}
