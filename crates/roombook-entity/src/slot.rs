//! Fixed hourly slots.

use std::fmt;

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use roombook_core::config::catalog::parse_slot_range;
use roombook_core::error::AppError;

/// One hour range of the daily schedule, identified by its literal label.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Slot(String);

impl Slot {
    /// Wrap a label such as `"11:20 - 12:20"`.
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    /// The literal label.
    pub fn label(&self) -> &str {
        &self.0
    }

    /// Start and end clock times.
    pub fn bounds(&self) -> Result<(NaiveTime, NaiveTime), AppError> {
        parse_slot_range(&self.0)
            .ok_or_else(|| AppError::validation(format!("Malformed slot label '{}'", self.0)))
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Slot {
    fn from(label: &str) -> Self {
        Self::new(label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds() {
        let (start, end) = Slot::from("16:55 - 17:50").bounds().unwrap();
        assert_eq!(start, NaiveTime::from_hms_opt(16, 55, 0).unwrap());
        assert_eq!(end, NaiveTime::from_hms_opt(17, 50, 0).unwrap());
    }

    #[test]
    fn test_malformed_bounds() {
        assert!(Slot::from("lunch").bounds().is_err());
    }
}
