//! Holiday table configuration.

use serde::{Deserialize, Serialize};

/// Dates on which no reservation may be made.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HolidayConfig {
    /// ISO dates (`YYYY-MM-DD`).
    #[serde(default = "default_dates")]
    pub dates: Vec<String>,
}

impl Default for HolidayConfig {
    fn default() -> Self {
        Self {
            dates: default_dates(),
        }
    }
}

fn default_dates() -> Vec<String> {
    [
        "2024-09-11",
        "2024-09-24",
        "2024-10-31",
        "2024-11-01",
        "2024-12-06",
        "2024-12-23",
        "2024-12-24",
        "2024-12-25",
        "2024-12-26",
        "2024-12-27",
        "2024-12-30",
        "2024-12-31",
        "2025-01-01",
        "2025-01-02",
        "2025-01-03",
        "2025-01-06",
        "2025-01-07",
        "2025-03-03",
        "2025-03-28",
        "2025-04-14",
        "2025-04-15",
        "2025-04-16",
        "2025-04-17",
        "2025-04-18",
        "2025-04-21",
        "2025-05-01",
        "2025-05-02",
        "2025-06-09",
        "2025-06-24",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}
