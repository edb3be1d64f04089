//! Table and JSON output formatting for CLI commands.

use serde::Serialize;
use tabled::{Table, Tabled};

use roombook_engine::availability::{DayAvailability, SlotAvailability};
use roombook_entity::day::DayInfo;
use roombook_entity::reservation::Reservation;

/// Output format selection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table
    #[default]
    Table,
    /// JSON output
    Json,
}

/// Print a list of items in the selected format
pub fn print_list<T: Serialize + Tabled>(items: &[T], format: OutputFormat) {
    match format {
        OutputFormat::Table => {
            if items.is_empty() {
                println!("No results found.");
            } else {
                println!("{}", Table::new(items));
            }
        }
        OutputFormat::Json => print_json(items),
    }
}

/// Print any serializable value as pretty JSON
pub fn print_json<T: Serialize + ?Sized>(value: &T) {
    let json = serde_json::to_string_pretty(value).unwrap_or_else(|_| "null".to_string());
    println!("{json}");
}

/// Print a success message
pub fn print_success(msg: &str) {
    println!("✓ {msg}");
}

/// Print a warning message
pub fn print_warning(msg: &str) {
    println!("⚠ {msg}");
}

/// Print an error message
pub fn print_error(msg: &str) {
    eprintln!("✗ {msg}");
}

/// Print a key-value pair
pub fn print_kv(key: &str, value: &str) {
    println!("  {:<24} {}", format!("{key}:"), value);
}

/// One day of the booking week.
#[derive(Debug, Serialize, Tabled)]
pub struct DayRow {
    /// ISO date.
    #[tabled(rename = "Date")]
    pub date: String,
    /// Display label.
    #[tabled(rename = "Day")]
    pub label: String,
    /// Holiday flag.
    #[tabled(rename = "Holiday")]
    pub holiday: bool,
    /// Weekend flag.
    #[tabled(rename = "Weekend")]
    pub weekend: bool,
    /// Whether it can be picked.
    #[tabled(rename = "Selectable")]
    pub selectable: bool,
}

impl From<&DayInfo> for DayRow {
    fn from(info: &DayInfo) -> Self {
        Self {
            date: info.day.to_string(),
            label: info.label.clone(),
            holiday: info.is_holiday,
            weekend: info.is_weekend,
            selectable: info.is_selectable(),
        }
    }
}

/// One slot of a day view.
#[derive(Debug, Serialize, Tabled)]
pub struct SlotRow {
    /// Slot label.
    #[tabled(rename = "Slot")]
    pub slot: String,
    /// `invalid`, `unavailable` or `bookable`.
    #[tabled(rename = "Status")]
    pub status: String,
    /// Bookable rooms.
    #[tabled(rename = "Rooms")]
    pub rooms: String,
    /// Held by the viewing requester.
    #[tabled(rename = "Yours")]
    pub yours: bool,
}

/// Flatten a day view into rows. Holidays yield no rows.
pub fn slot_rows(view: &DayAvailability) -> Vec<SlotRow> {
    let DayAvailability::Slots { slots, .. } = view else {
        return Vec::new();
    };
    slots
        .iter()
        .map(|row| {
            let (status, rooms) = match &row.availability {
                SlotAvailability::Invalid => ("invalid", String::new()),
                SlotAvailability::Unavailable => ("unavailable", String::new()),
                SlotAvailability::Bookable { rooms } => (
                    "bookable",
                    rooms.iter().map(String::as_str).collect::<Vec<_>>().join(", "),
                ),
            };
            SlotRow {
                slot: row.slot.to_string(),
                status: status.to_string(),
                rooms,
                yours: row.reserved_by_requester,
            }
        })
        .collect()
}

/// One stored reservation.
#[derive(Debug, Serialize, Tabled)]
pub struct ReservationRow {
    /// Store key.
    #[tabled(rename = "ID")]
    pub id: String,
    /// Booked day.
    #[tabled(rename = "Day")]
    pub day: String,
    /// Booked slot.
    #[tabled(rename = "Slot")]
    pub slot: String,
    /// Room name.
    #[tabled(rename = "Room")]
    pub room: String,
    /// Requester display name.
    #[tabled(rename = "Requested by")]
    pub requester: String,
    /// Participant names.
    #[tabled(rename = "Participants")]
    pub participants: String,
    /// Review state.
    #[tabled(rename = "Status")]
    pub status: String,
}

impl From<&Reservation> for ReservationRow {
    fn from(r: &Reservation) -> Self {
        Self {
            id: r.id.as_ref().map(ToString::to_string).unwrap_or_default(),
            day: r.day.to_string(),
            slot: r.slot.to_string(),
            room: r.room.clone(),
            requester: r.requester_name.clone(),
            participants: r.participants.join(", "),
            status: r.status.to_string(),
        }
    }
}
