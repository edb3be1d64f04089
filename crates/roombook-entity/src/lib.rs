//! # roombook-entity
//!
//! Domain value objects for Roombook. Every type here is plain data:
//! no I/O, no shared state. `Reservation` also knows how to map itself to
//! and from the flat document shape used by the external store.

pub mod day;
pub mod requester;
pub mod reservation;
pub mod room;
pub mod slot;

pub use day::{Day, DayInfo, HolidayCalendar};
pub use requester::Requester;
pub use reservation::{Reservation, ReservationKey, ReservationStatus};
pub use room::RoomRule;
pub use slot::Slot;
