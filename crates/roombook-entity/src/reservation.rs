//! Reservation records and their stored document shape.

use std::fmt;

use chrono::{DateTime, FixedOffset, NaiveDateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use roombook_core::error::AppError;
use roombook_core::traits::store::StoredDocument;
use roombook_core::types::id::{DocumentId, RequesterId};

use crate::day::Day;
use crate::requester::Requester;
use crate::slot::Slot;

/// Value of the `type` field on classroom reservations.
pub const RESERVATION_KIND: &str = "Aula";

/// Review state of a reservation.
///
/// Removal (rejection) deletes the document, so it has no variant here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReservationStatus {
    /// Awaiting a reviewer decision.
    #[default]
    Pending,
    /// Accepted by a reviewer. Terminal.
    Accepted,
}

impl ReservationStatus {
    /// Whether the reservation still awaits review.
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }

    /// Return the status as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Accepted => "accepted",
        }
    }
}

impl fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The tuple no two live reservations may share.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ReservationKey {
    /// Room name.
    pub room: String,
    /// Booked day.
    pub day: Day,
    /// Booked slot.
    pub slot: Slot,
}

/// One room booked for one slot on one day.
///
/// Field names on the wire follow the stored document shape (`location`,
/// `hour`, `students`, ...). Pending documents carry no `status` field.
///
/// Decoding is strict only for the conflict key (`location`, `day`,
/// `hour`) and `status`. Every other field falls back to empty when it is
/// missing or shaped differently, so a document written by another client
/// still blocks its slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reservation {
    /// Store key; `None` until the store has assigned one.
    #[serde(skip)]
    pub id: Option<DocumentId>,
    /// Room name.
    #[serde(rename = "location")]
    pub room: String,
    /// Booked day.
    pub day: Day,
    /// Booked slot label.
    #[serde(rename = "hour")]
    pub slot: Slot,
    /// Local wall-clock start, without offset.
    #[serde(
        default,
        deserialize_with = "lenient_local_time",
        skip_serializing_if = "Option::is_none"
    )]
    pub start: Option<NaiveDateTime>,
    /// Local wall-clock end, without offset.
    #[serde(
        default,
        deserialize_with = "lenient_local_time",
        skip_serializing_if = "Option::is_none"
    )]
    pub end: Option<NaiveDateTime>,
    /// Display title.
    #[serde(default, deserialize_with = "lenient")]
    pub title: String,
    /// When the request was made.
    #[serde(
        rename = "createdAt",
        default,
        deserialize_with = "lenient_instant",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<DateTime<Utc>>,
    /// Requester display name.
    #[serde(rename = "user", default, deserialize_with = "lenient")]
    pub requester_name: String,
    /// Requester id.
    #[serde(rename = "userId", default, deserialize_with = "lenient")]
    pub requester_id: RequesterId,
    /// Reservation type.
    #[serde(rename = "type", default = "default_kind", deserialize_with = "lenient")]
    pub kind: String,
    /// Participant names. Never empty for records created here.
    #[serde(rename = "students", default, deserialize_with = "lenient")]
    pub participants: Vec<String>,
    /// Review state.
    #[serde(default, skip_serializing_if = "ReservationStatus::is_pending")]
    pub status: ReservationStatus,
}

impl Reservation {
    /// Build a new pending reservation.
    pub fn pending(
        room: impl Into<String>,
        day: Day,
        slot: Slot,
        requester: &Requester,
        participants: Vec<String>,
        created_at: DateTime<Utc>,
    ) -> Result<Self, AppError> {
        let room = room.into();
        let (start, end) = slot.bounds()?;
        Ok(Self {
            id: None,
            title: format!("Reserva de ({room})"),
            room,
            day,
            start: Some(day.date().and_time(start)),
            end: Some(day.date().and_time(end)),
            slot,
            created_at: Some(created_at),
            requester_name: requester.display_name.clone(),
            requester_id: requester.id.clone(),
            kind: RESERVATION_KIND.to_string(),
            participants,
            status: ReservationStatus::Pending,
        })
    }

    /// The (room, day, slot) tuple.
    pub fn key(&self) -> ReservationKey {
        ReservationKey {
            room: self.room.clone(),
            day: self.day,
            slot: self.slot.clone(),
        }
    }

    /// Whether this reservation occupies `room` for `slot` on `day`.
    pub fn occupies(&self, room: &str, day: Day, slot: &Slot) -> bool {
        self.room == room && self.day == day && &self.slot == slot
    }

    /// Serialize to the flat document body.
    pub fn to_document(&self) -> Result<serde_json::Value, AppError> {
        Ok(serde_json::to_value(self)?)
    }

    /// Decode a stored document.
    pub fn from_document(document: &StoredDocument) -> Result<Self, AppError> {
        let mut reservation: Self = serde_json::from_value(document.data.clone())?;
        reservation.id = Some(document.id.clone());
        Ok(reservation)
    }
}

fn default_kind() -> String {
    RESERVATION_KIND.to_string()
}

/// Decode a cosmetic field, falling back to its default on any mismatch.
fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}

fn lenient_local_time<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    if let Some(text) = value.as_str() {
        if let Ok(local) = text.parse::<NaiveDateTime>() {
            return Ok(Some(local));
        }
    }
    Ok(parse_timestamp(&value).map(|ts| ts.naive_local()))
}

fn lenient_instant<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(parse_timestamp(&value).map(|ts| ts.with_timezone(&Utc)))
}

/// An RFC 3339 string, or a `{seconds, nanoseconds}` timestamp object as
/// written by Firestore clients (underscore-prefixed keys included).
fn parse_timestamp(value: &Value) -> Option<DateTime<FixedOffset>> {
    match value {
        Value::String(text) => DateTime::parse_from_rfc3339(text).ok(),
        Value::Object(fields) => {
            let field = |name: &str| {
                fields
                    .get(name)
                    .or_else(|| fields.get(&format!("_{name}")))
                    .and_then(Value::as_i64)
            };
            let seconds = field("seconds")?;
            let nanos = u32::try_from(field("nanoseconds").unwrap_or(0)).ok()?;
            DateTime::from_timestamp(seconds, nanos).map(|ts| ts.fixed_offset())
        }
        _ => None,
    }
}
