// JSON shapes exchanged with the booking server and their mapping to entities

use crate::booking::Booking;
use crate::coerce::{CoercionError, IntegerInput};
use crate::mode::Mode;
use crate::slot::{Player, Slot};
use crate::w3c::parse_timestamp;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum WireError {
    #[error("Invalid field value: {0}")]
    Coercion(#[from] CoercionError),

    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Invalid timestamp {value:?}: {source}")]
    Timestamp {
        value: String,
        source: chrono::ParseError,
    },
}

// Numeric fields are kept as raw JSON so that numeric strings pass through the
// same coercion rules as values set by calling code.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SlotDto {
    pub id: Value,
    pub room: Value,
    pub start_date_time: Option<String>,
    pub duration: Value,
    pub play_time: Value,
    pub capacity: Value,
    pub attendance: Value,
    pub players: Option<Vec<Player>>,
    pub locked: Value,
    pub available_modes: Option<Vec<ModeDto>>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ModeDto {
    pub token: Option<String>,
    pub label: Option<String>,
    pub description: Option<String>,
    pub min_attendance: Value,
    pub max_attendance: Value,
    pub votes: Value,
}

// Body of `GET rest/room/{id}/slots`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SlotListDto {
    pub slots: Option<Vec<SlotDto>>,
}

/// Where a mapped slot takes its resource id from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceId {
    /// Always this id; the entry's `room` is ignored.
    Fixed(i64),
    /// The entry's `room`, or this id when the entry has none.
    FromEntry(i64),
}

impl SlotDto {
    pub fn into_slot(self, resource: ResourceId) -> Result<Slot, WireError> {
        let resource_id = match resource {
            ResourceId::Fixed(id) => id,
            ResourceId::FromEntry(fallback) if self.room.is_null() => fallback,
            ResourceId::FromEntry(_) => required("room", &self.room)?,
        };

        let raw_start = self
            .start_date_time
            .ok_or(WireError::MissingField("startDateTime"))?;
        let start = parse_timestamp(&raw_start).map_err(|source| WireError::Timestamp {
            value: raw_start.clone(),
            source,
        })?;

        let modes = self
            .available_modes
            .map(|modes| {
                modes
                    .into_iter()
                    .map(ModeDto::into_mode)
                    .collect::<Result<Vec<_>, _>>()
            })
            .transpose()?;

        let slot = Slot::builder()
            .id(required("id", &self.id)?)
            .resource_id(resource_id)
            .start_date_time(start)
            .duration(&self.duration)
            .play_time(&self.play_time)
            .capacity(&self.capacity)
            .attendance(&self.attendance)
            .players(self.players)
            .locked(&self.locked)
            .available_modes(modes)
            .build()?;
        Ok(slot)
    }
}

impl ModeDto {
    pub fn into_mode(self) -> Result<Mode, CoercionError> {
        Mode::builder()
            .token(self.token.unwrap_or_default())
            .label(self.label.unwrap_or_default())
            .description(self.description.unwrap_or_default())
            .min_attendance(&self.min_attendance)
            .max_attendance(&self.max_attendance)
            .votes(&self.votes)
            .build()
    }
}

fn required(field: &'static str, value: &Value) -> Result<i64, CoercionError> {
    value
        .to_integer()
        .ok_or_else(|| CoercionError::not_an_integer(field, value))
}

/// Body of `POST rest/room/{id}/book`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingRequestBody<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mobile: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub street: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub postcode: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attendance: Option<i64>,
    pub players: &'a [Player],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclusive: Option<bool>,
    pub preferred_modes: &'a [String],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<&'a str>,
    pub slots: Vec<i64>,
}

impl<'a> From<&'a Booking> for BookingRequestBody<'a> {
    fn from(booking: &'a Booking) -> Self {
        BookingRequestBody {
            name: booking.name(),
            mobile: booking.mobile(),
            email: booking.email(),
            street: booking.street(),
            postcode: booking.postcode(),
            city: booking.city(),
            attendance: booking.attendance(),
            players: booking.players(),
            exclusive: booking.exclusive(),
            preferred_modes: booking.preferred_modes(),
            notes: booking.notes(),
            slots: booking.slot_ids(),
        }
    }
}
