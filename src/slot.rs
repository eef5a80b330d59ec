// Slot entity: a bookable time span of a resource

use crate::coerce::{CoercionError, IntegerInput, Truthy};
use crate::mode::Mode;
use chrono::{DateTime, Duration, FixedOffset, Local};
use serde_json::Value;

/// Player entries are passed through untouched; the server owns their shape.
pub type Player = Value;

// Sentinel for ids and counters that have not been populated yet
pub const UNSET: i64 = -1;

#[derive(Debug, Clone, PartialEq)]
pub struct Slot {
    id: i64,
    resource_id: i64,
    start_date_time: DateTime<FixedOffset>,
    end_date_time: Option<DateTime<FixedOffset>>,
    duration: i64,
    play_time: Option<i64>,
    capacity: i64,
    locked: bool,
    attendance: Option<i64>,
    players: Vec<Player>,
    available_modes: Vec<Mode>,
}

impl Default for Slot {
    fn default() -> Self {
        Self {
            id: UNSET,
            resource_id: UNSET,
            start_date_time: Local::now().into(),
            end_date_time: None,
            duration: UNSET,
            play_time: None,
            capacity: UNSET,
            locked: false,
            attendance: Some(UNSET),
            players: Vec::new(),
            available_modes: Vec::new(),
        }
    }
}

impl Slot {
    pub fn builder() -> SlotBuilder {
        SlotBuilder::default()
    }

    pub fn to_builder(&self) -> SlotBuilder {
        SlotBuilder {
            slot: self.clone(),
            error: None,
        }
    }

    pub fn id(&self) -> i64 {
        self.id
    }

    /// Id of the resource (room) the slot belongs to.
    pub fn resource_id(&self) -> i64 {
        self.resource_id
    }

    pub fn start_date_time(&self) -> DateTime<FixedOffset> {
        self.start_date_time
    }

    /// End of the slot.
    ///
    /// Falls back to `start + duration` minutes when no explicit end was set.
    /// A duration too large to represent leaves the start unchanged.
    pub fn end_date_time(&self) -> DateTime<FixedOffset> {
        self.end_date_time.unwrap_or_else(|| {
            Duration::try_minutes(self.duration)
                .and_then(|duration| self.start_date_time.checked_add_signed(duration))
                .unwrap_or(self.start_date_time)
        })
    }

    // The end exactly as it was set, if at all
    pub fn explicit_end_date_time(&self) -> Option<DateTime<FixedOffset>> {
        self.end_date_time
    }

    /// Length of the slot in minutes.
    pub fn duration(&self) -> i64 {
        self.duration
    }

    /// Minutes of actual play within the slot, if the server reports it.
    pub fn play_time(&self) -> Option<i64> {
        self.play_time
    }

    pub fn capacity(&self) -> i64 {
        self.capacity
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    pub fn attendance(&self) -> Option<i64> {
        self.attendance
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn available_modes(&self) -> &[Mode] {
        &self.available_modes
    }
}

// Builder keeping the first coercion failure; reported by `build`
#[derive(Debug, Clone, Default)]
pub struct SlotBuilder {
    slot: Slot,
    error: Option<CoercionError>,
}

impl SlotBuilder {
    pub fn id(mut self, id: i64) -> Self {
        self.slot.id = id;
        self
    }

    pub fn resource_id(mut self, resource_id: i64) -> Self {
        self.slot.resource_id = resource_id;
        self
    }

    pub fn start_date_time(mut self, start: impl Into<DateTime<FixedOffset>>) -> Self {
        self.slot.start_date_time = start.into();
        self
    }

    pub fn end_date_time(mut self, end: Option<DateTime<FixedOffset>>) -> Self {
        self.slot.end_date_time = end;
        self
    }

    pub fn duration(mut self, minutes: impl IntegerInput) -> Self {
        if let Some(minutes) = self.required("duration", minutes) {
            self.slot.duration = minutes;
        }
        self
    }

    pub fn play_time(mut self, minutes: impl IntegerInput) -> Self {
        if let Some(minutes) = self.nullable("playTime", minutes) {
            self.slot.play_time = minutes;
        }
        self
    }

    pub fn capacity(mut self, capacity: impl IntegerInput) -> Self {
        if let Some(capacity) = self.required("capacity", capacity) {
            self.slot.capacity = capacity;
        }
        self
    }

    pub fn locked(mut self, locked: impl Truthy) -> Self {
        self.slot.locked = locked.is_truthy();
        self
    }

    pub fn attendance(mut self, attendance: impl IntegerInput) -> Self {
        if let Some(attendance) = self.nullable("attendance", attendance) {
            self.slot.attendance = attendance;
        }
        self
    }

    pub fn players(mut self, players: impl Into<Option<Vec<Player>>>) -> Self {
        self.slot.players = players.into().unwrap_or_default();
        self
    }

    pub fn available_modes(mut self, modes: impl Into<Option<Vec<Mode>>>) -> Self {
        self.slot.available_modes = modes.into().unwrap_or_default();
        self
    }

    pub fn build(self) -> Result<Slot, CoercionError> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(self.slot),
        }
    }

    fn required(&mut self, field: &'static str, value: impl IntegerInput) -> Option<i64> {
        let number = value.to_integer();
        if number.is_none() {
            self.fail(CoercionError::not_an_integer(field, &value));
        }
        number
    }

    fn nullable(&mut self, field: &'static str, value: impl IntegerInput) -> Option<Option<i64>> {
        if value.is_null() {
            return Some(None);
        }
        self.required(field, value).map(Some)
    }

    fn fail(&mut self, err: CoercionError) {
        self.error.get_or_insert(err);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;
    use test_case::test_case;

    fn start() -> DateTime<FixedOffset> {
        FixedOffset::east_opt(3600)
            .unwrap()
            .with_ymd_and_hms(2014, 3, 10, 10, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_defaults_use_sentinels() {
        let slot = Slot::default();
        assert_eq!(slot.id(), UNSET);
        assert_eq!(slot.resource_id(), UNSET);
        assert_eq!(slot.duration(), UNSET);
        assert_eq!(slot.capacity(), UNSET);
        assert_eq!(slot.attendance(), Some(UNSET));
        assert_eq!(slot.play_time(), None);
        assert!(!slot.is_locked());
        assert!(slot.players().is_empty());
        assert!(slot.available_modes().is_empty());
        assert_eq!(slot.explicit_end_date_time(), None);
    }

    #[test]
    fn test_end_is_derived_from_duration() {
        let slot = Slot::builder()
            .start_date_time(start())
            .duration(90)
            .build()
            .unwrap();

        assert_eq!(slot.end_date_time(), start() + Duration::minutes(90));
        assert_eq!(slot.end_date_time().offset(), start().offset());
    }

    #[test]
    fn test_explicit_end_wins() {
        let end = start() + Duration::hours(3);
        let slot = Slot::builder()
            .start_date_time(start())
            .duration(60)
            .end_date_time(Some(end))
            .build()
            .unwrap();

        assert_eq!(slot.end_date_time(), end);
        assert_eq!(slot.explicit_end_date_time(), Some(end));
    }

    #[test]
    fn test_clearing_end_restores_derivation() {
        let slot = Slot::builder()
            .start_date_time(start())
            .duration(30)
            .end_date_time(Some(start() + Duration::hours(5)))
            .build()
            .unwrap();
        let cleared = slot.to_builder().end_date_time(None).build().unwrap();

        assert_eq!(cleared.end_date_time(), start() + Duration::minutes(30));
    }

    #[test]
    fn test_duration_coerced_from_string() {
        let slot = Slot::builder().duration("45").build().unwrap();
        assert_eq!(slot.duration(), 45);
    }

    #[test]
    fn test_attendance_keeps_null() {
        let slot = Slot::builder().attendance(Value::Null).build().unwrap();
        assert_eq!(slot.attendance(), None);

        let slot = Slot::builder().attendance("4").build().unwrap();
        assert_eq!(slot.attendance(), Some(4));
    }

    #[test]
    fn test_play_time_and_capacity() {
        let slot = Slot::builder()
            .play_time(json!(45))
            .capacity(json!("10"))
            .build()
            .unwrap();
        assert_eq!(slot.play_time(), Some(45));
        assert_eq!(slot.capacity(), 10);

        let slot = Slot::builder().play_time(None::<i64>).build().unwrap();
        assert_eq!(slot.play_time(), None);
    }

    #[test]
    fn test_invalid_duration_is_reported() {
        let err = Slot::builder().duration("soon").build().unwrap_err();
        assert_eq!(
            err,
            CoercionError::NotAnInteger {
                field: "duration",
                value: "\"soon\"".to_string(),
            }
        );
    }

    #[test]
    fn test_required_fields_reject_null() {
        assert!(Slot::builder().capacity(Value::Null).build().is_err());
        assert!(Slot::builder().duration(None::<i64>).build().is_err());
    }

    #[test_case(json!(true), true; "true")]
    #[test_case(json!(1), true; "one")]
    #[test_case(json!("yes"), true; "non empty string")]
    #[test_case(json!({}), true; "object")]
    #[test_case(json!(false), false; "false")]
    #[test_case(json!(0), false; "zero")]
    #[test_case(json!(""), false; "empty string")]
    #[test_case(json!(null), false; "null")]
    fn test_locked_follows_truthiness(input: Value, expected: bool) {
        let slot = Slot::builder().locked(input).build().unwrap();
        assert_eq!(slot.is_locked(), expected);
    }

    #[test]
    fn test_null_collections_become_empty() {
        let slot = Slot::builder()
            .players(vec![json!({"name": "Alice"})])
            .available_modes(vec![Mode::default()])
            .build()
            .unwrap();
        assert_eq!(slot.players().len(), 1);
        assert_eq!(slot.available_modes().len(), 1);

        let cleared = slot
            .to_builder()
            .players(None::<Vec<Player>>)
            .available_modes(None::<Vec<Mode>>)
            .build()
            .unwrap();
        assert!(cleared.players().is_empty());
        assert!(cleared.available_modes().is_empty());
    }

    #[test]
    fn test_oversized_duration_does_not_panic() {
        let slot = Slot::builder()
            .start_date_time(start())
            .duration(i64::MAX)
            .build()
            .unwrap();
        assert_eq!(slot.end_date_time(), start());
    }
}
