// Booking request assembled by a client and submitted through the adapter

use crate::slot::{Player, Slot};
use std::collections::BTreeSet;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("A booking can only contain slots from the same resource, found {resource_ids:?}")]
pub struct MixedResourcesError {
    pub resource_ids: Vec<i64>,
}

/// A reservation request covering one or more slots of a single resource.
///
/// Contact fields left unset are not sent to the server at all.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Booking {
    name: Option<String>,
    mobile: Option<String>,
    email: Option<String>,
    street: Option<String>,
    postcode: Option<String>,
    city: Option<String>,
    slots: Vec<Slot>,
    attendance: Option<i64>,
    players: Vec<Player>,
    exclusive: Option<bool>,
    preferred_modes: Vec<String>,
    notes: Option<String>,
}

impl Booking {
    pub fn builder() -> BookingBuilder {
        BookingBuilder::default()
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn mobile(&self) -> Option<&str> {
        self.mobile.as_deref()
    }

    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    pub fn street(&self) -> Option<&str> {
        self.street.as_deref()
    }

    pub fn postcode(&self) -> Option<&str> {
        self.postcode.as_deref()
    }

    pub fn city(&self) -> Option<&str> {
        self.city.as_deref()
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    pub fn attendance(&self) -> Option<i64> {
        self.attendance
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn exclusive(&self) -> Option<bool> {
        self.exclusive
    }

    pub fn preferred_modes(&self) -> &[String] {
        &self.preferred_modes
    }

    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    pub fn slot_ids(&self) -> Vec<i64> {
        self.slots.iter().map(Slot::id).collect()
    }

    /// The single resource all slots belong to.
    ///
    /// `Ok(None)` for a booking without slots; an error when the slots span
    /// more than one resource.
    pub fn resource_id(&self) -> Result<Option<i64>, MixedResourcesError> {
        let resource_ids: BTreeSet<i64> = self.slots.iter().map(Slot::resource_id).collect();
        match resource_ids.len() {
            0 => Ok(None),
            1 => Ok(resource_ids.into_iter().next()),
            _ => Err(MixedResourcesError {
                resource_ids: resource_ids.into_iter().collect(),
            }),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct BookingBuilder {
    booking: Booking,
}

impl BookingBuilder {
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.booking.name = Some(name.into());
        self
    }

    pub fn mobile(mut self, mobile: impl Into<String>) -> Self {
        self.booking.mobile = Some(mobile.into());
        self
    }

    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.booking.email = Some(email.into());
        self
    }

    pub fn street(mut self, street: impl Into<String>) -> Self {
        self.booking.street = Some(street.into());
        self
    }

    pub fn postcode(mut self, postcode: impl Into<String>) -> Self {
        self.booking.postcode = Some(postcode.into());
        self
    }

    pub fn city(mut self, city: impl Into<String>) -> Self {
        self.booking.city = Some(city.into());
        self
    }

    pub fn slots(mut self, slots: Vec<Slot>) -> Self {
        self.booking.slots = slots;
        self
    }

    pub fn slot(mut self, slot: Slot) -> Self {
        self.booking.slots.push(slot);
        self
    }

    pub fn attendance(mut self, attendance: i64) -> Self {
        self.booking.attendance = Some(attendance);
        self
    }

    pub fn players(mut self, players: Vec<Player>) -> Self {
        self.booking.players = players;
        self
    }

    pub fn exclusive(mut self, exclusive: bool) -> Self {
        self.booking.exclusive = Some(exclusive);
        self
    }

    // Mode tokens in order of preference
    pub fn preferred_modes<I, S>(mut self, tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.booking.preferred_modes = tokens.into_iter().map(Into::into).collect();
        self
    }

    pub fn notes(mut self, notes: impl Into<String>) -> Self {
        self.booking.notes = Some(notes.into());
        self
    }

    pub fn build(self) -> Booking {
        self.booking
    }
}
