// Adapter for the GoBoo booking REST API (v3)
// Read operations degrade to empty results; only booking reports failures.

use crate::booking::{Booking, MixedResourcesError};
use crate::coerce::Truthy;
use crate::options::{AdapterOptions, ConfigError};
use crate::slot::Slot;
use crate::transport::{HttpRequest, HttpResponse, ReqwestTransport, Transport, TransportError};
use crate::w3c::to_w3c_string;
use crate::wire::{BookingRequestBody, ResourceId, SlotDto, SlotListDto, WireError};
use async_trait::async_trait;
use chrono::{DateTime, FixedOffset};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{debug, info, warn};

// Failures of read operations; logged and turned into empty results
#[derive(Error, Debug)]
enum ApiError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("Unexpected status code {0}")]
    Status(u16),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid slot data: {0}")]
    Wire(#[from] WireError),

    #[error("Invalid query: {0}")]
    Query(#[from] serde_urlencoded::ser::Error),
}

#[derive(Error, Debug)]
pub enum BookingError {
    #[error(transparent)]
    MixedResources(#[from] MixedResourcesError),

    #[error("Booking rejected: {message}")]
    Rejected {
        message: String,
        response: HttpResponse,
    },

    #[error("Booking failed with status {}", .response.status)]
    Failed { response: HttpResponse },

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("Failed to encode booking: {0}")]
    Encode(#[from] serde_json::Error),
}

impl BookingError {
    /// The message the server gave for rejecting the booking.
    ///
    /// `None` for every other failure, including generic HTTP errors.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            BookingError::Rejected { message, .. } => Some(message),
            _ => None,
        }
    }

    pub fn response(&self) -> Option<&HttpResponse> {
        match self {
            BookingError::Rejected { response, .. } | BookingError::Failed { response } => {
                Some(response)
            }
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BookingReceipt {
    pub json: Value,
    pub response: HttpResponse,
}

#[derive(Debug, Clone, PartialEq)]
pub enum BookingOutcome {
    // The booking had no slots; nothing was sent
    Skipped,
    Booked(BookingReceipt),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Neighbours {
    Predecessors,
    Successors,
}

impl Neighbours {
    fn segment(self) -> &'static str {
        match self {
            Neighbours::Predecessors => "predecessors",
            Neighbours::Successors => "successors",
        }
    }
}

/// Operations offered by the booking server.
#[async_trait]
pub trait BookingApi: Send + Sync + 'static {
    /// Slots of a resource, optionally limited to a time window.
    async fn list_slots(
        &self,
        resource_id: i64,
        from: Option<DateTime<FixedOffset>>,
        until: Option<DateTime<FixedOffset>>,
    ) -> Vec<Slot>;

    async fn list_slot_predecessors(&self, slot: &Slot, limit: Option<u32>) -> Vec<Slot>;

    async fn list_slot_successors(&self, slot: &Slot, limit: Option<u32>) -> Vec<Slot>;

    /// A single slot including its available modes.
    async fn get_slot(&self, resource_id: i64, slot_id: i64) -> Option<Slot>;

    /// Submits a booking.
    ///
    /// Slots from more than one resource are rejected before anything is
    /// sent; a booking without slots is skipped.
    async fn book_slot(&self, booking: &Booking) -> Result<BookingOutcome, BookingError>;
}

pub struct Adapter<T = ReqwestTransport> {
    options: AdapterOptions,
    base_url: String,
    transport: T,
}

impl Adapter<ReqwestTransport> {
    pub fn new(options: AdapterOptions) -> Self {
        Self::with_transport(options, ReqwestTransport::default())
    }

    // Defaults overridden by `custom`, key by key
    pub fn from_custom_options(custom: Map<String, Value>) -> Result<Self, ConfigError> {
        Ok(Self::new(AdapterOptions::default().merge(custom)?))
    }
}

impl Default for Adapter<ReqwestTransport> {
    fn default() -> Self {
        Self::new(AdapterOptions::default())
    }
}

impl<T: Transport> Adapter<T> {
    pub fn with_transport(options: AdapterOptions, transport: T) -> Self {
        let base_url = options.base_url();
        Self {
            options,
            base_url,
            transport,
        }
    }

    pub fn options(&self) -> &AdapterOptions {
        &self.options
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str, query: &[(&str, String)]) -> Result<String, ApiError> {
        let mut url = format!("{}{}", self.base_url, path);
        if !query.is_empty() {
            url.push('?');
            url.push_str(&serde_urlencoded::to_string(query)?);
        }
        Ok(url)
    }

    async fn get_json<D: DeserializeOwned>(&self, url: String) -> Result<D, ApiError> {
        debug!(%url, "GET");
        let response = self.transport.send(HttpRequest::get(url)).await?;
        if !response.is_ok() {
            return Err(ApiError::Status(response.status));
        }
        Ok(serde_json::from_slice(&response.body)?)
    }

    async fn fetch_slots(
        &self,
        resource_id: i64,
        from: Option<DateTime<FixedOffset>>,
        until: Option<DateTime<FixedOffset>>,
    ) -> Result<Vec<Slot>, ApiError> {
        let mut query = Vec::new();
        if let Some(from) = from {
            query.push(("from", to_w3c_string(&from)));
        }
        if let Some(until) = until {
            query.push(("until", to_w3c_string(&until)));
        }

        let url = self.url(&format!("rest/room/{resource_id}/slots"), &query)?;
        let list: SlotListDto = self.get_json(url).await?;
        Ok(map_slots(list.slots, ResourceId::Fixed(resource_id)))
    }

    async fn fetch_neighbours(
        &self,
        slot: &Slot,
        direction: Neighbours,
        limit: Option<u32>,
    ) -> Result<Vec<Slot>, ApiError> {
        // a zero limit is left out, the server then applies its own
        let query: Vec<(&str, String)> = limit
            .filter(|limit| *limit > 0)
            .map(|limit| ("limit", limit.to_string()))
            .into_iter()
            .collect();
        let path = format!(
            "rest/room/{}/slot/{}/{}",
            slot.resource_id(),
            slot.id(),
            direction.segment()
        );
        let url = self.url(&path, &query)?;
        let entries: Option<Vec<SlotDto>> = self.get_json(url).await?;

        let resource = match direction {
            Neighbours::Predecessors => ResourceId::Fixed(slot.resource_id()),
            Neighbours::Successors => ResourceId::FromEntry(slot.resource_id()),
        };
        Ok(map_slots(entries, resource))
    }

    async fn fetch_slot(&self, resource_id: i64, slot_id: i64) -> Result<Slot, ApiError> {
        let url = self.url(&format!("rest/room/{resource_id}/slot/{slot_id}"), &[])?;
        let dto: SlotDto = self.get_json(url).await?;
        Ok(dto.into_slot(ResourceId::FromEntry(resource_id))?)
    }
}

// Entries that cannot be mapped are skipped, the rest of the listing is kept
fn map_slots(entries: Option<Vec<SlotDto>>, resource: ResourceId) -> Vec<Slot> {
    entries
        .unwrap_or_default()
        .into_iter()
        .filter_map(|entry| {
            let id = entry.id.clone();
            match entry.into_slot(resource) {
                Ok(slot) => Some(slot),
                Err(err) => {
                    warn!(%id, error = %err, "skipping invalid slot entry");
                    None
                }
            }
        })
        .collect()
}

fn degrade<V: Default>(operation: &str, result: Result<V, ApiError>) -> V {
    result.unwrap_or_else(|err| {
        warn!(operation, error = %err, "request failed, returning empty result");
        V::default()
    })
}

// Order matters: unparseable or falsy JSON, then a server error, then status
fn interpret_booking_response(response: HttpResponse) -> Result<BookingOutcome, BookingError> {
    let json = match serde_json::from_slice::<Value>(&response.body) {
        Ok(json) if json.is_truthy() => json,
        _ => return Err(BookingError::Failed { response }),
    };

    if let Some(error) = json.get("error").filter(|error| error.is_truthy()) {
        let message = match error.get("message") {
            Some(Value::String(message)) => message.clone(),
            Some(message) if !message.is_null() => message.to_string(),
            _ => match error {
                Value::String(message) => message.clone(),
                other => other.to_string(),
            },
        };
        return Err(BookingError::Rejected { message, response });
    }

    if !response.is_ok() {
        return Err(BookingError::Failed { response });
    }

    Ok(BookingOutcome::Booked(BookingReceipt { json, response }))
}

#[async_trait]
impl<T: Transport> BookingApi for Adapter<T> {
    async fn list_slots(
        &self,
        resource_id: i64,
        from: Option<DateTime<FixedOffset>>,
        until: Option<DateTime<FixedOffset>>,
    ) -> Vec<Slot> {
        degrade("list_slots", self.fetch_slots(resource_id, from, until).await)
    }

    async fn list_slot_predecessors(&self, slot: &Slot, limit: Option<u32>) -> Vec<Slot> {
        let result = self
            .fetch_neighbours(slot, Neighbours::Predecessors, limit)
            .await;
        degrade("list_slot_predecessors", result)
    }

    async fn list_slot_successors(&self, slot: &Slot, limit: Option<u32>) -> Vec<Slot> {
        let result = self
            .fetch_neighbours(slot, Neighbours::Successors, limit)
            .await;
        degrade("list_slot_successors", result)
    }

    async fn get_slot(&self, resource_id: i64, slot_id: i64) -> Option<Slot> {
        degrade("get_slot", self.fetch_slot(resource_id, slot_id).await.map(Some))
    }

    async fn book_slot(&self, booking: &Booking) -> Result<BookingOutcome, BookingError> {
        let Some(resource_id) = booking.resource_id()? else {
            debug!("booking has no slots, nothing to submit");
            return Ok(BookingOutcome::Skipped);
        };

        let body = serde_json::to_vec(&BookingRequestBody::from(booking))?;
        let url = format!("{}rest/room/{}/book", self.base_url, resource_id);
        info!(resource_id, slots = booking.slots().len(), "submitting booking");

        let response = self
            .transport
            .send(HttpRequest::post_json(url, body))
            .await?;
        let outcome = interpret_booking_response(response);
        if let Err(err) = &outcome {
            warn!(resource_id, error = %err, "booking failed");
        }
        outcome
    }
}
