// Client adapter for the GoBoo booking REST API

pub mod adapter;
pub mod booking;
pub mod coerce;
pub mod environment;
pub mod logging;
pub mod mode;
pub mod options;
pub mod slot;
pub mod transport;
pub mod w3c;
pub mod wire;

// Re-export key types for convenience
pub use adapter::{Adapter, BookingApi, BookingError, BookingOutcome, BookingReceipt};
pub use booking::{Booking, BookingBuilder, MixedResourcesError};
pub use coerce::{CoercionError, IntegerInput, Truthy};
pub use environment::Environment;
pub use mode::{Mode, ModeBuilder};
pub use options::{AdapterOptions, ConfigError};
pub use slot::{Player, Slot, SlotBuilder};
pub use transport::{HttpRequest, HttpResponse, ReqwestTransport, Transport, TransportError};
pub use w3c::to_w3c_string;
