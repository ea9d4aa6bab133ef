//! Foundation layer - the canonical message model and error taxonomy.
//!
//! Everything an adapter publishes to, or receives from, the message bus is
//! expressed in the types defined here.

pub mod error;
pub mod message;

pub use error::{AdapterError, AdapterResult, BusError, BusResult, TransportError, TransportResult};
pub use message::{
    DeliveryEvent, InboundMessage, OutboundMessage, SessionEvent, TransportMetadata,
    new_message_id,
};
