//! # Relay Core
//!
//! The core engine of the Relay USSD gateway.
//!
//! This crate provides the canonical message model and the contracts that
//! adapters, transports and the message bus agree on.
//!
//! ## Architecture Layers
//!
//! ### Foundation Layer
//!
//! - **Message model**: [`InboundMessage`], [`OutboundMessage`], [`SessionEvent`],
//!   [`TransportMetadata`], [`DeliveryEvent`]
//! - **Errors**: [`TransportError`], [`AdapterError`], [`BusError`]
//!
//! ### Integration Layer
//!
//! - **Adapter System**: Protocol implementations ([`Adapter`])
//! - **Message Bus**: [`MessageBus`] and the in-process [`ChannelBus`]
//! - **HTTP Capability**: parked request/response pairs ([`HttpServerCapability`])
//!
//! ## Data Flow
//!
//! ```text
//! ┌────────────┐  RawRequest  ┌─────────┐  InboundMessage   ┌─────┐
//! │ HTTP server│─────────────▶│ Adapter │──────────────────▶│ Bus │
//! │ (parked)   │◀─────────────│         │◀──────────────────│     │
//! └────────────┘  HttpReply   └─────────┘  OutboundMessage  └─────┘
//! ```

// Architectural layers
pub mod foundation;
pub mod integration;

// Re-export foundation types
pub use foundation::{
    AdapterError, AdapterResult, BusError, BusResult, DeliveryEvent, InboundMessage,
    OutboundMessage, SessionEvent, TransportError, TransportMetadata, TransportResult,
    new_message_id,
};

// Re-export integration types
pub use integration::{
    Adapter, AdapterContext, BoxedAdapter, BoxedBus, BoxedRequestHandler, BusEndpoints,
    ChannelBus, ConfigurableAdapter, HttpReply, HttpServerCapability, HttpServerConfig,
    ListenerHandle, MessageBus, RawRequest, RequestHandler, TransportContext, humantime_serde,
};

/// Prelude for common imports.
pub mod prelude {
    pub use super::foundation::*;
    pub use super::integration::{
        Adapter, AdapterContext, HttpReply, MessageBus, RawRequest, RequestHandler,
    };
}
