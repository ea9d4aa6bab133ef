//! # Relay
//!
//! A USSD gateway that bridges aggregator HTTP dialects onto a message bus.
//!
//! ## Overview
//!
//! USSD aggregators call the gateway over HTTP and wait, on the same
//! connection, for the text to show the subscriber. Relay parks each
//! request, publishes a normalized [`InboundMessage`](core::InboundMessage)
//! on the bus and completes the request once the application replies.
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────┐  GET/POST  ┌──────────────┐  InboundMessage  ┌─────┐
//! │ Aggregator │───────────▶│   Adapter    │─────────────────▶│     │
//! │            │◀───────────│  (BlastSMS)  │◀─────────────────│ Bus │──▶ application
//! └────────────┘  ussdresp  └──────────────┘  OutboundMessage └─────┘
//! ```
//!
//! - **Runtime**: loads configuration, starts adapters, routes replies
//! - **Transport**: the HTTP server that keeps requests parked
//! - **Adapters**: one per aggregator dialect
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use relay::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let runtime = RelayRuntime::new();
//!     runtime.register_adapter::<BlastSmsAdapter>().await?;
//!
//!     let mut endpoints = runtime.take_endpoints().await.unwrap();
//!     tokio::spawn(async move {
//!         while let Some(message) = endpoints.inbound.recv().await {
//!             let reply = message.reply("Hello!", true);
//!             let _ = endpoints.outbound.send(reply).await;
//!         }
//!     });
//!
//!     runtime.run().await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - `blastsms`: BlastSMS dialect adapter (default)
//! - `toml-config`: TOML configuration files (default)
//! - `yaml-config`: YAML configuration files
//! - `json-log`: JSON log output

pub use relay_core as core;
pub use relay_runtime as runtime;
pub use relay_transport as transport;

#[cfg(feature = "blastsms")]
pub use relay_adapter_blastsms as blastsms;

/// Prelude module for convenient imports.
///
/// ```rust,ignore
/// use relay::prelude::*;
/// ```
pub mod prelude {
    // Runtime - main entry point
    pub use relay_runtime::{RelayRuntime, RuntimeBuilder};

    // Message model
    pub use relay_core::{
        DeliveryEvent, InboundMessage, OutboundMessage, SessionEvent, TransportMetadata,
    };

    // Contracts for custom adapters
    pub use relay_core::{Adapter, AdapterContext, BusEndpoints, ConfigurableAdapter, MessageBus};

    #[cfg(feature = "blastsms")]
    pub use relay_adapter_blastsms::{BlastSmsAdapter, BlastSmsConfig};
}
