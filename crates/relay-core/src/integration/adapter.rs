//! Adapter trait and initialization context.
//!
//! An adapter translates one aggregator's wire dialect into the canonical
//! message model and back. It discovers the transports it needs through the
//! [`AdapterContext`]:
//!
//! ```rust,ignore
//! #[async_trait]
//! impl Adapter for MyAdapter {
//!     fn name() -> &'static str { "my-gateway" }
//!
//!     fn transport_name(&self) -> &str { "my-gateway" }
//!
//!     async fn on_start(&self, ctx: &mut AdapterContext) -> AdapterResult<()> {
//!         let server = ctx.transport().http_server().cloned()
//!             .ok_or(TransportError::NotAvailable { transport: "http-server" })?;
//!         let handle = server.listen(&self.http_config(), self.request_handler()).await?;
//!         ctx.add_listener(handle);
//!         Ok(())
//!     }
//!
//!     async fn handle_outbound(&self, message: OutboundMessage) {
//!         // render and complete the parked request, then ack or nack
//!     }
//! }
//! ```

use std::sync::Arc;

use async_trait::async_trait;

use crate::foundation::error::AdapterResult;
use crate::foundation::message::OutboundMessage;
use crate::integration::bus::BoxedBus;
use crate::integration::capability::{ListenerHandle, TransportContext};

/// Context provided to adapters during initialization and runtime.
///
/// Provides access to:
/// - Transport capabilities for accepting requests
/// - The message bus for publishing inbound messages and delivery events
pub struct AdapterContext {
    /// Available transport capabilities.
    transport: TransportContext,
    /// Message bus shared by all adapters.
    bus: BoxedBus,
    /// Active listener handles (to keep them alive).
    listeners: Vec<ListenerHandle>,
}

impl AdapterContext {
    /// Creates a new adapter context.
    pub fn new(transport: TransportContext, bus: BoxedBus) -> Self {
        Self {
            transport,
            bus,
            listeners: Vec::new(),
        }
    }

    /// Returns a reference to the transport context.
    pub fn transport(&self) -> &TransportContext {
        &self.transport
    }

    /// Returns a reference to the message bus.
    pub fn bus(&self) -> &BoxedBus {
        &self.bus
    }

    /// Registers a listener handle (keeps it alive).
    pub fn add_listener(&mut self, handle: ListenerHandle) {
        self.listeners.push(handle);
    }

    /// Returns the registered listeners.
    pub fn listeners(&self) -> &[ListenerHandle] {
        &self.listeners
    }

    /// Stops and drops all registered listeners.
    pub fn stop_listeners(&mut self) {
        for handle in self.listeners.drain(..) {
            handle.stop();
        }
    }
}

/// The core adapter trait.
#[async_trait]
pub trait Adapter: Send + Sync {
    /// Returns the adapter name (e.g., "blastsms").
    ///
    /// The name locates the adapter's configuration section:
    ///
    /// ```toml
    /// [adapters.blastsms]  # <- returned by Adapter::name()
    /// base_url = "https://gateway.example.com"
    /// ```
    fn name() -> &'static str
    where
        Self: Sized;

    /// Returns the transport name stamped on inbound messages.
    ///
    /// Outbound messages are routed to the adapter whose transport name
    /// matches their `transport_name`.
    fn transport_name(&self) -> &str;

    /// Called when the adapter should start accepting traffic.
    async fn on_start(&self, ctx: &mut AdapterContext) -> AdapterResult<()>;

    /// Delivers one outbound message.
    ///
    /// Failures are reported on the bus as nacks, never returned.
    async fn handle_outbound(&self, message: OutboundMessage);

    /// Called when the adapter is shutting down.
    ///
    /// Listener handles are dropped together with the context.
    async fn on_shutdown(&self, _ctx: &mut AdapterContext) -> AdapterResult<()> {
        Ok(())
    }
}

/// A boxed adapter trait object.
pub type BoxedAdapter = Arc<dyn Adapter>;

/// Trait for adapters that can be created from configuration.
pub trait ConfigurableAdapter: Adapter {
    /// The configuration type for this adapter.
    type Config: serde::de::DeserializeOwned + Default;

    /// Creates an adapter from its configuration.
    fn from_config(config: Self::Config) -> AdapterResult<Arc<Self>>
    where
        Self: Sized;
}
