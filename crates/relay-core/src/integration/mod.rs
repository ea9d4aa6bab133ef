//! Integration layer - External system interfaces.
//!
//! This module contains interfaces for integrating with external systems:
//! - Adapter system for protocol implementations
//! - Message bus contract
//! - HTTP server capability with request/response correlation
//! - Transport configuration types

pub mod adapter;
pub mod bus;
pub mod capability;
pub mod transport;

pub use adapter::{Adapter, AdapterContext, BoxedAdapter, ConfigurableAdapter};
pub use bus::{BoxedBus, BusEndpoints, ChannelBus, MessageBus};
pub use capability::{
    BoxedRequestHandler, HttpReply, HttpServerCapability, ListenerHandle, RawRequest,
    RequestHandler, TransportContext,
};
pub use transport::{HttpServerConfig, humantime_serde};
