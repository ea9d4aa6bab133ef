//! # Relay Transport
//!
//! Concrete transport capabilities for the Relay USSD gateway.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────┐
//! │  Adapter Layer      │  (BlastSMS, ...)
//! │  (uses capabilities)│
//! ├─────────────────────┤
//! │  relay-core         │  (capability traits)
//! ├─────────────────────┤
//! │  relay-transport    │  <- This crate (implementations)
//! ├─────────────────────┤
//! │  Network (TCP/HTTP) │
//! └─────────────────────┘
//! ```
//!
//! ## Capability Implementations
//!
//! | Capability | Description | Use Case |
//! |------------|-------------|----------|
//! | `HttpServerCapability` | Parks each request until the adapter replies | Synchronous USSD callbacks |
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use relay_core::{HttpServerCapability, HttpServerConfig};
//! use relay_transport::HttpServerCapabilityImpl;
//!
//! let server = Arc::new(HttpServerCapabilityImpl::new());
//! let handle = server
//!     .listen(&HttpServerConfig::new("0.0.0.0", 8080).with_path("/ussd"), handler)
//!     .await?;
//!
//! // later, from the reply path:
//! server.finish_request(&message_id, HttpReply::ok_xml(body));
//! ```

pub mod http;

pub use http::HttpServerCapabilityImpl;
