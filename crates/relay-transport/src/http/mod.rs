//! HTTP transport capabilities.

mod pending;
mod server;

pub use pending::PendingRequests;
pub use server::HttpServerCapabilityImpl;
