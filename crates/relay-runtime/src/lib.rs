//! Relay Runtime - Orchestration layer for the Relay USSD gateway.
//!
//! This crate provides:
//! - Runtime orchestration (`RelayRuntime`)
//! - Layered configuration loading (`ConfigLoader`)
//! - Logging configuration (`LoggingBuilder`)
//! - Routing of outbound messages to the adapter that owns their transport
//!
//! ```ignore
//! use relay_runtime::RelayRuntime;
//! use relay_adapter_blastsms::BlastSmsAdapter;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let runtime = RelayRuntime::new();
//!     runtime.register_adapter::<BlastSmsAdapter>().await?;
//!
//!     let endpoints = runtime.take_endpoints().await.expect("endpoints");
//!     tokio::spawn(application(endpoints));
//!
//!     // Run until Ctrl+C
//!     runtime.run().await?;
//!     Ok(())
//! }
//! ```
//!
//! # Configuration
//!
//! Configuration is layered: defaults, `relay.<profile>.toml`, `relay.toml`,
//! then `RELAY_*` environment variables with `__` as the nesting separator. Each adapter reads its own section:
//!
//! ```toml
//! [logging]
//! level = "debug"
//!
//! [adapters.blastsms]
//! base_url = "https://gateway.example.com"
//! web_port = 8080
//! web_path = "/api/v1/blastsms/ussd"
//! ```

pub mod config;
pub mod error;
pub mod logging;
pub mod runtime;

// Re-exports
pub use config::{ConfigError, ConfigLoader, ConfigResult, RelayConfig};
pub use error::{RuntimeError, RuntimeResult};
pub use logging::{LoggingBuilder, SpanEvents};
pub use runtime::{RelayRuntime, RuntimeBuilder};

// Re-export tracing for use by other crates
pub use tracing;
pub use tracing_subscriber;

/// Prelude module for convenient imports.
///
/// This provides all the commonly used logging macros:
/// - `trace!`, `debug!`, `info!`, `warn!`, `error!`
/// - `span`, `event`
/// - `instrument` attribute
/// - `Level` for span creation
pub mod prelude {
    pub use tracing::{Level, debug, error, info, instrument, span, trace, warn};
}
