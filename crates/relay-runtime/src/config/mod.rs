//! Configuration module for the Relay runtime.
//!
//! Layered loading (defaults, files, environment) via figment plus
//! validation of the runtime-level settings. Adapter sections are kept as
//! raw values and deserialized by the adapter that owns them.

pub mod error;
pub mod loader;
pub mod schema;
pub mod validation;

pub use error::{ConfigError, ConfigResult};
pub use loader::{ConfigLoader, Profile, load_config, load_config_from_file};
pub use schema::{
    BusConfig, LogFormat, LogLevel, LogOutput, LoggingConfig, RelayConfig, SpanEventConfig,
};
pub use validation::validate_config;
