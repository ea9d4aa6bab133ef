//! Runtime error types.

use thiserror::Error;

use crate::config::ConfigError;

/// Errors that can occur during runtime operations.
#[derive(Error, Debug)]
pub enum RuntimeError {
    /// Adapter configuration deserialization failed.
    #[error("Failed to deserialize adapter config: {0}")]
    AdapterConfigDeserialize(String),

    /// Adapter error.
    #[error("Adapter error: {0}")]
    Adapter(#[from] relay_core::AdapterError),

    /// Configuration error.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// An adapter with the same name is already registered.
    #[error("Adapter already registered: {0}")]
    AdapterExists(String),

    /// Two adapters claim the same transport name.
    #[error("Transport name '{transport}' already used by adapter '{adapter}'")]
    TransportConflict { transport: String, adapter: String },

    /// No adapter started successfully.
    #[error("No adapter could be started")]
    NoAdapterStarted,
}

/// Result type for runtime operations.
pub type RuntimeResult<T> = Result<T, RuntimeError>;
