//! Unified error types for the Relay core.
//!
//! Adapter-specific failures (field validation, rendering) are defined by the
//! adapters themselves and converted into [`AdapterError`] at the boundary.

use thiserror::Error;

// =============================================================================
// Transport Errors
// =============================================================================

/// Errors that can occur in transport operations.
#[derive(Debug, Clone, Error)]
pub enum TransportError {
    /// Binding the listener failed.
    #[error("failed to bind {addr}: {reason}")]
    BindFailed {
        /// The address that could not be bound.
        addr: String,
        /// Reason for failure.
        reason: String,
    },

    /// The capability has not been started yet.
    #[error("transport '{transport}' not available")]
    NotAvailable {
        /// The transport type that's not available.
        transport: &'static str,
    },

    /// Invalid configuration.
    #[error("invalid transport configuration: {0}")]
    InvalidConfig(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(String),
}

impl From<std::io::Error> for TransportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

// =============================================================================
// Bus Errors
// =============================================================================

/// Errors raised when talking to the message bus.
#[derive(Debug, Clone, Error)]
pub enum BusError {
    /// The receiving side of the bus has gone away.
    #[error("message bus closed")]
    Closed,

    /// Publishing failed for another reason.
    #[error("failed to publish: {0}")]
    PublishFailed(String),
}

// =============================================================================
// Adapter Errors
// =============================================================================

/// Errors that can occur in adapter operations.
#[derive(Debug, Clone, Error)]
pub enum AdapterError {
    /// Inbound request parsing failed.
    #[error("failed to parse request: {reason}")]
    ParseError {
        /// Reason for failure.
        reason: String,
    },

    /// Adapter configuration is invalid.
    #[error("invalid adapter configuration: {0}")]
    Config(String),

    /// Internal adapter error.
    #[error("adapter error: {0}")]
    Internal(String),

    /// Transport error.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// Bus error.
    #[error(transparent)]
    Bus(#[from] BusError),
}

impl AdapterError {
    /// Creates an internal adapter error.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Creates a parse error.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::ParseError { reason: msg.into() }
    }

    /// Creates a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for transport operations.
pub type TransportResult<T> = Result<T, TransportError>;

/// Result type for adapter operations.
pub type AdapterResult<T> = Result<T, AdapterError>;

/// Result type for bus operations.
pub type BusResult<T> = Result<T, BusError>;
