//! # Relay Adapter for BlastSMS
//!
//! Speaks the BlastSMS aggregator's USSD dialect: form-encoded or flat XML
//! requests in, `<ussdresp>` documents out.
//!
//! ## Overview
//!
//! - [`extract`]: request fields and schema validation
//! - [`inbound`]: session type codes, destination/text resolution
//! - [`provider`]: provider name mapping
//! - [`outbound`]: reply checks, application id resolution, rendering
//! - [`BlastSmsAdapter`]: wiring to the HTTP capability and the message bus
//!
//! ## Dialect Revisions
//!
//! | variant     | expected fields                         | optional fields            |
//! |-------------|-----------------------------------------|----------------------------|
//! | `shortcode` | msisdn, shortcode, type                 | msg, appid                 |
//! | `session`   | msisdn, shortcode, sessionid, type      | msg, appid                 |
//! | `provider`  | msisdn, provider, type                  | request, appid, to_addr    |
//!
//! ## Known Limitation
//!
//! Inbound type codes `3` (release) and `4` (timeout) are treated as the
//! start of a new session.

pub mod adapter;
pub mod config;
pub mod error;
pub mod extract;
pub mod inbound;
pub mod outbound;
pub mod provider;
pub mod schema;

pub use adapter::{BlastSmsAdapter, BlastSmsAdapterBuilder, TRANSPORT_NAME};
pub use config::{AppIdFallback, BlastSmsConfig, Encoding, Variant};
pub use error::{ExtractError, OutboundError, ValidationError};
pub use extract::{FieldValues, RawFields};
pub use provider::ProviderMap;
pub use schema::{FieldSchema, VariantProfile};
