//! Inbound normalization.
//!
//! Maps validated fields onto an [`InboundMessage`].

use relay_core::{AdapterError, AdapterResult, InboundMessage, SessionEvent, TransportMetadata};

use crate::extract::FieldValues;
use crate::provider::ProviderMap;
use crate::schema::{APPID_FIELD, AddressMode, MSISDN_FIELD, SessionIdSource, TYPE_FIELD, VariantProfile};

/// Transport type stamped on every inbound message.
pub const TRANSPORT_TYPE: &str = "ussd";

/// Maps the wire `type` code to a session event.
///
/// Release (`3`) and timeout (`4`) codes are not modelled and, like any
/// unknown code, start a new session.
pub fn classify_session_event(type_code: &str) -> SessionEvent {
    match type_code {
        "2" => SessionEvent::Resume,
        _ => SessionEvent::New,
    }
}

/// Resolves `(to_addr, content)` from the fields.
pub fn resolve_addresses(
    mode: &AddressMode,
    values: &FieldValues,
) -> (Option<String>, Option<String>) {
    match mode {
        AddressMode::Shortcode {
            destination,
            content,
        } => (values.get_owned(destination), values.get_owned(content)),
        AddressMode::Overloaded {
            overloaded,
            destination,
        } => match values.get_owned(destination) {
            // Session already has a destination: the overloaded field is text.
            Some(to_addr) => (Some(to_addr), values.get_owned(overloaded)),
            // Session start: the overloaded field is the destination.
            None => (values.get_owned(overloaded), None),
        },
    }
}

/// Everything the normalizer needs besides the request itself.
#[derive(Debug, Clone)]
pub struct Normalizer {
    profile: VariantProfile,
    providers: ProviderMap,
    transport_name: String,
}

impl Normalizer {
    /// Creates a normalizer.
    pub fn new(
        profile: VariantProfile,
        providers: ProviderMap,
        transport_name: impl Into<String>,
    ) -> Self {
        Self {
            profile,
            providers,
            transport_name: transport_name.into(),
        }
    }

    /// Returns the active profile.
    pub fn profile(&self) -> &VariantProfile {
        &self.profile
    }

    /// Builds the canonical inbound message.
    pub fn normalize(&self, message_id: &str, values: &FieldValues) -> AdapterResult<InboundMessage> {
        let from_addr = required(values, MSISDN_FIELD)?;
        let session_event = classify_session_event(&required(values, TYPE_FIELD)?);
        let (to_addr, content) = resolve_addresses(&self.profile.address_mode, values);

        let sessionid = match &self.profile.session_id {
            SessionIdSource::Field(name) => required(values, name)?,
            SessionIdSource::Placeholder(value) => value.clone(),
        };
        let transport_metadata = TransportMetadata {
            sessionid: Some(sessionid),
            appid: values.get_owned(APPID_FIELD),
        };

        let provider = self
            .profile
            .provider_field
            .as_deref()
            .and_then(|name| values.get(name))
            .map(|raw| self.providers.normalize(raw));

        Ok(InboundMessage {
            message_id: message_id.to_string(),
            from_addr,
            to_addr,
            content,
            session_event,
            provider,
            transport_name: self.transport_name.clone(),
            transport_type: TRANSPORT_TYPE.to_string(),
            transport_metadata,
        })
    }
}

fn required(values: &FieldValues, name: &str) -> AdapterResult<String> {
    values
        .get_owned(name)
        .ok_or_else(|| AdapterError::internal(format!("validated request lacks '{name}'")))
}
