//! Canonical message model shared by adapters and the message bus.
//!
//! Adapters translate a wire dialect into an [`InboundMessage`] and render an
//! [`OutboundMessage`] back onto the wire. Delivery outcomes of outbound
//! messages are reported as [`DeliveryEvent`]s.
//!
//! ```text
//! HTTP request ──▶ Adapter ──▶ InboundMessage ──▶ bus ──▶ application
//!                                                            │
//! HTTP response ◀── Adapter ◀── OutboundMessage ◀── bus ◀────┘
//!                     │
//!                     └──▶ DeliveryEvent (ack / nack) ──▶ bus
//! ```

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ============================================================================
// Session Event
// ============================================================================

/// Lifecycle signal of a USSD interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionEvent {
    /// The subscriber has just dialled in.
    #[default]
    New,
    /// The subscriber answered a prompt in an open session.
    Resume,
    /// The session is (or should be) terminated.
    Close,
}

impl SessionEvent {
    /// Returns the event name as it appears on the bus.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Resume => "resume",
            Self::Close => "close",
        }
    }

    /// Returns true unless this event ends the session.
    pub fn continues_session(&self) -> bool {
        !matches!(self, Self::Close)
    }
}

impl std::fmt::Display for SessionEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Transport Metadata
// ============================================================================

/// Correlation metadata threaded through a session.
///
/// The adapter never interprets these values beyond echoing them back on the
/// outbound leg.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TransportMetadata {
    /// Aggregator session identifier.
    pub sessionid: Option<String>,
    /// Aggregator application identifier.
    pub appid: Option<String>,
}

impl TransportMetadata {
    /// Creates metadata with the given session id and no application id.
    pub fn new(sessionid: impl Into<String>) -> Self {
        Self {
            sessionid: Some(sessionid.into()),
            appid: None,
        }
    }

    /// Sets the application id.
    pub fn with_appid(mut self, appid: impl Into<String>) -> Self {
        self.appid = Some(appid.into());
        self
    }
}

// ============================================================================
// Inbound Message
// ============================================================================

/// A normalized message received from a subscriber.
///
/// Created once per accepted request and handed to the bus; it is not
/// mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InboundMessage {
    /// Opaque correlation token assigned by the request layer.
    pub message_id: String,
    /// Subscriber address (MSISDN).
    pub from_addr: String,
    /// Destination address, usually the dialled USSD string.
    pub to_addr: Option<String>,
    /// Text typed by the subscriber, absent when a session starts.
    pub content: Option<String>,
    /// Session lifecycle signal.
    pub session_event: SessionEvent,
    /// Canonical network provider, if the dialect carries one.
    pub provider: Option<String>,
    /// Name of the transport that received the message.
    pub transport_name: String,
    /// Kind of transport (always `"ussd"` for this gateway).
    pub transport_type: String,
    /// Correlation metadata echoed back on replies.
    pub transport_metadata: TransportMetadata,
}

impl InboundMessage {
    /// Builds the reply to this message.
    ///
    /// Addresses are swapped, `in_reply_to` points at this message and the
    /// transport metadata is carried over so the adapter can correlate the
    /// reply with the still-open HTTP request.
    pub fn reply(&self, content: impl Into<String>, continue_session: bool) -> OutboundMessage {
        OutboundMessage {
            message_id: new_message_id(),
            to_addr: self.from_addr.clone(),
            from_addr: self.to_addr.clone(),
            in_reply_to: Some(self.message_id.clone()),
            content: Some(content.into()),
            session_event: if continue_session {
                SessionEvent::Resume
            } else {
                SessionEvent::Close
            },
            transport_name: self.transport_name.clone(),
            transport_metadata: self.transport_metadata.clone(),
        }
    }
}

// ============================================================================
// Outbound Message
// ============================================================================

/// A message produced by the application for delivery to a subscriber.
///
/// Consumed exactly once by the adapter named in `transport_name`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutboundMessage {
    /// Identifier of this outbound message, used for ack/nack.
    pub message_id: String,
    /// Subscriber address the reply is rendered for.
    pub to_addr: String,
    /// Originating address, if any.
    pub from_addr: Option<String>,
    /// Inbound message this replies to. Required by USSD transports.
    pub in_reply_to: Option<String>,
    /// Reply text.
    pub content: Option<String>,
    /// Whether the session continues or closes after this reply.
    pub session_event: SessionEvent,
    /// Adapter that must deliver this message.
    pub transport_name: String,
    /// Correlation metadata copied from the inbound message.
    pub transport_metadata: TransportMetadata,
}

impl OutboundMessage {
    /// Creates a non-reply outbound message with a fresh id.
    pub fn new(
        transport_name: impl Into<String>,
        to_addr: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            message_id: new_message_id(),
            to_addr: to_addr.into(),
            from_addr: None,
            in_reply_to: None,
            content: Some(content.into()),
            session_event: SessionEvent::Resume,
            transport_name: transport_name.into(),
            transport_metadata: TransportMetadata::default(),
        }
    }

    /// Sets the message id.
    pub fn with_message_id(mut self, message_id: impl Into<String>) -> Self {
        self.message_id = message_id.into();
        self
    }

    /// Sets the inbound message this replies to.
    pub fn with_in_reply_to(mut self, in_reply_to: impl Into<String>) -> Self {
        self.in_reply_to = Some(in_reply_to.into());
        self
    }

    /// Sets the transport metadata.
    pub fn with_metadata(mut self, metadata: TransportMetadata) -> Self {
        self.transport_metadata = metadata;
        self
    }

    /// Sets the session event.
    pub fn with_session_event(mut self, session_event: SessionEvent) -> Self {
        self.session_event = session_event;
        self
    }
}

// ============================================================================
// Delivery Events
// ============================================================================

/// Outcome of an outbound delivery attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event_type", rename_all = "lowercase")]
pub enum DeliveryEvent {
    /// The reply was handed to the aggregator.
    Ack {
        user_message_id: String,
        sent_message_id: String,
    },
    /// The reply could not be delivered.
    Nack {
        user_message_id: String,
        nack_reason: String,
    },
}

impl DeliveryEvent {
    /// Returns the id of the outbound message this event refers to.
    pub fn user_message_id(&self) -> &str {
        match self {
            Self::Ack {
                user_message_id, ..
            }
            | Self::Nack {
                user_message_id, ..
            } => user_message_id,
        }
    }
}

/// Generates a fresh opaque message id.
pub fn new_message_id() -> String {
    Uuid::new_v4().simple().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inbound() -> InboundMessage {
        InboundMessage {
            message_id: "abc".to_string(),
            from_addr: "273334444".to_string(),
            to_addr: Some("*1234#".to_string()),
            content: None,
            session_event: SessionEvent::New,
            provider: None,
            transport_name: "blastsms".to_string(),
            transport_type: "ussd".to_string(),
            transport_metadata: TransportMetadata::new("sid").with_appid("app"),
        }
    }

    #[test]
    fn test_reply_swaps_addresses_and_correlates() {
        let msg = inbound();
        let reply = msg.reply("hello", true);

        assert_eq!(reply.to_addr, "273334444");
        assert_eq!(reply.from_addr.as_deref(), Some("*1234#"));
        assert_eq!(reply.in_reply_to.as_deref(), Some("abc"));
        assert_eq!(reply.content.as_deref(), Some("hello"));
        assert_eq!(reply.session_event, SessionEvent::Resume);
        assert_eq!(reply.transport_name, "blastsms");
        assert_eq!(reply.transport_metadata, msg.transport_metadata);
        assert_ne!(reply.message_id, msg.message_id);
    }

    #[test]
    fn test_reply_closing_session() {
        let reply = inbound().reply("bye", false);
        assert_eq!(reply.session_event, SessionEvent::Close);
        assert!(!reply.session_event.continues_session());
    }

    #[test]
    fn test_delivery_event_serialization() {
        let nack = DeliveryEvent::Nack {
            user_message_id: "1".to_string(),
            nack_reason: "Outbound message is not a reply".to_string(),
        };
        let json = serde_json::to_value(&nack).unwrap();
        assert_eq!(json["event_type"], "nack");
        assert_eq!(json["nack_reason"], "Outbound message is not a reply");
        assert_eq!(nack.user_message_id(), "1");
    }
}
