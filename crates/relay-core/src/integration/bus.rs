//! Message bus contract.
//!
//! Adapters publish normalized inbound messages and delivery events through a
//! [`MessageBus`]. The bus itself (persistence, redelivery, routing to the
//! application) lives outside this crate; [`ChannelBus`] is an in-process
//! implementation backed by tokio channels.
//!
//! Ack and nack publication is synchronous and never waits on the consumer:
//! a USSD reply must not be held up by slow event storage.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::mpsc;
use tracing::warn;

use crate::foundation::error::{BusError, BusResult};
use crate::foundation::message::{DeliveryEvent, InboundMessage, OutboundMessage};

/// Publishing side of the message bus as seen by an adapter.
#[async_trait]
pub trait MessageBus: Send + Sync {
    /// Publishes a normalized inbound message.
    ///
    /// Resolves once the bus has accepted the message, not once the
    /// application has replied.
    async fn publish_message(&self, message: InboundMessage) -> BusResult<()>;

    /// Reports that an outbound message was delivered.
    fn publish_ack(&self, user_message_id: &str, sent_message_id: &str);

    /// Reports that an outbound message could not be delivered.
    fn publish_nack(&self, user_message_id: &str, reason: &str);
}

/// A shared message bus trait object.
pub type BoxedBus = Arc<dyn MessageBus>;

// =============================================================================
// Channel Bus
// =============================================================================

/// Application side of a [`ChannelBus`].
pub struct BusEndpoints {
    /// Inbound messages published by adapters.
    pub inbound: mpsc::Receiver<InboundMessage>,
    /// Delivery events published by adapters.
    pub events: mpsc::Receiver<DeliveryEvent>,
    /// Submits outbound messages for delivery.
    pub outbound: mpsc::Sender<OutboundMessage>,
}

/// In-process message bus backed by bounded tokio channels.
pub struct ChannelBus {
    inbound_tx: mpsc::Sender<InboundMessage>,
    events_tx: mpsc::Sender<DeliveryEvent>,
}

impl ChannelBus {
    /// Creates a bus and returns the adapter side, the application side and
    /// the outbound queue consumed by the runtime.
    pub fn new(
        buffer_size: usize,
    ) -> (Arc<Self>, BusEndpoints, mpsc::Receiver<OutboundMessage>) {
        let (inbound_tx, inbound_rx) = mpsc::channel(buffer_size);
        let (events_tx, events_rx) = mpsc::channel(buffer_size);
        let (outbound_tx, outbound_rx) = mpsc::channel(buffer_size);

        let bus = Arc::new(Self {
            inbound_tx,
            events_tx,
        });

        let endpoints = BusEndpoints {
            inbound: inbound_rx,
            events: events_rx,
            outbound: outbound_tx,
        };

        (bus, endpoints, outbound_rx)
    }

    fn dispatch_event(&self, event: DeliveryEvent) {
        if let Err(e) = self.events_tx.try_send(event) {
            let event = match &e {
                mpsc::error::TrySendError::Full(ev) | mpsc::error::TrySendError::Closed(ev) => ev,
            };
            warn!(
                user_message_id = %event.user_message_id(),
                error = %e,
                "Dropping delivery event",
            );
        }
    }
}

#[async_trait]
impl MessageBus for ChannelBus {
    async fn publish_message(&self, message: InboundMessage) -> BusResult<()> {
        self.inbound_tx
            .send(message)
            .await
            .map_err(|_| BusError::Closed)
    }

    fn publish_ack(&self, user_message_id: &str, sent_message_id: &str) {
        self.dispatch_event(DeliveryEvent::Ack {
            user_message_id: user_message_id.to_string(),
            sent_message_id: sent_message_id.to_string(),
        });
    }

    fn publish_nack(&self, user_message_id: &str, reason: &str) {
        self.dispatch_event(DeliveryEvent::Nack {
            user_message_id: user_message_id.to_string(),
            nack_reason: reason.to_string(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::message::{SessionEvent, TransportMetadata};

    #[tokio::test]
    async fn test_publish_message_reaches_application() {
        let (bus, mut endpoints, _outbound) = ChannelBus::new(8);

        let message = InboundMessage {
            message_id: "1".to_string(),
            from_addr: "27000".to_string(),
            to_addr: Some("*120#".to_string()),
            content: None,
            session_event: SessionEvent::New,
            provider: None,
            transport_name: "test".to_string(),
            transport_type: "ussd".to_string(),
            transport_metadata: TransportMetadata::default(),
        };
        bus.publish_message(message.clone()).await.unwrap();

        assert_eq!(endpoints.inbound.recv().await, Some(message));
    }

    #[tokio::test]
    async fn test_ack_and_nack_are_fire_and_forget() {
        let (bus, mut endpoints, _outbound) = ChannelBus::new(8);

        bus.publish_ack("a", "a");
        bus.publish_nack("b", "Outbound message has no content.");

        assert_eq!(
            endpoints.events.recv().await,
            Some(DeliveryEvent::Ack {
                user_message_id: "a".to_string(),
                sent_message_id: "a".to_string(),
            })
        );
        assert_eq!(
            endpoints.events.recv().await,
            Some(DeliveryEvent::Nack {
                user_message_id: "b".to_string(),
                nack_reason: "Outbound message has no content.".to_string(),
            })
        );
    }

    #[tokio::test]
    async fn test_publish_after_close_fails() {
        let (bus, endpoints, _outbound) = ChannelBus::new(1);
        drop(endpoints);

        let message = InboundMessage {
            message_id: "1".to_string(),
            from_addr: "27000".to_string(),
            to_addr: None,
            content: None,
            session_event: SessionEvent::New,
            provider: None,
            transport_name: "test".to_string(),
            transport_type: "ussd".to_string(),
            transport_metadata: TransportMetadata::default(),
        };
        assert!(matches!(
            bus.publish_message(message).await,
            Err(BusError::Closed)
        ));

        // Does not panic or block.
        bus.publish_nack("1", "gone");
    }
}
