//! BlastSMS adapter.
//!
//! Bridges the aggregator's HTTP dialect and the message bus:
//!
//! ```text
//! request ─▶ extract ─▶ validate ─┬─▶ normalize ─▶ bus.publish_message
//!                                 └─▶ 400 JSON
//! outbound ─▶ check ─▶ render ─▶ finish_request ─┬─▶ ack
//!               └──────────┴──────────┴──────────┴─▶ nack
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use relay_runtime::RelayRuntime;
//! use relay_adapter_blastsms::BlastSmsAdapter;
//!
//! let runtime = RelayRuntime::load_config()?;
//! runtime.register_adapter::<BlastSmsAdapter>().await?;
//! runtime.run().await?;
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use relay_core::{
    Adapter, AdapterContext, AdapterError, AdapterResult, BoxedBus, BoxedRequestHandler,
    ConfigurableAdapter, HttpReply, HttpServerCapability, OutboundMessage, RawRequest,
    RequestHandler, TransportError,
};
use tracing::{debug, error, info, instrument, warn};

use crate::config::{AppIdFallback, BlastSmsConfig, Encoding, Variant};
use crate::error::{ExtractError, OutboundError};
use crate::extract::{FieldValues, extract, validate};
use crate::inbound::Normalizer;
use crate::outbound::{AppIdPolicy, check, render};
use crate::provider::ProviderMap;

/// Transport name stamped on inbound messages and used to route replies.
pub const TRANSPORT_NAME: &str = "blastsms";

/// Characters left unescaped in the callback query value.
const QUERY_VALUE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'_')
    .remove(b'.')
    .remove(b'-')
    .remove(b'/');

/// The BlastSMS USSD adapter.
pub struct BlastSmsAdapter {
    inner: Arc<Inner>,
}

/// Collaborators bound in `on_start`, released in `on_shutdown`.
#[derive(Clone)]
struct Links {
    server: Arc<dyn HttpServerCapability>,
    bus: BoxedBus,
}

struct Inner {
    config: BlastSmsConfig,
    normalizer: Normalizer,
    appid_policy: AppIdPolicy,
    links: RwLock<Option<Links>>,
}

impl BlastSmsAdapter {
    /// Creates an adapter after validating its configuration.
    pub fn new(config: BlastSmsConfig) -> AdapterResult<Self> {
        config.validate()?;

        let normalizer = Normalizer::new(
            config.profile(),
            ProviderMap::new(config.provider_mappings.clone()),
            TRANSPORT_NAME,
        );
        let appid_policy = AppIdPolicy {
            default_appid: config.default_appid.clone(),
            fallback: config.appid_fallback,
        };

        Ok(Self {
            inner: Arc::new(Inner {
                config,
                normalizer,
                appid_policy,
                links: RwLock::new(None),
            }),
        })
    }

    /// Creates an adapter builder.
    pub fn builder(base_url: impl Into<String>) -> BlastSmsAdapterBuilder {
        BlastSmsAdapterBuilder {
            config: BlastSmsConfig::new(base_url),
        }
    }

    /// Returns the adapter configuration.
    pub fn config(&self) -> &BlastSmsConfig {
        &self.inner.config
    }

    /// URL the aggregator should call for sessions on `to_addr`.
    pub fn callback_url(&self, to_addr: &str) -> String {
        let config = &self.inner.config;
        format!(
            "{}{}?to_addr={}",
            config.base_url.trim_end_matches('/'),
            config.web_path,
            utf8_percent_encode(to_addr, QUERY_VALUE)
        )
    }
}

/// Builder for [`BlastSmsAdapter`].
pub struct BlastSmsAdapterBuilder {
    config: BlastSmsConfig,
}

impl BlastSmsAdapterBuilder {
    /// Sets the listen address.
    pub fn listen(mut self, host: impl Into<String>, port: u16) -> Self {
        self.config.web_host = host.into();
        self.config.web_port = port;
        self
    }

    /// Sets the request path.
    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.config.web_path = path.into();
        self
    }

    /// Selects the dialect revision.
    pub fn variant(mut self, variant: Variant) -> Self {
        self.config.variant = variant;
        self
    }

    /// Selects the request encoding.
    pub fn encoding(mut self, encoding: Encoding) -> Self {
        self.config.encoding = encoding;
        self
    }

    /// Sets the default application id.
    pub fn default_appid(mut self, appid: impl Into<String>) -> Self {
        self.config.default_appid = Some(appid.into());
        self
    }

    /// Sets the application id fallback.
    pub fn appid_fallback(mut self, fallback: AppIdFallback) -> Self {
        self.config.appid_fallback = fallback;
        self
    }

    /// Adds a provider mapping.
    pub fn provider_mapping(mut self, raw: impl Into<String>, canonical: impl Into<String>) -> Self {
        self.config
            .provider_mappings
            .insert(raw.into(), canonical.into());
        self
    }

    /// Replaces all provider mappings.
    pub fn provider_mappings(mut self, mappings: HashMap<String, String>) -> Self {
        self.config.provider_mappings = mappings;
        self
    }

    /// Builds the adapter.
    pub fn build(self) -> AdapterResult<Arc<BlastSmsAdapter>> {
        BlastSmsAdapter::new(self.config).map(Arc::new)
    }
}

#[async_trait]
impl Adapter for BlastSmsAdapter {
    fn name() -> &'static str {
        "blastsms"
    }

    fn transport_name(&self) -> &str {
        TRANSPORT_NAME
    }

    async fn on_start(&self, ctx: &mut AdapterContext) -> AdapterResult<()> {
        let server = ctx
            .transport()
            .http_server()
            .cloned()
            .ok_or(TransportError::NotAvailable {
                transport: "http-server",
            })?;

        {
            let mut links = self.inner.links.write();
            if links.is_some() {
                return Err(AdapterError::internal("BlastSMS adapter already started"));
            }
            *links = Some(Links {
                server: Arc::clone(&server),
                bus: Arc::clone(ctx.bus()),
            });
        }

        let config = &self.inner.config;
        let http_config = config.http_config();
        let handler: BoxedRequestHandler = Arc::clone(&self.inner) as BoxedRequestHandler;
        let handle = match server.listen(&http_config, handler).await {
            Ok(handle) => handle,
            Err(e) => {
                self.inner.links.write().take();
                return Err(e.into());
            }
        };

        info!(
            addr = %handle.local_addr,
            path = %http_config.normalized_path(),
            variant = ?config.variant,
            encoding = ?config.encoding,
            "BlastSMS adapter listening"
        );
        ctx.add_listener(handle);
        Ok(())
    }

    async fn handle_outbound(&self, message: OutboundMessage) {
        self.inner.deliver(&message);
    }

    async fn on_shutdown(&self, _ctx: &mut AdapterContext) -> AdapterResult<()> {
        self.inner.links.write().take();
        info!("BlastSMS adapter shutting down");
        Ok(())
    }
}

impl ConfigurableAdapter for BlastSmsAdapter {
    type Config = BlastSmsConfig;

    fn from_config(config: Self::Config) -> AdapterResult<Arc<Self>> {
        Self::new(config).map(Arc::new)
    }
}

impl Inner {
    fn links(&self) -> Option<Links> {
        self.links.read().clone()
    }

    fn extract_values(&self, request: &RawRequest) -> Result<FieldValues, ExtractError> {
        let fields = extract(request, self.config.encoding)?;
        Ok(validate(&fields, &self.normalizer.profile().schema)?)
    }

    #[instrument(
        name = "blastsms_reply",
        skip_all,
        fields(message_id = %message.message_id, in_reply_to = ?message.in_reply_to)
    )]
    fn deliver(&self, message: &OutboundMessage) {
        let Some(links) = self.links() else {
            error!(message_id = %message.message_id, "BlastSMS adapter not started, dropping reply");
            return;
        };

        match self.complete(&links, message) {
            Ok(()) => links
                .bus
                .publish_ack(&message.message_id, &message.message_id),
            Err(e) => {
                warn!(message_id = %message.message_id, reason = %e, "Reply not delivered");
                links.bus.publish_nack(&message.message_id, &e.to_string());
            }
        }
    }

    fn complete(&self, links: &Links, message: &OutboundMessage) -> Result<(), OutboundError> {
        let reply = check(message)?;
        let body = render(&reply, &self.appid_policy)?;
        debug!(in_reply_to = %reply.in_reply_to, body = %body, "Rendered BlastSMS reply");

        links
            .server
            .finish_request(reply.in_reply_to, HttpReply::ok_xml(body))
            .map(|_| ())
            .ok_or(OutboundError::ResponseFailed)
    }
}

#[async_trait]
impl RequestHandler for Inner {
    #[instrument(name = "blastsms_request", skip(self, request), fields(method = %request.method))]
    async fn on_request(&self, message_id: &str, request: RawRequest) {
        let Some(links) = self.links() else {
            error!(message_id = %message_id, "BlastSMS adapter not started, dropping request");
            return;
        };

        let values = match self.extract_values(&request) {
            Ok(values) => values,
            Err(e) => {
                info!(message_id = %message_id, error = %e, "Rejecting BlastSMS request");
                links
                    .server
                    .finish_request(message_id, HttpReply::json(400, &e.to_json()));
                return;
            }
        };

        let message = match self.normalizer.normalize(message_id, &values) {
            Ok(message) => message,
            Err(e) => {
                error!(message_id = %message_id, error = %e, "Failed to normalize request");
                links.server.finish_request(message_id, HttpReply::empty(500));
                return;
            }
        };

        info!(
            message_id = %message_id,
            from = %message.from_addr,
            to = message.to_addr.as_deref().unwrap_or_default(),
            "BlastSMS inbound"
        );

        if let Err(e) = links.bus.publish_message(message).await {
            error!(message_id = %message_id, error = %e, "Failed to publish inbound message");
            links.server.finish_request(message_id, HttpReply::empty(503));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use relay_core::{
        BusEndpoints, ChannelBus, DeliveryEvent, HttpServerConfig, InboundMessage, ListenerHandle,
        SessionEvent, TransportContext, TransportMetadata, TransportResult, new_message_id,
    };
    use std::collections::HashSet;
    use std::sync::Mutex;
    use tokio_util::sync::CancellationToken;
    use tracing_test::traced_test;

    /// In-memory stand-in for the HTTP server capability.
    #[derive(Default)]
    struct FakeHttpServer {
        handler: Mutex<Option<BoxedRequestHandler>>,
        parked: Mutex<HashSet<String>>,
        replies: Mutex<HashMap<String, HttpReply>>,
    }

    impl FakeHttpServer {
        async fn request(&self, request: RawRequest) -> String {
            let message_id = new_message_id();
            self.parked.lock().unwrap().insert(message_id.clone());
            let handler = self.handler.lock().unwrap().clone().unwrap();
            handler.on_request(&message_id, request).await;
            message_id
        }

        fn reply(&self, message_id: &str) -> Option<HttpReply> {
            self.replies.lock().unwrap().get(message_id).cloned()
        }

        /// Simulates a client that gave up waiting.
        fn abandon(&self, message_id: &str) {
            self.parked.lock().unwrap().remove(message_id);
        }
    }

    #[async_trait]
    impl HttpServerCapability for FakeHttpServer {
        async fn listen(
            &self,
            config: &HttpServerConfig,
            handler: BoxedRequestHandler,
        ) -> TransportResult<ListenerHandle> {
            *self.handler.lock().unwrap() = Some(handler);
            Ok(ListenerHandle::new(
                "fake",
                config.bind_addr(),
                CancellationToken::new(),
            ))
        }

        fn finish_request(&self, message_id: &str, reply: HttpReply) -> Option<String> {
            if !self.parked.lock().unwrap().remove(message_id) {
                return None;
            }
            self.replies
                .lock()
                .unwrap()
                .insert(message_id.to_string(), reply);
            Some(message_id.to_string())
        }

        fn pending_count(&self) -> usize {
            self.parked.lock().unwrap().len()
        }
    }

    struct Harness {
        adapter: Arc<BlastSmsAdapter>,
        server: Arc<FakeHttpServer>,
        endpoints: BusEndpoints,
        ctx: AdapterContext,
    }

    impl Harness {
        async fn start(builder: BlastSmsAdapterBuilder) -> Self {
            let adapter = builder.build().unwrap();
            let server = Arc::new(FakeHttpServer::default());
            let (bus, endpoints, _outbound) = ChannelBus::new(16);

            let transport = TransportContext::new().with_http_server(server.clone());
            let mut ctx = AdapterContext::new(transport, bus);
            adapter.on_start(&mut ctx).await.unwrap();
            assert_eq!(ctx.listeners().len(), 1);

            Self {
                adapter,
                server,
                endpoints,
                ctx,
            }
        }

        async fn inbound(&mut self, request: RawRequest) -> InboundMessage {
            self.server.request(request).await;
            self.endpoints.inbound.recv().await.unwrap()
        }

        async fn event(&mut self) -> DeliveryEvent {
            self.endpoints.events.recv().await.unwrap()
        }
    }

    fn session_request(query: &str) -> RawRequest {
        RawRequest::new("GET", "/api/v1/blastsms/ussd").with_query(query)
    }

    fn xml_request(body: &str) -> RawRequest {
        RawRequest::new("POST", "/api/v1/blastsms/ussd")
            .with_header("Content-Type", "text/xml")
            .with_body(body.to_string())
    }

    fn builder() -> BlastSmsAdapterBuilder {
        BlastSmsAdapter::builder("http://www.example.com/").path("/api/v1/blastsms/ussd")
    }

    #[tokio::test]
    async fn test_session_begin_and_reply() {
        let mut h = Harness::start(builder()).await;

        let inbound = h
            .inbound(session_request(
                "msisdn=2341234567&shortcode=%2A1234%23&sessionid=sess1234&type=1",
            ))
            .await;
        assert_eq!(inbound.from_addr, "2341234567");
        assert_eq!(inbound.to_addr.as_deref(), Some("*1234#"));
        assert_eq!(inbound.content, None);
        assert_eq!(inbound.session_event, SessionEvent::New);
        assert_eq!(inbound.transport_name, "blastsms");
        assert_eq!(inbound.transport_type, "ussd");
        assert_eq!(inbound.transport_metadata, TransportMetadata::new("sess1234"));

        let reply = inbound.reply("We are the Knights Who Say ... Ni!", true);
        h.adapter.handle_outbound(reply.clone()).await;

        let response = h.server.reply(&inbound.message_id).unwrap();
        assert_eq!(response.status, 200);
        assert_eq!(response.content_type.as_deref(), Some("text/xml; charset=utf-8"));
        assert_eq!(
            response.text(),
            format!(
                "<ussdresp><msisdn>2341234567</msisdn><sessionid>sess1234</sessionid>\
                 <appid>{}</appid><type>2</type><msg>We are the Knights Who Say ... Ni!</msg>\
                 </ussdresp>",
                inbound.message_id
            )
        );
        assert_eq!(
            h.event().await,
            DeliveryEvent::Ack {
                user_message_id: reply.message_id.clone(),
                sent_message_id: reply.message_id,
            }
        );
    }

    #[tokio::test]
    async fn test_session_resume_and_close() {
        let mut h = Harness::start(builder()).await;

        let inbound = h
            .inbound(session_request(
                "msisdn=2341234567&shortcode=%2A1234%23&sessionid=sess1234&type=2&msg=1&appid=quiz",
            ))
            .await;
        assert_eq!(inbound.session_event, SessionEvent::Resume);
        assert_eq!(inbound.content.as_deref(), Some("1"));
        assert_eq!(inbound.transport_metadata.appid.as_deref(), Some("quiz"));

        h.adapter
            .handle_outbound(inbound.reply("Thrëë, my lord.", false))
            .await;

        let body = h.server.reply(&inbound.message_id).unwrap().text();
        assert_eq!(
            body,
            "<ussdresp><msisdn>2341234567</msisdn><sessionid>sess1234</sessionid>\
             <appid>quiz</appid><type>3</type><msg>Thrëë, my lord.</msg></ussdresp>"
        );
        assert!(matches!(h.event().await, DeliveryEvent::Ack { .. }));
    }

    #[tokio::test]
    async fn test_xml_request_shortcode_variant() {
        let mut h = Harness::start(
            builder()
                .variant(Variant::Shortcode)
                .encoding(Encoding::Xml)
                .appid_fallback(AppIdFallback::Empty),
        )
        .await;

        let inbound = h
            .inbound(xml_request(
                "<ussd><msisdn>2341234567</msisdn><shortcode>*1234#</shortcode><type>1</type></ussd>",
            ))
            .await;
        assert_eq!(inbound.session_event, SessionEvent::New);
        assert_eq!(inbound.to_addr.as_deref(), Some("*1234#"));
        assert_eq!(inbound.content, None);

        h.adapter
            .handle_outbound(inbound.reply("We are the Knights Who Say ... Ni!", true))
            .await;

        assert_eq!(
            h.server.reply(&inbound.message_id).unwrap().text(),
            "<ussdresp><msisdn>2341234567</msisdn><sessionid>var_sessionid</sessionid>\
             <appid/><type>2</type><msg>We are the Knights Who Say ... Ni!</msg></ussdresp>"
        );
    }

    #[tokio::test]
    async fn test_provider_variant() {
        let mut h = Harness::start(
            builder()
                .variant(Variant::Provider)
                .provider_mapping("MTN-NG", "mtn")
                .default_appid("default-app"),
        )
        .await;

        let first = h
            .inbound(session_request(
                "msisdn=2341234567&provider=MTN-NG&type=1&request=%2A1234%23",
            ))
            .await;
        assert_eq!(first.to_addr.as_deref(), Some("*1234#"));
        assert_eq!(first.content, None);
        assert_eq!(first.provider.as_deref(), Some("mtn"));

        let second = h
            .inbound(session_request(
                "msisdn=2341234567&provider=MTN-NG&type=2&request=2&to_addr=%2A1234%23",
            ))
            .await;
        assert_eq!(second.to_addr.as_deref(), Some("*1234#"));
        assert_eq!(second.content.as_deref(), Some("2"));

        h.adapter.handle_outbound(second.reply("Done", false)).await;
        let body = h.server.reply(&second.message_id).unwrap().text();
        assert!(body.contains("<appid>default-app</appid>"));
    }

    #[tokio::test]
    async fn test_missing_parameters() {
        let mut h = Harness::start(builder()).await;

        let id = h.server.request(session_request("type=1")).await;

        let response = h.server.reply(&id).unwrap();
        assert_eq!(response.status, 400);
        assert_eq!(
            serde_json::from_slice::<serde_json::Value>(&response.body).unwrap(),
            serde_json::json!({"missing_parameter": ["msisdn", "sessionid", "shortcode"]})
        );
        assert!(h.endpoints.inbound.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_missing_and_unexpected_parameters() {
        let mut h = Harness::start(builder()).await;

        let id = h
            .server
            .request(session_request("type=1&foo=f&bar=b&msisdn=2341234567"))
            .await;

        let response = h.server.reply(&id).unwrap();
        assert_eq!(response.status, 400);
        assert_eq!(
            serde_json::from_slice::<serde_json::Value>(&response.body).unwrap(),
            serde_json::json!({
                "missing_parameter": ["sessionid", "shortcode"],
                "unexpected_parameter": ["bar", "foo"],
            })
        );
        assert!(h.endpoints.inbound.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_malformed_xml() {
        let mut h = Harness::start(builder().encoding(Encoding::Xml)).await;

        let id = h.server.request(xml_request("<ussd><msisdn>1</ussd>")).await;

        let response = h.server.reply(&id).unwrap();
        assert_eq!(response.status, 400);
        let body: serde_json::Value = serde_json::from_slice(&response.body).unwrap();
        assert!(body.get("invalid_request").is_some());
        assert!(h.endpoints.inbound.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_reply_without_content() {
        let mut h = Harness::start(builder()).await;
        let inbound = h
            .inbound(session_request(
                "msisdn=2341234567&shortcode=%2A1234%23&sessionid=sess1234&type=1",
            ))
            .await;

        let mut reply = inbound.reply("", true);
        reply.content = None;
        h.adapter.handle_outbound(reply.clone()).await;

        assert_eq!(
            h.event().await,
            DeliveryEvent::Nack {
                user_message_id: reply.message_id,
                nack_reason: "Outbound message has no content.".to_string(),
            }
        );
        assert!(h.server.reply(&inbound.message_id).is_none());
    }

    #[tokio::test]
    async fn test_reply_without_in_reply_to() {
        let mut h = Harness::start(builder()).await;

        let message = OutboundMessage::new(TRANSPORT_NAME, "2341234567", "going nowhere");
        h.adapter.handle_outbound(message.clone()).await;

        assert_eq!(
            h.event().await,
            DeliveryEvent::Nack {
                user_message_id: message.message_id,
                nack_reason: "Outbound message is not a reply".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn test_reply_to_abandoned_request() {
        let mut h = Harness::start(builder()).await;
        let inbound = h
            .inbound(session_request(
                "msisdn=2341234567&shortcode=%2A1234%23&sessionid=sess1234&type=1",
            ))
            .await;
        h.server.abandon(&inbound.message_id);

        let reply = inbound.reply("Too late", true);
        h.adapter.handle_outbound(reply.clone()).await;

        assert_eq!(
            h.event().await,
            DeliveryEvent::Nack {
                user_message_id: reply.message_id,
                nack_reason: "Response to http request failed.".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn test_start_without_http_server() {
        let adapter = builder().build().unwrap();
        let (bus, _endpoints, _outbound) = ChannelBus::new(4);
        let mut ctx = AdapterContext::new(TransportContext::new(), bus);

        assert!(adapter.on_start(&mut ctx).await.is_err());
    }

    #[tokio::test]
    async fn test_restart_after_shutdown() {
        let adapter = builder().build().unwrap();
        let server = Arc::new(FakeHttpServer::default());
        let (bus, mut endpoints, _outbound) = ChannelBus::new(16);
        let transport = TransportContext::new().with_http_server(server.clone());
        let mut ctx = AdapterContext::new(transport, bus);

        adapter.on_start(&mut ctx).await.unwrap();
        assert!(adapter.on_start(&mut ctx).await.is_err());

        adapter.on_shutdown(&mut ctx).await.unwrap();
        ctx.stop_listeners();
        adapter.on_start(&mut ctx).await.unwrap();
        assert_eq!(ctx.listeners().len(), 1);

        server
            .request(session_request(
                "msisdn=2341234567&shortcode=%2A1234%23&sessionid=sess1234&type=1",
            ))
            .await;
        let inbound = endpoints.inbound.recv().await.unwrap();
        let reply = inbound.reply("Back again", true);
        adapter.handle_outbound(reply.clone()).await;

        assert!(server.reply(&inbound.message_id).is_some());
        assert!(matches!(
            endpoints.events.recv().await,
            Some(DeliveryEvent::Ack { .. })
        ));
    }

    #[tokio::test]
    async fn test_outbound_after_shutdown_is_dropped() {
        let mut h = Harness::start(builder()).await;
        h.adapter.on_shutdown(&mut h.ctx).await.unwrap();

        h.adapter
            .handle_outbound(OutboundMessage::new(TRANSPORT_NAME, "2341234567", "hi"))
            .await;
        assert!(h.endpoints.events.try_recv().is_err());
    }

    #[tokio::test]
    #[traced_test]
    async fn test_request_logs_within_span() {
        let h = Harness::start(builder()).await;

        h.server.request(session_request("type=1")).await;

        assert!(logs_contain("blastsms_request"));
        assert!(logs_contain("Rejecting BlastSMS request"));
    }

    #[tokio::test]
    async fn test_outbound_before_start_is_dropped() {
        let adapter = builder().build().unwrap();
        adapter
            .handle_outbound(OutboundMessage::new(TRANSPORT_NAME, "2341234567", "hi"))
            .await;
    }

    #[test]
    fn test_callback_url() {
        let adapter = builder().build().unwrap();
        assert_eq!(
            adapter.callback_url("*1234#"),
            "http://www.example.com/api/v1/blastsms/ussd?to_addr=%2A1234%23"
        );
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        assert!(BlastSmsAdapter::builder("").build().is_err());
        assert!(BlastSmsAdapter::from_config(BlastSmsConfig::new("http://localhost")).is_ok());
    }
}
