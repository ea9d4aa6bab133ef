//! HTTP server capability for request/response transports.
//!
//! USSD aggregators speak synchronous HTTP: the aggregator opens a request and
//! waits for the reply body while the application decides what to say. The
//! capability defined here parks each request under an opaque `message_id`
//! and lets the adapter complete it later:
//!
//! ```text
//! aggregator ──HTTP──▶ HttpServerCapability ──on_request(id, req)──▶ adapter
//!                            ▲                                         │
//!                            └──────── finish_request(id, reply) ◀─────┘
//! ```
//!
//! Correlating the reply with the parked connection and enforcing the timeout
//! is the capability's job; the adapter only ever deals in `message_id`s.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use tokio_util::sync::CancellationToken;

use crate::foundation::error::TransportResult;
use crate::integration::transport::HttpServerConfig;

// =============================================================================
// Request / Reply
// =============================================================================

/// An inbound HTTP request as seen by an adapter.
#[derive(Debug, Clone, Default)]
pub struct RawRequest {
    /// HTTP method in upper case (`GET`, `POST`).
    pub method: String,
    /// Request path.
    pub path: String,
    /// Raw (still percent-encoded) query string, without the leading `?`.
    pub query: Option<String>,
    /// Request headers with lower-cased names.
    pub headers: HashMap<String, String>,
    /// Request body.
    pub body: Bytes,
}

impl RawRequest {
    /// Creates a request with the given method and path.
    pub fn new(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
            ..Default::default()
        }
    }

    /// Sets the query string.
    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    /// Adds a header. The name is lower-cased.
    pub fn with_header(mut self, name: impl AsRef<str>, value: impl Into<String>) -> Self {
        self.headers
            .insert(name.as_ref().to_ascii_lowercase(), value.into());
        self
    }

    /// Sets the body.
    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    /// Looks up a header by (case-insensitive) name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// Returns the media type of the body without parameters.
    pub fn media_type(&self) -> Option<&str> {
        self.header("content-type")
            .map(|ct| ct.split(';').next().unwrap_or(ct).trim())
    }
}

/// The response used to complete a parked request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpReply {
    /// HTTP status code.
    pub status: u16,
    /// Value of the `Content-Type` header, if any.
    pub content_type: Option<String>,
    /// Response body.
    pub body: Bytes,
}

impl HttpReply {
    /// Creates a reply with the given status and body.
    pub fn new(status: u16, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            content_type: None,
            body: body.into(),
        }
    }

    /// Creates a `200 OK` reply carrying an XML document.
    pub fn ok_xml(body: impl Into<Bytes>) -> Self {
        Self::new(200, body).with_content_type("text/xml; charset=utf-8")
    }

    /// Creates a reply carrying a JSON document.
    pub fn json(status: u16, value: &serde_json::Value) -> Self {
        Self::new(status, value.to_string()).with_content_type("application/json; charset=utf-8")
    }

    /// Creates a reply with an empty body.
    pub fn empty(status: u16) -> Self {
        Self::new(status, Bytes::new())
    }

    /// Sets the content type.
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Returns the body as UTF-8 text, replacing invalid sequences.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

// =============================================================================
// Request Handler
// =============================================================================

/// Receives parked requests from an HTTP server capability.
///
/// The handler must eventually call
/// [`HttpServerCapability::finish_request`] with the same `message_id`, either
/// right away (e.g. to reject a malformed request) or once a reply arrives.
/// Requests never completed are answered by the capability's timeout.
#[async_trait]
pub trait RequestHandler: Send + Sync {
    /// Called for every request arriving on the registered path.
    async fn on_request(&self, message_id: &str, request: RawRequest);
}

/// Boxed request handler.
pub type BoxedRequestHandler = Arc<dyn RequestHandler>;

// =============================================================================
// HTTP Server Capability
// =============================================================================

/// HTTP server capability with request/response correlation.
#[async_trait]
pub trait HttpServerCapability: Send + Sync {
    /// Starts serving `config.path` on `config.host:config.port`.
    ///
    /// Every request is assigned a fresh `message_id`, parked, and passed to
    /// `handler`. Dropping the returned handle stops the listener.
    async fn listen(
        &self,
        config: &HttpServerConfig,
        handler: BoxedRequestHandler,
    ) -> TransportResult<ListenerHandle>;

    /// Completes the parked request identified by `message_id`.
    ///
    /// Returns the `message_id` on success, or `None` if no such request is
    /// pending (already answered, timed out, or the client disconnected).
    fn finish_request(&self, message_id: &str, reply: HttpReply) -> Option<String>;

    /// Returns the number of requests currently awaiting a reply.
    fn pending_count(&self) -> usize;
}

// =============================================================================
// Handles
// =============================================================================

/// Handle to a running listener.
///
/// Dropping this handle stops the listener.
#[derive(Debug)]
pub struct ListenerHandle {
    /// Unique identifier for this listener.
    pub id: String,
    /// Address the listener is actually bound to.
    pub local_addr: String,
    /// Shutdown signal.
    shutdown_token: CancellationToken,
}

impl ListenerHandle {
    /// Creates a new listener handle.
    pub fn new(
        id: impl Into<String>,
        local_addr: impl Into<String>,
        shutdown_token: CancellationToken,
    ) -> Self {
        Self {
            id: id.into(),
            local_addr: local_addr.into(),
            shutdown_token,
        }
    }

    /// Stops the listener.
    pub fn stop(self) {
        self.shutdown_token.cancel();
    }

    /// Returns true once the listener has been asked to stop.
    pub fn is_stopped(&self) -> bool {
        self.shutdown_token.is_cancelled()
    }
}

impl Drop for ListenerHandle {
    fn drop(&mut self) {
        self.shutdown_token.cancel();
    }
}

// =============================================================================
// Transport Context
// =============================================================================

/// Context for adapter initialization.
///
/// Provides access to available transport capabilities.
#[derive(Clone, Default)]
pub struct TransportContext {
    http_server: Option<Arc<dyn HttpServerCapability>>,
}

impl TransportContext {
    /// Creates a new empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the HTTP server capability.
    pub fn with_http_server(mut self, cap: Arc<dyn HttpServerCapability>) -> Self {
        self.http_server = Some(cap);
        self
    }

    /// Sets the HTTP server capability.
    pub fn set_http_server(&mut self, cap: Arc<dyn HttpServerCapability>) {
        self.http_server = Some(cap);
    }

    /// Gets the HTTP server capability if available.
    pub fn http_server(&self) -> Option<&Arc<dyn HttpServerCapability>> {
        self.http_server.as_ref()
    }
}
