//! HTTP server capability implementation.
//!
//! Each inbound request is parked in [`PendingRequests`] under a fresh
//! `message_id` before the adapter sees it. The axum handler then waits on
//! the reply channel until the adapter calls `finish_request` or the
//! configured timeout fires. The deadline is fixed on arrival and also bounds
//! the adapter's `on_request`:
//!
//! ```text
//! GET/POST {path}
//!   ├── register(message_id) ──▶ PendingRequests
//!   ├── handler.on_request(message_id, RawRequest)
//!   └── await reply ── finish_request ─▶ HttpReply
//!                  └── timeout ───────▶ {timeout_status}, empty body
//! ```

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::{
    Router,
    body::{Body, Bytes},
    extract::{ConnectInfo, State},
    http::{HeaderMap, Method, StatusCode, Uri, header},
    response::{IntoResponse, Response},
    routing::get,
};
use relay_core::{
    BoxedRequestHandler, HttpReply, HttpServerCapability, HttpServerConfig, ListenerHandle,
    RawRequest, TransportError, TransportResult,
};
use tokio::net::TcpListener;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, trace, warn};

use super::pending::PendingRequests;

/// HTTP server capability implementation.
///
/// One instance may serve several listeners; all of them share the same
/// table of parked requests, so `finish_request` works regardless of which
/// listener accepted the request.
pub struct HttpServerCapabilityImpl {
    pending: Arc<PendingRequests>,
}

impl HttpServerCapabilityImpl {
    /// Creates a new HTTP server capability.
    pub fn new() -> Self {
        Self {
            pending: Arc::new(PendingRequests::new()),
        }
    }
}

impl Default for HttpServerCapabilityImpl {
    fn default() -> Self {
        Self::new()
    }
}

/// Shared state for a single listener.
struct RouteState {
    /// Request handler from the adapter.
    handler: BoxedRequestHandler,
    /// Parked requests (shared with the capability).
    pending: Arc<PendingRequests>,
    /// How long a parked request may wait.
    request_timeout: Duration,
    /// Status sent when the wait expires.
    timeout_status: StatusCode,
}

#[async_trait]
impl HttpServerCapability for HttpServerCapabilityImpl {
    async fn listen(
        &self,
        config: &HttpServerConfig,
        handler: BoxedRequestHandler,
    ) -> TransportResult<ListenerHandle> {
        let path = config.normalized_path();
        let timeout_status = StatusCode::from_u16(config.timeout_status).map_err(|e| {
            TransportError::InvalidConfig(format!(
                "timeout_status {}: {e}",
                config.timeout_status
            ))
        })?;

        let state = Arc::new(RouteState {
            handler,
            pending: Arc::clone(&self.pending),
            request_timeout: config.request_timeout,
            timeout_status,
        });

        let router = Router::new()
            .route(&path, get(http_handler).post(http_handler))
            .with_state(state);

        let addr = config.bind_addr();
        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|e| TransportError::BindFailed {
                addr: addr.clone(),
                reason: e.to_string(),
            })?;
        let actual_addr = listener.local_addr()?;

        info!(addr = %actual_addr, path = %path, "HTTP server listening");

        let shutdown_token = CancellationToken::new();
        let token_clone = shutdown_token.clone();

        tokio::spawn(async move {
            let server = axum::serve(
                listener,
                router.into_make_service_with_connect_info::<SocketAddr>(),
            );

            tokio::select! {
                result = server => {
                    if let Err(e) = result {
                        error!(error = %e, "HTTP server error");
                    }
                }
                () = token_clone.cancelled() => {
                    info!(addr = %actual_addr, "HTTP server shutting down");
                }
            }
        });

        Ok(ListenerHandle::new(
            format!("http-server-{actual_addr}{path}"),
            actual_addr.to_string(),
            shutdown_token,
        ))
    }

    fn finish_request(&self, message_id: &str, reply: HttpReply) -> Option<String> {
        self.pending.complete(message_id, reply)
    }

    fn pending_count(&self) -> usize {
        self.pending.len()
    }
}

/// HTTP handler for the registered path.
async fn http_handler(
    State(state): State<Arc<RouteState>>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let (guard, reply_rx) = state.pending.register();
    let message_id = guard.message_id().to_string();

    let request = RawRequest {
        method: method.as_str().to_string(),
        path: uri.path().to_string(),
        query: uri.query().map(str::to_string),
        headers: collect_headers(&headers),
        body,
    };

    trace!(
        message_id = %message_id,
        remote_addr = %addr,
        method = %method,
        len = request.body.len(),
        "Received HTTP request",
    );

    let deadline = Instant::now() + state.request_timeout;
    let outcome = tokio::time::timeout_at(deadline, async {
        state.handler.on_request(&message_id, request).await;
        reply_rx.await
    })
    .await;

    let response = match outcome {
        Ok(Ok(reply)) => {
            debug!(message_id = %message_id, status = reply.status, "Completing HTTP request");
            into_response(reply)
        }
        Ok(Err(_)) => {
            error!(message_id = %message_id, "Reply channel closed without a reply");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
        Err(_) => {
            warn!(
                message_id = %message_id,
                timeout_ms = state.request_timeout.as_millis() as u64,
                "Timed out waiting for reply",
            );
            state.timeout_status.into_response()
        }
    };

    drop(guard);
    response
}

/// Collects headers into a plain map with lower-cased names.
fn collect_headers(headers: &HeaderMap) -> HashMap<String, String> {
    headers
        .iter()
        .filter_map(|(name, value)| {
            value
                .to_str()
                .ok()
                .map(|v| (name.as_str().to_lowercase(), v.to_string()))
        })
        .collect()
}

/// Converts an adapter reply into an axum response.
fn into_response(reply: HttpReply) -> Response {
    let status = StatusCode::from_u16(reply.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let mut builder = Response::builder().status(status);
    if let Some(content_type) = &reply.content_type {
        builder = builder.header(header::CONTENT_TYPE, content_type.as_str());
    }

    match builder.body(Body::from(reply.body)) {
        Ok(response) => response,
        Err(e) => {
            error!(error = %e, "Failed to build HTTP response");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
