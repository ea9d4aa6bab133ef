//! Main runtime orchestration.
//!
//! The runtime owns the shared transport capabilities and the in-process
//! message bus. Adapters are started with an [`AdapterContext`] exposing
//! both; outbound messages submitted by the application are routed to the
//! adapter whose transport name they carry.
//!
//! ```text
//!               ┌──────────────── RelayRuntime ────────────────┐
//! aggregator ──▶│ HttpServerCapabilityImpl ─▶ Adapter ─▶ ChannelBus │──▶ application
//!            ◀──│                 ◀──────── outbound pump ◀──────── │◀──
//!               └──────────────────────────────────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use relay_runtime::RelayRuntime;
//!
//! let runtime = RelayRuntime::builder()
//!     .config_file("config/relay.toml")
//!     .build()?;
//! runtime.register_adapter::<BlastSmsAdapter>().await?;
//! let endpoints = runtime.take_endpoints().await.unwrap();
//! runtime.run().await?;
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use relay_core::{
    AdapterContext, BoxedAdapter, BoxedBus, BusEndpoints, ChannelBus, ConfigurableAdapter,
    HttpServerCapability, MessageBus, OutboundMessage, TransportContext,
};
use relay_transport::HttpServerCapabilityImpl;
use tokio::signal;
use tokio::sync::{Mutex, RwLock, mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::config::{ConfigLoader, ConfigResult, RelayConfig};
use crate::error::{RuntimeError, RuntimeResult};
use crate::logging;

/// Outbound pump task; hands the queue back when stopped.
struct Pump {
    stop: oneshot::Sender<()>,
    handle: JoinHandle<mpsc::Receiver<OutboundMessage>>,
}

/// The Relay runtime that orchestrates adapters, transports and the bus.
pub struct RelayRuntime {
    /// The configuration.
    config: RelayConfig,
    /// Map of adapter name to adapter instance.
    adapters: RwLock<HashMap<String, BoxedAdapter>>,
    /// Per-adapter contexts (populated by `init`).
    contexts: Mutex<HashMap<String, AdapterContext>>,
    /// Transport capabilities handed to adapters.
    transport_context: TransportContext,
    /// HTTP capability shared by all adapters.
    http_server: Arc<HttpServerCapabilityImpl>,
    /// Adapter side of the bus.
    bus: Arc<ChannelBus>,
    /// Application side of the bus, until taken.
    endpoints: Mutex<Option<BusEndpoints>>,
    /// Outbound queue while the pump is not running.
    outbound_rx: Mutex<Option<mpsc::Receiver<OutboundMessage>>>,
    /// Running outbound pump.
    pump: Mutex<Option<Pump>>,
    /// Whether the runtime is running.
    running: RwLock<bool>,
}

impl RelayRuntime {
    /// Creates a runtime from the configuration found in the current
    /// directory, falling back to defaults.
    pub fn new() -> Self {
        let config = ConfigLoader::new()
            .with_current_dir()
            .load()
            .unwrap_or_else(|e| {
                eprintln!("Warning: Failed to load config ({e}), using defaults");
                RelayConfig::default()
            });

        Self::from_config(&config)
    }

    /// Creates a runtime from the default configuration locations.
    pub fn load_config() -> ConfigResult<Self> {
        RuntimeBuilder::new().build()
    }

    /// Creates a runtime builder for custom configuration.
    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    /// Creates a new runtime from configuration.
    ///
    /// Initializes logging and creates the transport capabilities and bus.
    pub fn from_config(config: &RelayConfig) -> Self {
        logging::init_from_config(&config.logging);

        let http_server = Arc::new(HttpServerCapabilityImpl::new());
        let transport_context = TransportContext::new().with_http_server(http_server.clone());
        debug!("Registered HttpServer capability");

        let (bus, endpoints, outbound_rx) = ChannelBus::new(config.bus.buffer_size);

        info!(
            log_level = %config.logging.level,
            log_format = ?config.logging.format,
            bus_buffer = config.bus.buffer_size,
            "Runtime initialized from configuration"
        );

        Self {
            config: config.clone(),
            adapters: RwLock::new(HashMap::new()),
            contexts: Mutex::new(HashMap::new()),
            transport_context,
            http_server,
            bus,
            endpoints: Mutex::new(Some(endpoints)),
            outbound_rx: Mutex::new(Some(outbound_rx)),
            pump: Mutex::new(None),
            running: RwLock::new(false),
        }
    }

    /// Returns a reference to the configuration.
    pub fn config(&self) -> &RelayConfig {
        &self.config
    }

    /// Returns the shared HTTP capability.
    pub fn http_server(&self) -> &Arc<HttpServerCapabilityImpl> {
        &self.http_server
    }

    /// Takes the application side of the bus. Returns `None` once taken.
    pub async fn take_endpoints(&self) -> Option<BusEndpoints> {
        self.endpoints.lock().await.take()
    }

    /// Registers an adapter built from its configuration section.
    ///
    /// The section is `adapters.<A::name()>`; when it is missing the
    /// adapter's default configuration is used.
    pub async fn register_adapter<A>(&self) -> RuntimeResult<()>
    where
        A: ConfigurableAdapter + 'static,
    {
        let adapter_name = A::name();

        let config: A::Config = if let Some(config_value) = self.config.adapters.get(adapter_name)
        {
            config_value.deserialize().map_err(|e| {
                RuntimeError::AdapterConfigDeserialize(format!(
                    "Failed to deserialize config for adapter '{adapter_name}': {e}"
                ))
            })?
        } else {
            warn!(
                adapter = adapter_name,
                "No configuration found for adapter, using default"
            );
            Default::default()
        };

        let adapter = A::from_config(config)?;
        self.add_adapter(adapter_name, adapter).await
    }

    /// Registers an already constructed adapter under `name`.
    pub async fn add_adapter(&self, name: &str, adapter: BoxedAdapter) -> RuntimeResult<()> {
        let mut adapters = self.adapters.write().await;
        if adapters.contains_key(name) {
            return Err(RuntimeError::AdapterExists(name.to_string()));
        }
        if let Some((other, _)) = adapters
            .iter()
            .find(|(_, a)| a.transport_name() == adapter.transport_name())
        {
            return Err(RuntimeError::TransportConflict {
                transport: adapter.transport_name().to_string(),
                adapter: other.clone(),
            });
        }

        info!(adapter = name, transport = adapter.transport_name(), "Registered adapter");
        adapters.insert(name.to_string(), adapter);
        Ok(())
    }

    /// Returns a registered adapter.
    pub async fn adapter(&self, name: &str) -> Option<BoxedAdapter> {
        self.adapters.read().await.get(name).cloned()
    }

    /// Returns the number of registered adapters.
    pub async fn adapter_count(&self) -> usize {
        self.adapters.read().await.len()
    }

    /// Returns whether the runtime is currently running.
    pub async fn is_running(&self) -> bool {
        *self.running.read().await
    }

    /// Creates a context for every registered adapter that lacks one.
    pub async fn init(&self) -> RuntimeResult<()> {
        let adapters = self.adapters.read().await;
        let mut contexts = self.contexts.lock().await;
        debug!("Initializing {} adapter(s)", adapters.len());

        for name in adapters.keys() {
            if contexts.contains_key(name) {
                continue;
            }
            let bus: BoxedBus = self.bus.clone();
            contexts.insert(
                name.clone(),
                AdapterContext::new(self.transport_context.clone(), bus),
            );
            debug!(adapter = %name, "Adapter context created");
        }

        info!("Runtime initialized");
        Ok(())
    }

    /// Starts all adapters and the outbound pump.
    pub async fn start(&self) -> RuntimeResult<()> {
        {
            let mut running = self.running.write().await;
            if *running {
                warn!("Runtime is already running");
                return Ok(());
            }
            *running = true;
        }

        info!("Starting Relay runtime");

        let adapters = self.adapters.read().await;
        let mut contexts = self.contexts.lock().await;
        let mut routes: HashMap<String, BoxedAdapter> = HashMap::new();

        for (name, adapter) in adapters.iter() {
            let Some(ctx) = contexts.get_mut(name) else {
                warn!(adapter = %name, "Adapter not initialized, skipping");
                continue;
            };
            if let Err(e) = adapter.on_start(ctx).await {
                error!(adapter = %name, error = %e, "Failed to start adapter");
                continue;
            }
            info!(adapter = %name, "Adapter started");
            routes.insert(adapter.transport_name().to_string(), Arc::clone(adapter));
        }

        if routes.is_empty() && !adapters.is_empty() {
            *self.running.write().await = false;
            return Err(RuntimeError::NoAdapterStarted);
        }

        if let Some(rx) = self.outbound_rx.lock().await.take() {
            let (stop, stop_rx) = oneshot::channel();
            let bus: BoxedBus = self.bus.clone();
            let handle = tokio::spawn(pump_outbound(rx, routes, bus, stop_rx));
            *self.pump.lock().await = Some(Pump { stop, handle });
        }

        info!("Runtime started");
        Ok(())
    }

    /// Stops the outbound pump and all adapters.
    pub async fn stop(&self) -> RuntimeResult<()> {
        {
            let mut running = self.running.write().await;
            if !*running {
                warn!("Runtime is not running");
                return Ok(());
            }
            *running = false;
        }

        info!("Stopping Relay runtime");

        if let Some(pump) = self.pump.lock().await.take() {
            let _ = pump.stop.send(());
            match pump.handle.await {
                Ok(rx) => *self.outbound_rx.lock().await = Some(rx),
                Err(e) => error!(error = %e, "Outbound pump failed"),
            }
        }

        let adapters = self.adapters.read().await;
        let mut contexts = self.contexts.lock().await;

        for (name, adapter) in adapters.iter() {
            if let Some(ctx) = contexts.get_mut(name) {
                if let Err(e) = adapter.on_shutdown(ctx).await {
                    error!(adapter = %name, error = %e, "Error during adapter shutdown");
                }
                ctx.stop_listeners();
            }
        }

        info!(
            pending = self.http_server.pending_count(),
            "Runtime stopped"
        );
        Ok(())
    }

    /// Runs the runtime until a shutdown signal is received.
    pub async fn run(&self) -> RuntimeResult<()> {
        self.init().await?;
        self.start().await?;

        info!("Relay runtime is now running. Press Ctrl+C to stop.");
        wait_for_shutdown().await;

        self.stop().await
    }

    /// Runs the runtime with a custom shutdown future.
    pub async fn run_until<F>(&self, shutdown: F) -> RuntimeResult<()>
    where
        F: std::future::Future<Output = ()>,
    {
        self.init().await?;
        self.start().await?;

        shutdown.await;

        self.stop().await
    }
}

impl Default for RelayRuntime {
    fn default() -> Self {
        Self::new()
    }
}

/// Delivers outbound messages to the adapter named by `transport_name`.
async fn pump_outbound(
    mut rx: mpsc::Receiver<OutboundMessage>,
    routes: HashMap<String, BoxedAdapter>,
    bus: BoxedBus,
    mut stop: oneshot::Receiver<()>,
) -> mpsc::Receiver<OutboundMessage> {
    loop {
        tokio::select! {
            _ = &mut stop => break,
            message = rx.recv() => match message {
                Some(message) => route_outbound(&routes, bus.as_ref(), message).await,
                None => break,
            },
        }
    }
    debug!("Outbound pump stopped");
    rx
}

async fn route_outbound(
    routes: &HashMap<String, BoxedAdapter>,
    bus: &dyn MessageBus,
    message: OutboundMessage,
) {
    match routes.get(&message.transport_name) {
        Some(adapter) => adapter.handle_outbound(message).await,
        None => {
            warn!(
                message_id = %message.message_id,
                transport = %message.transport_name,
                "No adapter for outbound message"
            );
            bus.publish_nack(
                &message.message_id,
                &format!("No adapter for transport '{}'", message.transport_name),
            );
        }
    }
}

/// Waits for shutdown signals (Ctrl+C or SIGTERM).
async fn wait_for_shutdown() {
    #[cfg(unix)]
    {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = signal::ctrl_c() => {
                        info!("Received Ctrl+C, shutting down");
                    }
                    _ = sigterm.recv() => {
                        info!("Received SIGTERM, shutting down");
                    }
                }
                return;
            }
            Err(e) => warn!(error = %e, "Failed to register SIGTERM handler"),
        }
    }

    match signal::ctrl_c().await {
        Ok(()) => info!("Received Ctrl+C, shutting down"),
        Err(e) => error!(error = %e, "Failed to listen for Ctrl+C, shutting down"),
    }
}

// =============================================================================
// RuntimeBuilder
// =============================================================================

/// Builder for creating a `RelayRuntime` with custom configuration.
pub struct RuntimeBuilder {
    config_loader: ConfigLoader,
}

impl RuntimeBuilder {
    /// Creates a new runtime builder.
    pub fn new() -> Self {
        Self {
            config_loader: ConfigLoader::new().with_current_dir(),
        }
    }

    /// Sets a specific configuration file to load.
    pub fn config_file<P: AsRef<std::path::Path>>(mut self, path: P) -> Self {
        self.config_loader = self.config_loader.file(path);
        self
    }

    /// Sets the configuration profile (e.g., "development", "production").
    pub fn profile(mut self, profile: impl Into<String>) -> Self {
        self.config_loader = self.config_loader.profile(profile);
        self
    }

    /// Adds a search path for configuration files.
    pub fn search_path<P: AsRef<std::path::Path>>(mut self, path: P) -> Self {
        self.config_loader = self.config_loader.search_path(path);
        self
    }

    /// Disables loading environment variables.
    pub fn without_env(mut self) -> Self {
        self.config_loader = self.config_loader.without_env();
        self
    }

    /// Merges additional configuration programmatically.
    pub fn merge(mut self, config: RelayConfig) -> Self {
        self.config_loader = self.config_loader.merge(config);
        self
    }

    /// Builds the runtime.
    pub fn build(self) -> ConfigResult<RelayRuntime> {
        let config = self.config_loader.load()?;
        Ok(RelayRuntime::from_config(&config))
    }
}

impl Default for RuntimeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use relay_core::{Adapter, AdapterResult, DeliveryEvent};
    use serde::Deserialize;
    use std::time::Duration;

    #[derive(Debug, Default, Deserialize)]
    #[serde(default)]
    struct RecordingConfig {
        transport: String,
    }

    /// Records outbound messages instead of delivering them.
    struct RecordingAdapter {
        transport: String,
        delivered: std::sync::Mutex<Vec<OutboundMessage>>,
    }

    impl RecordingAdapter {
        fn new(transport: &str) -> Arc<Self> {
            Arc::new(Self {
                transport: transport.to_string(),
                delivered: std::sync::Mutex::new(Vec::new()),
            })
        }

        fn delivered(&self) -> Vec<OutboundMessage> {
            self.delivered.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Adapter for RecordingAdapter {
        fn name() -> &'static str {
            "recording"
        }

        fn transport_name(&self) -> &str {
            &self.transport
        }

        async fn on_start(&self, _ctx: &mut AdapterContext) -> AdapterResult<()> {
            Ok(())
        }

        async fn handle_outbound(&self, message: OutboundMessage) {
            self.delivered.lock().unwrap().push(message);
        }
    }

    impl ConfigurableAdapter for RecordingAdapter {
        type Config = RecordingConfig;

        fn from_config(config: Self::Config) -> AdapterResult<Arc<Self>> {
            let transport = if config.transport.is_empty() {
                "recording".to_string()
            } else {
                config.transport
            };
            Ok(RecordingAdapter::new(&transport))
        }
    }

    #[tokio::test]
    async fn test_register_adapter_from_config_section() {
        let mut config = RelayConfig::default();
        config.adapters.insert(
            "recording".to_string(),
            figment::value::Value::serialize(serde_json::json!({"transport": "ussd-a"})).unwrap(),
        );
        let runtime = RelayRuntime::from_config(&config);

        runtime.register_adapter::<RecordingAdapter>().await.unwrap();

        let adapter = runtime.adapter("recording").await.unwrap();
        assert_eq!(adapter.transport_name(), "ussd-a");
    }

    #[tokio::test]
    async fn test_register_adapter_twice() {
        let runtime = RelayRuntime::from_config(&RelayConfig::default());
        runtime.register_adapter::<RecordingAdapter>().await.unwrap();

        assert!(matches!(
            runtime.register_adapter::<RecordingAdapter>().await,
            Err(RuntimeError::AdapterExists(_))
        ));
        assert!(matches!(
            runtime.add_adapter("other", RecordingAdapter::new("recording")).await,
            Err(RuntimeError::TransportConflict { .. })
        ));
    }

    #[tokio::test]
    async fn test_outbound_routing() {
        let runtime = RelayRuntime::from_config(&RelayConfig::default());
        let adapter = RecordingAdapter::new("blastsms");
        runtime.add_adapter("blastsms", adapter.clone()).await.unwrap();
        let mut endpoints = runtime.take_endpoints().await.unwrap();
        assert!(runtime.take_endpoints().await.is_none());

        runtime.init().await.unwrap();
        runtime.start().await.unwrap();
        assert!(runtime.is_running().await);

        let routed = OutboundMessage::new("blastsms", "27000", "hello");
        endpoints.outbound.send(routed.clone()).await.unwrap();

        let unrouted = OutboundMessage::new("elsewhere", "27000", "hello");
        endpoints.outbound.send(unrouted.clone()).await.unwrap();

        let event = tokio::time::timeout(Duration::from_secs(2), endpoints.events.recv())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(
            event,
            DeliveryEvent::Nack {
                user_message_id: unrouted.message_id,
                nack_reason: "No adapter for transport 'elsewhere'".to_string(),
            }
        );
        assert_eq!(adapter.delivered(), vec![routed]);

        runtime.stop().await.unwrap();
        assert!(!runtime.is_running().await);
    }

    #[tokio::test]
    async fn test_restart_keeps_outbound_queue() {
        let runtime = RelayRuntime::from_config(&RelayConfig::default());
        let adapter = RecordingAdapter::new("blastsms");
        runtime.add_adapter("blastsms", adapter.clone()).await.unwrap();
        let endpoints = runtime.take_endpoints().await.unwrap();

        runtime.init().await.unwrap();
        runtime.start().await.unwrap();
        runtime.stop().await.unwrap();
        runtime.start().await.unwrap();

        let message = OutboundMessage::new("blastsms", "27000", "again");
        endpoints.outbound.send(message.clone()).await.unwrap();

        for _ in 0..50 {
            if !adapter.delivered().is_empty() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        assert_eq!(adapter.delivered(), vec![message]);
        runtime.stop().await.unwrap();
    }

    #[tokio::test]
    async fn test_run_until_without_adapters() {
        let runtime = RelayRuntime::from_config(&RelayConfig::default());
        runtime.run_until(async {}).await.unwrap();
        assert!(!runtime.is_running().await);
    }
}
