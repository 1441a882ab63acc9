//! High-level mediator orchestrator.
//!
//! The mediator owns the session worker, wires up command/signal/event
//! channels, and exposes a builder-based API for the application's
//! composition root. Single-instance-per-process semantics come from the
//! composition root owning the one [`Mediator`], not from global state.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;

use ads_core::HostPlayback;

use crate::api::{MediatorError, MediatorHandle, Result};
use crate::bridge::{AdCallbacks, BridgeSignal, PlatformBridge};
use crate::events::{Event, EventBus, Topic};
use crate::workers::{Command, SessionWorker};

/// Mediator configuration shared across the orchestrator and the worker.
#[derive(Debug, Clone)]
pub struct MediatorConfig {
    /// Deadline for one load attempt, measured on the tokio clock.
    pub load_timeout: Duration,
    /// Cadence of the auto-load / timeout sweep.
    pub tick_interval: Duration,
    /// Initial value of the ads-allowed flag.
    pub ads_allowed: bool,
    pub event_buffer_size: usize,
    pub command_buffer_size: usize,
}

impl MediatorConfig {
    pub const DEFAULT_LOAD_TIMEOUT: Duration = Duration::from_secs(5);
    pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(200);
}

impl Default for MediatorConfig {
    fn default() -> Self {
        Self {
            load_timeout: Self::DEFAULT_LOAD_TIMEOUT,
            tick_interval: Self::DEFAULT_TICK_INTERVAL,
            ads_allowed: true,
            event_buffer_size: 100,
            command_buffer_size: 32,
        }
    }
}

/// Main mediator that arbitrates ad sessions
///
/// Design: Mediator owns the worker and coordinates shutdown.
/// [`MediatorHandle`] provides a cloneable façade for clients.
pub struct Mediator {
    // Shared handle (can be cloned for clients)
    handle: MediatorHandle,

    // Background worker
    worker_handle: JoinHandle<()>,
}

impl Mediator {
    /// Create a new mediator builder
    pub fn builder() -> MediatorBuilder {
        MediatorBuilder::new()
    }

    /// Get a cloneable handle to this mediator
    ///
    /// The handle can be shared across clients and async tasks.
    pub fn handle(&self) -> MediatorHandle {
        self.handle.clone()
    }

    /// Subscribe to events from a specific topic
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.handle.subscribe(topic)
    }

    /// Shutdown the mediator gracefully
    pub async fn shutdown(self) -> Result<()> {
        drop(self.handle);

        self.worker_handle.await.map_err(MediatorError::WorkerJoin)
    }
}

/// Builder for [`Mediator`] with flexible configuration.
///
/// The bridge signal channel is created up front so [`callbacks`] can hand
/// the delivery side to the bridge before `build`:
///
/// ```rust,ignore
/// let mut builder = Mediator::builder();
/// let bridge = MockBridge::new(MockBridgeConfig::default(), builder.callbacks());
/// let mediator = builder
///     .bridge(Arc::new(bridge))
///     .playback(SharedPlayback::default())
///     .build()?;
/// ```
///
/// [`callbacks`]: MediatorBuilder::callbacks
pub struct MediatorBuilder {
    config: MediatorConfig,
    bridge: Option<Arc<dyn PlatformBridge>>,
    playback: Option<Box<dyn HostPlayback>>,
    signal_tx: mpsc::UnboundedSender<BridgeSignal>,
    signal_rx: mpsc::UnboundedReceiver<BridgeSignal>,
}

impl MediatorBuilder {
    fn new() -> Self {
        let (signal_tx, signal_rx) = mpsc::unbounded_channel();
        Self {
            config: MediatorConfig::default(),
            bridge: None,
            playback: None,
            signal_tx,
            signal_rx,
        }
    }

    /// Override mediator configuration
    pub fn config(mut self, config: MediatorConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the required platform bridge
    pub fn bridge(mut self, bridge: Arc<dyn PlatformBridge>) -> Self {
        self.bridge = Some(bridge);
        self
    }

    /// Set the required host playback implementation
    pub fn playback(mut self, playback: impl HostPlayback) -> Self {
        self.playback = Some(Box::new(playback));
        self
    }

    /// Entry points the bridge uses to deliver results.
    ///
    /// Available before `build` so the bridge can be constructed with them.
    pub fn callbacks(&self) -> AdCallbacks {
        AdCallbacks::new(self.signal_tx.clone())
    }

    /// Build the mediator and spawn its session worker.
    ///
    /// Must be called within a tokio runtime.
    pub fn build(self) -> Result<Mediator> {
        let bridge = self.bridge.ok_or(MediatorError::MissingBridge)?;
        let playback = self.playback.ok_or(MediatorError::MissingPlayback)?;

        let (command_tx, command_rx) = mpsc::channel::<Command>(self.config.command_buffer_size);
        let events = EventBus::with_capacity(self.config.event_buffer_size);

        let handle = MediatorHandle::new(
            command_tx,
            AdCallbacks::new(self.signal_tx.clone()),
            events.clone(),
        );

        let worker = SessionWorker::new(
            self.config,
            bridge,
            playback,
            command_rx,
            self.signal_rx,
            events,
        );

        let worker_handle = tokio::spawn(worker.run());

        tracing::info!("ad mediator started");

        Ok(Mediator {
            handle,
            worker_handle,
        })
    }
}
