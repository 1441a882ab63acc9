//! Session worker that owns all mutable mediation state.
//!
//! Receives commands from [`MediatorHandle`], bridge signals from
//! [`AdCallbacks`], and a periodic tick, and funnels every mutation of the
//! slots, the session lock, and the playback backup through one task so
//! callbacks arriving from foreign execution contexts cannot interleave.
//!
//! [`MediatorHandle`]: crate::api::MediatorHandle
//! [`AdCallbacks`]: crate::bridge::AdCallbacks

use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, error, info, trace, warn};

use ads_core::{AdKind, HostPlayback, PendingReward};

use crate::api::{MediatorError, MediatorStatus, Result};
use crate::bridge::{BridgeSignal, PlatformBridge};
use crate::events::{Event, EventBus, RewardEvent, SessionEvent, SlotEvent};
use crate::runtime::MediatorConfig;
use crate::slot::AdSlot;

/// Commands that can be sent to the session worker
pub enum Command {
    /// Start an ad session for the given kind (reward stash for rewarded).
    Show {
        kind: AdKind,
        reward: Option<PendingReward>,
        reply: oneshot::Sender<Result<()>>,
    },
    /// Query slot readiness and session state (read-only).
    QueryStatus {
        reply: oneshot::Sender<MediatorStatus>,
    },
    /// Toggle the global ads-allowed flag.
    SetAdsAllowed { allowed: bool },
}

/// Host state captured at session start and written back at session end.
#[derive(Debug, Clone, Copy)]
struct PlaybackBackup {
    volume: f32,
    time_scale: f32,
}

/// Background task that processes mediation commands and bridge signals.
pub struct SessionWorker {
    interstitial: AdSlot,
    rewarded: AdSlot,
    ads_allowed: bool,
    /// Session lock: `Some` from an accepted show request until its
    /// terminating callback. Never more than one session in flight.
    showing: Option<AdKind>,
    backup: Option<PlaybackBackup>,
    pending_reward: Option<PendingReward>,
    playback: Box<dyn HostPlayback>,
    bridge: Arc<dyn PlatformBridge>,
    command_rx: mpsc::Receiver<Command>,
    signal_rx: mpsc::UnboundedReceiver<BridgeSignal>,
    events: EventBus,
    config: MediatorConfig,
}

impl SessionWorker {
    pub fn new(
        config: MediatorConfig,
        bridge: Arc<dyn PlatformBridge>,
        playback: Box<dyn HostPlayback>,
        command_rx: mpsc::Receiver<Command>,
        signal_rx: mpsc::UnboundedReceiver<BridgeSignal>,
        events: EventBus,
    ) -> Self {
        Self {
            interstitial: AdSlot::new(AdKind::Interstitial),
            rewarded: AdSlot::new(AdKind::Rewarded),
            ads_allowed: config.ads_allowed,
            showing: None,
            backup: None,
            pending_reward: None,
            playback,
            bridge,
            command_rx,
            signal_rx,
            events,
            config,
        }
    }

    /// Main worker loop.
    ///
    /// Exits when the command channel closes (all handles dropped).
    pub async fn run(mut self) {
        let mut tick = tokio::time::interval(self.config.tick_interval);
        tick.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                cmd = self.command_rx.recv() => match cmd {
                    Some(cmd) => self.handle_command(cmd).await,
                    None => break,
                },
                Some(signal) = self.signal_rx.recv() => {
                    self.handle_signal(signal);
                }
                _ = tick.tick() => {
                    self.on_tick().await;
                }
            }
        }

        debug!("session worker stopped");
    }

    async fn handle_command(&mut self, cmd: Command) {
        match cmd {
            Command::Show {
                kind,
                reward,
                reply,
            } => {
                let result = self.start_session(kind, reward).await;
                if reply.send(result).is_err() {
                    debug!("Show reply channel closed (caller dropped)");
                }
            }
            Command::QueryStatus { reply } => {
                if reply.send(self.status()).is_err() {
                    debug!("QueryStatus reply channel closed (caller dropped)");
                }
            }
            Command::SetAdsAllowed { allowed } => {
                info!(allowed, "ads-allowed flag updated");
                self.ads_allowed = allowed;
            }
        }
    }

    fn handle_signal(&mut self, signal: BridgeSignal) {
        match signal {
            BridgeSignal::Loaded { kind, instance_id } => self.on_loaded(kind, instance_id),
            BridgeSignal::ShowCompleted {
                kind,
                should_reward,
            } => self.on_show_completed(kind, should_reward),
            BridgeSignal::Error { slot, message } => self.on_bridge_error(slot, message),
        }
    }

    // ===== periodic tick: timeout sweep + auto-load =====

    async fn on_tick(&mut self) {
        let now = Instant::now();
        for kind in AdKind::ALL {
            if self.slot(kind).expired(now) {
                warn!(%kind, "ad load timed out");
                self.slot_mut(kind).clear();
                self.events
                    .publish(Event::Slot(SlotEvent::LoadTimedOut { kind }));
            }
            self.ensure_loading(kind).await;
        }
    }

    /// Start a load attempt if the slot is empty and loading is permitted.
    async fn ensure_loading(&mut self, kind: AdKind) {
        if !self.ads_allowed || !self.slot(kind).is_empty() {
            return;
        }

        let deadline = Instant::now() + self.config.load_timeout;
        self.slot_mut(kind).begin_loading(deadline);
        trace!(%kind, "requesting ad load");

        if let Err(err) = self.bridge.request_load(kind).await {
            error!(%kind, %err, "ad load request failed");
            self.slot_mut(kind).clear();
            self.events.publish(Event::Slot(SlotEvent::LoadFailed {
                kind,
                message: err.to_string(),
            }));
        }
    }

    // ===== show path =====

    async fn start_session(
        &mut self,
        kind: AdKind,
        reward: Option<PendingReward>,
    ) -> Result<()> {
        if self.showing.is_some() {
            return Err(MediatorError::AlreadyQueued);
        }
        if !self.ads_allowed {
            return Err(MediatorError::AdsDisallowed);
        }
        let Some(instance) = self.slot(kind).instance().map(str::to_owned) else {
            return Err(MediatorError::NoInstanceAvailable { kind });
        };

        self.showing = Some(kind);
        if kind.is_rewarded() {
            self.pending_reward = reward;
        }
        self.session_started(kind);

        if let Err(err) = self.bridge.request_show(&instance, kind).await {
            error!(%kind, %err, "ad show request failed");
            self.slot_mut(kind).clear();
            self.session_ended(kind);
            return Err(err.into());
        }

        Ok(())
    }

    fn on_loaded(&mut self, kind: AdKind, instance_id: String) {
        if self.slot(kind).instance() == Some(instance_id.as_str()) {
            trace!(%kind, %instance_id, "duplicate load callback ignored");
            return;
        }

        info!(%kind, %instance_id, "ad loaded");
        self.slot_mut(kind).fulfill(instance_id.clone());
        self.events.publish(Event::Slot(SlotEvent::Loaded {
            kind,
            instance: instance_id,
        }));
    }

    fn on_show_completed(&mut self, kind: AdKind, should_reward: bool) {
        let Some(current) = self.showing else {
            trace!(%kind, "completion callback with no session in flight ignored");
            return;
        };
        if current != kind {
            warn!(%kind, %current, "completion callback for wrong ad kind ignored");
            return;
        }

        // The shown fill is spent either way; a fresh load is required before
        // the next show.
        self.slot_mut(kind).clear();
        let reward = self.pending_reward.take();
        self.session_ended(kind);

        if kind.is_rewarded() && should_reward {
            if let Some(reward) = reward {
                let payload = reward.grant();
                info!("reward granted");
                self.events
                    .publish(Event::Reward(RewardEvent::Granted { payload }));
            }
        }
    }

    fn on_bridge_error(&mut self, slot: Option<AdKind>, message: String) {
        error!(?slot, %message, "bridge reported ad error");

        match slot {
            Some(kind) => {
                if self.showing == Some(kind) {
                    self.session_ended(kind);
                }
                self.fail_slot(kind, &message);
            }
            // Unattributed error: resolve against the in-flight session,
            // otherwise reset both slots.
            None => {
                if let Some(kind) = self.showing {
                    self.session_ended(kind);
                    self.fail_slot(kind, &message);
                } else {
                    for kind in AdKind::ALL {
                        self.fail_slot(kind, &message);
                    }
                }
            }
        }
    }

    /// Reset a slot after a bridge error, reporting the failed load if one
    /// was in flight.
    fn fail_slot(&mut self, kind: AdKind, message: &str) {
        let was_loading = self.slot(kind).is_loading();
        self.slot_mut(kind).clear();
        if was_loading {
            self.events.publish(Event::Slot(SlotEvent::LoadFailed {
                kind,
                message: message.to_string(),
            }));
        }
    }

    // ===== host pause/resume =====

    /// Capture host playback state, pause fully, and announce the session.
    fn session_started(&mut self, kind: AdKind) {
        self.backup = Some(PlaybackBackup {
            volume: self.playback.volume(),
            time_scale: self.playback.time_scale(),
        });
        self.playback.set_volume(0.0);
        self.playback.set_time_scale(0.0);

        info!(%kind, "ad session started");
        self.events
            .publish(Event::Session(SessionEvent::Started { kind }));
    }

    /// Single exit point for every session outcome.
    ///
    /// Releases the lock, restores captured playback state exactly once, and
    /// discards any reward that was not granted. Safe to call when no backup
    /// exists.
    fn session_ended(&mut self, kind: AdKind) {
        self.showing = None;
        self.pending_reward = None;

        if let Some(backup) = self.backup.take() {
            self.playback.set_volume(backup.volume);
            self.playback.set_time_scale(backup.time_scale);
        }

        info!(%kind, "ad session ended");
        self.events
            .publish(Event::Session(SessionEvent::Ended { kind }));
    }

    // ===== helpers =====

    fn status(&self) -> MediatorStatus {
        MediatorStatus {
            interstitial_ready: self.interstitial.is_ready(),
            rewarded_ready: self.rewarded.is_ready(),
            ads_allowed: self.ads_allowed,
            showing: self.showing,
        }
    }

    fn slot(&self, kind: AdKind) -> &AdSlot {
        match kind {
            AdKind::Interstitial => &self.interstitial,
            AdKind::Rewarded => &self.rewarded,
        }
    }

    fn slot_mut(&mut self, kind: AdKind) -> &mut AdSlot {
        match kind {
            AdKind::Interstitial => &mut self.interstitial,
            AdKind::Rewarded => &mut self.rewarded,
        }
    }
}
