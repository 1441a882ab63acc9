//! Cloneable façade for issuing commands to the mediator.
//!
//! [`MediatorHandle`] hides channel plumbing and offers async helpers for
//! showing ads, querying readiness, and streaming events from specific
//! topics.
use serde::{Deserialize, Serialize};
use tokio::sync::{broadcast, mpsc, oneshot};

use ads_core::{AdKind, PendingReward};

use super::errors::{MediatorError, Result};
use crate::bridge::AdCallbacks;
use crate::events::{Event, EventBus, Topic};
use crate::workers::Command;

/// Read-only snapshot of mediator state.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MediatorStatus {
    pub interstitial_ready: bool,
    pub rewarded_ready: bool,
    pub ads_allowed: bool,
    /// Kind of the ad session currently in flight, if any.
    pub showing: Option<AdKind>,
}

impl MediatorStatus {
    pub fn ready(&self, kind: AdKind) -> bool {
        match kind {
            AdKind::Interstitial => self.interstitial_ready,
            AdKind::Rewarded => self.rewarded_ready,
        }
    }
}

/// Client-facing handle to interact with the mediator
#[derive(Clone)]
pub struct MediatorHandle {
    command_tx: mpsc::Sender<Command>,
    callbacks: AdCallbacks,
    events: EventBus,
}

impl MediatorHandle {
    pub(crate) fn new(
        command_tx: mpsc::Sender<Command>,
        callbacks: AdCallbacks,
        events: EventBus,
    ) -> Self {
        Self {
            command_tx,
            callbacks,
            events,
        }
    }

    /// Request an interstitial show.
    ///
    /// Resolves once the session is accepted and playback is paused. The
    /// session itself ends later, signalled by `SessionEvent::Ended`.
    /// Rejections (`AlreadyQueued`, `AdsDisallowed`, `NoInstanceAvailable`)
    /// leave all state untouched.
    pub async fn show_interstitial(&self) -> Result<()> {
        self.show(AdKind::Interstitial, None).await
    }

    /// Request a rewarded show, stashing `reward` for the session.
    ///
    /// The reward callback fires and its payload is rebroadcast on the
    /// reward topic iff the completion callback reports a grant.
    pub async fn show_rewarded(&self, reward: PendingReward) -> Result<()> {
        self.show(AdKind::Rewarded, Some(reward)).await
    }

    async fn show(&self, kind: AdKind, reward: Option<PendingReward>) -> Result<()> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.command_tx
            .send(Command::Show {
                kind,
                reward,
                reply: reply_tx,
            })
            .await
            .map_err(|_| MediatorError::CommandChannelClosed)?;

        reply_rx.await.map_err(MediatorError::ReplyChannelClosed)?
    }

    /// Query slot readiness and session state (read-only snapshot)
    pub async fn status(&self) -> Result<MediatorStatus> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.command_tx
            .send(Command::QueryStatus { reply: reply_tx })
            .await
            .map_err(|_| MediatorError::CommandChannelClosed)?;

        reply_rx.await.map_err(MediatorError::ReplyChannelClosed)
    }

    /// Toggle the global ads-allowed flag.
    ///
    /// While false, shows reject with `AdsDisallowed` and no load requests
    /// are issued.
    pub async fn set_ads_allowed(&self, allowed: bool) -> Result<()> {
        self.command_tx
            .send(Command::SetAdsAllowed { allowed })
            .await
            .map_err(|_| MediatorError::CommandChannelClosed)
    }

    /// Subscribe to events from a specific topic
    ///
    /// # Topics
    ///
    /// - `Topic::Session` - Ad session started/ended
    /// - `Topic::Slot` - Slot load progress
    /// - `Topic::Reward` - Reward grants
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// use ads_runtime::Topic;
    ///
    /// // Only subscribe to session boundaries
    /// let mut session_rx = handle.subscribe(Topic::Session);
    /// while let Ok(event) = session_rx.recv().await {
    ///     // Pause/resume UI chrome around ads
    /// }
    /// ```
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.events.subscribe(topic)
    }

    /// Entry points for bridge glue to deliver load/show results.
    pub fn callbacks(&self) -> AdCallbacks {
        self.callbacks.clone()
    }

    /// Get a reference to the event bus for advanced usage
    pub fn event_bus(&self) -> &EventBus {
        &self.events
    }
}
