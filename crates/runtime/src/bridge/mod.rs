//! Platform bridge contract and callback entry points.
//!
//! The bridge is the subsystem that actually talks to an ad-serving platform.
//! The mediator drives it through [`PlatformBridge`] and receives results
//! through [`AdCallbacks`], the stable entry points a foreign-runtime bridge
//! (or the in-process [`MockBridge`]) invokes when loads and shows resolve.

mod mock;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::mpsc;

use ads_core::AdKind;

pub use mock::{MockBridge, MockBridgeConfig};

/// Failure reported by a bridge request before any callback fires.
#[derive(Debug, Clone, Error)]
#[error("bridge request failed: {0}")]
pub struct BridgeError(pub String);

/// Outbound half of the bridge contract.
///
/// Implementations must return promptly: `request_load` and `request_show`
/// kick off the platform round trip and report the outcome later through
/// [`AdCallbacks`]. Long-running work belongs behind the callbacks, not in
/// these methods, since they run on the mediator's worker task.
#[async_trait]
pub trait PlatformBridge: Send + Sync {
    /// Ask the platform to fetch a fill for the given ad kind.
    async fn request_load(&self, kind: AdKind) -> Result<(), BridgeError>;

    /// Ask the platform to present a previously loaded instance.
    async fn request_show(&self, instance_id: &str, kind: AdKind) -> Result<(), BridgeError>;
}

/// Signals delivered by the bridge back to the session worker.
#[derive(Debug, Clone)]
pub(crate) enum BridgeSignal {
    Loaded {
        kind: AdKind,
        instance_id: String,
    },
    ShowCompleted {
        kind: AdKind,
        should_reward: bool,
    },
    /// `slot: None` covers bridges that cannot attribute an error to a
    /// specific ad kind; the worker then resolves it against the in-flight
    /// session, or resets both slots when idle.
    Error {
        slot: Option<AdKind>,
        message: String,
    },
}

/// Cloneable entry points the bridge invokes to deliver results.
///
/// Sends are non-blocking and callable from any thread, so FFI glue can
/// forward platform callbacks directly. Each entry point is safe against
/// duplicate delivery: the worker ignores signals that no longer match an
/// in-flight attempt or session.
#[derive(Clone)]
pub struct AdCallbacks {
    tx: mpsc::UnboundedSender<BridgeSignal>,
}

impl AdCallbacks {
    pub(crate) fn new(tx: mpsc::UnboundedSender<BridgeSignal>) -> Self {
        Self { tx }
    }

    /// A fill is available for the slot.
    pub fn loaded(&self, kind: AdKind, instance_id: impl Into<String>) {
        self.send(BridgeSignal::Loaded {
            kind,
            instance_id: instance_id.into(),
        });
    }

    /// The interstitial finished playing.
    pub fn interstitial_completed(&self) {
        self.send(BridgeSignal::ShowCompleted {
            kind: AdKind::Interstitial,
            should_reward: false,
        });
    }

    /// The rewarded ad finished playing or was skipped.
    pub fn rewarded_completed(&self, should_reward: bool) {
        self.send(BridgeSignal::ShowCompleted {
            kind: AdKind::Rewarded,
            should_reward,
        });
    }

    /// The platform reported a load or playback failure.
    ///
    /// Pass `slot: None` when the platform does not say which ad kind the
    /// error belongs to.
    pub fn error(&self, slot: Option<AdKind>, message: impl Into<String>) {
        self.send(BridgeSignal::Error {
            slot,
            message: message.into(),
        });
    }

    fn send(&self, signal: BridgeSignal) {
        if self.tx.send(signal).is_err() {
            tracing::debug!("mediator worker gone, dropping bridge callback");
        }
    }
}
