//! Unified error types surfaced by the mediator API.
//!
//! Show rejections are ordinary, retryable outcomes; the remaining variants
//! wrap worker coordination and construction failures so clients can bubble
//! them up with consistent context.
use thiserror::Error;
use tokio::sync::oneshot;

use ads_core::AdKind;

use crate::bridge::BridgeError;

pub type Result<T> = std::result::Result<T, MediatorError>;

#[derive(Debug, Error)]
pub enum MediatorError {
    /// A show request arrived while another ad session was in flight.
    /// Requests are rejected, never queued; retry after the session ends.
    #[error("an ad session is already queued")]
    AlreadyQueued,

    /// Ads are globally disabled via the ads-allowed flag.
    #[error("ads are not allowed")]
    AdsDisallowed,

    /// The target slot holds no fill; retry once it reloads.
    #[error("no {kind} instance available")]
    NoInstanceAvailable { kind: AdKind },

    #[error(transparent)]
    Bridge(#[from] BridgeError),

    #[error("session worker command channel closed")]
    CommandChannelClosed,

    #[error("session worker reply channel closed")]
    ReplyChannelClosed(#[source] oneshot::error::RecvError),

    #[error("session worker join failed")]
    WorkerJoin(#[source] tokio::task::JoinError),

    #[error("mediator requires a platform bridge before building")]
    MissingBridge,

    #[error("mediator requires a host playback implementation before building")]
    MissingPlayback,
}

impl MediatorError {
    /// True for the non-fatal show rejections a caller may simply retry.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            MediatorError::AlreadyQueued
                | MediatorError::AdsDisallowed
                | MediatorError::NoInstanceAvailable { .. }
        )
    }
}
