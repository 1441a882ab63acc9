//! Event types for different topics.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use ads_core::AdKind;

/// Events marking the boundaries of an ad session.
///
/// Host playback is already paused when `Started` is published and already
/// restored when `Ended` is published, so listeners may safely touch game
/// state from either.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum SessionEvent {
    /// A show request was accepted and playback was paused.
    Started { kind: AdKind },
    /// The session reached its terminating callback (completion, skip, or
    /// error) and playback was restored.
    Ended { kind: AdKind },
}

/// Events tracking per-slot load progress.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum SlotEvent {
    /// The bridge delivered a fill for the slot.
    Loaded { kind: AdKind, instance: String },
    /// A load attempt outlived its deadline; the slot was reset and will be
    /// retried on the next tick.
    LoadTimedOut { kind: AdKind },
    /// The bridge reported a failure while the slot was loading.
    LoadFailed { kind: AdKind, message: String },
}

/// Reward outcomes from rewarded sessions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum RewardEvent {
    /// The rewarded ad was watched to completion; carries the payload the
    /// caller supplied to `show_rewarded`.
    Granted { payload: Value },
}
