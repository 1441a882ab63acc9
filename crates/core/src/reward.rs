//! Caller-supplied reward held for the duration of a rewarded session.
use std::fmt;

use serde_json::Value;

/// Callback invoked when a rewarded session completes with a grant.
pub type RewardCallback = Box<dyn FnOnce() + Send + 'static>;

/// Opaque reward stashed by the mediator while a rewarded ad plays.
///
/// The payload is rebroadcast on the reward topic when the session completes
/// with a grant; the callback (if any) fires at the same moment. Both are
/// discarded when the ad is skipped or the session errors.
pub struct PendingReward {
    payload: Value,
    on_grant: Option<RewardCallback>,
}

impl PendingReward {
    pub fn new(payload: Value) -> Self {
        Self {
            payload,
            on_grant: None,
        }
    }

    pub fn with_callback(payload: Value, on_grant: impl FnOnce() + Send + 'static) -> Self {
        Self {
            payload,
            on_grant: Some(Box::new(on_grant)),
        }
    }

    pub fn payload(&self) -> &Value {
        &self.payload
    }

    /// Consume the reward: run the callback and hand back the payload for
    /// listeners. Called at most once per session.
    pub fn grant(self) -> Value {
        if let Some(on_grant) = self.on_grant {
            on_grant();
        }
        self.payload
    }
}

impl Default for PendingReward {
    fn default() -> Self {
        Self::new(Value::Null)
    }
}

impl fmt::Debug for PendingReward {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PendingReward")
            .field("payload", &self.payload)
            .field("has_callback", &self.on_grant.is_some())
            .finish()
    }
}
