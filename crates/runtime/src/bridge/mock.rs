//! In-process bridge substitute with simulated delays.
//!
//! Replaces the platform round trip in non-production environments. Results
//! travel through the same [`AdCallbacks`] entry points as real traffic, so
//! everything downstream of the bridge behaves identically in both modes.

use std::time::Duration;

use async_trait::async_trait;
use rand::Rng;

use ads_core::AdKind;

use super::{AdCallbacks, BridgeError, PlatformBridge};

/// Simulated timings and outcomes. These stand in for platform behavior, not
/// mediator logic; tests shrink them to keep runs fast.
#[derive(Debug, Clone)]
pub struct MockBridgeConfig {
    /// Delay before a load resolves with a fresh instance id.
    pub load_delay: Duration,
    /// Simulated interstitial playback duration.
    pub interstitial_duration: Duration,
    /// Simulated rewarded playback duration.
    pub rewarded_duration: Duration,
    /// Probability that a rewarded show completes with a grant.
    pub reward_rate: f64,
}

impl MockBridgeConfig {
    pub const DEFAULT_LOAD_DELAY: Duration = Duration::from_secs(1);
    pub const DEFAULT_INTERSTITIAL_DURATION: Duration = Duration::from_secs(2);
    pub const DEFAULT_REWARDED_DURATION: Duration = Duration::from_secs(3);
    pub const DEFAULT_REWARD_RATE: f64 = 1.0;
}

impl Default for MockBridgeConfig {
    fn default() -> Self {
        Self {
            load_delay: Self::DEFAULT_LOAD_DELAY,
            interstitial_duration: Self::DEFAULT_INTERSTITIAL_DURATION,
            rewarded_duration: Self::DEFAULT_REWARDED_DURATION,
            reward_rate: Self::DEFAULT_REWARD_RATE,
        }
    }
}

/// Bridge implementation that synthesizes loads and shows locally.
pub struct MockBridge {
    config: MockBridgeConfig,
    callbacks: AdCallbacks,
}

impl MockBridge {
    /// Construct a mock bridge delivering into the given callbacks.
    ///
    /// Obtain the callbacks from [`MediatorBuilder::callbacks`] before
    /// building the mediator.
    ///
    /// [`MediatorBuilder::callbacks`]: crate::runtime::MediatorBuilder::callbacks
    pub fn new(config: MockBridgeConfig, callbacks: AdCallbacks) -> Self {
        Self { config, callbacks }
    }

    fn mock_instance_id(kind: AdKind) -> String {
        let suffix: u32 = rand::thread_rng().gen_range(100..1000);
        format!("{}_{}", kind.as_str(), suffix)
    }
}

#[async_trait]
impl PlatformBridge for MockBridge {
    async fn request_load(&self, kind: AdKind) -> Result<(), BridgeError> {
        let callbacks = self.callbacks.clone();
        let delay = self.config.load_delay;

        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let instance_id = Self::mock_instance_id(kind);
            tracing::debug!(%kind, %instance_id, "mock load resolved");
            callbacks.loaded(kind, instance_id);
        });

        Ok(())
    }

    async fn request_show(&self, instance_id: &str, kind: AdKind) -> Result<(), BridgeError> {
        let callbacks = self.callbacks.clone();
        let (duration, reward_rate) = match kind {
            AdKind::Interstitial => (self.config.interstitial_duration, 0.0),
            AdKind::Rewarded => (self.config.rewarded_duration, self.config.reward_rate),
        };

        tracing::debug!(%kind, %instance_id, ?duration, "mock show playing");
        tokio::spawn(async move {
            tokio::time::sleep(duration).await;
            match kind {
                AdKind::Interstitial => callbacks.interstitial_completed(),
                AdKind::Rewarded => {
                    let should_reward = rand::thread_rng().gen_bool(reward_rate);
                    callbacks.rewarded_completed(should_reward);
                }
            }
        });

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mock_ids_follow_the_kind_pattern() {
        for _ in 0..32 {
            let id = MockBridge::mock_instance_id(AdKind::Rewarded);
            let suffix = id
                .strip_prefix("rewarded_")
                .expect("id should start with the kind label");
            let n: u32 = suffix.parse().expect("suffix should be numeric");
            assert!((100..1000).contains(&n));
        }
    }
}
