//! Demo runtime configuration loaded from the environment.
use std::env;
use std::str::FromStr;
use std::time::Duration;

use ads_runtime::{MediatorConfig, MockBridgeConfig};

/// Configuration required to bootstrap the demo mediator.
#[derive(Clone, Debug, Default)]
pub struct DemoConfig {
    pub mediator: MediatorConfig,
    pub mock: MockBridgeConfig,
}

impl DemoConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables (all optional, milliseconds unless noted):
    /// - `AD_LOAD_TIMEOUT_MS` - Load attempt deadline (default: 5000)
    /// - `AD_TICK_INTERVAL_MS` - Auto-load sweep cadence (default: 200)
    /// - `MOCK_LOAD_DELAY_MS` - Simulated load delay (default: 1000)
    /// - `MOCK_INTERSTITIAL_MS` - Simulated interstitial playback (default: 2000)
    /// - `MOCK_REWARDED_MS` - Simulated rewarded playback (default: 3000)
    /// - `MOCK_REWARD_RATE` - Grant probability, 0.0..=1.0 (default: 1.0)
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(ms) = read_env::<u64>("AD_LOAD_TIMEOUT_MS") {
            config.mediator.load_timeout = Duration::from_millis(ms);
        }
        if let Some(ms) = read_env::<u64>("AD_TICK_INTERVAL_MS") {
            config.mediator.tick_interval = Duration::from_millis(ms.max(1));
        }
        if let Some(ms) = read_env::<u64>("MOCK_LOAD_DELAY_MS") {
            config.mock.load_delay = Duration::from_millis(ms);
        }
        if let Some(ms) = read_env::<u64>("MOCK_INTERSTITIAL_MS") {
            config.mock.interstitial_duration = Duration::from_millis(ms);
        }
        if let Some(ms) = read_env::<u64>("MOCK_REWARDED_MS") {
            config.mock.rewarded_duration = Duration::from_millis(ms);
        }
        if let Some(rate) = read_env::<f64>("MOCK_REWARD_RATE") {
            config.mock.reward_rate = rate.clamp(0.0, 1.0);
        }

        config
    }
}

fn read_env<T: FromStr>(name: &str) -> Option<T> {
    env::var(name).ok()?.parse().ok()
}
