//! Headless demo: wires the mediator to the mock bridge and drives one
//! interstitial and one rewarded session at the composition root.
mod config;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use serde_json::json;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use ads_core::{AdKind, PendingReward, SharedPlayback};
use ads_runtime::{Event, Mediator, MediatorHandle, MockBridge, SessionEvent, Topic};
use config::DemoConfig;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();

    setup_logging();

    let config = DemoConfig::from_env();
    let playback = SharedPlayback::default();

    let builder = Mediator::builder().config(config.mediator.clone());
    let bridge = MockBridge::new(config.mock.clone(), builder.callbacks());
    let mediator = builder
        .bridge(Arc::new(bridge))
        .playback(playback.clone())
        .build()?;

    let handle = mediator.handle();

    // Surface reward grants the way a game's reward system would
    let mut reward_rx = handle.subscribe(Topic::Reward);
    tokio::spawn(async move {
        while let Ok(event) = reward_rx.recv().await {
            tracing::info!(?event, "reward listener");
        }
    });

    run_session(&handle, &playback, AdKind::Interstitial).await?;
    run_session(&handle, &playback, AdKind::Rewarded).await?;

    // The worker exits once every command sender is gone.
    drop(handle);
    mediator.shutdown().await?;
    Ok(())
}

/// Wait for the slot to fill, show it, and wait for the session to end.
async fn run_session(
    handle: &MediatorHandle,
    playback: &SharedPlayback,
    kind: AdKind,
) -> Result<()> {
    while !handle.status().await?.ready(kind) {
        tokio::time::sleep(Duration::from_millis(100)).await;
    }

    let mut session_rx = handle.subscribe(Topic::Session);
    match kind {
        AdKind::Interstitial => handle.show_interstitial().await?,
        AdKind::Rewarded => {
            let reward = PendingReward::with_callback(json!({ "coins": 100 }), || {
                tracing::info!("reward callback fired - grant coins to player");
            });
            handle.show_rewarded(reward).await?;
        }
    }
    tracing::info!(%kind, snapshot = ?playback.snapshot(), "playback paused during ad");

    while let Ok(event) = session_rx.recv().await {
        if let Event::Session(SessionEvent::Ended { .. }) = event {
            break;
        }
    }
    tracing::info!(%kind, snapshot = ?playback.snapshot(), "playback restored after ad");

    Ok(())
}

/// Log to stderr, filtered by `RUST_LOG` (default info).
fn setup_logging() {
    let env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing::Level::INFO.into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
