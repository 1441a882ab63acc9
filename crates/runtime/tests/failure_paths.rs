//! Timeout, error, and idempotency behavior of the session worker.
//!
//! Uses inert bridges plus direct callback injection so each failure signal
//! can be delivered at a controlled moment.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;
use tokio::time::timeout;

use ads_core::{AdKind, PendingReward, PlaybackState, SharedPlayback};
use ads_runtime::{
    BridgeError, Event, Mediator, MediatorConfig, MediatorError, PlatformBridge, SessionEvent,
    SlotEvent, Topic,
};

const WAIT: Duration = Duration::from_secs(2);

/// Accepts every request and never delivers a callback.
struct NullBridge;

#[async_trait]
impl PlatformBridge for NullBridge {
    async fn request_load(&self, _kind: AdKind) -> Result<(), BridgeError> {
        Ok(())
    }

    async fn request_show(&self, _instance_id: &str, _kind: AdKind) -> Result<(), BridgeError> {
        Ok(())
    }
}

/// Counts load requests per kind and never delivers a callback.
#[derive(Default)]
struct CountingBridge {
    interstitial_loads: AtomicUsize,
    rewarded_loads: AtomicUsize,
}

#[async_trait]
impl PlatformBridge for CountingBridge {
    async fn request_load(&self, kind: AdKind) -> Result<(), BridgeError> {
        match kind {
            AdKind::Interstitial => self.interstitial_loads.fetch_add(1, Ordering::SeqCst),
            AdKind::Rewarded => self.rewarded_loads.fetch_add(1, Ordering::SeqCst),
        };
        Ok(())
    }

    async fn request_show(&self, _instance_id: &str, _kind: AdKind) -> Result<(), BridgeError> {
        Ok(())
    }
}

fn fast_config() -> MediatorConfig {
    MediatorConfig {
        load_timeout: Duration::from_millis(80),
        tick_interval: Duration::from_millis(10),
        ..Default::default()
    }
}

fn start_with_bridge(bridge: Arc<dyn PlatformBridge>, playback: SharedPlayback) -> Mediator {
    Mediator::builder()
        .config(fast_config())
        .bridge(bridge)
        .playback(playback)
        .build()
        .expect("mediator should build")
}

async fn next_event(rx: &mut tokio::sync::broadcast::Receiver<Event>) -> Event {
    timeout(WAIT, rx.recv())
        .await
        .expect("event should arrive before the deadline")
        .expect("event channel should stay open")
}

/// Assert that no event arrives on the receiver within a grace window.
async fn assert_quiet(rx: &mut tokio::sync::broadcast::Receiver<Event>, window: Duration) {
    if let Ok(event) = timeout(window, rx.recv()).await {
        panic!("expected no event, got {event:?}");
    }
}

#[tokio::test]
async fn load_with_no_callback_times_out_and_resets_the_slot() {
    let mediator = start_with_bridge(Arc::new(NullBridge), SharedPlayback::default());
    let handle = mediator.handle();
    let mut slot_rx = handle.subscribe(Topic::Slot);

    let event = timeout(WAIT, async {
        loop {
            if let e @ Event::Slot(SlotEvent::LoadTimedOut { .. }) = next_event(&mut slot_rx).await
            {
                break e;
            }
        }
    })
    .await
    .expect("a load should time out");

    assert!(matches!(event, Event::Slot(SlotEvent::LoadTimedOut { .. })));

    let status = handle.status().await.expect("status");
    assert!(!status.interstitial_ready);
    assert!(!status.rewarded_ready);

    drop(handle);
    mediator.shutdown().await.expect("shutdown");
}

#[tokio::test]
async fn timed_out_loads_are_retried_on_subsequent_ticks() {
    let bridge = Arc::new(CountingBridge::default());
    let mediator = start_with_bridge(
        Arc::clone(&bridge) as Arc<dyn PlatformBridge>,
        SharedPlayback::default(),
    );

    // 80ms timeout: ~300ms covers at least three attempts per slot.
    tokio::time::sleep(Duration::from_millis(300)).await;

    assert!(bridge.interstitial_loads.load(Ordering::SeqCst) >= 2);
    assert!(bridge.rewarded_loads.load(Ordering::SeqCst) >= 2);

    mediator.shutdown().await.expect("shutdown");
}

#[tokio::test]
async fn bridge_error_during_load_resets_without_session_events() {
    let mediator = start_with_bridge(Arc::new(NullBridge), SharedPlayback::default());
    let handle = mediator.handle();
    let mut slot_rx = handle.subscribe(Topic::Slot);
    let mut session_rx = handle.subscribe(Topic::Session);

    // Let the first tick put both slots into loading, then fail one.
    tokio::time::sleep(Duration::from_millis(30)).await;
    handle
        .callbacks()
        .error(Some(AdKind::Interstitial), "no fill available");

    let event = timeout(WAIT, async {
        loop {
            if let e @ Event::Slot(SlotEvent::LoadFailed { .. }) = next_event(&mut slot_rx).await {
                break e;
            }
        }
    })
    .await
    .expect("the failed load should be reported");

    let Event::Slot(SlotEvent::LoadFailed { kind, message }) = event else {
        unreachable!()
    };
    assert_eq!(kind, AdKind::Interstitial);
    assert_eq!(message, "no fill available");

    // A load failure with no session in flight is not a session boundary.
    assert_quiet(&mut session_rx, Duration::from_millis(100)).await;

    drop(handle);
    mediator.shutdown().await.expect("shutdown");
}

#[tokio::test]
async fn bridge_error_during_show_ends_the_session_without_reward() {
    let playback = SharedPlayback::new(PlaybackState {
        volume: 0.4,
        time_scale: 2.0,
    });
    let mediator = start_with_bridge(Arc::new(NullBridge), playback.clone());
    let handle = mediator.handle();
    let mut session_rx = handle.subscribe(Topic::Session);
    let mut reward_rx = handle.subscribe(Topic::Reward);

    // Hand-deliver a fill, then show it through the inert bridge.
    handle.callbacks().loaded(AdKind::Rewarded, "rewarded_777");
    timeout(WAIT, async {
        while !handle.status().await.expect("status").rewarded_ready {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("hand-delivered fill should land");

    let fired = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&fired);
    let reward = PendingReward::with_callback(json!("gems"), move || {
        counter.fetch_add(1, Ordering::SeqCst);
    });
    handle.show_rewarded(reward).await.expect("show accepted");
    assert!(matches!(
        next_event(&mut session_rx).await,
        Event::Session(SessionEvent::Started {
            kind: AdKind::Rewarded
        })
    ));

    handle
        .callbacks()
        .error(Some(AdKind::Rewarded), "render crashed");

    assert!(matches!(
        next_event(&mut session_rx).await,
        Event::Session(SessionEvent::Ended {
            kind: AdKind::Rewarded
        })
    ));

    // State restored, lock released, reward discarded.
    assert_eq!(
        playback.snapshot(),
        PlaybackState {
            volume: 0.4,
            time_scale: 2.0
        }
    );
    let status = handle.status().await.expect("status");
    assert_eq!(status.showing, None);
    assert!(!status.rewarded_ready);
    assert_eq!(fired.load(Ordering::SeqCst), 0);
    assert_quiet(&mut reward_rx, Duration::from_millis(100)).await;

    drop(handle);
    mediator.shutdown().await.expect("shutdown");
}

#[tokio::test]
async fn skipped_rewarded_ad_grants_nothing_and_clears_the_slot() {
    let mediator = start_with_bridge(Arc::new(NullBridge), SharedPlayback::default());
    let handle = mediator.handle();
    let mut session_rx = handle.subscribe(Topic::Session);
    let mut reward_rx = handle.subscribe(Topic::Reward);

    handle.callbacks().loaded(AdKind::Rewarded, "rewarded_888");
    timeout(WAIT, async {
        while !handle.status().await.expect("status").rewarded_ready {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("hand-delivered fill should land");

    let fired = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&fired);
    let reward = PendingReward::with_callback(json!("gems"), move || {
        counter.fetch_add(1, Ordering::SeqCst);
    });
    handle.show_rewarded(reward).await.expect("show accepted");

    handle.callbacks().rewarded_completed(false);

    assert!(matches!(
        next_event(&mut session_rx).await,
        Event::Session(SessionEvent::Started { .. })
    ));
    assert!(matches!(
        next_event(&mut session_rx).await,
        Event::Session(SessionEvent::Ended {
            kind: AdKind::Rewarded
        })
    ));

    assert_eq!(fired.load(Ordering::SeqCst), 0);
    assert_quiet(&mut reward_rx, Duration::from_millis(100)).await;

    // The skipped fill is spent; a fresh load is required before re-showing.
    let err = handle
        .show_rewarded(PendingReward::default())
        .await
        .expect_err("slot must be empty after a skip");
    assert!(matches!(
        err,
        MediatorError::NoInstanceAvailable {
            kind: AdKind::Rewarded
        }
    ));

    drop(handle);
    mediator.shutdown().await.expect("shutdown");
}

#[tokio::test]
async fn spurious_completions_are_ignored() {
    let playback = SharedPlayback::default();
    let mediator = start_with_bridge(Arc::new(NullBridge), playback.clone());
    let handle = mediator.handle();
    let mut session_rx = handle.subscribe(Topic::Session);

    // No session in flight: these must not publish session boundaries or
    // touch playback.
    handle.callbacks().interstitial_completed();
    handle.callbacks().rewarded_completed(true);

    assert_quiet(&mut session_rx, Duration::from_millis(100)).await;
    assert_eq!(playback.snapshot(), PlaybackState::default());

    drop(handle);
    mediator.shutdown().await.expect("shutdown");
}

#[tokio::test]
async fn unattributed_error_while_idle_resets_both_loading_slots() {
    let mediator = start_with_bridge(Arc::new(NullBridge), SharedPlayback::default());
    let handle = mediator.handle();
    let mut slot_rx = handle.subscribe(Topic::Slot);

    // Let the first tick put both slots into loading.
    tokio::time::sleep(Duration::from_millis(30)).await;
    handle.callbacks().error(None, "bridge lost");

    let mut failed = Vec::new();
    while failed.len() < 2 {
        if let Event::Slot(SlotEvent::LoadFailed { kind, .. }) = next_event(&mut slot_rx).await {
            failed.push(kind);
        }
    }
    assert!(failed.contains(&AdKind::Interstitial));
    assert!(failed.contains(&AdKind::Rewarded));

    drop(handle);
    mediator.shutdown().await.expect("shutdown");
}

#[tokio::test]
async fn rejection_order_prefers_disallowed_over_missing_instance() {
    let mediator = start_with_bridge(Arc::new(NullBridge), SharedPlayback::default());
    let handle = mediator.handle();

    // Ready slot + ads disallowed: the flag check must win.
    handle.callbacks().loaded(AdKind::Interstitial, "interstitial_111");
    timeout(WAIT, async {
        while !handle.status().await.expect("status").interstitial_ready {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("hand-delivered fill should land");
    handle.set_ads_allowed(false).await.expect("set flag");

    let err = handle
        .show_interstitial()
        .await
        .expect_err("show must reject while disallowed");
    assert!(matches!(err, MediatorError::AdsDisallowed));

    // Empty slot + ads allowed: missing instance is the remaining rejection.
    handle.set_ads_allowed(true).await.expect("set flag");
    let err = handle
        .show_rewarded(PendingReward::default())
        .await
        .expect_err("empty slot must reject");
    assert!(matches!(
        err,
        MediatorError::NoInstanceAvailable {
            kind: AdKind::Rewarded
        }
    ));

    drop(handle);
    mediator.shutdown().await.expect("shutdown");
}
