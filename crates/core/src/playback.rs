//! Host playback state paused and resumed around ad sessions.
//!
//! The mediator is the only component allowed to touch these values while a
//! session is in flight; embedders implement [`HostPlayback`] against their
//! engine (audio mixer volume, simulation time-scale) and hand it to the
//! mediator builder.
use std::sync::{Arc, Mutex, PoisonError};

/// Accessors for the process-wide playback state the mediator pauses.
///
/// Implementations must tolerate being called from the mediator's worker
/// task. `set_*` calls happen in matched pairs: values captured at session
/// start are written back verbatim at session end.
pub trait HostPlayback: Send + 'static {
    fn volume(&self) -> f32;
    fn set_volume(&mut self, volume: f32);
    fn time_scale(&self) -> f32;
    fn set_time_scale(&mut self, scale: f32);
}

/// Plain value snapshot of the host playback state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaybackState {
    pub volume: f32,
    pub time_scale: f32,
}

impl Default for PlaybackState {
    fn default() -> Self {
        Self {
            volume: 1.0,
            time_scale: 1.0,
        }
    }
}

/// Shared, cloneable [`HostPlayback`] implementation.
///
/// Backed by a mutex so the embedding application and the mediator worker can
/// observe the same state. Used by the demo binary and tests; real engines
/// typically implement [`HostPlayback`] directly instead.
#[derive(Debug, Clone, Default)]
pub struct SharedPlayback {
    state: Arc<Mutex<PlaybackState>>,
}

impl SharedPlayback {
    pub fn new(state: PlaybackState) -> Self {
        Self {
            state: Arc::new(Mutex::new(state)),
        }
    }

    /// Snapshot of the current state.
    pub fn snapshot(&self) -> PlaybackState {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl HostPlayback for SharedPlayback {
    fn volume(&self) -> f32 {
        self.snapshot().volume
    }

    fn set_volume(&mut self, volume: f32) {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .volume = volume;
    }

    fn time_scale(&self) -> f32 {
        self.snapshot().time_scale
    }

    fn set_time_scale(&mut self, scale: f32) {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .time_scale = scale;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_observe_the_same_state() {
        let mut playback = SharedPlayback::default();
        let observer = playback.clone();

        playback.set_volume(0.25);
        playback.set_time_scale(0.0);

        assert_eq!(observer.snapshot().volume, 0.25);
        assert_eq!(observer.snapshot().time_scale, 0.0);
    }

    #[test]
    fn defaults_to_full_volume_and_real_time() {
        let playback = SharedPlayback::default();
        assert_eq!(playback.snapshot(), PlaybackState::default());
    }
}
