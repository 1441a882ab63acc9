//! Domain types shared by the ad mediation runtime and its embedders.
//!
//! This crate stays free of async machinery so host applications can depend
//! on it from any context:
//! - [`kind`] identifies the two independently tracked ad slots
//! - [`playback`] abstracts the host audio/time-scale state paused around ads
//! - [`reward`] carries the caller-supplied reward for rewarded sessions
pub mod kind;
pub mod playback;
pub mod reward;

pub use kind::AdKind;
pub use playback::{HostPlayback, PlaybackState, SharedPlayback};
pub use reward::{PendingReward, RewardCallback};
