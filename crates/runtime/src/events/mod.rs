//! Topic-based event bus for mediator notifications.
//!
//! This module provides a flexible event system where events are published to
//! specific topics, and consumers can subscribe only to the topics they need.

mod bus;
mod types;

pub use bus::{Event, EventBus, Topic};
pub use types::{RewardEvent, SessionEvent, SlotEvent};
