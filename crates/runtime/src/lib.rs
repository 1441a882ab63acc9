//! Ad session mediation runtime.
//!
//! This crate wires the platform bridge abstraction, the per-slot load state
//! machine, and host playback pause/resume into a cohesive runtime API.
//! Consumers embed [`Mediator`] at their composition root, drive shows and
//! readiness queries through [`MediatorHandle`], and subscribe to session,
//! slot, and reward notifications.
//!
//! Modules are organized by responsibility:
//! - [`runtime`] hosts the orchestrator and builder
//! - [`api`] exposes the types downstream clients interact with
//! - [`bridge`] defines the platform bridge contract and the mock bridge
//! - [`events`] provides the topic-based event bus for notifications
//! - [`slot`] models one ad slot's load lifecycle
//! - `workers` keeps the session worker internal to the crate
pub mod api;
pub mod bridge;
pub mod events;
pub mod runtime;
pub mod slot;

mod workers;

pub use api::{MediatorError, MediatorHandle, MediatorStatus, Result};
pub use bridge::{AdCallbacks, BridgeError, MockBridge, MockBridgeConfig, PlatformBridge};
pub use events::{Event, EventBus, RewardEvent, SessionEvent, SlotEvent, Topic};
pub use runtime::{Mediator, MediatorBuilder, MediatorConfig};
pub use slot::{AdSlot, SlotState};
