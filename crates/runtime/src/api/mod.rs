//! Public mediator API surface.
//!
//! This module gathers the types exposed to consumers of the runtime crate so
//! other layers can stay focused on orchestration, workers, or the bridge.

pub mod errors;
pub mod handle;

pub use errors::{MediatorError, Result};
pub use handle::{MediatorHandle, MediatorStatus};
