//! Load lifecycle of a single ad slot.
//!
//! Each slot moves `Empty → Loading → Ready` and back to `Empty` on
//! show-completion, timeout, or bridge error. Modeling the state as an enum
//! makes "loading and ready at the same time" unrepresentable.
use tokio::time::Instant;

use ads_core::AdKind;

/// Where a slot currently is in its load lifecycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlotState {
    /// No fill and no attempt in flight; the next tick re-requests a load.
    Empty,
    /// A load request was issued. The deadline is measured on the tokio
    /// clock, which the host time-scale manipulation cannot stall.
    Loading { deadline: Instant },
    /// The bridge reported a fill; the instance id is ready to show.
    Ready { instance: String },
}

/// One tracked ad slot: its kind plus the current load state.
#[derive(Debug, Clone)]
pub struct AdSlot {
    kind: AdKind,
    state: SlotState,
}

impl AdSlot {
    pub fn new(kind: AdKind) -> Self {
        Self {
            kind,
            state: SlotState::Empty,
        }
    }

    pub fn kind(&self) -> AdKind {
        self.kind
    }

    pub fn state(&self) -> &SlotState {
        &self.state
    }

    pub fn is_empty(&self) -> bool {
        matches!(self.state, SlotState::Empty)
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, SlotState::Loading { .. })
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.state, SlotState::Ready { .. })
    }

    /// Instance id if the slot holds a fill.
    pub fn instance(&self) -> Option<&str> {
        match &self.state {
            SlotState::Ready { instance } => Some(instance),
            _ => None,
        }
    }

    /// Mark a load attempt in flight with its timeout deadline.
    pub fn begin_loading(&mut self, deadline: Instant) {
        self.state = SlotState::Loading { deadline };
    }

    /// Record a fill from the bridge.
    ///
    /// Accepts the fill regardless of prior state: a callback that arrives
    /// after its attempt already timed out still revives the slot, and a
    /// duplicate delivery simply overwrites with the same id.
    pub fn fulfill(&mut self, instance: String) {
        self.state = SlotState::Ready { instance };
    }

    /// Reset to empty, dropping any fill or in-flight attempt.
    pub fn clear(&mut self) {
        self.state = SlotState::Empty;
    }

    /// True when a load attempt has outlived its deadline.
    pub fn expired(&self, now: Instant) -> bool {
        match self.state {
            SlotState::Loading { deadline } => now >= deadline,
            _ => false,
        }
    }
}
