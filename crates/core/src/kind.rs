//! Identification of the two ad slots tracked by the mediator.
use std::fmt;

use serde::{Deserialize, Serialize};

/// The two independently tracked ad types.
///
/// Every bridge request and callback is tagged with a kind so the mediator
/// can route it to the matching slot.
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum AdKind {
    Interstitial,
    Rewarded,
}

impl AdKind {
    /// Both kinds, in the order the mediator sweeps them each tick.
    pub const ALL: [AdKind; 2] = [AdKind::Interstitial, AdKind::Rewarded];

    /// Lowercase label used in instance ids and log lines.
    pub fn as_str(&self) -> &'static str {
        match self {
            AdKind::Interstitial => "interstitial",
            AdKind::Rewarded => "rewarded",
        }
    }

    pub fn is_rewarded(&self) -> bool {
        matches!(self, AdKind::Rewarded)
    }
}

impl fmt::Display for AdKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
