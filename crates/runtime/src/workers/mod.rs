//! Worker tasks that back the mediator orchestration.
//!
//! The session worker is the single owner of slot, session, and playback
//! state; everything else communicates with it over channels.

mod session;

pub use session::{Command, SessionWorker};
