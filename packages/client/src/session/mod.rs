//! Client connection session.
//!
//! `machine` holds the pure state machine; `driver` runs it against a real
//! WebSocket and timer on a tokio task.

mod driver;
mod machine;

pub use driver::{ClientSession, SessionHandle};
pub use machine::{
    GroupPreferences, MAX_RECONNECT_ATTEMPTS, RECONNECT_DELAY, SessionAction, SessionEvent,
    SessionMachine, SessionStatus,
};
