//! Huddle client library.
//!
//! The session state machine, its async WebSocket driver, client identity
//! derivation and the pieces of the interactive CLI.

pub mod error;
pub mod formatter;
pub mod identity;
pub mod runner;
pub mod session;
mod ui;
