//! Huddle coordinator library.
//!
//! Tracks live client connections, pending group requests and formed groups,
//! and exposes them over a WebSocket protocol for clients plus an HTTP trigger
//! surface for the external matching process.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;
