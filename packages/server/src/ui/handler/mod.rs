//! Request handlers.

mod http;
mod websocket;

pub use http::{disband_group, form_group, health_check, not_found};
pub use websocket::websocket_handler;
