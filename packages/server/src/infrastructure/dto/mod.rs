//! Data Transfer Objects (DTOs) for the coordinator.
//!
//! DTOs are organized by protocol:
//! - `websocket`: WebSocket frame DTOs
//! - `http`: HTTP trigger surface DTOs

pub mod conversion;
pub mod http;
pub mod websocket;
