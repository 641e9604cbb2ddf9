//! Infrastructure layer: wire formats, transports and storage.

pub mod channel;
pub mod dto;
pub mod repository;
