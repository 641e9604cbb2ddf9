//! Domain error types.

use thiserror::Error;

/// Value object construction errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueObjectError {
    #[error("{0} must not be empty")]
    EmptyIdentifier(&'static str),

    #[error("age range min ({min}) must not exceed max ({max})")]
    InvalidAgeRange { min: u32, max: u32 },

    #[error("chatTime must be a positive number")]
    NonPositiveChatTime,
}

/// Errors reported by the lobby aggregate.
///
/// Every variant is returned before any table is touched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LobbyError {
    #[error("Client {0} not found")]
    ClientNotFound(String),

    #[error("Group request {0} not found")]
    GroupRequestNotFound(String),

    #[error("Group {0} not found")]
    GroupNotFound(String),

    #[error("Group request {request_id} is not owned by client {client_id}")]
    NotRequestOwner {
        request_id: String,
        client_id: String,
    },
}

/// Errors while pushing a notification onto a client transport
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessagePushError {
    #[error("transport is closed")]
    TransportClosed,

    #[error("failed to encode notification: {0}")]
    Encode(String),
}
