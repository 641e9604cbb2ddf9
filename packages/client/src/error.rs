//! Error types for the Huddle client.

use thiserror::Error;

/// Client-specific errors
#[derive(Debug, Error)]
pub enum ClientError {
    /// The session task has stopped and no longer accepts commands
    #[error("Session is no longer running")]
    SessionClosed,

    /// Gave up after exhausting reconnection attempts
    #[error("Connection lost after {0} reconnection attempts")]
    ConnectionLost(u32),
}
