//! Utilities shared by the huddle coordinator and client binaries.

pub mod logger;
pub mod time;
