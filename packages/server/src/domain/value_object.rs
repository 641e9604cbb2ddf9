//! Value objects for the coordinator domain.
//!
//! Identifiers are opaque strings. Client identifiers are supplied by clients;
//! request, group and connection identifiers are generated here.

use std::fmt;

use uuid::Uuid;

use super::error::ValueObjectError;

/// Client identifier (externally supplied, opaque)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClientId(String);

impl ClientId {
    /// Create a new ClientId, rejecting empty strings
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        if value.is_empty() {
            return Err(ValueObjectError::EmptyIdentifier("clientId"));
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ClientId {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Group request identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GroupRequestId(String);

impl GroupRequestId {
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        if value.is_empty() {
            return Err(ValueObjectError::EmptyIdentifier("groupRequestId"));
        }
        Ok(Self(value))
    }

    /// Generate a fresh, globally unique request identifier
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for GroupRequestId {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl fmt::Display for GroupRequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Active group identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GroupId(String);

impl GroupId {
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        if value.is_empty() {
            return Err(ValueObjectError::EmptyIdentifier("groupId"));
        }
        Ok(Self(value))
    }

    /// Generate a fresh, globally unique group identifier
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for GroupId {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifies one accepted transport.
///
/// A client identifier may be re-registered on a new transport; the registry
/// compares connection identifiers so that a displaced transport closing later
/// cannot remove its replacement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(Uuid);

impl ConnectionId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Unix timestamp in milliseconds (UTC)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Timestamp(i64);

impl Timestamp {
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

/// Desired age range, inclusive (`min <= max`)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AgeRange {
    min: u32,
    max: u32,
}

impl AgeRange {
    pub fn new(min: u32, max: u32) -> Result<Self, ValueObjectError> {
        if min > max {
            return Err(ValueObjectError::InvalidAgeRange { min, max });
        }
        Ok(Self { min, max })
    }

    pub fn min(&self) -> u32 {
        self.min
    }

    pub fn max(&self) -> u32 {
        self.max
    }
}

/// Chat duration in minutes of a formed group
///
/// Any finite number of at least one minute; fractional minutes are kept as given.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct ChatTime(f64);

impl ChatTime {
    pub fn new(minutes: f64) -> Result<Self, ValueObjectError> {
        if !minutes.is_finite() || minutes < 1.0 {
            return Err(ValueObjectError::NonPositiveChatTime);
        }
        Ok(Self(minutes))
    }

    pub fn minutes(&self) -> f64 {
        self.0
    }

    pub fn as_millis(&self) -> i64 {
        (self.0 * 60_000.0).round() as i64
    }
}

impl fmt::Display for ChatTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
