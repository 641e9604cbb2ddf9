//! WebSocket frame DTOs.
//!
//! Every frame is a JSON object with a `type` discriminator. Both directions
//! are closed sum types with an `Unknown` catch-all so that unrecognized tags
//! parse successfully and can be ignored by the receiver.

use serde::{Deserialize, Serialize, Serializer};
use thiserror::Error;

use crate::domain::ValueObjectError;

/// Inbound frame could not be turned into a domain operation
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("malformed frame: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("invalid field: {0}")]
    InvalidField(#[from] ValueObjectError),
}

/// Age range on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgeRangeDto {
    pub min: u32,
    pub max: u32,
}

/// Writes whole minutes as a JSON integer and anything else as a float
pub fn serialize_minutes<S>(minutes: &f64, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    if minutes.fract() == 0.0 && (0.0..=u64::MAX as f64).contains(minutes) {
        serializer.serialize_u64(*minutes as u64)
    } else {
        serializer.serialize_f64(*minutes)
    }
}

// ========================================
// client → coordinator
// ========================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterFrame {
    pub client_id: String,
    pub first_name: String,
    pub last_name: String,
    pub photo_data: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_photo_data: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateGroupFrame {
    pub client_id: String,
    pub age_range: AgeRangeDto,
    pub distance: u32,
    pub group_size: u32,
    pub chat_time: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelGroupFrame {
    /// Identifier of the group request to cancel
    pub group_id: String,
    pub client_id: String,
}

/// Frames sent by a client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientFrame {
    Register(RegisterFrame),
    CreateGroup(CreateGroupFrame),
    CancelGroup(CancelGroupFrame),
    #[serde(other)]
    Unknown,
}

impl ClientFrame {
    pub fn parse(text: &str) -> Result<Self, ProtocolError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

// ========================================
// coordinator → client
// ========================================

/// Echo of a group request in the creator's ack
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupRequestDto {
    pub id: String,
    pub creator_id: String,
    pub creator_name: String,
    pub age_range: AgeRangeDto,
    pub distance: u32,
    pub group_size: u32,
    pub chat_time: u32,
    /// RFC 3339 (UTC)
    pub created_at: String,
}

/// Member roster entry of `group_formed`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberDto {
    pub first_name: String,
    pub last_name: String,
    pub photo_data: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_photo_data: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisteredFrame {
    pub client_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupCreatedFrame {
    /// Identifier of the new group request
    pub group_id: String,
    pub request: GroupRequestDto,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupCancelledFrame {
    pub group_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupFormedFrame {
    pub group_id: String,
    /// Minutes, possibly fractional
    #[serde(serialize_with = "serialize_minutes")]
    pub chat_time: f64,
    pub members: Vec<MemberDto>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupDisbandedFrame {
    pub group_id: String,
}

/// Frames sent by the coordinator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerFrame {
    Registered(RegisteredFrame),
    GroupCreated(GroupCreatedFrame),
    GroupCancelled(GroupCancelledFrame),
    GroupFormed(GroupFormedFrame),
    GroupDisbanded(GroupDisbandedFrame),
    #[serde(other)]
    Unknown,
}

impl ServerFrame {
    pub fn parse(text: &str) -> Result<Self, ProtocolError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
