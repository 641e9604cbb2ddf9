//! HTTP API DTOs for the matchmaking trigger surface.

use serde::{Deserialize, Serialize};

use super::websocket::serialize_minutes;

/// `POST /api/groups/form-group` body
///
/// Fields are optional on the wire so that validation can report which one is
/// missing instead of failing deserialization.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormGroupRequestDto {
    #[serde(default)]
    pub group_request_ids: Vec<String>,
    #[serde(default)]
    pub client_ids: Vec<String>,
    #[serde(default)]
    pub chat_time: Option<serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormGroupResponseDto {
    pub message: String,
    pub group_id: String,
    pub group_request_ids: Vec<String>,
    pub client_ids: Vec<String>,
    #[serde(serialize_with = "serialize_minutes")]
    pub chat_time: f64,
}

/// `POST /api/groups/disband-group` body
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisbandGroupRequestDto {
    #[serde(default)]
    pub group_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisbandGroupResponseDto {
    pub message: String,
    pub group_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponseDto {
    pub error: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponseDto {
    pub status: String,
    pub timestamp: String,
}
