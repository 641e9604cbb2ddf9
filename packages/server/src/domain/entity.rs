//! Domain entities: profiles, group requests and active groups.

use super::value_object::{
    AgeRange, ChatTime, ClientId, GroupId, GroupRequestId, Timestamp,
};

/// Profile snapshot submitted with a registration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientProfile {
    pub first_name: String,
    pub last_name: String,
    /// Primary photo payload (opaque, usually base64)
    pub photo_data: String,
    pub additional_photo_data: Option<Vec<String>>,
}

impl ClientProfile {
    pub fn new(
        first_name: String,
        last_name: String,
        photo_data: String,
        additional_photo_data: Option<Vec<String>>,
    ) -> Self {
        Self {
            first_name,
            last_name,
            photo_data,
            additional_photo_data,
        }
    }

    /// "first last"
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Matching criteria declared by a group request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupCriteria {
    pub age_range: AgeRange,
    /// Desired distance in kilometres
    pub distance: u32,
    pub group_size: u32,
    /// Requested chat duration in minutes, echoed as sent
    pub chat_time: u32,
}

/// Pending match request, owned by exactly one client
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupRequest {
    pub id: GroupRequestId,
    pub creator_id: ClientId,
    /// Creator's display name captured at creation
    pub creator_name: String,
    pub criteria: GroupCriteria,
    pub created_at: Timestamp,
}

/// Member snapshot stored with an active group (no photo payloads)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupMember {
    pub client_id: ClientId,
    pub first_name: String,
    pub last_name: String,
}

impl GroupMember {
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Formed group with immutable membership
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveGroup {
    pub id: GroupId,
    /// Members in the order given by the caller that formed the group
    pub members: Vec<GroupMember>,
    pub chat_time: ChatTime,
    pub created_at: Timestamp,
}

impl ActiveGroup {
    /// Nominal expiry (`created_at + chat_time`). Not enforced anywhere.
    pub fn nominal_end(&self) -> Timestamp {
        Timestamp::new(self.created_at.value() + self.chat_time.as_millis())
    }

    pub fn member_ids(&self) -> impl Iterator<Item = &ClientId> {
        self.members.iter().map(|member| &member.client_id)
    }
}
