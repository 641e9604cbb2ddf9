//! Conversion logic between DTOs and domain types.

use huddle_shared::time::timestamp_to_rfc3339;

use crate::domain::{
    AgeRange, ClientProfile, GroupCriteria, GroupRequest, Notification, ValueObjectError,
};
use crate::infrastructure::dto::websocket as dto;

// ========================================
// DTO → Domain
// ========================================

impl From<&dto::RegisterFrame> for ClientProfile {
    fn from(frame: &dto::RegisterFrame) -> Self {
        ClientProfile::new(
            frame.first_name.clone(),
            frame.last_name.clone(),
            frame.photo_data.clone(),
            frame.additional_photo_data.clone(),
        )
    }
}

impl TryFrom<&dto::CreateGroupFrame> for GroupCriteria {
    type Error = ValueObjectError;

    fn try_from(frame: &dto::CreateGroupFrame) -> Result<Self, Self::Error> {
        Ok(GroupCriteria {
            age_range: AgeRange::new(frame.age_range.min, frame.age_range.max)?,
            distance: frame.distance,
            group_size: frame.group_size,
            chat_time: frame.chat_time,
        })
    }
}

// ========================================
// Domain → DTO
// ========================================

impl From<&GroupRequest> for dto::GroupRequestDto {
    fn from(request: &GroupRequest) -> Self {
        Self {
            id: request.id.to_string(),
            creator_id: request.creator_id.to_string(),
            creator_name: request.creator_name.clone(),
            age_range: dto::AgeRangeDto {
                min: request.criteria.age_range.min(),
                max: request.criteria.age_range.max(),
            },
            distance: request.criteria.distance,
            group_size: request.criteria.group_size,
            chat_time: request.criteria.chat_time,
            created_at: timestamp_to_rfc3339(request.created_at.value()),
        }
    }
}

impl From<&ClientProfile> for dto::MemberDto {
    fn from(profile: &ClientProfile) -> Self {
        Self {
            first_name: profile.first_name.clone(),
            last_name: profile.last_name.clone(),
            photo_data: profile.photo_data.clone(),
            additional_photo_data: profile.additional_photo_data.clone(),
        }
    }
}

impl From<&Notification> for dto::ServerFrame {
    fn from(notification: &Notification) -> Self {
        match notification {
            Notification::Registered { client_id } => {
                dto::ServerFrame::Registered(dto::RegisteredFrame {
                    client_id: client_id.to_string(),
                })
            }
            Notification::GroupCreated { request } => {
                dto::ServerFrame::GroupCreated(dto::GroupCreatedFrame {
                    group_id: request.id.to_string(),
                    request: request.into(),
                })
            }
            Notification::GroupCancelled { request_id } => {
                dto::ServerFrame::GroupCancelled(dto::GroupCancelledFrame {
                    group_id: request_id.to_string(),
                })
            }
            Notification::GroupFormed {
                group_id,
                chat_time,
                members,
            } => dto::ServerFrame::GroupFormed(dto::GroupFormedFrame {
                group_id: group_id.to_string(),
                chat_time: chat_time.minutes(),
                members: members.iter().map(dto::MemberDto::from).collect(),
            }),
            Notification::GroupDisbanded { group_id } => {
                dto::ServerFrame::GroupDisbanded(dto::GroupDisbandedFrame {
                    group_id: group_id.to_string(),
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ChatTime, ClientId, GroupId, GroupRequestId, Timestamp};

    fn create_frame(min: u32, max: u32, chat_time: u32) -> dto::CreateGroupFrame {
        dto::CreateGroupFrame {
            client_id: "alice".to_string(),
            age_range: dto::AgeRangeDto { min, max },
            distance: 5,
            group_size: 3,
            chat_time,
        }
    }

    #[test]
    fn test_create_group_frame_to_criteria() {
        // テスト項目: create_group フレームがドメインの条件に変換される
        // given (前提条件):
        let frame = create_frame(20, 30, 15);

        // when (操作):
        let criteria = GroupCriteria::try_from(&frame).unwrap();

        // then (期待する結果):
        assert_eq!(criteria.age_range.min(), 20);
        assert_eq!(criteria.age_range.max(), 30);
        assert_eq!(criteria.distance, 5);
        assert_eq!(criteria.group_size, 3);
        assert_eq!(criteria.chat_time, 15);
    }

    #[test]
    fn test_create_group_frame_keeps_chat_time_as_sent() {
        // テスト項目: リクエストのチャット時間は検証されず、0 分でもそのまま保持される
        // given (前提条件):
        let frame = create_frame(20, 30, 0);

        // when (操作):
        let criteria = GroupCriteria::try_from(&frame);

        // then (期待する結果):
        assert_eq!(criteria.map(|c| c.chat_time), Ok(0));
    }

    #[test]
    fn test_group_formed_notification_carries_fractional_chat_time() {
        // テスト項目: group_formed 通知が小数のチャット時間をそのまま運ぶ
        // given (前提条件):
        let notification = Notification::GroupFormed {
            group_id: GroupId::new("g1".to_string()).unwrap(),
            chat_time: ChatTime::new(1.5).unwrap(),
            members: vec![],
        };

        // when (操作):
        let frame = dto::ServerFrame::from(&notification);

        // then (期待する結果):
        let dto::ServerFrame::GroupFormed(formed) = frame else {
            panic!("expected group_formed, got {:?}", frame);
        };
        assert_eq!(formed.chat_time, 1.5);
    }

    #[test]
    fn test_create_group_frame_with_inverted_age_range_fails() {
        // テスト項目: min > max の年齢範囲は変換エラーになる
        // given (前提条件):
        let frame = create_frame(40, 30, 15);

        // when (操作):
        let result = GroupCriteria::try_from(&frame);

        // then (期待する結果):
        assert_eq!(
            result,
            Err(ValueObjectError::InvalidAgeRange { min: 40, max: 30 })
        );
    }

    #[test]
    fn test_group_created_notification_echoes_request() {
        // テスト項目: group_created 通知がリクエスト内容をそのまま返す
        // given (前提条件):
        let request = GroupRequest {
            id: GroupRequestId::new("req-1".to_string()).unwrap(),
            creator_id: ClientId::new("alice".to_string()).unwrap(),
            creator_name: "Alice Tester".to_string(),
            criteria: GroupCriteria::try_from(&create_frame(20, 30, 15)).unwrap(),
            created_at: Timestamp::new(1672531200000),
        };

        // when (操作):
        let frame = dto::ServerFrame::from(&Notification::GroupCreated { request });

        // then (期待する結果):
        let dto::ServerFrame::GroupCreated(created) = frame else {
            panic!("expected group_created, got {:?}", frame);
        };
        assert_eq!(created.group_id, "req-1");
        assert_eq!(created.request.creator_name, "Alice Tester");
        assert_eq!(created.request.age_range, dto::AgeRangeDto { min: 20, max: 30 });
        assert_eq!(created.request.created_at, "2023-01-01T00:00:00.000Z");
    }
}
