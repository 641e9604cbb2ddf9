//! クライアントへの通知チャネル trait 定義
//!
//! Lobby はクライアントのトランスポートを直接知らず、この trait を通して
//! 通知を送信します。具体的な実装は Infrastructure 層が提供します。
//!
//! `push` はキューへの投入のみを行い、ブロックしてはいけません。
//! Lobby はロックを保持したまま `push` を呼び出します。

use super::{
    entity::{ClientProfile, GroupRequest},
    error::MessagePushError,
    value_object::{ChatTime, ClientId, GroupId, GroupRequestId},
};

/// Notification pushed from the coordinator to one client
#[derive(Debug, Clone, PartialEq)]
pub enum Notification {
    /// Registration acknowledged
    Registered { client_id: ClientId },
    /// Creator-only ack of a new group request
    GroupCreated { request: GroupRequest },
    /// Creator-only ack of a cancelled group request
    GroupCancelled { request_id: GroupRequestId },
    /// Group formed; carries the full roster with photo payloads
    GroupFormed {
        group_id: GroupId,
        chat_time: ChatTime,
        members: Vec<ClientProfile>,
    },
    GroupDisbanded { group_id: GroupId },
}

/// Handle on one live client transport
#[cfg_attr(test, mockall::automock)]
pub trait ClientChannel: Send + Sync {
    /// Enqueue a notification for delivery
    fn push(&self, notification: &Notification) -> Result<(), MessagePushError>;

    /// Forcibly close the transport
    fn close(&self);

    /// Whether the transport still accepts frames
    fn is_open(&self) -> bool;
}
