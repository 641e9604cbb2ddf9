//! Repository trait 定義
//!
//! Lobby 集約へのアクセスインターフェースを定義します。
//! 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。
//!
//! ## 原子性
//!
//! 各メソッドは Lobby の 4 つのテーブル全体に対して 1 つの不可分な操作として
//! 実行されなければなりません。テーブルごとにロックを分割してはいけません。

use std::sync::Arc;

use async_trait::async_trait;

use super::{
    channel::ClientChannel,
    entity::{ActiveGroup, ClientProfile, GroupCriteria, GroupRequest},
    error::LobbyError,
    lobby::{ClientRemoval, DisbandedGroup, LobbySnapshot, Registration},
    value_object::{ChatTime, ClientId, ConnectionId, GroupId, GroupRequestId},
};

/// Lobby Repository trait
///
/// UseCase 層はこの trait に依存し、Infrastructure 層の具体的な実装には依存しない。
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LobbyRepository: Send + Sync {
    /// クライアントを登録（同じ ID の既存接続は閉じられる）
    async fn register_client(
        &self,
        client_id: ClientId,
        connection_id: ConnectionId,
        profile: ClientProfile,
        channel: Arc<dyn ClientChannel>,
    ) -> Registration;

    /// 接続が閉じたクライアントを削除（保留中のリクエストも削除）
    async fn remove_client(
        &self,
        client_id: &ClientId,
        connection_id: ConnectionId,
    ) -> Option<ClientRemoval>;

    /// グループリクエストを作成（既存のリクエストは置き換えられる）
    async fn create_request(
        &self,
        client_id: &ClientId,
        criteria: GroupCriteria,
    ) -> Result<GroupRequest, LobbyError>;

    /// グループリクエストをキャンセル
    async fn cancel_request(
        &self,
        request_id: &GroupRequestId,
        client_id: &ClientId,
    ) -> Result<(), LobbyError>;

    /// リクエストを消費してアクティブグループを形成
    async fn form_group(
        &self,
        request_ids: &[GroupRequestId],
        client_ids: &[ClientId],
        chat_time: ChatTime,
    ) -> Result<ActiveGroup, LobbyError>;

    /// アクティブグループを解散
    async fn disband_group(&self, group_id: &GroupId) -> Result<DisbandedGroup, LobbyError>;

    /// 全テーブルのスナップショットを取得
    async fn snapshot(&self) -> LobbySnapshot;
}
