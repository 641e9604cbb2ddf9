//! InMemory Lobby Repository 実装
//!
//! ドメイン層が定義する LobbyRepository trait の具体的な実装。
//! Lobby 集約全体を 1 つの Mutex で保護します。各メソッドはロックを取得して
//! Lobby の操作を最後まで実行するため、4 つのテーブルへの変更と通知の投入は
//! 他の操作から見て常に 1 つの不可分な状態遷移になります。

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{
    ActiveGroup, ChatTime, ClientChannel, ClientId, ClientProfile, ClientRemoval,
    ConnectionId, DisbandedGroup, GroupCriteria, GroupId, GroupRequest, GroupRequestId, Lobby,
    LobbyError, LobbyRepository, LobbySnapshot, Registration,
};

/// インメモリ Lobby Repository 実装
pub struct InMemoryLobbyRepository {
    /// Lobby 集約（全テーブルを 1 つのロックで保護）
    lobby: Arc<Mutex<Lobby>>,
}

impl InMemoryLobbyRepository {
    /// 新しい InMemoryLobbyRepository を作成
    pub fn new(lobby: Arc<Mutex<Lobby>>) -> Self {
        Self { lobby }
    }
}

#[async_trait]
impl LobbyRepository for InMemoryLobbyRepository {
    async fn register_client(
        &self,
        client_id: ClientId,
        connection_id: ConnectionId,
        profile: ClientProfile,
        channel: Arc<dyn ClientChannel>,
    ) -> Registration {
        let mut lobby = self.lobby.lock().await;
        lobby.register_client(client_id, connection_id, profile, channel)
    }

    async fn remove_client(
        &self,
        client_id: &ClientId,
        connection_id: ConnectionId,
    ) -> Option<ClientRemoval> {
        let mut lobby = self.lobby.lock().await;
        lobby.remove_client(client_id, connection_id)
    }

    async fn create_request(
        &self,
        client_id: &ClientId,
        criteria: GroupCriteria,
    ) -> Result<GroupRequest, LobbyError> {
        let mut lobby = self.lobby.lock().await;
        lobby.create_request(client_id, criteria)
    }

    async fn cancel_request(
        &self,
        request_id: &GroupRequestId,
        client_id: &ClientId,
    ) -> Result<(), LobbyError> {
        let mut lobby = self.lobby.lock().await;
        lobby.cancel_request(request_id, client_id)
    }

    async fn form_group(
        &self,
        request_ids: &[GroupRequestId],
        client_ids: &[ClientId],
        chat_time: ChatTime,
    ) -> Result<ActiveGroup, LobbyError> {
        let mut lobby = self.lobby.lock().await;
        lobby.form_group(request_ids, client_ids, chat_time)
    }

    async fn disband_group(&self, group_id: &GroupId) -> Result<DisbandedGroup, LobbyError> {
        let mut lobby = self.lobby.lock().await;
        lobby.disband_group(group_id)
    }

    async fn snapshot(&self) -> LobbySnapshot {
        let lobby = self.lobby.lock().await;
        lobby.snapshot()
    }
}
