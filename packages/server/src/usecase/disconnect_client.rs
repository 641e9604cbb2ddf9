//! UseCase: クライアント切断処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - DisconnectClientUseCase::execute() メソッド
//! - 切断時に保留中のリクエストが削除されること（第三者への通知なし）
//!
//! ### どのような状況を想定しているか
//! - 正常系：登録済みクライアントの切断
//! - エッジケース：置き換え済みの旧接続の切断、登録前の切断

use std::sync::Arc;

use crate::domain::{ClientId, ClientRemoval, ConnectionId, LobbyRepository};

/// クライアント切断のユースケース
pub struct DisconnectClientUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn LobbyRepository>,
}

impl DisconnectClientUseCase {
    /// 新しい DisconnectClientUseCase を作成
    pub fn new(repository: Arc<dyn LobbyRepository>) -> Self {
        Self { repository }
    }

    /// クライアント切断を実行
    ///
    /// # Returns
    ///
    /// * `Some(ClientRemoval)` - 登録が削除された
    /// * `None` - このトランスポートの登録は既に存在しない
    pub async fn execute(
        &self,
        client_id: &ClientId,
        connection_id: ConnectionId,
    ) -> Option<ClientRemoval> {
        let removal = self
            .repository
            .remove_client(client_id, connection_id)
            .await;

        match &removal {
            Some(ClientRemoval {
                cancelled_request: Some(request_id),
            }) => tracing::info!(
                "Removed pending group request {} of disconnected client '{}'",
                request_id,
                client_id
            ),
            Some(_) => {}
            None => tracing::debug!(
                "Connection {} no longer owns '{}', nothing to remove",
                connection_id,
                client_id
            ),
        }

        removal
    }
}
