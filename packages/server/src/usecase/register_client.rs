//! UseCase: クライアント登録処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - RegisterClientUseCase::execute() メソッド
//! - 新規登録と、同じ clientId での再登録（旧接続のクローズ）
//!
//! ### なぜこのテストが必要か
//! - 再登録時に旧トランスポートが閉じられ、新トランスポートだけが ack を受け取ることを保証
//! - 再登録でクライアントの保留中リクエストが失われないことを確認

use std::sync::Arc;

use crate::domain::{
    ClientChannel, ClientId, ClientProfile, ConnectionId, LobbyRepository, Registration,
};

/// クライアント登録のユースケース
pub struct RegisterClientUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn LobbyRepository>,
}

impl RegisterClientUseCase {
    /// 新しい RegisterClientUseCase を作成
    pub fn new(repository: Arc<dyn LobbyRepository>) -> Self {
        Self { repository }
    }

    /// クライアント登録を実行
    ///
    /// # Arguments
    ///
    /// * `client_id` - 登録するクライアントの ID（Domain Model）
    /// * `connection_id` - 登録を受け付けたトランスポートの ID
    /// * `profile` - 登録時のプロフィール
    /// * `channel` - クライアントへの通知チャネル
    ///
    /// # Returns
    ///
    /// 置き換えられた旧接続の ID（あれば）を含む `Registration`
    pub async fn execute(
        &self,
        client_id: ClientId,
        connection_id: ConnectionId,
        profile: ClientProfile,
        channel: Arc<dyn ClientChannel>,
    ) -> Registration {
        let registration = self
            .repository
            .register_client(client_id.clone(), connection_id, profile, channel)
            .await;

        if let Some(replaced) = registration.replaced
            && replaced != connection_id
        {
            tracing::info!(
                "Connection {} of '{}' was replaced by {}",
                replaced,
                client_id,
                connection_id
            );
        }

        registration
    }
}
