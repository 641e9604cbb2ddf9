//! UseCase: グループリクエスト作成処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - CreateGroupRequestUseCase::execute() メソッド
//! - 1 クライアントにつき保留中のリクエストは 1 件だけ（既存のリクエストは置き換え）
//!
//! ### どのような状況を想定しているか
//! - 正常系：登録済みクライアントのリクエスト作成と作成者への ack
//! - 異常系：未登録クライアントからのリクエスト（何も変更されない）
//! - 異常系：想定外の Lobby エラー（Mock Repository で再現）

use std::sync::Arc;

use crate::domain::{ClientId, GroupCriteria, GroupRequest, LobbyError, LobbyRepository};

use super::error::CreateGroupRequestError;

/// グループリクエスト作成のユースケース
pub struct CreateGroupRequestUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn LobbyRepository>,
}

impl CreateGroupRequestUseCase {
    /// 新しい CreateGroupRequestUseCase を作成
    pub fn new(repository: Arc<dyn LobbyRepository>) -> Self {
        Self { repository }
    }

    /// グループリクエスト作成を実行
    ///
    /// # Returns
    ///
    /// * `Ok(GroupRequest)` - 作成されたリクエスト（作成者には group_created が送信済み）
    /// * `Err(CreateGroupRequestError)` - 作成失敗
    pub async fn execute(
        &self,
        client_id: &ClientId,
        criteria: GroupCriteria,
    ) -> Result<GroupRequest, CreateGroupRequestError> {
        self.repository
            .create_request(client_id, criteria)
            .await
            .map_err(|e| match e {
                LobbyError::ClientNotFound(id) => CreateGroupRequestError::ClientNotRegistered(id),
                other => CreateGroupRequestError::Unexpected(other.to_string()),
            })
    }
}
