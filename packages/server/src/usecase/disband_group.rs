//! UseCase: グループ解散処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - DisbandGroupUseCase::execute() メソッド
//! - 接続中のメンバーだけに group_disbanded が届き、グループが削除されること
//!
//! ### どのような状況を想定しているか
//! - 正常系：全員接続中のグループの解散
//! - エッジケース：一部メンバーが切断済みのグループの解散
//! - 異常系：存在しないグループ ID

use std::sync::Arc;

use crate::domain::{DisbandedGroup, GroupId, LobbyError, LobbyRepository};

use super::error::DisbandGroupError;

/// グループ解散のユースケース
pub struct DisbandGroupUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn LobbyRepository>,
}

impl DisbandGroupUseCase {
    /// 新しい DisbandGroupUseCase を作成
    pub fn new(repository: Arc<dyn LobbyRepository>) -> Self {
        Self { repository }
    }

    /// グループ解散を実行
    ///
    /// # Returns
    ///
    /// * `Ok(DisbandedGroup)` - 解散したグループと通知できたメンバー
    /// * `Err(DisbandGroupError)` - 解散失敗
    pub async fn execute(&self, group_id: &GroupId) -> Result<DisbandedGroup, DisbandGroupError> {
        self.repository
            .disband_group(group_id)
            .await
            .map_err(|e| match e {
                LobbyError::GroupNotFound(id) => DisbandGroupError::GroupNotFound(id),
                other => DisbandGroupError::Unexpected(other.to_string()),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::ChatTime,
        infrastructure::dto::websocket::{GroupDisbandedFrame, ServerFrame},
        usecase::test_support::{client_id, create_test_repository, drain_frames, register},
    };

    #[tokio::test]
    async fn test_disband_notifies_connected_members_only() {
        // テスト項目: 接続中のメンバーだけに group_disbanded が送信され、グループが削除される
        // given (前提条件):
        let repository = create_test_repository();
        let usecase = DisbandGroupUseCase::new(repository.clone());
        let (_, mut alice_rx) = register(repository.as_ref(), "alice").await;
        let (bob_connection, _bob_rx) = register(repository.as_ref(), "bob").await;
        let group = repository
            .form_group(
                &[],
                &[client_id("alice"), client_id("bob")],
                ChatTime::new(15.0).unwrap(),
            )
            .await
            .unwrap();
        repository
            .remove_client(&client_id("bob"), bob_connection)
            .await;
        drain_frames(&mut alice_rx);

        // when (操作):
        let disbanded = usecase.execute(&group.id).await.unwrap();

        // then (期待する結果):
        assert_eq!(disbanded.notified, vec![client_id("alice")]);
        assert_eq!(
            drain_frames(&mut alice_rx),
            vec![ServerFrame::GroupDisbanded(GroupDisbandedFrame {
                group_id: group.id.to_string()
            })]
        );
        assert!(repository.snapshot().await.active_groups.is_empty());
    }

    #[tokio::test]
    async fn test_unknown_group_is_rejected() {
        // テスト項目: 存在しないグループの解散は GroupNotFound になる
        // given (前提条件):
        let repository = create_test_repository();
        let usecase = DisbandGroupUseCase::new(repository.clone());

        // when (操作):
        let result = usecase
            .execute(&GroupId::new("missing".to_string()).unwrap())
            .await;

        // then (期待する結果):
        assert_eq!(
            result,
            Err(DisbandGroupError::GroupNotFound("missing".to_string()))
        );
    }
}
