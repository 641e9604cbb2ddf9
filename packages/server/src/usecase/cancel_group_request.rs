//! UseCase: グループリクエストキャンセル処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - CancelGroupRequestUseCase::execute() メソッド
//! - 作成者本人だけがリクエストをキャンセルできること
//!
//! ### どのような状況を想定しているか
//! - 正常系：作成者によるキャンセルと group_cancelled の送信
//! - 異常系：存在しないリクエスト、他人のリクエスト

use std::sync::Arc;

use crate::domain::{ClientId, GroupRequestId, LobbyError, LobbyRepository};

use super::error::CancelGroupRequestError;

/// グループリクエストキャンセルのユースケース
pub struct CancelGroupRequestUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn LobbyRepository>,
}

impl CancelGroupRequestUseCase {
    /// 新しい CancelGroupRequestUseCase を作成
    pub fn new(repository: Arc<dyn LobbyRepository>) -> Self {
        Self { repository }
    }

    /// グループリクエストキャンセルを実行
    pub async fn execute(
        &self,
        request_id: &GroupRequestId,
        client_id: &ClientId,
    ) -> Result<(), CancelGroupRequestError> {
        self.repository
            .cancel_request(request_id, client_id)
            .await
            .map_err(|e| match e {
                LobbyError::GroupRequestNotFound(id) => CancelGroupRequestError::RequestNotFound(id),
                LobbyError::NotRequestOwner {
                    request_id,
                    client_id,
                } => CancelGroupRequestError::NotOwner {
                    request_id,
                    client_id,
                },
                other => CancelGroupRequestError::Unexpected(other.to_string()),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        infrastructure::dto::websocket::{GroupCancelledFrame, ServerFrame},
        usecase::test_support::{
            client_id, create_test_repository, criteria, drain_frames, register,
        },
    };

    #[tokio::test]
    async fn test_creator_cancels_request() {
        // テスト項目: 作成者がキャンセルするとリクエストが削除され group_cancelled が送信される
        // given (前提条件):
        let repository = create_test_repository();
        let usecase = CancelGroupRequestUseCase::new(repository.clone());
        let (_, mut rx) = register(repository.as_ref(), "alice").await;
        let request = repository
            .create_request(&client_id("alice"), criteria(15))
            .await
            .unwrap();
        drain_frames(&mut rx);

        // when (操作):
        let result = usecase.execute(&request.id, &client_id("alice")).await;

        // then (期待する結果):
        assert_eq!(result, Ok(()));
        let snapshot = repository.snapshot().await;
        assert!(snapshot.requests.is_empty());
        assert!(snapshot.client_requests.is_empty());
        assert_eq!(
            drain_frames(&mut rx),
            vec![ServerFrame::GroupCancelled(GroupCancelledFrame {
                group_id: request.id.to_string()
            })]
        );
    }

    #[tokio::test]
    async fn test_other_client_cannot_cancel() {
        // テスト項目: 作成者以外のキャンセルは拒否され、リクエストは残る
        // given (前提条件):
        let repository = create_test_repository();
        let usecase = CancelGroupRequestUseCase::new(repository.clone());
        let (_, _alice_rx) = register(repository.as_ref(), "alice").await;
        let (_, mut bob_rx) = register(repository.as_ref(), "bob").await;
        let request = repository
            .create_request(&client_id("alice"), criteria(15))
            .await
            .unwrap();
        drain_frames(&mut bob_rx);

        // when (操作):
        let result = usecase.execute(&request.id, &client_id("bob")).await;

        // then (期待する結果):
        assert_eq!(
            result,
            Err(CancelGroupRequestError::NotOwner {
                request_id: request.id.to_string(),
                client_id: "bob".to_string(),
            })
        );
        assert_eq!(repository.snapshot().await.requests.len(), 1);
        assert!(drain_frames(&mut bob_rx).is_empty());
    }

    #[tokio::test]
    async fn test_unknown_request_is_rejected() {
        // テスト項目: 存在しないリクエストのキャンセルは RequestNotFound になる
        // given (前提条件):
        let repository = create_test_repository();
        let usecase = CancelGroupRequestUseCase::new(repository.clone());
        let (_, _rx) = register(repository.as_ref(), "alice").await;

        // when (操作):
        let result = usecase
            .execute(
                &GroupRequestId::new("missing".to_string()).unwrap(),
                &client_id("alice"),
            )
            .await;

        // then (期待する結果):
        assert_eq!(
            result,
            Err(CancelGroupRequestError::RequestNotFound(
                "missing".to_string()
            ))
        );
    }
}
