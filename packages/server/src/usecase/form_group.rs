//! UseCase: グループ形成処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - FormGroupUseCase::execute() メソッド
//! - 指定されたリクエストを消費し、指定されたクライアントでアクティブグループを作る
//!
//! ### なぜこのテストが必要か
//! - 検証に失敗した場合に一切の変更が起きない（全か無か）ことを保証
//! - メンバー全員が同じ group_formed（同じ順序のメンバー一覧）を受け取ることを確認
//!
//! ### どのような状況を想定しているか
//! - 正常系：2 クライアントのグループ形成
//! - 異常系：存在しないリクエスト ID、未登録のクライアント ID
//! - エッジケース：クライアント ID の重複

use std::sync::Arc;

use huddle_shared::time::{minutes_after_rfc3339, timestamp_to_rfc3339};

use crate::domain::{ActiveGroup, ChatTime, ClientId, GroupRequestId, LobbyError, LobbyRepository};

use super::error::FormGroupError;

/// グループ形成のユースケース
pub struct FormGroupUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn LobbyRepository>,
}

impl FormGroupUseCase {
    /// 新しい FormGroupUseCase を作成
    pub fn new(repository: Arc<dyn LobbyRepository>) -> Self {
        Self { repository }
    }

    /// グループ形成を実行
    ///
    /// # Arguments
    ///
    /// * `request_ids` - 消費するグループリクエストの ID（空でもよい）
    /// * `client_ids` - メンバーになるクライアントの ID（この順序で名簿が作られる）
    /// * `chat_time` - チャット時間（分）
    pub async fn execute(
        &self,
        request_ids: &[GroupRequestId],
        client_ids: &[ClientId],
        chat_time: ChatTime,
    ) -> Result<ActiveGroup, FormGroupError> {
        let group = self
            .repository
            .form_group(request_ids, client_ids, chat_time)
            .await
            .map_err(|e| match e {
                LobbyError::GroupRequestNotFound(id) => FormGroupError::GroupRequestNotFound(id),
                LobbyError::ClientNotFound(id) => FormGroupError::ClientNotFound(id),
                other => FormGroupError::Unexpected(other.to_string()),
            })?;

        // 終了時刻は記録のみ（自動解散はしない）
        tracing::info!(
            "Group {} scheduled from {} until {}",
            group.id,
            timestamp_to_rfc3339(group.created_at.value()),
            minutes_after_rfc3339(group.created_at.value(), chat_time.minutes())
        );

        Ok(group)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        infrastructure::dto::websocket::ServerFrame,
        usecase::test_support::{
            client_id, create_test_repository, criteria, drain_frames, register,
        },
    };

    #[tokio::test]
    async fn test_form_group_consumes_requests_and_notifies_members() {
        // テスト項目: グループ形成でリクエストが消費され、全メンバーに同じ group_formed が届く
        // given (前提条件):
        let repository = create_test_repository();
        let usecase = FormGroupUseCase::new(repository.clone());
        let (_, mut alice_rx) = register(repository.as_ref(), "alice").await;
        let (_, mut bob_rx) = register(repository.as_ref(), "bob").await;
        let alice_request = repository
            .create_request(&client_id("alice"), criteria(15))
            .await
            .unwrap();
        let bob_request = repository
            .create_request(&client_id("bob"), criteria(15))
            .await
            .unwrap();
        drain_frames(&mut alice_rx);
        drain_frames(&mut bob_rx);

        // when (操作):
        let group = usecase
            .execute(
                &[alice_request.id.clone(), bob_request.id.clone()],
                &[client_id("alice"), client_id("bob")],
                ChatTime::new(15.0).unwrap(),
            )
            .await
            .unwrap();

        // then (期待する結果):
        let snapshot = repository.snapshot().await;
        assert!(snapshot.requests.is_empty());
        assert!(snapshot.client_requests.is_empty());
        assert!(snapshot.active_groups.contains_key(&group.id));

        let alice_frames = drain_frames(&mut alice_rx);
        let bob_frames = drain_frames(&mut bob_rx);
        assert_eq!(alice_frames, bob_frames);
        let ServerFrame::GroupFormed(formed) = &alice_frames[0] else {
            panic!("expected group_formed, got {:?}", alice_frames[0]);
        };
        assert_eq!(formed.group_id, group.id.to_string());
        assert_eq!(formed.chat_time, 15.0);
        let names: Vec<&str> = formed.members.iter().map(|m| m.first_name.as_str()).collect();
        assert_eq!(names, vec!["alice", "bob"]);
        assert_eq!(formed.members[0].photo_data, "alice-photo");
    }

    #[tokio::test]
    async fn test_unknown_request_id_changes_nothing() {
        // テスト項目: 存在しないリクエスト ID を含む場合はエラーになり、何も変更されない
        // given (前提条件):
        let repository = create_test_repository();
        let usecase = FormGroupUseCase::new(repository.clone());
        let (_, mut alice_rx) = register(repository.as_ref(), "alice").await;
        let request = repository
            .create_request(&client_id("alice"), criteria(15))
            .await
            .unwrap();
        drain_frames(&mut alice_rx);
        let before = repository.snapshot().await;

        // when (操作):
        let result = usecase
            .execute(
                &[
                    request.id.clone(),
                    GroupRequestId::new("missing".to_string()).unwrap(),
                ],
                &[client_id("alice")],
                ChatTime::new(15.0).unwrap(),
            )
            .await;

        // then (期待する結果):
        assert_eq!(
            result,
            Err(FormGroupError::GroupRequestNotFound("missing".to_string()))
        );
        assert_eq!(repository.snapshot().await, before);
        assert!(drain_frames(&mut alice_rx).is_empty());
    }

    #[tokio::test]
    async fn test_unregistered_client_id_changes_nothing() {
        // テスト項目: 未登録のクライアント ID を含む場合はエラーになり、何も変更されない
        // given (前提条件):
        let repository = create_test_repository();
        let usecase = FormGroupUseCase::new(repository.clone());
        let (_, mut alice_rx) = register(repository.as_ref(), "alice").await;
        drain_frames(&mut alice_rx);

        // when (操作):
        let result = usecase
            .execute(
                &[],
                &[client_id("alice"), client_id("ghost")],
                ChatTime::new(15.0).unwrap(),
            )
            .await;

        // then (期待する結果):
        assert_eq!(
            result,
            Err(FormGroupError::ClientNotFound("ghost".to_string()))
        );
        assert!(repository.snapshot().await.active_groups.is_empty());
        assert!(drain_frames(&mut alice_rx).is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_client_ids_are_kept_as_given() {
        // テスト項目: 重複したクライアント ID はそのままメンバーになり、通知も重複して届く
        // given (前提条件):
        let repository = create_test_repository();
        let usecase = FormGroupUseCase::new(repository.clone());
        let (_, mut alice_rx) = register(repository.as_ref(), "alice").await;
        drain_frames(&mut alice_rx);

        // when (操作):
        let group = usecase
            .execute(
                &[],
                &[client_id("alice"), client_id("alice")],
                ChatTime::new(5.0).unwrap(),
            )
            .await
            .unwrap();

        // then (期待する結果):
        assert_eq!(group.members.len(), 2);
        assert_eq!(drain_frames(&mut alice_rx).len(), 2);
    }
}
