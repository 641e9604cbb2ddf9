//! HTTP API endpoint handlers.
//!
//! `form-group` / `disband-group` are the trigger surface invoked by the external
//! matching process. Both validate their body before touching the lobby.

use std::sync::Arc;

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use huddle_shared::time::{get_timestamp, timestamp_to_rfc3339};

use crate::{
    domain::{ChatTime, ClientId, GroupId, GroupRequestId},
    infrastructure::dto::http::{
        DisbandGroupRequestDto, DisbandGroupResponseDto, FormGroupRequestDto,
        FormGroupResponseDto, HealthResponseDto,
    },
    ui::{error::ApiError, state::AppState},
};

/// Health check endpoint
pub async fn health_check() -> Json<HealthResponseDto> {
    Json(HealthResponseDto {
        status: "ok".to_string(),
        timestamp: timestamp_to_rfc3339(get_timestamp()),
    })
}

/// Fallback for unmatched routes
pub async fn not_found() -> ApiError {
    ApiError::NotFound
}

/// Form a group from pending requests and live clients
pub async fn form_group(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<FormGroupRequestDto>, JsonRejection>,
) -> Result<Json<FormGroupResponseDto>, ApiError> {
    let Json(body) = payload.map_err(|rejection| ApiError::Validation(rejection.body_text()))?;

    if body.client_ids.is_empty() {
        return Err(ApiError::Validation(
            "clientIds is required and must not be empty".to_string(),
        ));
    }
    let chat_time = parse_chat_time(body.chat_time.as_ref())?;

    // String -> Domain Model
    let request_ids = body
        .group_request_ids
        .iter()
        .map(|id| GroupRequestId::new(id.clone()))
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| ApiError::Validation(format!("groupRequestIds: {}", e)))?;
    let client_ids = body
        .client_ids
        .iter()
        .map(|id| ClientId::new(id.clone()))
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| ApiError::Validation(format!("clientIds: {}", e)))?;

    let group = state
        .form_group_usecase
        .execute(&request_ids, &client_ids, chat_time)
        .await?;

    Ok(Json(FormGroupResponseDto {
        message: "Group formed successfully".to_string(),
        group_id: group.id.to_string(),
        group_request_ids: body.group_request_ids,
        client_ids: body.client_ids,
        chat_time: chat_time.minutes(),
    }))
}

/// Disband an active group
pub async fn disband_group(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<DisbandGroupRequestDto>, JsonRejection>,
) -> Result<Json<DisbandGroupResponseDto>, ApiError> {
    let Json(body) = payload.map_err(|rejection| ApiError::Validation(rejection.body_text()))?;

    let group_id = body
        .group_id
        .and_then(|id| GroupId::try_from(id).ok())
        .ok_or_else(|| ApiError::Validation("groupId is required".to_string()))?;

    let disbanded = state.disband_group_usecase.execute(&group_id).await?;
    tracing::info!(
        "Group {} disbanded, notified {}/{} members",
        group_id,
        disbanded.notified.len(),
        disbanded.group.members.len()
    );

    Ok(Json(DisbandGroupResponseDto {
        message: "Group disbanded successfully".to_string(),
        group_id: group_id.to_string(),
    }))
}

/// Accept any JSON number of at least one minute
fn parse_chat_time(value: Option<&serde_json::Value>) -> Result<ChatTime, ApiError> {
    value
        .and_then(serde_json::Value::as_f64)
        .and_then(|minutes| ChatTime::new(minutes).ok())
        .ok_or_else(|| ApiError::Validation("chatTime must be a positive number".to_string()))
}

#[cfg(test)]
mod tests {
    use axum::{
        Router,
        body::{Body, to_bytes},
        http::{Request, StatusCode, header},
    };
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use super::*;
    use crate::{
        domain::LobbyRepository,
        infrastructure::{dto::websocket::ServerFrame, repository::InMemoryLobbyRepository},
        ui::Server,
        usecase::test_support::{
            client_id, create_test_repository, criteria, drain_frames, register,
        },
    };

    // ========================================
    // テスト作業記録
    // ========================================
    // 【何をテストするか】
    // - form-group / disband-group の入力検証とステータスコード
    // - 成功時にロビーの状態が変わり、メンバーに通知が届くこと
    // - 未定義のルートが JSON の 404 を返すこと
    // ========================================

    fn create_test_app(repository: Arc<InMemoryLobbyRepository>) -> Router {
        Server::with_repository(repository).router()
    }

    async fn post_json(app: Router, uri: &str, body: &str) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_health_check() {
        // テスト項目: /health が status ok とタイムスタンプを返す
        // given (前提条件):
        let app = create_test_app(create_test_repository());
        let request = Request::builder()
            .uri("/health")
            .body(Body::empty())
            .unwrap();

        // when (操作):
        let response = app.oneshot(request).await.unwrap();

        // then (期待する結果):
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: HealthResponseDto = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body.status, "ok");
        assert!(body.timestamp.ends_with('Z'));
    }

    #[tokio::test]
    async fn test_form_group_success() {
        // テスト項目: 正しい入力でグループが形成され、メンバーに group_formed が届く
        // given (前提条件):
        let repository = create_test_repository();
        let (_, mut alice_rx) = register(repository.as_ref(), "alice").await;
        let (_, mut bob_rx) = register(repository.as_ref(), "bob").await;
        let request = repository
            .create_request(&client_id("alice"), criteria(15))
            .await
            .unwrap();
        drain_frames(&mut alice_rx);
        drain_frames(&mut bob_rx);
        let app = create_test_app(repository.clone());
        let body = json!({
            "groupRequestIds": [request.id.to_string()],
            "clientIds": ["alice", "bob"],
            "chatTime": 15
        });

        // when (操作):
        let (status, value) =
            post_json(app, "/api/groups/form-group", &body.to_string()).await;

        // then (期待する結果):
        assert_eq!(status, StatusCode::OK);
        assert_eq!(value["chatTime"], json!(15));
        let response: FormGroupResponseDto = serde_json::from_value(value).unwrap();
        assert_eq!(response.message, "Group formed successfully");
        assert_eq!(response.client_ids, vec!["alice", "bob"]);
        assert_eq!(response.chat_time, 15.0);
        let snapshot = repository.snapshot().await;
        assert!(snapshot.requests.is_empty());
        assert_eq!(snapshot.active_groups.len(), 1);
        assert!(matches!(
            drain_frames(&mut bob_rx).as_slice(),
            [ServerFrame::GroupFormed(_)]
        ));
    }

    #[tokio::test]
    async fn test_form_group_rejects_empty_client_ids() {
        // テスト項目: clientIds が空の場合は 400 になる
        // given (前提条件):
        let app = create_test_app(create_test_repository());

        // when (操作):
        let (status, value) = post_json(
            app,
            "/api/groups/form-group",
            r#"{"groupRequestIds":[],"clientIds":[],"chatTime":15}"#,
        )
        .await;

        // then (期待する結果):
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            value,
            json!({"error": "clientIds is required and must not be empty"})
        );
    }

    #[tokio::test]
    async fn test_form_group_accepts_fractional_chat_time() {
        // テスト項目: 小数の chatTime でもグループが形成され、レスポンスと group_formed にそのまま返される
        // given (前提条件):
        let repository = create_test_repository();
        let (_, mut alice_rx) = register(repository.as_ref(), "alice").await;
        drain_frames(&mut alice_rx);
        let app = create_test_app(repository.clone());

        // when (操作):
        let (status, value) = post_json(
            app,
            "/api/groups/form-group",
            r#"{"groupRequestIds":[],"clientIds":["alice"],"chatTime":1.5}"#,
        )
        .await;

        // then (期待する結果):
        assert_eq!(status, StatusCode::OK);
        assert_eq!(value["chatTime"], json!(1.5));
        let frames = drain_frames(&mut alice_rx);
        let [ServerFrame::GroupFormed(formed)] = frames.as_slice() else {
            panic!("expected group_formed, got {:?}", frames);
        };
        assert_eq!(formed.chat_time, 1.5);
        assert_eq!(formed.group_id, value["groupId"].as_str().unwrap());
    }

    #[tokio::test]
    async fn test_form_group_rejects_non_positive_chat_time() {
        // テスト項目: chatTime が 1 以上の数でない場合は 400 になる
        // given (前提条件):
        let repository = create_test_repository();

        for chat_time in ["0", "0.5", "-5", "\"15\"", "null", "true"] {
            let app = create_test_app(repository.clone());
            let body = format!(r#"{{"clientIds":["alice"],"chatTime":{}}}"#, chat_time);

            // when (操作):
            let (status, value) = post_json(app, "/api/groups/form-group", &body).await;

            // then (期待する結果):
            assert_eq!(status, StatusCode::BAD_REQUEST, "chatTime = {}", chat_time);
            assert_eq!(value, json!({"error": "chatTime must be a positive number"}));
        }
    }

    #[tokio::test]
    async fn test_form_group_with_unknown_client_changes_nothing() {
        // テスト項目: 未登録のクライアントを含む場合は 400 になり、リクエストは消費されない
        // given (前提条件):
        let repository = create_test_repository();
        let (_, _alice_rx) = register(repository.as_ref(), "alice").await;
        let request = repository
            .create_request(&client_id("alice"), criteria(15))
            .await
            .unwrap();
        let app = create_test_app(repository.clone());
        let body = json!({
            "groupRequestIds": [request.id.to_string()],
            "clientIds": ["alice", "ghost"],
            "chatTime": 15
        });

        // when (操作):
        let (status, value) =
            post_json(app, "/api/groups/form-group", &body.to_string()).await;

        // then (期待する結果):
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(value, json!({"error": "Client ghost not found"}));
        let snapshot = repository.snapshot().await;
        assert_eq!(snapshot.requests.len(), 1);
        assert!(snapshot.active_groups.is_empty());
    }

    #[tokio::test]
    async fn test_form_group_rejects_invalid_json() {
        // テスト項目: JSON として解析できない本文は 400 になる
        // given (前提条件):
        let app = create_test_app(create_test_repository());

        // when (操作):
        let (status, value) = post_json(app, "/api/groups/form-group", "not json").await;

        // then (期待する結果):
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(value["error"].is_string());
    }

    #[tokio::test]
    async fn test_disband_group_requires_group_id() {
        // テスト項目: groupId が無い場合は 400 になる
        // given (前提条件):
        let app = create_test_app(create_test_repository());

        // when (操作):
        let (status, value) = post_json(app, "/api/groups/disband-group", "{}").await;

        // then (期待する結果):
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(value, json!({"error": "groupId is required"}));
    }

    #[tokio::test]
    async fn test_disband_unknown_group() {
        // テスト項目: 存在しないグループの解散は 400 になる
        // given (前提条件):
        let app = create_test_app(create_test_repository());

        // when (操作):
        let (status, value) = post_json(
            app,
            "/api/groups/disband-group",
            r#"{"groupId":"missing"}"#,
        )
        .await;

        // then (期待する結果):
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(value, json!({"error": "Group missing not found"}));
    }

    #[tokio::test]
    async fn test_disband_group_success() {
        // テスト項目: 形成済みのグループが解散され、メンバーに group_disbanded が届く
        // given (前提条件):
        let repository = create_test_repository();
        let (_, mut alice_rx) = register(repository.as_ref(), "alice").await;
        let group = repository
            .form_group(&[], &[client_id("alice")], ChatTime::new(10.0).unwrap())
            .await
            .unwrap();
        drain_frames(&mut alice_rx);
        let app = create_test_app(repository.clone());
        let body = json!({ "groupId": group.id.to_string() });

        // when (操作):
        let (status, value) =
            post_json(app, "/api/groups/disband-group", &body.to_string()).await;

        // then (期待する結果):
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            value,
            json!({"message": "Group disbanded successfully", "groupId": group.id.to_string()})
        );
        assert!(repository.snapshot().await.active_groups.is_empty());
        assert!(matches!(
            drain_frames(&mut alice_rx).as_slice(),
            [ServerFrame::GroupDisbanded(_)]
        ));
    }

    #[tokio::test]
    async fn test_unmatched_route_returns_json_404() {
        // テスト項目: 未定義のルートは {error: "Not found"} の 404 を返す
        // given (前提条件):
        let app = create_test_app(create_test_repository());
        let request = Request::builder()
            .uri("/api/unknown")
            .body(Body::empty())
            .unwrap();

        // when (操作):
        let response = app.oneshot(request).await.unwrap();

        // then (期待する結果):
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(value, json!({"error": "Not found"}));
    }
}
