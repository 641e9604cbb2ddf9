//! Server execution logic.

use std::{any::Any, sync::Arc};

use axum::{
    Router,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tokio::net::TcpListener;
use tower_http::{catch_panic::CatchPanicLayer, trace::TraceLayer};

use crate::{
    domain::LobbyRepository,
    usecase::{
        CancelGroupRequestUseCase, CreateGroupRequestUseCase, DisbandGroupUseCase,
        DisconnectClientUseCase, FormGroupUseCase, RegisterClientUseCase,
    },
};

use super::{
    error::ApiError,
    handler::{disband_group, form_group, health_check, not_found, websocket_handler},
    signal::shutdown_signal,
    state::AppState,
};

/// Group coordinator server
///
/// This struct encapsulates the server configuration and provides methods to run the server.
///
/// # Example
///
/// ```ignore
/// let server = Server::with_repository(repository);
/// server.run("0.0.0.0".to_string(), 3000).await?;
/// ```
pub struct Server {
    /// RegisterClientUseCase（クライアント登録のユースケース）
    register_client_usecase: Arc<RegisterClientUseCase>,
    /// DisconnectClientUseCase（クライアント切断のユースケース）
    disconnect_client_usecase: Arc<DisconnectClientUseCase>,
    /// CreateGroupRequestUseCase（グループリクエスト作成のユースケース）
    create_group_request_usecase: Arc<CreateGroupRequestUseCase>,
    /// CancelGroupRequestUseCase（グループリクエストキャンセルのユースケース）
    cancel_group_request_usecase: Arc<CancelGroupRequestUseCase>,
    /// FormGroupUseCase（グループ形成のユースケース）
    form_group_usecase: Arc<FormGroupUseCase>,
    /// DisbandGroupUseCase（グループ解散のユースケース）
    disband_group_usecase: Arc<DisbandGroupUseCase>,
}

impl Server {
    /// Create a new Server instance
    pub fn new(
        register_client_usecase: Arc<RegisterClientUseCase>,
        disconnect_client_usecase: Arc<DisconnectClientUseCase>,
        create_group_request_usecase: Arc<CreateGroupRequestUseCase>,
        cancel_group_request_usecase: Arc<CancelGroupRequestUseCase>,
        form_group_usecase: Arc<FormGroupUseCase>,
        disband_group_usecase: Arc<DisbandGroupUseCase>,
    ) -> Self {
        Self {
            register_client_usecase,
            disconnect_client_usecase,
            create_group_request_usecase,
            cancel_group_request_usecase,
            form_group_usecase,
            disband_group_usecase,
        }
    }

    /// Create a Server whose use cases all share `repository`
    pub fn with_repository(repository: Arc<dyn LobbyRepository>) -> Self {
        Self::new(
            Arc::new(RegisterClientUseCase::new(repository.clone())),
            Arc::new(DisconnectClientUseCase::new(repository.clone())),
            Arc::new(CreateGroupRequestUseCase::new(repository.clone())),
            Arc::new(CancelGroupRequestUseCase::new(repository.clone())),
            Arc::new(FormGroupUseCase::new(repository.clone())),
            Arc::new(DisbandGroupUseCase::new(repository)),
        )
    }

    /// Build the application router
    pub fn router(self) -> Router {
        let app_state = Arc::new(AppState {
            register_client_usecase: self.register_client_usecase,
            disconnect_client_usecase: self.disconnect_client_usecase,
            create_group_request_usecase: self.create_group_request_usecase,
            cancel_group_request_usecase: self.cancel_group_request_usecase,
            form_group_usecase: self.form_group_usecase,
            disband_group_usecase: self.disband_group_usecase,
        });

        let groups = Router::new()
            .route("/form-group", post(form_group))
            .route("/disband-group", post(disband_group));

        Router::new()
            // WebSocket エンドポイント
            .route("/ws", get(websocket_handler))
            // HTTP エンドポイント
            .route("/health", get(health_check))
            .nest("/api/groups", groups)
            .fallback(not_found)
            .layer(CatchPanicLayer::custom(handle_panic))
            .layer(TraceLayer::new_for_http())
            .with_state(app_state)
    }

    /// Run the server on `host:port` until a shutdown signal arrives
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails to bind to the specified address or
    /// if there's an error during server execution.
    pub async fn run(self, host: String, port: u16) -> Result<(), Box<dyn std::error::Error>> {
        let bind_addr = format!("{}:{}", host, port);
        let listener = TcpListener::bind(&bind_addr).await?;

        tracing::info!("Huddle coordinator listening on {}", listener.local_addr()?);
        tracing::info!("Connect to: ws://{}/ws", bind_addr);
        tracing::info!("Press Ctrl+C to shutdown gracefully");

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");

        Ok(())
    }

    /// Serve on an already bound listener (no signal handling)
    pub async fn serve(self, listener: TcpListener) -> std::io::Result<()> {
        axum::serve(listener, self.router()).await
    }
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic payload".to_string()
    };
    tracing::error!("Request handler panicked: {}", detail);

    ApiError::Internal.into_response()
}
