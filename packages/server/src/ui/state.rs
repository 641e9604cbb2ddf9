//! Shared application state.

use std::sync::Arc;

use crate::usecase::{
    CancelGroupRequestUseCase, CreateGroupRequestUseCase, DisbandGroupUseCase,
    DisconnectClientUseCase, FormGroupUseCase, RegisterClientUseCase,
};

/// Shared application state
pub struct AppState {
    /// RegisterClientUseCase（クライアント登録のユースケース）
    pub register_client_usecase: Arc<RegisterClientUseCase>,
    /// DisconnectClientUseCase（クライアント切断のユースケース）
    pub disconnect_client_usecase: Arc<DisconnectClientUseCase>,
    /// CreateGroupRequestUseCase（グループリクエスト作成のユースケース）
    pub create_group_request_usecase: Arc<CreateGroupRequestUseCase>,
    /// CancelGroupRequestUseCase（グループリクエストキャンセルのユースケース）
    pub cancel_group_request_usecase: Arc<CancelGroupRequestUseCase>,
    /// FormGroupUseCase（グループ形成のユースケース）
    pub form_group_usecase: Arc<FormGroupUseCase>,
    /// DisbandGroupUseCase（グループ解散のユースケース）
    pub disband_group_usecase: Arc<DisbandGroupUseCase>,
}
