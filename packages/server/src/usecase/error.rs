//! UseCase 層のエラー型

use thiserror::Error;

/// グループリクエスト作成のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CreateGroupRequestError {
    #[error("Client {0} is not registered")]
    ClientNotRegistered(String),

    #[error("Unexpected lobby error: {0}")]
    Unexpected(String),
}

/// グループリクエストキャンセルのエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CancelGroupRequestError {
    #[error("Group request {0} not found")]
    RequestNotFound(String),

    #[error("Group request {request_id} is not owned by client {client_id}")]
    NotOwner {
        request_id: String,
        client_id: String,
    },

    #[error("Unexpected lobby error: {0}")]
    Unexpected(String),
}

/// グループ形成のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormGroupError {
    #[error("Group request {0} not found")]
    GroupRequestNotFound(String),

    #[error("Client {0} not found")]
    ClientNotFound(String),

    #[error("Unexpected lobby error: {0}")]
    Unexpected(String),
}

/// グループ解散のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DisbandGroupError {
    #[error("Group {0} not found")]
    GroupNotFound(String),

    #[error("Unexpected lobby error: {0}")]
    Unexpected(String),
}
