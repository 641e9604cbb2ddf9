//! HTTP error responses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::{
    infrastructure::dto::http::ErrorResponseDto,
    usecase::{DisbandGroupError, FormGroupError},
};

/// Error returned by the HTTP handlers
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ApiError {
    /// Malformed or incomplete request body
    #[error("{0}")]
    Validation(String),

    /// The coordinator rejected the operation
    #[error("{0}")]
    Rejected(String),

    #[error("Not found")]
    NotFound,

    /// Details are logged, never sent
    #[error("Internal server error")]
    Internal,
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::Rejected(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorResponseDto {
            error: self.to_string(),
        };
        (self.status(), Json(body)).into_response()
    }
}

impl From<FormGroupError> for ApiError {
    fn from(e: FormGroupError) -> Self {
        match e {
            FormGroupError::Unexpected(detail) => {
                tracing::error!("Group formation failed unexpectedly: {}", detail);
                ApiError::Internal
            }
            other => ApiError::Rejected(other.to_string()),
        }
    }
}

impl From<DisbandGroupError> for ApiError {
    fn from(e: DisbandGroupError) -> Self {
        match e {
            DisbandGroupError::Unexpected(detail) => {
                tracing::error!("Group disbandment failed unexpectedly: {}", detail);
                ApiError::Internal
            }
            other => ApiError::Rejected(other.to_string()),
        }
    }
}
