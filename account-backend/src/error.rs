// src/error.rs

use crate::utils::password::PasswordError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use sea_orm::DbErr;
use serde::Serialize;
use serde_json::json;
use std::collections::HashMap;
use thiserror::Error;
use validator::ValidationErrors;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    DbErr(#[from] DbErr),

    #[error("Item not found: {0}")]
    NotFound(String),

    #[error("Validation failed")]
    ValidationFailure(#[from] ValidationErrors),

    /// フィールド単位のエラー（一意制約やボディの解析失敗など）
    #[error("Invalid fields: {0:?}")]
    FieldErrors(HashMap<String, Vec<String>>),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal server error: {0}")]
    InternalServerError(String),
}

impl AppError {
    /// 単一フィールドの 422 エラーを作成
    pub fn field(field: &str, message: impl Into<String>) -> Self {
        let mut errors = HashMap::new();
        errors.insert(field.to_string(), vec![message.into()]);
        AppError::FieldErrors(errors)
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::DbErr(DbErr::RecordNotFound(_)) => StatusCode::NOT_FOUND,
            AppError::DbErr(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::ValidationFailure(_) | AppError::FieldErrors(_) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<PasswordError> for AppError {
    fn from(err: PasswordError) -> Self {
        match err {
            PasswordError::WeakPassword(message) => AppError::field("password", message),
            other => AppError::InternalServerError(other.to_string()),
        }
    }
}

// axum でエラーをHTTPレスポンスに変換するための実装
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let error_response = match self {
            AppError::DbErr(db_err) => {
                tracing::error!(error = ?db_err, "Database error"); // サーバーログには詳細を出す

                let (message, details) = match &db_err {
                    DbErr::RecordNotFound(entity) => (
                        "The requested resource was not found".to_string(),
                        Some(json!({ "entity": entity })),
                    ),
                    _ => ("A database error occurred".to_string(), None),
                };

                ErrorResponse {
                    success: false,
                    error: message.clone(),
                    message,
                    details,
                    validation_errors: None,
                    error_type: "database_error".to_string(),
                }
            }
            AppError::NotFound(message) => ErrorResponse::simple(message, "not_found"),
            AppError::ValidationFailure(errors) => {
                let field_errors: HashMap<String, Vec<String>> = errors
                    .field_errors()
                    .into_iter()
                    .map(|(field, errors)| {
                        let messages = errors
                            .iter()
                            .map(|e| {
                                e.message
                                    .as_ref()
                                    .map_or_else(|| "Invalid value".to_string(), |m| m.to_string())
                            })
                            .collect();
                        (field.to_string(), messages)
                    })
                    .collect();
                ErrorResponse::validation(field_errors)
            }
            AppError::FieldErrors(field_errors) => ErrorResponse::validation(field_errors),
            AppError::BadRequest(message) => ErrorResponse::simple(message, "bad_request"),
            AppError::Unauthorized(message) => ErrorResponse::simple(message, "unauthorized"),
            AppError::Forbidden(message) => ErrorResponse::simple(message, "forbidden"),
            AppError::Conflict(message) => ErrorResponse::simple(message, "conflict"),
            AppError::InternalServerError(message) => {
                tracing::error!(%message, "Internal server error");
                ErrorResponse::simple(
                    "An internal server error occurred".to_string(),
                    "internal_server_error",
                )
            }
        };

        (status, Json(error_response)).into_response()
    }
}

// Result 型のエイリアス
pub type AppResult<T> = Result<T, AppError>;

/// 統一的なエラーレスポンス構造
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validation_errors: Option<HashMap<String, Vec<String>>>,
    pub error_type: String,
}

impl ErrorResponse {
    fn simple(message: String, error_type: &str) -> Self {
        Self {
            success: false,
            error: message.clone(),
            message,
            details: None,
            validation_errors: None,
            error_type: error_type.to_string(),
        }
    }

    fn validation(field_errors: HashMap<String, Vec<String>>) -> Self {
        Self {
            success: false,
            error: "Validation failed".to_string(),
            message: "Validation failed".to_string(),
            details: None,
            validation_errors: Some(field_errors),
            error_type: "validation_errors".to_string(),
        }
    }
}
