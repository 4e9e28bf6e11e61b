use crate::logging::current_request_id;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Serialize, Deserialize, Debug)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub meta: ResponseMeta,
    #[serde(skip)]
    status: u16,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct ResponseMeta {
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
}

impl ResponseMeta {
    pub fn new() -> Self {
        Self {
            request_id: current_request_id().unwrap_or_else(|| Uuid::new_v4().to_string()),
            timestamp: Utc::now(),
        }
    }
}

impl Default for ResponseMeta {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
            meta: ResponseMeta::new(),
            status: StatusCode::OK.as_u16(),
        }
    }

    /// 201 Created を返すレスポンス
    pub fn created(data: T) -> Self {
        Self {
            status: StatusCode::CREATED.as_u16(),
            ..Self::success(data)
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.status).unwrap_or(StatusCode::OK)
    }
}

impl ApiResponse<()> {
    /// データを持たない成功レスポンス
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            data: None,
            message: Some(message.into()),
            meta: ResponseMeta::new(),
            status: StatusCode::OK.as_u16(),
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        (self.status_code(), Json(self)).into_response()
    }
}
