// src/middleware/api_key.rs

use crate::api::AppState;
use crate::error::AppError;
use crate::utils::token::constant_time_eq;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use tracing::{debug, warn};

pub const API_KEY_HEADER: &str = "x-api-key";

/// `X-API-KEY` ヘッダーを検証するミドルウェア
///
/// `API_KEY` が未設定の場合は検証しない。
pub async fn api_key_middleware(
    State(app_state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let Some(expected) = app_state.config.api_key.as_deref() else {
        debug!("API key not configured, skipping check");
        return Ok(next.run(request).await);
    };

    let matched = request
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(|key| constant_time_eq(key, expected));

    match matched {
        Some(true) => Ok(next.run(request).await),
        Some(false) => {
            warn!(path = %request.uri().path(), "Invalid API key");
            Err(AppError::Unauthorized("Invalid API key".to_string()))
        }
        None => {
            warn!(path = %request.uri().path(), "Missing API key");
            Err(AppError::Unauthorized("API key required".to_string()))
        }
    }
}
