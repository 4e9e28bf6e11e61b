// src/api/handlers/system_handler.rs
use crate::api::AppState;
use crate::types::ApiResponse;
use axum::{extract::State, routing::get, Router};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub environment: String,
    pub version: String,
}

/// 稼働確認
pub async fn health_handler(State(app_state): State<AppState>) -> ApiResponse<HealthResponse> {
    ApiResponse::success(HealthResponse {
        status: "ok".to_string(),
        environment: app_state.config.environment.clone(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

pub fn system_router(app_state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .with_state(app_state)
}
