// src/api/handlers/auth_handler.rs
use crate::api::dto::auth_dto::{AuthResponse, LoginRequest, RegisterRequest};
use crate::api::AppState;
use crate::error::AppResult;
use crate::extractors::ValidatedJson;
use crate::middleware::{
    api_key::api_key_middleware,
    auth::{token_auth_middleware, AuthenticatedUser},
};
use crate::types::ApiResponse;
use axum::{extract::State, middleware, routing::post, Router};
use tracing::info;

/// ユーザー登録
pub async fn register_handler(
    State(app_state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<RegisterRequest>,
) -> AppResult<ApiResponse<AuthResponse>> {
    let response = app_state.auth_service.register(payload).await?;
    Ok(ApiResponse::created(response).with_message("Registration successful"))
}

/// ログイン
pub async fn login_handler(
    State(app_state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<LoginRequest>,
) -> AppResult<ApiResponse<AuthResponse>> {
    let response = app_state.auth_service.login(payload).await?;
    Ok(ApiResponse::success(response).with_message("Login successful"))
}

/// 現在のトークンを失効させる
pub async fn logout_handler(
    State(app_state): State<AppState>,
    auth_user: AuthenticatedUser,
) -> AppResult<ApiResponse<()>> {
    app_state.auth_service.logout(&auth_user.token).await?;
    info!(user_id = %auth_user.user_id(), "User logged out");
    Ok(ApiResponse::message("Logged out successfully"))
}

pub fn auth_router(app_state: AppState) -> Router {
    let public = Router::new()
        .route("/auth/register", post(register_handler))
        .route("/auth/login", post(login_handler));

    let protected = Router::new()
        .route("/auth/logout", post(logout_handler))
        .route_layer(middleware::from_fn_with_state(
            app_state.clone(),
            token_auth_middleware,
        ));

    public
        .merge(protected)
        .route_layer(middleware::from_fn_with_state(
            app_state.clone(),
            api_key_middleware,
        ))
        .with_state(app_state)
}
