// src/api/handlers/user_handler.rs
use crate::api::dto::user_dto::{UpdateProfileRequest, UserProfileResponse};
use crate::api::AppState;
use crate::error::AppResult;
use crate::extractors::ValidatedJson;
use crate::middleware::auth::AuthenticatedUser;
use crate::middleware::{api_key::api_key_middleware, auth::token_auth_middleware};
use crate::types::ApiResponse;
use axum::{extract::State, middleware, routing::get, Router};

pub const PROFILE_UPDATE_ABILITY: &str = "profile:update";

/// プロフィール取得
pub async fn get_profile_handler(
    State(app_state): State<AppState>,
    auth_user: AuthenticatedUser,
) -> AppResult<ApiResponse<UserProfileResponse>> {
    let subscribed = app_state
        .subscription_service
        .is_subscribed(&auth_user.user)
        .await?;

    Ok(ApiResponse::success(UserProfileResponse {
        user: auth_user.user.to_safe_user(),
        subscribed,
    }))
}

/// プロフィール更新
pub async fn update_profile_handler(
    State(app_state): State<AppState>,
    auth_user: AuthenticatedUser,
    ValidatedJson(payload): ValidatedJson<UpdateProfileRequest>,
) -> AppResult<ApiResponse<UserProfileResponse>> {
    auth_user.ensure_can(PROFILE_UPDATE_ABILITY)?;

    let user = app_state
        .user_service
        .update_profile(&auth_user.user, payload)
        .await?;
    let subscribed = app_state.subscription_service.is_subscribed(&user).await?;

    Ok(ApiResponse::success(UserProfileResponse {
        user: user.to_safe_user(),
        subscribed,
    })
    .with_message("Profile updated successfully"))
}

pub fn user_router(app_state: AppState) -> Router {
    Router::new()
        .route(
            "/user/profile",
            get(get_profile_handler).put(update_profile_handler),
        )
        .route_layer(middleware::from_fn_with_state(
            app_state.clone(),
            token_auth_middleware,
        ))
        .route_layer(middleware::from_fn_with_state(
            app_state.clone(),
            api_key_middleware,
        ))
        .with_state(app_state)
}
