// src/api/handlers/subscription_handler.rs
use crate::api::dto::subscription_dto::{
    CreateSubscriptionRequest, SubscriptionResponse, SubscriptionStatusResponse,
    UpdateSubscriptionRequest,
};
use crate::api::AppState;
use crate::error::AppResult;
use crate::extractors::ValidatedJson;
use crate::middleware::auth::AuthenticatedUser;
use crate::middleware::{api_key::api_key_middleware, auth::token_auth_middleware};
use crate::types::ApiResponse;
use axum::{
    extract::State,
    middleware,
    routing::{get, post},
    Router,
};

pub const SUBSCRIPTION_MANAGE_ABILITY: &str = "subscription:manage";

/// 現在のサブスクリプション
pub async fn get_subscription_handler(
    State(app_state): State<AppState>,
    auth_user: AuthenticatedUser,
) -> AppResult<ApiResponse<SubscriptionResponse>> {
    let subscription = app_state
        .subscription_service
        .current(&auth_user.user)
        .await?;
    Ok(ApiResponse::success(subscription.into()))
}

/// 購読状態
pub async fn subscription_status_handler(
    State(app_state): State<AppState>,
    auth_user: AuthenticatedUser,
) -> AppResult<ApiResponse<SubscriptionStatusResponse>> {
    let subscribed = app_state
        .subscription_service
        .is_subscribed(&auth_user.user)
        .await?;
    Ok(ApiResponse::success(SubscriptionStatusResponse { subscribed }))
}

/// サブスクリプション開始
pub async fn create_subscription_handler(
    State(app_state): State<AppState>,
    auth_user: AuthenticatedUser,
    ValidatedJson(payload): ValidatedJson<CreateSubscriptionRequest>,
) -> AppResult<ApiResponse<SubscriptionResponse>> {
    auth_user.ensure_can(SUBSCRIPTION_MANAGE_ABILITY)?;

    let subscription = app_state
        .subscription_service
        .subscribe(&auth_user.user, payload)
        .await?;
    Ok(ApiResponse::created(subscription.into()).with_message("Subscription created"))
}

/// プラン・数量変更
pub async fn update_subscription_handler(
    State(app_state): State<AppState>,
    auth_user: AuthenticatedUser,
    ValidatedJson(payload): ValidatedJson<UpdateSubscriptionRequest>,
) -> AppResult<ApiResponse<SubscriptionResponse>> {
    auth_user.ensure_can(SUBSCRIPTION_MANAGE_ABILITY)?;

    let subscription = app_state
        .subscription_service
        .change(&auth_user.user, payload)
        .await?;
    Ok(ApiResponse::success(subscription.into()).with_message("Subscription updated"))
}

/// キャンセル
pub async fn cancel_subscription_handler(
    State(app_state): State<AppState>,
    auth_user: AuthenticatedUser,
) -> AppResult<ApiResponse<SubscriptionResponse>> {
    auth_user.ensure_can(SUBSCRIPTION_MANAGE_ABILITY)?;

    let subscription = app_state
        .subscription_service
        .cancel(&auth_user.user)
        .await?;
    Ok(ApiResponse::success(subscription.into()).with_message("Subscription canceled"))
}

/// 再開
pub async fn resume_subscription_handler(
    State(app_state): State<AppState>,
    auth_user: AuthenticatedUser,
) -> AppResult<ApiResponse<SubscriptionResponse>> {
    auth_user.ensure_can(SUBSCRIPTION_MANAGE_ABILITY)?;

    let subscription = app_state
        .subscription_service
        .resume(&auth_user.user)
        .await?;
    Ok(ApiResponse::success(subscription.into()).with_message("Subscription resumed"))
}

pub fn subscription_router(app_state: AppState) -> Router {
    Router::new()
        .route(
            "/subscription",
            get(get_subscription_handler)
                .post(create_subscription_handler)
                .put(update_subscription_handler),
        )
        .route("/subscription/status", get(subscription_status_handler))
        .route("/subscription/cancel", post(cancel_subscription_handler))
        .route("/subscription/resume", post(resume_subscription_handler))
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
