// src/api/mod.rs
use crate::api::handlers::{
    auth_handler::auth_router, subscription_handler::subscription_router,
    system_handler::system_router, user_handler::user_router,
};
use crate::config::AppConfig;
use crate::logging::{inject_request_context, logging_middleware};
use crate::middleware::api_key::API_KEY_HEADER;
use crate::providers::Repositories;
use crate::service::{
    auth_service::AuthService, subscription_service::SubscriptionService,
    token_service::TokenManager, user_service::UserService,
};
use crate::utils::password::PasswordManager;
use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderName, HeaderValue, Method},
    middleware, Router,
};
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::warn;

pub mod dto;
pub mod handlers;

const MAX_BODY_BYTES: usize = 1024 * 1024;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// 統一されたアプリケーション状態
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub auth_service: Arc<AuthService>,
    pub user_service: Arc<UserService>,
    pub subscription_service: Arc<SubscriptionService>,
    pub token_manager: Arc<TokenManager>,
}

impl AppState {
    /// リポジトリ実装からサービスを組み立てる
    pub fn from_parts(
        config: AppConfig,
        repositories: Repositories,
        password_manager: Arc<PasswordManager>,
    ) -> Self {
        let token_manager = Arc::new(TokenManager::new(
            repositories.tokens.clone(),
            repositories.users.clone(),
            config.token.expiration_minutes,
        ));

        let auth_service = Arc::new(AuthService::new(
            repositories.users.clone(),
            token_manager.clone(),
            password_manager,
            config.token.default_name.clone(),
        ));

        Self {
            auth_service,
            user_service: Arc::new(UserService::new(repositories.users)),
            subscription_service: Arc::new(SubscriptionService::new(repositories.subscriptions)),
            token_manager,
            config: Arc::new(config),
        }
    }
}

/// 全ルートとグローバルミドルウェアを持つルーター
pub fn app_router(app_state: AppState) -> Router {
    let api = Router::new()
        .merge(auth_router(app_state.clone()))
        .merge(user_router(app_state.clone()))
        .merge(subscription_router(app_state.clone()));

    Router::new()
        .nest("/api", api)
        .merge(system_router(app_state.clone()))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(TimeoutLayer::new(REQUEST_TIMEOUT))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&app_state.config))
        .layer(middleware::from_fn(logging_middleware))
        .layer(middleware::from_fn(inject_request_context))
}

/// CORS 設定
pub fn cors_layer(config: &AppConfig) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            header::ACCEPT,
            HeaderName::from_static(API_KEY_HEADER),
        ])
        .max_age(Duration::from_secs(3600));

    if config.cors_allowed_origins.iter().any(|origin| origin == "*") {
        return layer.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = config
        .cors_allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(%origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    layer.allow_origin(AllowOrigin::list(origins))
}
