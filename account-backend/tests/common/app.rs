// tests/common/app.rs

use super::memory::{
    InMemorySubscriptionRepository, InMemoryTokenRepository, InMemoryUserRepository,
};
use super::request::{api_request, register_body};
use account_backend::api::{app_router, AppState};
use account_backend::config::AppConfig;
use account_backend::domain::user_model;
use account_backend::providers::Repositories;
use account_backend::utils::password::{Argon2Config, PasswordManager, PasswordPolicy};
use axum::{
    body::{self, Body},
    http::{Request, StatusCode},
    Router,
};
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub tokens: Arc<InMemoryTokenRepository>,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_config(AppConfig::for_testing())
    }

    pub fn with_config(config: AppConfig) -> Self {
        super::init_test_env();

        let tokens = Arc::new(InMemoryTokenRepository::default());
        let repositories = Repositories {
            users: Arc::new(InMemoryUserRepository::default()),
            subscriptions: Arc::new(InMemorySubscriptionRepository::default()),
            tokens: tokens.clone(),
        };
        let password_manager = Arc::new(
            PasswordManager::new(Argon2Config::for_testing(), PasswordPolicy::default())
                .expect("password manager"),
        );

        let state = AppState::from_parts(config, repositories, password_manager);
        Self {
            router: app_router(state.clone()),
            state,
            tokens,
        }
    }

    /// リクエストを送信してステータスと JSON ボディを返す
    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, json)
    }

    /// ユーザーを登録して平文トークンを返す
    pub async fn register(&self, name: &str, email: &str) -> String {
        let (status, json) = self
            .send(api_request(
                "POST",
                "/api/auth/register",
                None,
                Some(register_body(name, email)),
            ))
            .await;
        assert_eq!(status, StatusCode::CREATED, "register failed: {json}");
        json["data"]["token"].as_str().unwrap().to_string()
    }

    /// トークンの所有ユーザーを取得
    pub async fn user_for_token(&self, token: &str) -> user_model::Model {
        let (user, _) = self.state.token_manager.authenticate(token).await.unwrap();
        user
    }
}
