// src/service/auth_service.rs
use crate::api::dto::auth_dto::{AuthResponse, LoginRequest, RegisterRequest};
use crate::domain::personal_access_token_model;
use crate::error::{AppError, AppResult};
use crate::repository::user_repository::{CreateUser, UserRepository};
use crate::service::token_service::TokenManager;
use crate::utils::password::PasswordManager;
use std::sync::Arc;
use tracing::{info, warn};

/// 認証サービス
pub struct AuthService {
    user_repo: Arc<dyn UserRepository>,
    token_manager: Arc<TokenManager>,
    password_manager: Arc<PasswordManager>,
    default_token_name: String,
}

impl AuthService {
    pub fn new(
        user_repo: Arc<dyn UserRepository>,
        token_manager: Arc<TokenManager>,
        password_manager: Arc<PasswordManager>,
        default_token_name: String,
    ) -> Self {
        Self {
            user_repo,
            token_manager,
            password_manager,
            default_token_name,
        }
    }

    /// ユーザー登録してトークンを発行
    pub async fn register(&self, request: RegisterRequest) -> AppResult<AuthResponse> {
        let email = normalize_email(&request.email);

        // メールアドレスの重複チェック
        if self.user_repo.email_exists(&email, None).await? {
            return Err(AppError::field(
                "email",
                "The email has already been taken.",
            ));
        }

        let password_hash = self.password_manager.hash_password(&request.password)?;

        let user = self
            .user_repo
            .create(CreateUser {
                name: request.name.trim().to_string(),
                email,
                password_hash,
            })
            .await?;

        let token_name = self.token_name(request.device_name.as_deref());
        let new_token = self
            .token_manager
            .create_token(&user, &token_name, Vec::new(), None)
            .await?;

        info!(user_id = %user.id, "User registered");

        Ok(AuthResponse::bearer(
            user.to_safe_user(),
            new_token.plain_text_token,
        ))
    }

    /// メールアドレスとパスワードで認証してトークンを発行
    pub async fn login(&self, request: LoginRequest) -> AppResult<AuthResponse> {
        let email = normalize_email(&request.email);

        let user = match self.user_repo.find_by_email(&email).await? {
            Some(user) => user,
            None => {
                warn!("Login attempt for unknown email");
                return Err(invalid_credentials());
            }
        };

        if !self
            .password_manager
            .verify_password(&request.password, &user.password_hash)?
        {
            warn!(user_id = %user.id, "Login attempt with wrong password");
            return Err(invalid_credentials());
        }

        let token_name = self.token_name(request.device_name.as_deref());
        let new_token = self
            .token_manager
            .create_token(&user, &token_name, Vec::new(), None)
            .await?;

        info!(user_id = %user.id, token_id = %new_token.access_token.id, "User logged in");

        Ok(AuthResponse::bearer(
            user.to_safe_user(),
            new_token.plain_text_token,
        ))
    }

    /// 現在のトークンを失効させる
    pub async fn logout(&self, token: &personal_access_token_model::Model) -> AppResult<()> {
        self.token_manager.revoke(token).await?;
        info!(user_id = %token.user_id, token_id = %token.id, "Access token revoked");
        Ok(())
    }

    fn token_name(&self, device_name: Option<&str>) -> String {
        device_name
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map_or_else(|| self.default_token_name.clone(), str::to_string)
    }
}

fn invalid_credentials() -> AppError {
    AppError::Unauthorized("These credentials do not match our records.".to_string())
}

/// メールアドレスを比較用に正規化
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
