// src/middleware/auth.rs

use crate::api::AppState;
use crate::domain::{personal_access_token_model, user_model};
use crate::error::AppError;
use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};
use tracing::{info, warn};

/// 認証済みユーザー情報を格納するエクステンション
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user: user_model::Model,
    pub token: personal_access_token_model::Model,
}

impl AuthenticatedUser {
    pub fn user_id(&self) -> uuid::Uuid {
        self.user.id
    }

    /// トークンが指定のアビリティを持つか確認
    pub fn ensure_can(&self, ability: &str) -> Result<(), AppError> {
        if self.token.cant(ability) {
            warn!(
                user_id = %self.user.id,
                token_id = %self.token.id,
                ability,
                "Token lacks required ability"
            );
            return Err(AppError::Forbidden(format!(
                "This token is not allowed to perform '{}'",
                ability
            )));
        }
        Ok(())
    }
}

impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .ok_or_else(|| AppError::Unauthorized("Authentication required".to_string()))
    }
}

/// ベアラートークン認証ミドルウェア
pub async fn token_auth_middleware(
    State(app_state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let path = request.uri().path().to_string();

    let plain_text = extract_bearer_token(request.headers()).ok_or_else(|| {
        warn!(path = %path, "Missing authentication token");
        AppError::Unauthorized("Authentication required".to_string())
    })?;

    let (user, token) = app_state.token_manager.authenticate(&plain_text).await?;

    info!(
        user_id = %user.id,
        token_id = %token.id,
        path = %path,
        "Authenticated request"
    );

    request
        .extensions_mut()
        .insert(AuthenticatedUser { user, token });

    Ok(next.run(request).await)
}

/// Authorization ヘッダーからベアラートークンを取得
pub fn extract_bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| {
            value
                .strip_prefix("Bearer ")
                .or_else(|| value.strip_prefix("bearer "))
        })
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
}
