// src/service/token_service.rs

use crate::domain::personal_access_token_model::{self, WILDCARD_ABILITY};
use crate::domain::user_model;
use crate::error::{AppError, AppResult};
use crate::repository::personal_access_token_repository::{
    CreateAccessToken, PersonalAccessTokenRepository,
};
use crate::repository::user_repository::UserRepository;
use crate::utils::token::{
    constant_time_eq, format_plain_text_token, generate_secret, hash_token, parse_plain_text_token,
    PlainTextToken,
};
use chrono::{DateTime, Utc};
use sea_orm::DbErr;
use std::sync::Arc;
use tracing::{debug, warn};

/// 発行直後のトークン。平文はこの時だけ取得できる
#[derive(Debug, Clone)]
pub struct NewAccessToken {
    pub access_token: personal_access_token_model::Model,
    pub plain_text_token: String,
}

/// パーソナルアクセストークンの発行・検証・失効を行う
pub struct TokenManager {
    token_repo: Arc<dyn PersonalAccessTokenRepository>,
    user_repo: Arc<dyn UserRepository>,
    expiration_minutes: Option<i64>,
}

impl TokenManager {
    pub fn new(
        token_repo: Arc<dyn PersonalAccessTokenRepository>,
        user_repo: Arc<dyn UserRepository>,
        expiration_minutes: Option<i64>,
    ) -> Self {
        Self {
            token_repo,
            user_repo,
            expiration_minutes,
        }
    }

    /// ユーザーに新しいトークンを発行
    pub async fn create_token(
        &self,
        user: &user_model::Model,
        name: &str,
        abilities: Vec<String>,
        expires_at: Option<DateTime<Utc>>,
    ) -> Result<NewAccessToken, DbErr> {
        let abilities = if abilities.is_empty() {
            vec![WILDCARD_ABILITY.to_string()]
        } else {
            abilities
        };

        let secret = generate_secret();
        let access_token = self
            .token_repo
            .create(CreateAccessToken {
                user_id: user.id,
                name: name.to_string(),
                token_hash: hash_token(&secret),
                abilities,
                expires_at,
            })
            .await?;

        debug!(user_id = %user.id, token_id = %access_token.id, "Access token issued");

        Ok(NewAccessToken {
            plain_text_token: format_plain_text_token(access_token.id, &secret),
            access_token,
        })
    }

    /// 平文トークンから保存済みトークンを検索
    pub async fn find_token(
        &self,
        plain_text: &str,
    ) -> Result<Option<personal_access_token_model::Model>, DbErr> {
        match parse_plain_text_token(plain_text) {
            Some(PlainTextToken::WithId { id, secret }) => {
                let token = self.token_repo.find(id).await?;
                Ok(token.filter(|token| constant_time_eq(&token.token, &hash_token(secret))))
            }
            Some(PlainTextToken::SecretOnly(secret)) => {
                self.token_repo
                    .find_by_token_hash(&hash_token(secret))
                    .await
            }
            None => Ok(None),
        }
    }

    /// ベアラートークンを検証し、所有ユーザーとトークンを返す
    pub async fn authenticate(
        &self,
        plain_text: &str,
    ) -> AppResult<(user_model::Model, personal_access_token_model::Model)> {
        let token = self.find_token(plain_text).await?.ok_or_else(|| {
            warn!("Unknown access token presented");
            AppError::Unauthorized("Invalid access token".to_string())
        })?;

        let now = Utc::now();
        if token.is_expired(now, self.expiration_minutes) {
            warn!(token_id = %token.id, "Expired access token presented");
            return Err(AppError::Unauthorized("Access token has expired".to_string()));
        }

        let user = self.user_repo.find(token.user_id).await?.ok_or_else(|| {
            warn!(token_id = %token.id, user_id = %token.user_id, "Token owner not found");
            AppError::Unauthorized("Invalid access token".to_string())
        })?;

        self.token_repo.touch_last_used(token.id, now).await?;

        Ok((user, token))
    }

    /// トークンを失効させる
    pub async fn revoke(&self, token: &personal_access_token_model::Model) -> Result<bool, DbErr> {
        self.token_repo.delete(token.id).await
    }
}
