// src/repository/personal_access_token_repository.rs

use crate::domain::personal_access_token_model::{
    self, abilities_to_json, ActiveModel as TokenActiveModel, Entity as TokenEntity,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::entity::*;
use sea_orm::{DatabaseConnection, DbErr, QueryFilter, Set};
use std::sync::Arc;
use uuid::Uuid;

/// アクセストークン作成用構造体
#[derive(Debug, Clone)]
pub struct CreateAccessToken {
    pub user_id: Uuid,
    pub name: String,
    /// SHA-256 ハッシュ済みのトークン
    pub token_hash: String,
    pub abilities: Vec<String>,
    pub expires_at: Option<DateTime<Utc>>,
}

/// パーソナルアクセストークンの永続化操作
#[async_trait]
pub trait PersonalAccessTokenRepository: Send + Sync {
    /// トークンを作成。主キーはモデル側で生成される
    async fn create(
        &self,
        input: CreateAccessToken,
    ) -> Result<personal_access_token_model::Model, DbErr>;

    async fn find(&self, id: Uuid) -> Result<Option<personal_access_token_model::Model>, DbErr>;

    async fn find_by_token_hash(
        &self,
        token_hash: &str,
    ) -> Result<Option<personal_access_token_model::Model>, DbErr>;

    /// 最終使用日時を記録
    async fn touch_last_used(&self, id: Uuid, used_at: DateTime<Utc>) -> Result<(), DbErr>;

    /// トークンを削除。存在した場合 true
    async fn delete(&self, id: Uuid) -> Result<bool, DbErr>;
}

#[derive(Debug)]
pub struct DbPersonalAccessTokenRepository {
    db: Arc<DatabaseConnection>,
}

impl DbPersonalAccessTokenRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl PersonalAccessTokenRepository for DbPersonalAccessTokenRepository {
    async fn create(
        &self,
        input: CreateAccessToken,
    ) -> Result<personal_access_token_model::Model, DbErr> {
        let mut new_token = TokenActiveModel::new();
        new_token.user_id = Set(input.user_id);
        new_token.name = Set(input.name);
        new_token.token = Set(input.token_hash);
        new_token.abilities = Set(Some(abilities_to_json(&input.abilities)));
        new_token.expires_at = Set(input.expires_at);

        new_token.insert(self.db.as_ref()).await
    }

    async fn find(&self, id: Uuid) -> Result<Option<personal_access_token_model::Model>, DbErr> {
        TokenEntity::find_by_id(id).one(self.db.as_ref()).await
    }

    async fn find_by_token_hash(
        &self,
        token_hash: &str,
    ) -> Result<Option<personal_access_token_model::Model>, DbErr> {
        TokenEntity::find()
            .filter(personal_access_token_model::Column::Token.eq(token_hash))
            .one(self.db.as_ref())
            .await
    }

    async fn touch_last_used(&self, id: Uuid, used_at: DateTime<Utc>) -> Result<(), DbErr> {
        TokenEntity::update_many()
            .set(TokenActiveModel {
                last_used_at: Set(Some(used_at)),
                updated_at: Set(used_at),
                ..ActiveModelTrait::default()
            })
            .filter(personal_access_token_model::Column::Id.eq(id))
            .exec(self.db.as_ref())
            .await?;
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, DbErr> {
        let result = TokenEntity::delete_by_id(id).exec(self.db.as_ref()).await?;
        Ok(result.rows_affected > 0)
    }
}
