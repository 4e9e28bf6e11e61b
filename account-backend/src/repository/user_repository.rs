// src/repository/user_repository.rs

use crate::domain::user_model::{self, ActiveModel as UserActiveModel, Entity as UserEntity};
use async_trait::async_trait;
use sea_orm::entity::*;
use sea_orm::{DatabaseConnection, DbErr, QueryFilter, Set};
use std::sync::Arc;
use uuid::Uuid;

/// ユーザー作成用構造体
#[derive(Debug, Clone)]
pub struct CreateUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
}

/// ユーザー更新用構造体（None のフィールドは変更しない）
#[derive(Debug, Clone, Default)]
pub struct UpdateUser {
    pub name: Option<String>,
    pub email: Option<String>,
}

impl UpdateUser {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none()
    }
}

/// ユーザーの永続化操作
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// ユーザーをIDで検索
    async fn find(&self, id: Uuid) -> Result<Option<user_model::Model>, DbErr>;

    /// ユーザーをメールアドレスで検索
    async fn find_by_email(&self, email: &str) -> Result<Option<user_model::Model>, DbErr>;

    /// ユーザーを作成
    async fn create(&self, input: CreateUser) -> Result<user_model::Model, DbErr>;

    /// ユーザーを更新して更新後の値を返す
    async fn update(
        &self,
        user: &user_model::Model,
        input: UpdateUser,
    ) -> Result<user_model::Model, DbErr>;

    /// メールアドレスが使用済みか（`except` のユーザーは除外）
    async fn email_exists(&self, email: &str, except: Option<Uuid>) -> Result<bool, DbErr>;
}

#[derive(Debug)]
pub struct DbUserRepository {
    db: Arc<DatabaseConnection>,
}

impl DbUserRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepository for DbUserRepository {
    async fn find(&self, id: Uuid) -> Result<Option<user_model::Model>, DbErr> {
        UserEntity::find_by_id(id).one(self.db.as_ref()).await
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<user_model::Model>, DbErr> {
        UserEntity::find()
            .filter(user_model::Column::Email.eq(email))
            .one(self.db.as_ref())
            .await
    }

    async fn create(&self, input: CreateUser) -> Result<user_model::Model, DbErr> {
        let mut new_user = UserActiveModel::new();
        new_user.name = Set(input.name);
        new_user.email = Set(input.email);
        new_user.password_hash = Set(input.password_hash);

        new_user.insert(self.db.as_ref()).await
    }

    async fn update(
        &self,
        user: &user_model::Model,
        input: UpdateUser,
    ) -> Result<user_model::Model, DbErr> {
        if input.is_empty() {
            return Ok(user.clone());
        }

        let mut active_model: UserActiveModel = user.clone().into();

        if let Some(name) = input.name {
            active_model.name = Set(name);
        }
        if let Some(email) = input.email {
            active_model.email = Set(email);
        }

        active_model.update(self.db.as_ref()).await
    }

    async fn email_exists(&self, email: &str, except: Option<Uuid>) -> Result<bool, DbErr> {
        let mut query = UserEntity::find().filter(user_model::Column::Email.eq(email));
        if let Some(except_id) = except {
            query = query.filter(user_model::Column::Id.ne(except_id));
        }
        Ok(query.one(self.db.as_ref()).await?.is_some())
    }
}
