// src/domain/user_model.rs

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{ConnectionTrait, DbErr, Set};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    pub name: String,

    #[sea_orm(unique)]
    pub email: String,

    #[serde(skip_serializing)] // パスワードハッシュは絶対にシリアライズしない
    pub password_hash: String,

    #[sea_orm(nullable)]
    pub email_verified_at: Option<DateTime<Utc>>,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "crate::domain::subscription_model::Entity")]
    Subscriptions,

    #[sea_orm(has_many = "crate::domain::personal_access_token_model::Entity")]
    PersonalAccessTokens,
}

impl Related<crate::domain::subscription_model::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Subscriptions.def()
    }
}

impl Related<crate::domain::personal_access_token_model::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PersonalAccessTokens.def()
    }
}

#[async_trait::async_trait]
impl ActiveModelBehavior for ActiveModel {
    fn new() -> Self {
        Self {
            id: Set(Uuid::new_v4()),
            created_at: Set(Utc::now()),
            updated_at: Set(Utc::now()),
            ..ActiveModelTrait::default()
        }
    }

    async fn before_save<C>(mut self, _db: &C, insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        if !insert {
            // 更新の場合のみ updated_at を更新
            self.updated_at = Set(Utc::now());
        }
        Ok(self)
    }
}

impl Model {
    /// パスワードハッシュを除いたセーフなユーザー情報を取得
    pub fn to_safe_user(&self) -> SafeUser {
        SafeUser {
            id: self.id,
            name: self.name.clone(),
            email: self.email.clone(),
            email_verified_at: self.email_verified_at,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// パスワードハッシュを含まないセーフなユーザー表現
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SafeUser {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub email_verified_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Model> for SafeUser {
    fn from(user: Model) -> Self {
        user.to_safe_user()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_hash_never_serialized() {
        let user = Model {
            id: Uuid::new_v4(),
            name: "Jane".to_string(),
            email: "jane@example.com".to_string(),
            password_hash: "$argon2id$secret".to_string(),
            email_verified_at: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("password_hash").is_none());

        let safe = serde_json::to_value(user.to_safe_user()).unwrap();
        assert_eq!(safe["email"], "jane@example.com");
        assert!(safe.get("password_hash").is_none());
    }
}
