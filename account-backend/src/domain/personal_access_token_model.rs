// src/domain/personal_access_token_model.rs

use chrono::{DateTime, Duration, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{ConnectionTrait, DbErr, Set};
use serde::{Deserialize, Serialize};

/// 全権限を表すアビリティ
pub const WILDCARD_ABILITY: &str = "*";

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "personal_access_tokens")]
pub struct Model {
    /// 連番ではなく作成時に生成されるUUID
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    pub user_id: Uuid,

    pub name: String,

    #[serde(skip_serializing)] // トークンハッシュは絶対にシリアライズしない
    #[sea_orm(unique)]
    pub token: String,

    #[sea_orm(nullable)]
    pub abilities: Option<Json>,

    #[sea_orm(nullable)]
    pub last_used_at: Option<DateTime<Utc>>,

    #[sea_orm(nullable)]
    pub expires_at: Option<DateTime<Utc>>,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "crate::domain::user_model::Entity",
        from = "Column::UserId",
        to = "crate::domain::user_model::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    User,
}

impl Related<crate::domain::user_model::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

/// トークンの主キーを生成（時系列順に並ぶ UUID v7）
pub fn new_token_id() -> Uuid {
    Uuid::now_v7()
}

#[async_trait::async_trait]
impl ActiveModelBehavior for ActiveModel {
    fn new() -> Self {
        Self {
            id: Set(new_token_id()),
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
            self.updated_at = Set(Utc::now());
        }
        Ok(self)
    }
}

/// アビリティ一覧を JSON 値へ変換
pub fn abilities_to_json(abilities: &[String]) -> Json {
    Json::from(abilities.to_vec())
}

impl Model {
    /// 保存されているアビリティ一覧。未設定の場合は全権限
    pub fn abilities(&self) -> Vec<String> {
        match &self.abilities {
            Some(Json::Array(values)) => values
                .iter()
                .filter_map(|value| value.as_str().map(str::to_string))
                .collect(),
            _ => vec![WILDCARD_ABILITY.to_string()],
        }
    }

    /// 指定アビリティを持つか
    pub fn can(&self, ability: &str) -> bool {
        self.abilities()
            .iter()
            .any(|granted| granted == WILDCARD_ABILITY || granted == ability)
    }

    pub fn cant(&self, ability: &str) -> bool {
        !self.can(ability)
    }

    /// 有効期限切れか。`expiration_minutes` は発行からの全体設定
    pub fn is_expired(&self, now: DateTime<Utc>, expiration_minutes: Option<i64>) -> bool {
        if self.expires_at.is_some_and(|expires| expires <= now) {
            return true;
        }
        // 範囲外の分数は期限なしとして扱う
        expiration_minutes
            .filter(|minutes| *minutes > 0)
            .and_then(Duration::try_minutes)
            .and_then(|lifetime| self.created_at.checked_add_signed(lifetime))
            .is_some_and(|expires| expires <= now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token(abilities: Option<Json>) -> Model {
        Model {
            id: new_token_id(),
            user_id: Uuid::new_v4(),
            name: "api".to_string(),
            token: "hash".to_string(),
            abilities,
            last_used_at: None,
            expires_at: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_new_active_model_has_uuid_primary_key() {
        let active = ActiveModel::new();
        let id = active.id.clone().unwrap();
        assert_eq!(id.get_version_num(), 7);
        assert!(Uuid::parse_str(&id.to_string()).is_ok());
        assert_ne!(id, ActiveModel::new().id.unwrap());
    }

    #[test]
    fn test_wildcard_grants_everything() {
        let token = token(Some(abilities_to_json(&["*".to_string()])));
        assert!(token.can("subscription:write"));
        assert!(!token.cant("anything"));
    }

    #[test]
    fn test_missing_abilities_default_to_wildcard() {
        assert!(token(None).can("profile:read"));
    }

    #[test]
    fn test_specific_abilities() {
        let token = token(Some(abilities_to_json(&["profile:read".to_string()])));
        assert!(token.can("profile:read"));
        assert!(token.cant("profile:write"));
    }

    #[test]
    fn test_token_hash_never_serialized() {
        let json = serde_json::to_value(token(None)).unwrap();
        assert!(json.get("token").is_none());
        assert!(json["id"].is_string());
    }

    #[test]
    fn test_expiration() {
        let now = Utc::now();
        let mut token = token(None);
        assert!(!token.is_expired(now, None));

        token.created_at = now - Duration::minutes(90);
        assert!(token.is_expired(now, Some(60)));
        assert!(!token.is_expired(now, Some(120)));

        token.expires_at = Some(now - Duration::seconds(1));
        assert!(token.is_expired(now, None));
    }

    #[test]
    fn test_out_of_range_expiration_never_expires() {
        let now = Utc::now();
        let mut token = token(None);
        token.created_at = now - Duration::days(365);

        assert!(!token.is_expired(now, Some(i64::MAX)));
        assert!(!token.is_expired(now, Some(i64::MAX / 60)));
        assert!(!token.is_expired(now, Some(0)));
        assert!(!token.is_expired(now, Some(-5)));
    }
}
