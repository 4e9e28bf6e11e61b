// src/domain/subscription_model.rs

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{ConnectionTrait, DbErr, Set};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 既定のサブスクリプション名
pub const DEFAULT_SUBSCRIPTION_NAME: &str = "default";

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "subscriptions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    pub user_id: Uuid,

    pub name: String,

    pub plan: String,

    pub status: String,

    pub quantity: i32,

    #[sea_orm(nullable)]
    pub trial_ends_at: Option<DateTime<Utc>>,

    #[sea_orm(nullable)]
    pub ends_at: Option<DateTime<Utc>>,

    #[sea_orm(nullable)]
    pub canceled_at: Option<DateTime<Utc>>,

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

#[async_trait::async_trait]
impl ActiveModelBehavior for ActiveModel {
    fn new() -> Self {
        Self {
            id: Set(Uuid::new_v4()),
            name: Set(DEFAULT_SUBSCRIPTION_NAME.to_string()),
            status: Set(SubscriptionStatus::Active.to_string()),
            quantity: Set(1),
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

/// サブスクリプションステータス
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionStatus {
    Active,
    Trialing,
    PastDue,
    Canceled,
}

impl SubscriptionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubscriptionStatus::Active => "active",
            SubscriptionStatus::Trialing => "trialing",
            SubscriptionStatus::PastDue => "past_due",
            SubscriptionStatus::Canceled => "canceled",
        }
    }
}

impl fmt::Display for SubscriptionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SubscriptionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(SubscriptionStatus::Active),
            "trialing" => Ok(SubscriptionStatus::Trialing),
            "past_due" => Ok(SubscriptionStatus::PastDue),
            "canceled" => Ok(SubscriptionStatus::Canceled),
            _ => Err(format!("Invalid subscription status: {}", s)),
        }
    }
}

impl Model {
    /// 保存されているステータス。不明な値は PastDue として扱う
    pub fn status(&self) -> SubscriptionStatus {
        self.status.parse().unwrap_or(SubscriptionStatus::PastDue)
    }

    pub fn is_canceled(&self) -> bool {
        self.status() == SubscriptionStatus::Canceled
    }

    /// トライアル期間中か
    pub fn on_trial(&self, now: DateTime<Utc>) -> bool {
        self.trial_ends_at.is_some_and(|ends| ends > now)
    }

    /// 終了日時を過ぎているか
    pub fn has_ended(&self, now: DateTime<Utc>) -> bool {
        self.ends_at.is_some_and(|ends| ends <= now)
    }

    /// 現在有効なサブスクリプションか
    pub fn is_valid(&self, now: DateTime<Utc>) -> bool {
        let status_ok = match self.status() {
            SubscriptionStatus::Active => true,
            SubscriptionStatus::Trialing => self.on_trial(now) || self.trial_ends_at.is_none(),
            SubscriptionStatus::PastDue | SubscriptionStatus::Canceled => false,
        };
        status_ok && !self.has_ended(now)
    }
}
