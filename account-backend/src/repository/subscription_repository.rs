// src/repository/subscription_repository.rs

use crate::domain::subscription_model::{
    self, ActiveModel as SubscriptionActiveModel, Entity as SubscriptionEntity,
    SubscriptionStatus,
};
use crate::domain::user_model;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::entity::*;
use sea_orm::{DatabaseConnection, DbErr, Order, QueryFilter, QueryOrder, Set, SqlErr};
use std::sync::Arc;

/// サブスクリプション作成用構造体
#[derive(Debug, Clone)]
pub struct CreateSubscription {
    pub name: Option<String>,
    pub plan: String,
    pub quantity: Option<i32>,
    pub trial_ends_at: Option<DateTime<Utc>>,
}

/// サブスクリプション更新用構造体（None のフィールドは変更しない）
#[derive(Debug, Clone, Default)]
pub struct UpdateSubscription {
    pub plan: Option<String>,
    pub quantity: Option<i32>,
    pub status: Option<SubscriptionStatus>,
    pub trial_ends_at: Option<DateTime<Utc>>,
    pub ends_at: Option<DateTime<Utc>>,
}

impl UpdateSubscription {
    pub fn is_empty(&self) -> bool {
        self.plan.is_none()
            && self.quantity.is_none()
            && self.status.is_none()
            && self.trial_ends_at.is_none()
            && self.ends_at.is_none()
    }
}

/// サブスクリプションの永続化操作
#[async_trait]
pub trait SubscriptionRepository: Send + Sync {
    /// ユーザーの現在のサブスクリプション（最も新しく作成されたもの）
    async fn find_user_subscription(
        &self,
        user: &user_model::Model,
    ) -> Result<Option<subscription_model::Model>, DbErr>;

    /// 既に有効なサブスクリプションがある場合は `DbErr::RecordNotInserted`
    async fn create_subscription(
        &self,
        user: &user_model::Model,
        input: CreateSubscription,
    ) -> Result<subscription_model::Model, DbErr>;

    /// 変更があった場合 true
    async fn update_subscription(
        &self,
        subscription: &subscription_model::Model,
        input: UpdateSubscription,
    ) -> Result<bool, DbErr>;

    /// 即時キャンセル。既にキャンセル済みなら false
    async fn cancel_subscription(
        &self,
        subscription: &subscription_model::Model,
    ) -> Result<bool, DbErr>;

    /// キャンセル済みのサブスクリプションを再開。キャンセルされていなければ false
    async fn resume_subscription(
        &self,
        subscription: &subscription_model::Model,
    ) -> Result<bool, DbErr>;

    /// 有効なサブスクリプションを持つか
    async fn is_user_subscribed(&self, user: &user_model::Model) -> Result<bool, DbErr> {
        Ok(self
            .find_user_subscription(user)
            .await?
            .is_some_and(|subscription| subscription.is_valid(Utc::now())))
    }
}

#[derive(Debug)]
pub struct DbSubscriptionRepository {
    db: Arc<DatabaseConnection>,
}

impl DbSubscriptionRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    async fn apply(
        &self,
        subscription: &subscription_model::Model,
        mut changes: SubscriptionActiveModel,
    ) -> Result<bool, DbErr> {
        changes.updated_at = Set(Utc::now());
        let result = SubscriptionEntity::update_many()
            .set(changes)
            .filter(subscription_model::Column::Id.eq(subscription.id))
            .exec(self.db.as_ref())
            .await?;
        Ok(result.rows_affected > 0)
    }
}

#[async_trait]
impl SubscriptionRepository for DbSubscriptionRepository {
    async fn find_user_subscription(
        &self,
        user: &user_model::Model,
    ) -> Result<Option<subscription_model::Model>, DbErr> {
        SubscriptionEntity::find()
            .filter(subscription_model::Column::UserId.eq(user.id))
            .order_by(subscription_model::Column::CreatedAt, Order::Desc)
            .one(self.db.as_ref())
            .await
    }

    async fn create_subscription(
        &self,
        user: &user_model::Model,
        input: CreateSubscription,
    ) -> Result<subscription_model::Model, DbErr> {
        let mut new_subscription = SubscriptionActiveModel::new();
        new_subscription.user_id = Set(user.id);
        new_subscription.plan = Set(input.plan);
        if let Some(name) = input.name {
            new_subscription.name = Set(name);
        }
        if let Some(quantity) = input.quantity {
            new_subscription.quantity = Set(quantity);
        }
        if let Some(trial_ends_at) = input.trial_ends_at {
            new_subscription.status = Set(SubscriptionStatus::Trialing.to_string());
            new_subscription.trial_ends_at = Set(Some(trial_ends_at));
        }

        new_subscription
            .insert(self.db.as_ref())
            .await
            .map_err(|err| match err.sql_err() {
                // 有効なサブスクリプションの一意制約に違反
                Some(SqlErr::UniqueConstraintViolation(_)) => DbErr::RecordNotInserted,
                _ => err,
            })
    }

    async fn update_subscription(
        &self,
        subscription: &subscription_model::Model,
        input: UpdateSubscription,
    ) -> Result<bool, DbErr> {
        if input.is_empty() {
            return Ok(false);
        }

        let mut changes = <SubscriptionActiveModel as ActiveModelTrait>::default();
        if let Some(plan) = input.plan {
            changes.plan = Set(plan);
        }
        if let Some(quantity) = input.quantity {
            changes.quantity = Set(quantity);
        }
        if let Some(status) = input.status {
            changes.status = Set(status.to_string());
        }
        if let Some(trial_ends_at) = input.trial_ends_at {
            changes.trial_ends_at = Set(Some(trial_ends_at));
        }
        if let Some(ends_at) = input.ends_at {
            changes.ends_at = Set(Some(ends_at));
        }

        self.apply(subscription, changes).await
    }

    async fn cancel_subscription(
        &self,
        subscription: &subscription_model::Model,
    ) -> Result<bool, DbErr> {
        if subscription.is_canceled() {
            return Ok(false);
        }

        let now = Utc::now();
        let changes = SubscriptionActiveModel {
            status: Set(SubscriptionStatus::Canceled.to_string()),
            canceled_at: Set(Some(now)),
            ends_at: Set(Some(now)),
            ..ActiveModelTrait::default()
        };
        self.apply(subscription, changes).await
    }

    async fn resume_subscription(
        &self,
        subscription: &subscription_model::Model,
    ) -> Result<bool, DbErr> {
        if !subscription.is_canceled() {
            return Ok(false);
        }

        let changes = SubscriptionActiveModel {
            status: Set(SubscriptionStatus::Active.to_string()),
            canceled_at: Set(None),
            ends_at: Set(None),
            ..ActiveModelTrait::default()
        };
        self.apply(subscription, changes).await
    }
}
