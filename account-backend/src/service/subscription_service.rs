// src/service/subscription_service.rs
use crate::api::dto::subscription_dto::{CreateSubscriptionRequest, UpdateSubscriptionRequest};
use crate::domain::{subscription_model, user_model};
use crate::error::{AppError, AppResult};
use crate::repository::subscription_repository::{
    CreateSubscription, SubscriptionRepository, UpdateSubscription,
};
use chrono::{Duration, Utc};
use sea_orm::DbErr;
use std::sync::Arc;
use tracing::info;

pub struct SubscriptionService {
    subscription_repo: Arc<dyn SubscriptionRepository>,
}

impl SubscriptionService {
    pub fn new(subscription_repo: Arc<dyn SubscriptionRepository>) -> Self {
        Self { subscription_repo }
    }

    /// 現在のサブスクリプション。存在しなければ 404
    pub async fn current(&self, user: &user_model::Model) -> AppResult<subscription_model::Model> {
        self.subscription_repo
            .find_user_subscription(user)
            .await?
            .ok_or_else(|| AppError::NotFound("Subscription not found".to_string()))
    }

    pub async fn is_subscribed(&self, user: &user_model::Model) -> AppResult<bool> {
        Ok(self.subscription_repo.is_user_subscribed(user).await?)
    }

    /// サブスクリプションを開始。既に有効なものがあれば 409
    pub async fn subscribe(
        &self,
        user: &user_model::Model,
        request: CreateSubscriptionRequest,
    ) -> AppResult<subscription_model::Model> {
        if self.subscription_repo.is_user_subscribed(user).await? {
            return Err(already_subscribed());
        }

        let subscription = self
            .subscription_repo
            .create_subscription(
                user,
                CreateSubscription {
                    name: None,
                    plan: request.plan,
                    quantity: request.quantity,
                    trial_ends_at: request
                        .trial_days
                        .map(|days| Utc::now() + Duration::days(days)),
                },
            )
            .await
            .map_err(|err| match err {
                // 同時リクエストで先に作成された場合
                DbErr::RecordNotInserted => already_subscribed(),
                other => AppError::DbErr(other),
            })?;

        info!(
            user_id = %user.id,
            subscription_id = %subscription.id,
            plan = %subscription.plan,
            "Subscription created"
        );
        Ok(subscription)
    }

    /// プラン・数量を変更
    pub async fn change(
        &self,
        user: &user_model::Model,
        request: UpdateSubscriptionRequest,
    ) -> AppResult<subscription_model::Model> {
        let subscription = self.current(user).await?;

        if subscription.is_canceled() {
            return Err(AppError::Conflict(
                "A canceled subscription cannot be changed".to_string(),
            ));
        }

        let changed = self
            .subscription_repo
            .update_subscription(
                &subscription,
                UpdateSubscription {
                    plan: request.plan,
                    quantity: request.quantity,
                    ..Default::default()
                },
            )
            .await?;

        if changed {
            info!(user_id = %user.id, subscription_id = %subscription.id, "Subscription updated");
        }
        self.current(user).await
    }

    /// サブスクリプションをキャンセル
    pub async fn cancel(&self, user: &user_model::Model) -> AppResult<subscription_model::Model> {
        let subscription = self.current(user).await?;

        if !self
            .subscription_repo
            .cancel_subscription(&subscription)
            .await?
        {
            return Err(AppError::Conflict(
                "Subscription is already canceled".to_string(),
            ));
        }

        info!(user_id = %user.id, subscription_id = %subscription.id, "Subscription canceled");
        self.current(user).await
    }

    /// キャンセル済みサブスクリプションを再開
    pub async fn resume(&self, user: &user_model::Model) -> AppResult<subscription_model::Model> {
        let subscription = self.current(user).await?;

        if !self
            .subscription_repo
            .resume_subscription(&subscription)
            .await?
        {
            return Err(AppError::Conflict(
                "Only canceled subscriptions can be resumed".to_string(),
            ));
        }

        info!(user_id = %user.id, subscription_id = %subscription.id, "Subscription resumed");
        self.current(user).await
    }
}

fn already_subscribed() -> AppError {
    AppError::Conflict("User already has an active subscription".to_string())
}
