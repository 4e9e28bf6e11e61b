// src/api/dto/subscription_dto.rs

use crate::domain::subscription_model;
use crate::utils::validation::validate_plan;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

// --- リクエストDTO ---

/// サブスクリプション開始リクエスト
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct CreateSubscriptionRequest {
    #[validate(
        length(min = 1, max = 100, message = "The plan field is required."),
        custom(function = validate_plan)
    )]
    pub plan: String,

    #[validate(range(min = 1, max = 10000, message = "The quantity must be at least 1."))]
    pub quantity: Option<i32>,

    #[validate(range(min = 1, max = 365, message = "The trial days must be between 1 and 365."))]
    pub trial_days: Option<i64>,
}

/// プラン・数量変更リクエスト
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct UpdateSubscriptionRequest {
    #[validate(
        length(min = 1, max = 100, message = "The plan must be between 1 and 100 characters."),
        custom(function = validate_plan)
    )]
    pub plan: Option<String>,

    #[validate(range(min = 1, max = 10000, message = "The quantity must be at least 1."))]
    pub quantity: Option<i32>,
}

// --- レスポンスDTO ---

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubscriptionResponse {
    pub id: Uuid,
    pub name: String,
    pub plan: String,
    pub status: String,
    pub quantity: i32,
    pub valid: bool,
    pub on_trial: bool,
    pub trial_ends_at: Option<DateTime<Utc>>,
    pub ends_at: Option<DateTime<Utc>>,
    pub canceled_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<subscription_model::Model> for SubscriptionResponse {
    fn from(subscription: subscription_model::Model) -> Self {
        let now = Utc::now();
        Self {
            valid: subscription.is_valid(now),
            on_trial: subscription.on_trial(now),
            id: subscription.id,
            name: subscription.name,
            plan: subscription.plan,
            status: subscription.status,
            quantity: subscription.quantity,
            trial_ends_at: subscription.trial_ends_at,
            ends_at: subscription.ends_at,
            canceled_at: subscription.canceled_at,
            created_at: subscription.created_at,
            updated_at: subscription.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubscriptionStatusResponse {
    pub subscribed: bool,
}
