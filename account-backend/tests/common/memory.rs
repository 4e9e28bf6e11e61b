// tests/common/memory.rs
//
// リポジトリトレイトのインメモリ実装

use account_backend::domain::personal_access_token_model::{
    self, abilities_to_json, new_token_id,
};
use account_backend::domain::subscription_model::{
    self, SubscriptionStatus, DEFAULT_SUBSCRIPTION_NAME,
};
use account_backend::domain::user_model;
use account_backend::repository::personal_access_token_repository::CreateAccessToken;
use account_backend::repository::subscription_repository::{CreateSubscription, UpdateSubscription};
use account_backend::repository::user_repository::{CreateUser, UpdateUser};
use account_backend::repository::{
    PersonalAccessTokenRepository, SubscriptionRepository, UserRepository,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::DbErr;
use std::sync::Mutex;
use uuid::Uuid;

#[derive(Default)]
pub struct InMemoryUserRepository {
    users: Mutex<Vec<user_model::Model>>,
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find(&self, id: Uuid) -> Result<Option<user_model::Model>, DbErr> {
        let users = self.users.lock().unwrap();
        Ok(users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<user_model::Model>, DbErr> {
        let users = self.users.lock().unwrap();
        Ok(users.iter().find(|u| u.email == email).cloned())
    }

    async fn create(&self, input: CreateUser) -> Result<user_model::Model, DbErr> {
        let mut users = self.users.lock().unwrap();
        if users.iter().any(|u| u.email == input.email) {
            return Err(DbErr::Custom("duplicate email".to_string()));
        }

        let now = Utc::now();
        let user = user_model::Model {
            id: Uuid::new_v4(),
            name: input.name,
            email: input.email,
            password_hash: input.password_hash,
            email_verified_at: None,
            created_at: now,
            updated_at: now,
        };
        users.push(user.clone());
        Ok(user)
    }

    async fn update(
        &self,
        user: &user_model::Model,
        input: UpdateUser,
    ) -> Result<user_model::Model, DbErr> {
        let mut users = self.users.lock().unwrap();
        let stored = users
            .iter_mut()
            .find(|u| u.id == user.id)
            .ok_or_else(|| DbErr::RecordNotFound("users".to_string()))?;

        if let Some(name) = input.name {
            stored.name = name;
        }
        if let Some(email) = input.email {
            stored.email = email;
        }
        stored.updated_at = Utc::now();
        Ok(stored.clone())
    }

    async fn email_exists(&self, email: &str, except: Option<Uuid>) -> Result<bool, DbErr> {
        let users = self.users.lock().unwrap();
        Ok(users
            .iter()
            .any(|u| u.email == email && Some(u.id) != except))
    }
}

#[derive(Default)]
pub struct InMemorySubscriptionRepository {
    subscriptions: Mutex<Vec<subscription_model::Model>>,
}

impl InMemorySubscriptionRepository {
    fn modify(
        &self,
        id: Uuid,
        apply: impl FnOnce(&mut subscription_model::Model),
    ) -> Result<bool, DbErr> {
        let mut subscriptions = self.subscriptions.lock().unwrap();
        match subscriptions.iter_mut().find(|s| s.id == id) {
            Some(subscription) => {
                apply(subscription);
                subscription.updated_at = Utc::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[async_trait]
impl SubscriptionRepository for InMemorySubscriptionRepository {
    async fn find_user_subscription(
        &self,
        user: &user_model::Model,
    ) -> Result<Option<subscription_model::Model>, DbErr> {
        let subscriptions = self.subscriptions.lock().unwrap();
        // 後から作成されたものを優先
        Ok(subscriptions
            .iter()
            .rev()
            .find(|s| s.user_id == user.id)
            .cloned())
    }

    async fn create_subscription(
        &self,
        user: &user_model::Model,
        input: CreateSubscription,
    ) -> Result<subscription_model::Model, DbErr> {
        let now = Utc::now();
        let status = if input.trial_ends_at.is_some() {
            SubscriptionStatus::Trialing
        } else {
            SubscriptionStatus::Active
        };

        let mut subscriptions = self.subscriptions.lock().unwrap();
        // 部分一意インデックスと同じ制約
        if subscriptions.iter().any(|s| {
            s.user_id == user.id
                && matches!(
                    s.status(),
                    SubscriptionStatus::Active | SubscriptionStatus::Trialing
                )
        }) {
            return Err(DbErr::RecordNotInserted);
        }

        let subscription = subscription_model::Model {
            id: Uuid::new_v4(),
            user_id: user.id,
            name: input
                .name
                .unwrap_or_else(|| DEFAULT_SUBSCRIPTION_NAME.to_string()),
            plan: input.plan,
            status: status.to_string(),
            quantity: input.quantity.unwrap_or(1),
            trial_ends_at: input.trial_ends_at,
            ends_at: None,
            canceled_at: None,
            created_at: now,
            updated_at: now,
        };
        subscriptions.push(subscription.clone());
        Ok(subscription)
    }

    async fn update_subscription(
        &self,
        subscription: &subscription_model::Model,
        input: UpdateSubscription,
    ) -> Result<bool, DbErr> {
        if input.is_empty() {
            return Ok(false);
        }

        self.modify(subscription.id, |stored| {
            if let Some(plan) = input.plan {
                stored.plan = plan;
            }
            if let Some(quantity) = input.quantity {
                stored.quantity = quantity;
            }
            if let Some(status) = input.status {
                stored.status = status.to_string();
            }
            if let Some(trial_ends_at) = input.trial_ends_at {
                stored.trial_ends_at = Some(trial_ends_at);
            }
            if let Some(ends_at) = input.ends_at {
                stored.ends_at = Some(ends_at);
            }
        })
    }

    async fn cancel_subscription(
        &self,
        subscription: &subscription_model::Model,
    ) -> Result<bool, DbErr> {
        if subscription.is_canceled() {
            return Ok(false);
        }

        let now = Utc::now();
        self.modify(subscription.id, |stored| {
            stored.status = SubscriptionStatus::Canceled.to_string();
            stored.canceled_at = Some(now);
            stored.ends_at = Some(now);
        })
    }

    async fn resume_subscription(
        &self,
        subscription: &subscription_model::Model,
    ) -> Result<bool, DbErr> {
        if !subscription.is_canceled() {
            return Ok(false);
        }

        self.modify(subscription.id, |stored| {
            stored.status = SubscriptionStatus::Active.to_string();
            stored.canceled_at = None;
            stored.ends_at = None;
        })
    }
}

#[derive(Default)]
pub struct InMemoryTokenRepository {
    tokens: Mutex<Vec<personal_access_token_model::Model>>,
}

impl InMemoryTokenRepository {
    pub fn all(&self) -> Vec<personal_access_token_model::Model> {
        self.tokens.lock().unwrap().clone()
    }

    /// 全トークンの発行日時を過去へずらす
    pub fn backdate(&self, by: chrono::Duration) {
        for token in self.tokens.lock().unwrap().iter_mut() {
            token.created_at -= by;
        }
    }
}

#[async_trait]
impl PersonalAccessTokenRepository for InMemoryTokenRepository {
    async fn create(
        &self,
        input: CreateAccessToken,
    ) -> Result<personal_access_token_model::Model, DbErr> {
        let now = Utc::now();
        let token = personal_access_token_model::Model {
            id: new_token_id(),
            user_id: input.user_id,
            name: input.name,
            token: input.token_hash,
            abilities: Some(abilities_to_json(&input.abilities)),
            last_used_at: None,
            expires_at: input.expires_at,
            created_at: now,
            updated_at: now,
        };
        self.tokens.lock().unwrap().push(token.clone());
        Ok(token)
    }

    async fn find(&self, id: Uuid) -> Result<Option<personal_access_token_model::Model>, DbErr> {
        let tokens = self.tokens.lock().unwrap();
        Ok(tokens.iter().find(|t| t.id == id).cloned())
    }

    async fn find_by_token_hash(
        &self,
        token_hash: &str,
    ) -> Result<Option<personal_access_token_model::Model>, DbErr> {
        let tokens = self.tokens.lock().unwrap();
        Ok(tokens.iter().find(|t| t.token == token_hash).cloned())
    }

    async fn touch_last_used(&self, id: Uuid, used_at: DateTime<Utc>) -> Result<(), DbErr> {
        let mut tokens = self.tokens.lock().unwrap();
        if let Some(token) = tokens.iter_mut().find(|t| t.id == id) {
            token.last_used_at = Some(used_at);
        }
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, DbErr> {
        let mut tokens = self.tokens.lock().unwrap();
        let before = tokens.len();
        tokens.retain(|t| t.id != id);
        Ok(tokens.len() < before)
    }
}
