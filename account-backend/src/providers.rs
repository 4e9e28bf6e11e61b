// src/providers.rs

use crate::api::AppState;
use crate::config::AppConfig;
use crate::repository::personal_access_token_repository::DbPersonalAccessTokenRepository;
use crate::repository::subscription_repository::DbSubscriptionRepository;
use crate::repository::user_repository::DbUserRepository;
use crate::repository::{PersonalAccessTokenRepository, SubscriptionRepository, UserRepository};
use crate::utils::password::{PasswordError, PasswordManager};
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tracing::info;

/// リポジトリトレイトと実装の束縛結果
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub subscriptions: Arc<dyn SubscriptionRepository>,
    pub tokens: Arc<dyn PersonalAccessTokenRepository>,
}

pub struct RepositoryProvider;

impl RepositoryProvider {
    /// 各トレイトを sea-orm 実装に束縛する
    pub fn register(db: &Arc<DatabaseConnection>) -> Repositories {
        Repositories {
            users: Arc::new(DbUserRepository::new(db.clone())),
            subscriptions: Arc::new(DbSubscriptionRepository::new(db.clone())),
            tokens: Arc::new(DbPersonalAccessTokenRepository::new(db.clone())),
        }
    }
}

/// 起動時のコンポジションルート
pub fn build_app_state(
    db: &Arc<DatabaseConnection>,
    config: AppConfig,
) -> Result<AppState, PasswordError> {
    let repositories = RepositoryProvider::register(db);
    let password_manager = Arc::new(PasswordManager::from_env()?);

    info!("Repositories and services registered");
    Ok(AppState::from_parts(config, repositories, password_manager))
}
