// src/db.rs
use crate::config::AppConfig;
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use std::time::Duration;

pub type DbPool = DatabaseConnection;

pub async fn create_db_pool(config: &AppConfig) -> Result<DbPool, DbErr> {
    let mut opt = ConnectOptions::new(config.database.url.clone());

    // 接続オプションを設定
    opt.max_connections(config.database.max_connections)
        .min_connections(config.database.min_connections)
        .connect_timeout(Duration::from_secs(8))
        .acquire_timeout(Duration::from_secs(8))
        .idle_timeout(Duration::from_secs(8 * 60))
        .max_lifetime(Duration::from_secs(30 * 60))
        .sqlx_logging(!config.is_production());

    Database::connect(opt).await
}

/// 未適用のマイグレーションを実行
pub async fn run_migrations(db: &DbPool) -> Result<(), DbErr> {
    Migrator::up(db, None).await
}
