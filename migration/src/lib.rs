// migration/src/lib.rs
pub use sea_orm_migration::prelude::*;

// 認証関連マイグレーション
mod m20250701_000001_create_users_table;
mod m20250701_000002_create_subscriptions_table;
mod m20250701_000003_create_personal_access_tokens_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            // 1. 基本テーブル作成（依存関係なし）
            Box::new(m20250701_000001_create_users_table::Migration),
            // 2. usersテーブルに依存するテーブル
            Box::new(m20250701_000002_create_subscriptions_table::Migration),
            Box::new(m20250701_000003_create_personal_access_tokens_table::Migration),
        ]
    }
}
