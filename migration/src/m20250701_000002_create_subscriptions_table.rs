use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Subscriptions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Subscriptions::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Subscriptions::UserId).uuid().not_null())
                    .col(
                        ColumnDef::new(Subscriptions::Name)
                            .string_len(100)
                            .not_null()
                            .default("default"),
                    )
                    .col(ColumnDef::new(Subscriptions::Plan).string_len(100).not_null())
                    .col(
                        ColumnDef::new(Subscriptions::Status)
                            .string_len(50)
                            .not_null()
                            .default("active"),
                    )
                    .col(
                        ColumnDef::new(Subscriptions::Quantity)
                            .integer()
                            .not_null()
                            .default(1),
                    )
                    .col(
                        ColumnDef::new(Subscriptions::TrialEndsAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Subscriptions::EndsAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Subscriptions::CanceledAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Subscriptions::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Subscriptions::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_subscriptions_user_id")
                            .from(Subscriptions::Table, Subscriptions::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // ユーザーの最新サブスクリプション検索用
        manager
            .create_index(
                Index::create()
                    .table(Subscriptions::Table)
                    .name("idx_subscriptions_user_id_created_at")
                    .col(Subscriptions::UserId)
                    .col(Subscriptions::CreatedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .table(Subscriptions::Table)
                    .name("idx_subscriptions_status")
                    .col(Subscriptions::Status)
                    .to_owned(),
            )
            .await?;

        // 有効なサブスクリプションはユーザーごとに1件まで
        manager
            .get_connection()
            .execute_unprepared(
                "CREATE UNIQUE INDEX IF NOT EXISTS idx_subscriptions_user_id_current \
                 ON subscriptions (user_id) WHERE status IN ('active', 'trialing')",
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared("DROP INDEX IF EXISTS idx_subscriptions_user_id_current")
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .table(Subscriptions::Table)
                    .name("idx_subscriptions_status")
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .table(Subscriptions::Table)
                    .name("idx_subscriptions_user_id_created_at")
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(Subscriptions::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Subscriptions {
    Table,
    Id,
    UserId,
    Name,
    Plan,
    Status,
    Quantity,
    TrialEndsAt,
    EndsAt,
    CanceledAt,
    CreatedAt,
    UpdatedAt,
}

/// Reference to the users table for foreign key
#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
}
