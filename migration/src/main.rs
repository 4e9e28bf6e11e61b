// migration/src/main.rs

use migration::Migrator;
use sea_orm_migration::prelude::*;

// `cargo run -p migration -- up` などで DATABASE_URL に対して実行する
#[async_std::main]
async fn main() {
    cli::run_cli(Migrator).await;
}
