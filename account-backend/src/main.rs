// src/main.rs
use account_backend::api::app_router;
use account_backend::config::AppConfig;
use account_backend::db::{create_db_pool, run_migrations};
use account_backend::providers::build_app_state;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // トレーシングの設定
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "account_backend=info,tower_http=info".into()),
        )
        .with(fmt::layer())
        .init();

    tracing::info!("Starting account backend server...");

    // 設定を読み込む
    let app_config = AppConfig::from_env()?;
    tracing::info!(
        environment = %app_config.environment,
        api_key_configured = app_config.api_key.is_some(),
        "Configuration loaded"
    );

    // データベース接続を作成
    let db_pool = create_db_pool(&app_config).await?;
    tracing::info!("Database pool created successfully.");

    run_migrations(&db_pool).await?;
    tracing::info!("Database migrations applied.");

    let server_addr = app_config.server_addr();
    let app_state = build_app_state(&Arc::new(db_pool), app_config)?;
    let app = app_router(app_state);

    tracing::info!("Router configured. Server listening on {}", server_addr);

    let listener = TcpListener::bind(&server_addr).await?;
    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to install Ctrl+C handler");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received, stopping server...");
}
