// tests/common/mod.rs
#![allow(dead_code)]

pub mod app;
pub mod memory;
pub mod request;

use std::sync::Once;

// テスト環境の初期化を一度だけ実行
static INIT: Once = Once::new();

/// テスト用のログ設定
pub fn init_test_env() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter("account_backend=debug,tower_http=debug")
            .with_test_writer()
            .try_init();
    });
}
