//! サーバー初期化ロジック
//!
//! データベース接続、マイグレーション、通知器とスケジューラの組み立てを担当する。

use crate::common::error::MonitorError;
use crate::config::{AlertConfig, MonitorConfig};
use crate::db::{endpoints, migrations};
use crate::notify::Notifier;
use crate::AppState;
use tracing::info;

/// アプリケーション状態を初期化する
///
/// DB接続とマイグレーションを行い、環境変数の設定で各コンポーネントを組み立てる。
/// スケジューラは起動しない（`serve` のみが起動する）。
pub async fn initialize(database_url: &str) -> Result<AppState, MonitorError> {
    info!("healthmon v{}", env!("CARGO_PKG_VERSION"));

    let db_pool = migrations::initialize_database(database_url).await?;
    let endpoint_count = endpoints::count_endpoints(&db_pool).await?;
    info!(
        database_url = %database_url,
        endpoints = endpoint_count,
        "Database initialized"
    );

    let monitor_config = MonitorConfig::from_env();
    info!(
        tick_interval_ms = monitor_config.tick_interval.as_millis() as u64,
        probe_timeout_ms = monitor_config.probe_timeout.as_millis() as u64,
        min_check_interval_ms = monitor_config.min_check_interval_ms,
        retention = monitor_config.retention,
        "Monitor configuration loaded"
    );

    let notifier = Notifier::from_config(&AlertConfig::from_env());

    AppState::new(db_pool, monitor_config, notifier)
}
