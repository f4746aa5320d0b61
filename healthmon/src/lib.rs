//! healthmon
//!
//! 登録されたHTTPエンドポイントを個別の間隔で監視し、チェック履歴を保持して
//! 障害時にアラートを送るサーバー

#![warn(missing_docs)]

/// 共通型定義（エラー型）
pub mod common;

/// REST APIハンドラー
pub mod api;

/// サーバー初期化
pub mod bootstrap;

/// CLIインターフェース
pub mod cli;

/// 設定管理（環境変数ヘルパー）
pub mod config;

/// データベースアクセス
pub mod db;

/// ヘルスチェック監視（プローブ・実行・スケジューラ）
pub mod health;

/// ロギング初期化ユーティリティ
pub mod logging;

/// 障害アラート通知
pub mod notify;

/// axumサーバー起動
pub mod server;

/// Shutdown controller
pub mod shutdown;

/// 型定義
pub mod types;

use common::error::MonitorError;
use config::MonitorConfig;
use health::{CheckExecutor, DueCheckScheduler, Prober};
use notify::Notifier;

/// アプリケーション状態
#[derive(Clone)]
pub struct AppState {
    /// データベース接続プール
    pub db_pool: sqlx::SqlitePool,
    /// チェック実行器
    pub executor: CheckExecutor,
    /// 期限ベースのスケジューラ（未起動で作成される）
    pub scheduler: DueCheckScheduler,
    /// Cooperative shutdown controller
    pub shutdown: shutdown::ShutdownController,
    /// 監視エンジン設定
    pub monitor_config: MonitorConfig,
}

impl AppState {
    /// 各コンポーネントを組み立てる（スケジューラは起動しない）
    pub fn new(
        db_pool: sqlx::SqlitePool,
        monitor_config: MonitorConfig,
        notifier: Notifier,
    ) -> Result<Self, MonitorError> {
        let shutdown = shutdown::ShutdownController::default();
        let prober = Prober::new(monitor_config.probe_timeout)?;
        let executor = CheckExecutor::from_pool(
            db_pool.clone(),
            prober,
            notifier,
            monitor_config.retention,
        );
        let scheduler = DueCheckScheduler::new(executor.clone(), &monitor_config, shutdown.clone());

        Ok(Self {
            db_pool,
            executor,
            scheduler,
            shutdown,
            monitor_config,
        })
    }
}
