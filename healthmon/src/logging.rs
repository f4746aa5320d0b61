//! ロギング初期化ユーティリティ
//!
//! 標準出力へのfmtレイヤーに加え、`HEALTHMON_LOG_DIR` が設定されていれば
//! 日次ローテーションのファイル出力を追加する。

use crate::config::{get_env, get_env_with_fallback};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// デフォルトのフィルタ
pub const DEFAULT_FILTER: &str = "info,sqlx::query=warn";

/// ログファイル名のプレフィックス
const LOG_FILE_PREFIX: &str = "healthmon.log";

/// ファイル出力のバックグラウンドライターを保持するガード
///
/// ドロップするとバッファがフラッシュされるため、`main` の終了まで保持すること。
#[must_use = "dropping the guard stops file logging"]
pub struct LoggingGuard {
    _file_guard: Option<WorkerGuard>,
}

/// フィルタ文字列を決定（`HEALTHMON_LOG_LEVEL` → `RUST_LOG` → デフォルト）
pub fn filter_directive() -> String {
    get_env_with_fallback("HEALTHMON_LOG_LEVEL", "RUST_LOG")
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| DEFAULT_FILTER.to_string())
}

fn build_filter() -> EnvFilter {
    let directive = filter_directive();
    EnvFilter::try_new(&directive).unwrap_or_else(|e| {
        eprintln!("Invalid log filter '{}': {}; falling back to '{}'", directive, e, DEFAULT_FILTER);
        EnvFilter::new(DEFAULT_FILTER)
    })
}

/// グローバルなtracingサブスクライバーを初期化
pub fn init() -> Result<LoggingGuard, anyhow::Error> {
    let stdout_layer = fmt::layer().with_writer(std::io::stdout).with_target(true);

    let log_dir = get_env("HEALTHMON_LOG_DIR")
        .filter(|v| !v.trim().is_empty());

    let (file_layer, file_guard) = match log_dir {
        Some(dir) => {
            std::fs::create_dir_all(&dir)?;
            let appender = tracing_appender::rolling::daily(&dir, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer().with_writer(writer).with_ansi(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(build_filter())
        .with(stdout_layer)
        .with(file_layer)
        .try_init()?;

    Ok(LoggingGuard {
        _file_guard: file_guard,
    })
}
