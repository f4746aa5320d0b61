//! CLI module for healthmon
//!
//! Provides the command-line interface: the HTTP server plus one-shot check commands.

pub mod check;
pub mod serve;

use clap::{Args, Parser, Subcommand};

/// healthmon - HTTP endpoint health monitor
#[derive(Parser, Debug)]
#[command(name = "healthmon")]
#[command(version, about, long_about = None)]
#[command(after_help = r#"ENVIRONMENT VARIABLES:
    HEALTHMON_HOST                   Bind address (default: 0.0.0.0)
    HEALTHMON_PORT                   Listen port (default: 3000, legacy: PORT)
    HEALTHMON_DATABASE_URL           Database URL (default: sqlite:healthmon.db)
    HEALTHMON_LOG_LEVEL              Log filter (default: info, legacy: RUST_LOG)
    HEALTHMON_LOG_DIR                Directory for daily-rotated log files
    HEALTHMON_TICK_INTERVAL_MS       Scheduler tick (default: 5000)
    HEALTHMON_PROBE_TIMEOUT_MS       Probe timeout (default: 30000)
    HEALTHMON_MIN_CHECK_INTERVAL_MS  Minimum check interval (default: 10000)
    HEALTHMON_CHECK_RETENTION        Checks kept per endpoint (default: 100)
    HEALTHMON_ALERT_EMAIL            Failure alert destination (legacy: ALERT_EMAIL)
    HEALTHMON_SMTP_HOST              SMTP host (legacy: SMTP_HOST)
    HEALTHMON_SMTP_PORT              SMTP port (default: 587)
    HEALTHMON_SMTP_SECURITY          ssl | tls (default: plain)
    HEALTHMON_SMTP_USERNAME          SMTP user
    HEALTHMON_SMTP_PASSWORD          SMTP password
    HEALTHMON_SMTP_FROM_EMAIL        Sender address
    HEALTHMON_SMTP_FROM_NAME         Sender display name
"#)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the HTTP server and the due-check scheduler (default)
    Serve(serve::ServeArgs),
    /// Check every endpoint once and print the results as JSON
    CheckAll(DatabaseArgs),
    /// Run one due-check pass and print the report as JSON
    Due(DatabaseArgs),
}

/// データベース指定の共通引数
#[derive(Args, Debug, Clone, Default)]
pub struct DatabaseArgs {
    /// Database URL (overrides HEALTHMON_DATABASE_URL)
    #[arg(long)]
    pub database_url: Option<String>,
}

impl DatabaseArgs {
    /// 引数 → 環境変数 → デフォルトの順で解決
    pub fn resolve(&self) -> String {
        self.database_url
            .clone()
            .unwrap_or_else(|| crate::config::ServerConfig::from_env().database_url)
    }
}
