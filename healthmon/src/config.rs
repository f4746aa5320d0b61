//! Configuration management via environment variables
//!
//! Provides helper functions for reading environment variables with fallback
//! to deprecated variable names with warning logs, plus the typed configuration
//! sections built from them.

use std::time::Duration;

/// デフォルトの待ち受けポート
pub const DEFAULT_PORT: u16 = 3000;

/// デフォルトのデータベースURL
pub const DEFAULT_DATABASE_URL: &str = "sqlite:healthmon.db";

/// スケジューラのティック間隔（ミリ秒）
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 5_000;

/// プローブのタイムアウト（ミリ秒）
pub const DEFAULT_PROBE_TIMEOUT_MS: u64 = 30_000;

/// 期限判定に使う最小チェック間隔（ミリ秒）
pub const DEFAULT_MIN_CHECK_INTERVAL_MS: u64 = 10_000;

/// SMTPのデフォルトポート
pub const DEFAULT_SMTP_PORT: u16 = 587;

/// Get an environment variable with fallback to a deprecated name
///
/// If the new variable name is set, returns its value.
/// If only the old (deprecated) variable name is set, returns its value
/// and logs a deprecation warning.
///
/// # Arguments
/// * `new_name` - The new environment variable name (preferred)
/// * `old_name` - The deprecated environment variable name (fallback)
///
/// # Returns
/// * `Some(value)` - The environment variable value
/// * `None` - Neither variable is set
///
/// # Example
/// ```
/// use healthmon::config::get_env_with_fallback;
///
/// let port = get_env_with_fallback("HEALTHMON_PORT", "PORT");
/// ```
pub fn get_env_with_fallback(new_name: &str, old_name: &str) -> Option<String> {
    if let Ok(val) = std::env::var(new_name) {
        return Some(val);
    }
    if let Ok(val) = std::env::var(old_name) {
        tracing::warn!(
            "Environment variable '{}' is deprecated, use '{}' instead",
            old_name,
            new_name
        );
        return Some(val);
    }
    None
}

/// Get an environment variable with fallback and default value
///
/// Similar to `get_env_with_fallback`, but returns a default value
/// if neither variable is set.
pub fn get_env_with_fallback_or(new_name: &str, old_name: &str, default: &str) -> String {
    get_env_with_fallback(new_name, old_name).unwrap_or_else(|| default.to_string())
}

/// Get an environment variable with fallback, parsing to a specific type
///
/// Returns `default` if neither variable is set or parsing fails.
pub fn get_env_with_fallback_parse<T: std::str::FromStr>(
    new_name: &str,
    old_name: &str,
    default: T,
) -> T {
    get_env_with_fallback(new_name, old_name)
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(default)
}

/// Get an environment variable that has no deprecated name
pub fn get_env(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

/// Get an environment variable without fallback, returning `default` when unset
pub fn get_env_or(name: &str, default: &str) -> String {
    get_env(name).unwrap_or_else(|| default.to_string())
}

/// Get an environment variable without fallback, parsing to a specific type
///
/// Returns `default` if the variable is unset or parsing fails.
pub fn get_env_parse<T: std::str::FromStr>(name: &str, default: T) -> T {
    get_env(name)
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(default)
}

/// 0を未設定として扱う
fn non_zero_or<T: PartialEq + Default>(value: T, default: T) -> T {
    if value == T::default() {
        default
    } else {
        value
    }
}

/// 空文字列を未設定として扱う
fn get_env_non_empty(new_name: &str, old_name: &str) -> Option<String> {
    get_env_with_fallback(new_name, old_name)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// HTTPサーバー設定
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// バインドアドレス
    pub host: String,
    /// 待ち受けポート
    pub port: u16,
    /// データベースURL
    pub database_url: String,
}

impl ServerConfig {
    /// Load server configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            host: get_env_or("HEALTHMON_HOST", "0.0.0.0"),
            port: get_env_with_fallback_parse("HEALTHMON_PORT", "PORT", DEFAULT_PORT),
            database_url: get_env_with_fallback_or(
                "HEALTHMON_DATABASE_URL",
                "DATABASE_URL",
                DEFAULT_DATABASE_URL,
            ),
        }
    }

    /// `host:port` 形式のバインドアドレス
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// 監視エンジン設定
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonitorConfig {
    /// スケジューラのティック間隔
    pub tick_interval: Duration,
    /// プローブのタイムアウト
    pub probe_timeout: Duration,
    /// 期限判定時の最小チェック間隔（ミリ秒）
    pub min_check_interval_ms: u64,
    /// エンドポイントごとに保持するチェック履歴数
    pub retention: u32,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_millis(DEFAULT_TICK_INTERVAL_MS),
            probe_timeout: Duration::from_millis(DEFAULT_PROBE_TIMEOUT_MS),
            min_check_interval_ms: DEFAULT_MIN_CHECK_INTERVAL_MS,
            retention: crate::db::checks::DEFAULT_RETENTION,
        }
    }
}

impl MonitorConfig {
    /// Load monitor configuration from environment variables.
    ///
    /// Zero tick, timeout or retention falls back to the default. A retention of 0
    /// would prune the check just recorded and make every endpoint due on every tick.
    pub fn from_env() -> Self {
        let tick_ms = get_env_parse("HEALTHMON_TICK_INTERVAL_MS", DEFAULT_TICK_INTERVAL_MS);
        let timeout_ms = get_env_parse("HEALTHMON_PROBE_TIMEOUT_MS", DEFAULT_PROBE_TIMEOUT_MS);
        let min_check_interval_ms =
            get_env_parse("HEALTHMON_MIN_CHECK_INTERVAL_MS", DEFAULT_MIN_CHECK_INTERVAL_MS);
        let retention = get_env_parse(
            "HEALTHMON_CHECK_RETENTION",
            crate::db::checks::DEFAULT_RETENTION,
        );

        Self {
            tick_interval: Duration::from_millis(non_zero_or(tick_ms, DEFAULT_TICK_INTERVAL_MS)),
            probe_timeout: Duration::from_millis(non_zero_or(timeout_ms, DEFAULT_PROBE_TIMEOUT_MS)),
            min_check_interval_ms,
            retention: non_zero_or(retention, crate::db::checks::DEFAULT_RETENTION),
        }
    }
}

/// SMTP接続のセキュリティモード
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SmtpSecurity {
    /// 平文（STARTTLSなし）
    None,
    /// 接続時からTLS（SMTPS）
    Ssl,
    /// STARTTLS必須
    StartTls,
}

impl SmtpSecurity {
    /// 設定値とポートからモードを決定
    ///
    /// `ssl` またはポート465は暗黙TLS、`tls` はSTARTTLS、それ以外は平文。
    pub fn resolve(value: Option<&str>, port: u16) -> Self {
        match value.map(|v| v.trim().to_ascii_lowercase()) {
            Some(v) if v == "ssl" => Self::Ssl,
            _ if port == 465 => Self::Ssl,
            Some(v) if v == "tls" => Self::StartTls,
            _ => Self::None,
        }
    }
}

/// SMTP送信設定
#[derive(Clone, PartialEq, Eq)]
pub struct SmtpConfig {
    /// SMTPホスト
    pub host: String,
    /// SMTPポート
    pub port: u16,
    /// セキュリティモード
    pub security: SmtpSecurity,
    /// 認証ユーザー名
    pub username: Option<String>,
    /// 認証パスワード
    pub password: Option<String>,
    /// 送信元アドレス
    pub from_email: String,
    /// 送信元表示名
    pub from_name: Option<String>,
}

impl std::fmt::Debug for SmtpConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("security", &self.security)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .field("from_email", &self.from_email)
            .field("from_name", &self.from_name)
            .finish()
    }
}

impl SmtpConfig {
    /// Load SMTP configuration from environment variables.
    ///
    /// Returns `None` when the host or the sender address is missing.
    pub fn from_env() -> Option<Self> {
        let host = get_env_non_empty("HEALTHMON_SMTP_HOST", "SMTP_HOST")?;
        let from_email = get_env_non_empty("HEALTHMON_SMTP_FROM_EMAIL", "SMTP_FROM_EMAIL")?;
        let port = get_env_with_fallback_parse("HEALTHMON_SMTP_PORT", "SMTP_PORT", DEFAULT_SMTP_PORT);
        let security = SmtpSecurity::resolve(
            get_env_non_empty("HEALTHMON_SMTP_SECURITY", "SMTP_SECURITY").as_deref(),
            port,
        );

        Some(Self {
            host,
            port,
            security,
            username: get_env_non_empty("HEALTHMON_SMTP_USERNAME", "SMTP_USERNAME"),
            password: get_env_non_empty("HEALTHMON_SMTP_PASSWORD", "SMTP_PASSWORD"),
            from_email,
            from_name: get_env_non_empty("HEALTHMON_SMTP_FROM_NAME", "SMTP_FROM_NAME"),
        })
    }
}

/// 障害アラート設定
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AlertConfig {
    /// 送信先アドレス（未設定ならアラート無効）
    pub destination: Option<String>,
    /// SMTP設定（未設定なら送信手段なし）
    pub smtp: Option<SmtpConfig>,
}

impl AlertConfig {
    /// Load alert configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            destination: get_env_non_empty("HEALTHMON_ALERT_EMAIL", "ALERT_EMAIL"),
            smtp: SmtpConfig::from_env(),
        }
    }
}
