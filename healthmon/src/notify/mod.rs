//! 障害アラート通知
//!
//! チェック失敗時に固定フォーマットのメールを1件送る。送信は投げっぱなしで、
//! 失敗してもログに残すだけで呼び出し元には伝えない。

pub mod smtp;

pub use smtp::SmtpAlertTransport;

use crate::config::AlertConfig;
use crate::types::check::STATUS_UNREACHABLE;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

/// アラート送信エラー
#[derive(Debug, Error)]
pub enum NotifyError {
    /// アドレス形式が不正
    #[error("Invalid email address: {0}")]
    Address(#[from] lettre::address::AddressError),

    /// メッセージ組み立て失敗
    #[error("Failed to build message: {0}")]
    Message(#[from] lettre::error::Error),

    /// SMTP送信失敗
    #[error("SMTP error: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),

    /// その他の送信失敗
    #[error("Transport error: {0}")]
    Transport(String),
}

/// アラートの送信手段
#[async_trait]
pub trait AlertTransport: Send + Sync {
    /// 1通送信する
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), NotifyError>;
}

/// 障害アラートの内容
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailureAlert<'a> {
    /// エンドポイント表示名
    pub endpoint_name: &'a str,
    /// エンドポイントURL
    pub endpoint_url: &'a str,
    /// HTTPステータス（0 = 応答なし）
    pub status: u16,
    /// 応答時間（ミリ秒）
    pub response_time_ms: u64,
    /// エラーメッセージ
    pub error_message: Option<&'a str>,
}

impl FailureAlert<'_> {
    /// 件名
    pub fn subject(&self) -> String {
        format!("Health check failed: {}", self.endpoint_name)
    }

    /// 本文（プレーンテキスト）
    pub fn body(&self) -> String {
        let status = if self.status == STATUS_UNREACHABLE {
            "No response".to_string()
        } else {
            self.status.to_string()
        };
        format!(
            "Endpoint \"{}\" ({}) is failing.\n\nStatus: {}\nResponse time: {}ms\nError: {}\n\nPlease investigate.",
            self.endpoint_name,
            self.endpoint_url,
            status,
            self.response_time_ms,
            self.error_message.unwrap_or("None"),
        )
    }
}

/// 障害アラート通知器
#[derive(Clone, Default)]
pub struct Notifier {
    destination: Option<String>,
    transport: Option<Arc<dyn AlertTransport>>,
}

impl std::fmt::Debug for Notifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Notifier")
            .field("destination", &self.destination)
            .field("transport", &self.transport.is_some())
            .finish()
    }
}

impl Notifier {
    /// 送信先と送信手段を指定して作成
    pub fn new(destination: Option<String>, transport: Option<Arc<dyn AlertTransport>>) -> Self {
        Self {
            destination,
            transport,
        }
    }

    /// 何も送らない通知器
    pub fn disabled() -> Self {
        Self::default()
    }

    /// 設定からSMTP通知器を構築
    ///
    /// SMTPトランスポートの構築に失敗した場合は警告を出して無効化する。
    pub fn from_config(config: &AlertConfig) -> Self {
        let transport = config.smtp.as_ref().and_then(|smtp| {
            match SmtpAlertTransport::new(smtp) {
                Ok(t) => {
                    info!(
                        host = %smtp.host,
                        port = smtp.port,
                        from = %t.from(),
                        "SMTP transport configured"
                    );
                    Some(Arc::new(t) as Arc<dyn AlertTransport>)
                }
                Err(e) => {
                    warn!(host = %smtp.host, error = %e, "Failed to build SMTP transport; alerts disabled");
                    None
                }
            }
        });

        let notifier = Self::new(config.destination.clone(), transport);
        if notifier.is_enabled() {
            info!("Failure alerts enabled");
        } else {
            info!("Failure alerts disabled (alert destination or SMTP transport not configured)");
        }
        notifier
    }

    /// 送信先と送信手段の両方が揃っているか
    pub fn is_enabled(&self) -> bool {
        self.destination.is_some() && self.transport.is_some()
    }

    /// 障害アラートを送信
    ///
    /// 送信失敗はログに残して破棄する。
    pub async fn alert_failure(&self, alert: &FailureAlert<'_>) {
        let (Some(to), Some(transport)) = (&self.destination, &self.transport) else {
            debug!(
                endpoint_name = %alert.endpoint_name,
                "Failure alert skipped: notifier not configured"
            );
            return;
        };

        match transport.send(to, &alert.subject(), &alert.body()).await {
            Ok(()) => info!(
                endpoint_name = %alert.endpoint_name,
                status = alert.status,
                "Failure alert sent"
            ),
            Err(e) => warn!(
                endpoint_name = %alert.endpoint_name,
                error = %e,
                "Failed to send failure alert"
            ),
        }
    }
}
