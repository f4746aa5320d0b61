//! HTTPプローブ
//!
//! 1回のGETで到達性とステータスを取得する。リトライはしない。

use crate::common::error::MonitorError;
use crate::types::check::STATUS_UNREACHABLE;
use reqwest::Client;
use std::time::{Duration, Instant};
use tracing::debug;

/// エラー内容が取得できなかった場合のメッセージ
pub const FALLBACK_ERROR_MESSAGE: &str = "Failed to reach endpoint";

/// プローブ結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeOutcome {
    /// HTTPステータス（0 = 応答なし）
    pub status: u16,
    /// 開始から結論までの経過時間（ミリ秒）
    pub response_time_ms: u64,
    /// エラーメッセージ（ステータス未受信時のみ）
    pub error_message: Option<String>,
}

/// HTTPプローバー
#[derive(Clone, Debug)]
pub struct Prober {
    client: Client,
}

impl Prober {
    /// タイムアウトを指定してプローバーを作成
    pub fn new(timeout: Duration) -> Result<Self, MonitorError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| MonitorError::Internal(format!("Failed to create HTTP client: {}", e)))?;
        Ok(Self { client })
    }

    /// URLへGETを1回送信して結果を分類
    ///
    /// 4xx/5xxもステータスとして記録する。応答ボディは読まない。
    pub async fn probe(&self, url: &str) -> ProbeOutcome {
        let start = Instant::now();
        let result = self.client.get(url).send().await;
        let response_time_ms = start.elapsed().as_millis() as u64;

        match result {
            Ok(response) => ProbeOutcome {
                status: response.status().as_u16(),
                response_time_ms,
                error_message: None,
            },
            Err(e) => {
                debug!(url = %url, error = %e, "Probe failed before receiving a status");
                ProbeOutcome {
                    status: STATUS_UNREACHABLE,
                    response_time_ms,
                    error_message: Some(describe_error(&e)),
                }
            }
        }
    }
}

fn describe_error(err: &reqwest::Error) -> String {
    let message = if err.is_timeout() {
        format!("Request timed out: {}", err)
    } else {
        err.to_string()
    };
    if message.trim().is_empty() {
        FALLBACK_ERROR_MESSAGE.to_string()
    } else {
        message
    }
}
