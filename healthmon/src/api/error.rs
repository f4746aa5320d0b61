//! APIエラーレスポンス型
//!
//! axum用の共通エラーハンドリング。レスポンスは `{"error": "..."}` 形式。

use crate::common::error::MonitorError;
use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

/// Axum用のエラーレスポンス型
#[derive(Debug)]
pub struct AppError {
    status: StatusCode,
    message: String,
}

impl AppError {
    /// ステータスとメッセージを指定
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    /// 400 Bad Request
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    /// 404 Endpoint not found
    pub fn endpoint_not_found() -> Self {
        Self::new(StatusCode::NOT_FOUND, "Endpoint not found")
    }

    /// 操作ごとのメッセージでMonitorErrorを変換
    ///
    /// 未検出は404、入力エラーは400のまま、それ以外は `failure_message` の500にする。
    /// 内部の詳細はログにのみ出力する。
    pub fn from_monitor(err: MonitorError, failure_message: &str) -> Self {
        if err.is_not_found() || err.status_code() == StatusCode::BAD_REQUEST {
            return Self::from(err);
        }
        tracing::error!(error = %err, "{}", failure_message);
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, failure_message)
    }

    /// HTTPステータス
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// クライアント向けメッセージ
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<MonitorError> for AppError {
    fn from(err: MonitorError) -> Self {
        let status = err.status_code();
        if status.is_server_error() {
            tracing::error!(error = %err, "Request failed");
        }
        // Use external_message() to avoid exposing internal details (SQL errors, hostnames, etc.)
        Self::new(status, err.external_message())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let payload = json!({
            "error": self.message
        });

        (self.status, Json(payload)).into_response()
    }
}
