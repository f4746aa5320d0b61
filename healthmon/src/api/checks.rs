//! ヘルスチェック実行API

use super::endpoints::parse_endpoint_id;
use super::error::AppError;
use crate::health::PassOutcome;
use crate::types::check::{Check, CheckResult};
use crate::AppState;
use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 手動チェックリクエスト
#[derive(Debug, Default, Deserialize)]
pub struct CheckRequest {
    /// 対象エンドポイントID
    #[serde(default, alias = "endpointId")]
    pub endpoint_id: Option<String>,
}

/// 一括チェックの1件分
#[derive(Debug, Clone, Serialize)]
pub struct CheckSummary {
    /// エンドポイントID
    pub endpoint_id: Uuid,
    /// 表示名
    pub name: String,
    /// URL
    pub url: String,
    /// HTTPステータス（0 = 応答なし）
    pub status: u16,
    /// 応答時間（ミリ秒）
    pub response_time_ms: u64,
    /// エラーメッセージ
    pub error_message: Option<String>,
    /// 正常判定
    pub healthy: bool,
}

impl From<CheckResult> for CheckSummary {
    fn from(result: CheckResult) -> Self {
        Self {
            endpoint_id: result.endpoint_id,
            name: result.endpoint_name,
            url: result.endpoint_url,
            status: result.status,
            response_time_ms: result.response_time_ms,
            error_message: result.error_message,
            healthy: result.healthy,
        }
    }
}

/// POST /api/check - 1エンドポイントを即時チェック
pub async fn check_endpoint(
    State(state): State<AppState>,
    Json(req): Json<CheckRequest>,
) -> Result<Json<Check>, AppError> {
    let Some(raw_id) = req.endpoint_id.filter(|id| !id.trim().is_empty()) else {
        return Err(AppError::bad_request("Endpoint ID is required"));
    };
    let id = parse_endpoint_id(&raw_id)?;

    let result = state
        .executor
        .execute_check_by_id(id)
        .await
        .map_err(|e| AppError::from_monitor(e, "Failed to perform health check"))?;
    Ok(Json(result.check))
}

/// GET /api/check - 全エンドポイントを並列チェック
pub async fn check_all(
    State(state): State<AppState>,
) -> Result<Json<Vec<CheckSummary>>, AppError> {
    let results = state
        .executor
        .execute_check_all()
        .await
        .map_err(|e| AppError::from_monitor(e, "Failed to perform health checks"))?;
    Ok(Json(results.into_iter().map(CheckSummary::from).collect()))
}

/// GET /api/check/due - 期限到来分のパスを即時実行
pub async fn check_due(State(state): State<AppState>) -> Result<Json<PassOutcome>, AppError> {
    let outcome = state
        .scheduler
        .run_due_pass()
        .await
        .map_err(|e| AppError::from_monitor(e, "Failed to perform due health checks"))?;
    Ok(Json(outcome))
}
