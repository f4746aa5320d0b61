//! エンドポイント管理API

use super::error::AppError;
use crate::db::{checks as checks_db, endpoints as db};
use crate::types::check::Check;
use crate::types::endpoint::{
    Endpoint, EndpointUpdate, DEFAULT_CHECK_INTERVAL_MS, MAX_CHECK_INTERVAL_MS,
};
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info};
use uuid::Uuid;

/// チェック履歴取得件数のデフォルト
pub const DEFAULT_CHECKS_LIMIT: u32 = 50;

/// チェック履歴取得件数の上限
const MAX_CHECKS_LIMIT: u32 = 1_000;

/// エンドポイント登録リクエスト
#[derive(Debug, Default, Deserialize)]
pub struct CreateEndpointRequest {
    /// 表示名
    #[serde(default)]
    pub name: Option<String>,
    /// チェック対象URL
    #[serde(default)]
    pub url: Option<String>,
    /// チェック間隔（ミリ秒、未指定または0ならデフォルト）
    #[serde(default, alias = "checkInterval", alias = "check_interval_ms")]
    pub check_interval: Option<u64>,
}

/// チェック履歴クエリ
#[derive(Debug, Deserialize)]
pub struct ChecksQuery {
    /// 取得件数
    pub limit: Option<u32>,
}

/// パスのIDを解釈（UUIDでなければ存在しないものとして扱う）
pub(crate) fn parse_endpoint_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw.trim()).map_err(|_| AppError::endpoint_not_found())
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn interval_too_large() -> AppError {
    AppError::bad_request(format!(
        "checkInterval must not exceed {}",
        MAX_CHECK_INTERVAL_MS
    ))
}

fn db_error(message: &'static str) -> impl FnOnce(sqlx::Error) -> AppError {
    move |e| {
        error!(error = %e, "{}", message);
        AppError::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }
}

/// POST /api/endpoints - エンドポイント登録
pub async fn create_endpoint(
    State(state): State<AppState>,
    Json(req): Json<CreateEndpointRequest>,
) -> Result<impl IntoResponse, AppError> {
    let (Some(name), Some(url)) = (non_blank(req.name.as_deref()), non_blank(req.url.as_deref()))
    else {
        return Err(AppError::bad_request("URL and name are required"));
    };

    let interval = match req.check_interval {
        Some(ms) if ms > MAX_CHECK_INTERVAL_MS => return Err(interval_too_large()),
        Some(ms) if ms > 0 => ms,
        _ => DEFAULT_CHECK_INTERVAL_MS,
    };
    let endpoint = Endpoint::new(name, url).with_interval(interval);

    db::create_endpoint(&state.db_pool, &endpoint)
        .await
        .map_err(db_error("Failed to create endpoint"))?;

    info!(
        endpoint_id = %endpoint.id,
        endpoint_name = %endpoint.name,
        check_interval_ms = endpoint.check_interval_ms,
        "Endpoint registered"
    );

    Ok((StatusCode::CREATED, Json(endpoint)))
}

/// GET /api/endpoints - エンドポイント一覧（新しい順）
pub async fn list_endpoints(
    State(state): State<AppState>,
) -> Result<Json<Vec<Endpoint>>, AppError> {
    let endpoints = db::list_endpoints(&state.db_pool)
        .await
        .map_err(db_error("Failed to fetch endpoints"))?;
    Ok(Json(endpoints))
}

/// GET /api/endpoints/:id - エンドポイント詳細
pub async fn get_endpoint(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Endpoint>, AppError> {
    let id = parse_endpoint_id(&id)?;
    db::get_endpoint(&state.db_pool, id)
        .await
        .map_err(db_error("Failed to fetch endpoint"))?
        .map(Json)
        .ok_or_else(AppError::endpoint_not_found)
}

/// PUT /api/endpoints/:id - エンドポイント更新（指定フィールドのみ）
pub async fn update_endpoint(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(update): Json<EndpointUpdate>,
) -> Result<Json<Endpoint>, AppError> {
    let id = parse_endpoint_id(&id)?;

    let blank = |v: &Option<String>| v.as_deref().is_some_and(|s| s.trim().is_empty());
    if blank(&update.name) || blank(&update.url) {
        return Err(AppError::bad_request("URL and name cannot be empty"));
    }
    match update.check_interval_ms {
        Some(0) => return Err(AppError::bad_request("checkInterval must be greater than 0")),
        Some(ms) if ms > MAX_CHECK_INTERVAL_MS => return Err(interval_too_large()),
        _ => {}
    }

    let mut endpoint = db::get_endpoint(&state.db_pool, id)
        .await
        .map_err(db_error("Failed to update endpoint"))?
        .ok_or_else(AppError::endpoint_not_found)?;

    update.apply_to(&mut endpoint);

    let updated = db::update_endpoint(&state.db_pool, &endpoint)
        .await
        .map_err(db_error("Failed to update endpoint"))?;
    if !updated {
        // 取得後に削除された
        return Err(AppError::endpoint_not_found());
    }

    info!(endpoint_id = %endpoint.id, "Endpoint updated");
    Ok(Json(endpoint))
}

/// DELETE /api/endpoints/:id - エンドポイント削除（チェック履歴も削除）
pub async fn delete_endpoint(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_endpoint_id(&id)?;

    let deleted = db::delete_endpoint(&state.db_pool, id)
        .await
        .map_err(db_error("Failed to delete endpoint"))?;
    if !deleted {
        return Err(AppError::endpoint_not_found());
    }

    info!(endpoint_id = %id, "Endpoint deleted");
    Ok(Json(json!({ "message": "Endpoint deleted successfully" })))
}

/// GET /api/endpoints/:id/checks - チェック履歴（新しい順）
pub async fn list_checks(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<ChecksQuery>,
) -> Result<Json<Vec<Check>>, AppError> {
    let id = parse_endpoint_id(&id)?;
    let limit = query
        .limit
        .unwrap_or(DEFAULT_CHECKS_LIMIT)
        .clamp(1, MAX_CHECKS_LIMIT);

    let checks = checks_db::list_recent(&state.db_pool, id, limit)
        .await
        .map_err(db_error("Failed to fetch checks"))?;
    Ok(Json(checks))
}
