//! REST APIハンドラー
//!
//! エンドポイントCRUDとチェック実行のルーティング

pub mod checks;
pub mod endpoints;
pub mod error;

use crate::AppState;
use axum::{
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use tower_http::trace::TraceLayer;

/// アプリケーションのルーターを作成
pub fn create_app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route(
            "/api/endpoints",
            get(endpoints::list_endpoints).post(endpoints::create_endpoint),
        )
        .route(
            "/api/endpoints/:id",
            get(endpoints::get_endpoint)
                .put(endpoints::update_endpoint)
                .delete(endpoints::delete_endpoint),
        )
        .route("/api/endpoints/:id/checks", get(endpoints::list_checks))
        .route(
            "/api/check",
            post(checks::check_endpoint).get(checks::check_all),
        )
        .route("/api/check/due", get(checks::check_due))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// GET /health - 自身の稼働確認
async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}
