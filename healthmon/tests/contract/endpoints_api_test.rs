//! Contract Test: エンドポイント管理API
//!
//! /api/endpoints 系のステータスコードとレスポンス形式を検証する。

use crate::support::{build_app, http};
use axum::http::StatusCode;
use chrono::{Duration as ChronoDuration, Utc};
use healthmon::db::checks;
use healthmon::types::check::Check;
use serde_json::json;
use std::time::Duration;
use uuid::Uuid;

#[tokio::test]
async fn test_health_returns_ok() {
    let app = build_app().await;
    let (status, body) = http::get(&app.router(), "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_create_endpoint_returns_201_with_defaults() {
    let app = build_app().await;
    let router = app.router();

    let (status, body) = http::post(
        &router,
        "/api/endpoints",
        json!({ "name": "API", "url": "http://localhost:8080/health" }),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert!(Uuid::parse_str(body["id"].as_str().unwrap()).is_ok());
    assert_eq!(body["name"], "API");
    assert_eq!(body["url"], "http://localhost:8080/health");
    assert_eq!(body["check_interval_ms"], 60_000);
    assert_eq!(body["created_at"], body["updated_at"]);
}

#[tokio::test]
async fn test_create_endpoint_accepts_check_interval() {
    let app = build_app().await;
    let router = app.router();

    let (status, body) = http::post(
        &router,
        "/api/endpoints",
        json!({ "name": "Fast", "url": "http://localhost:1", "checkInterval": 15000 }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["check_interval_ms"], 15_000);

    // 0は未指定と同じ扱い
    let (status, body) = http::post(
        &router,
        "/api/endpoints",
        json!({ "name": "Zero", "url": "http://localhost:1", "checkInterval": 0 }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["check_interval_ms"], 60_000);
}

#[tokio::test]
async fn test_check_interval_beyond_storable_range_returns_400() {
    let app = build_app().await;
    let router = app.router();

    let (status, body) = http::post(
        &router,
        "/api/endpoints",
        json!({ "name": "Huge", "url": "http://localhost:1", "checkInterval": u64::MAX }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("checkInterval"));

    let (_, list) = http::get(&router, "/api/endpoints").await;
    assert_eq!(list.as_array().unwrap().len(), 0);

    let id = http::create_endpoint(&router, "API", "http://localhost:1").await;
    let (status, _) = http::put(
        &router,
        &format!("/api/endpoints/{id}"),
        json!({ "checkInterval": i64::MAX as u64 + 1 }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = http::put(
        &router,
        &format!("/api/endpoints/{id}"),
        json!({ "checkInterval": i64::MAX }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["check_interval_ms"], i64::MAX);

    let (_, fetched) = http::get(&router, &format!("/api/endpoints/{id}")).await;
    assert_eq!(fetched["check_interval_ms"], i64::MAX);
}

#[tokio::test]
async fn test_create_endpoint_requires_name_and_url() {
    let app = build_app().await;
    let router = app.router();

    for payload in [
        json!({ "name": "No URL" }),
        json!({ "url": "http://localhost:1" }),
        json!({ "name": "  ", "url": "http://localhost:1" }),
        json!({}),
    ] {
        let (status, body) = http::post(&router, "/api/endpoints", payload.clone()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "payload: {payload}");
        assert_eq!(body["error"], "URL and name are required");
    }

    let (_, list) = http::get(&router, "/api/endpoints").await;
    assert_eq!(list.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_list_endpoints_newest_first() {
    let app = build_app().await;
    let router = app.router();

    let first = http::create_endpoint(&router, "First", "http://localhost:1").await;
    tokio::time::sleep(Duration::from_millis(5)).await;
    let second = http::create_endpoint(&router, "Second", "http://localhost:2").await;

    let (status, body) = http::get(&router, "/api/endpoints").await;
    assert_eq!(status, StatusCode::OK);

    let ids: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec![second.as_str(), first.as_str()]);
}

#[tokio::test]
async fn test_get_endpoint_by_id() {
    let app = build_app().await;
    let router = app.router();
    let id = http::create_endpoint(&router, "API", "http://localhost:1").await;

    let (status, body) = http::get(&router, &format!("/api/endpoints/{id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], id.as_str());
    assert_eq!(body["name"], "API");
}

#[tokio::test]
async fn test_unknown_or_malformed_id_returns_404() {
    let app = build_app().await;
    let router = app.router();
    let missing = Uuid::new_v4();

    for uri in [
        format!("/api/endpoints/{missing}"),
        "/api/endpoints/not-a-uuid".to_string(),
    ] {
        let (status, body) = http::get(&router, &uri).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "uri: {uri}");
        assert_eq!(body["error"], "Endpoint not found");
    }

    let (status, _) = http::put(
        &router,
        &format!("/api/endpoints/{missing}"),
        json!({ "name": "X" }),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = http::delete(&router, &format!("/api/endpoints/{missing}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_endpoint_partial_fields() {
    let app = build_app().await;
    let router = app.router();
    let id = http::create_endpoint(&router, "API", "http://localhost:1").await;

    let (status, body) = http::put(
        &router,
        &format!("/api/endpoints/{id}"),
        json!({ "checkInterval": 30000 }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "API");
    assert_eq!(body["url"], "http://localhost:1");
    assert_eq!(body["check_interval_ms"], 30_000);

    let (status, body) = http::put(
        &router,
        &format!("/api/endpoints/{id}"),
        json!({ "name": "Renamed" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Renamed");
    assert_eq!(body["check_interval_ms"], 30_000);

    let (_, fetched) = http::get(&router, &format!("/api/endpoints/{id}")).await;
    assert_eq!(fetched["name"], "Renamed");
}

#[tokio::test]
async fn test_update_endpoint_rejects_blank_values() {
    let app = build_app().await;
    let router = app.router();
    let id = http::create_endpoint(&router, "API", "http://localhost:1").await;

    let (status, body) = http::put(
        &router,
        &format!("/api/endpoints/{id}"),
        json!({ "url": "" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "URL and name cannot be empty");

    let (status, _) = http::put(
        &router,
        &format!("/api/endpoints/{id}"),
        json!({ "checkInterval": 0 }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, fetched) = http::get(&router, &format!("/api/endpoints/{id}")).await;
    assert_eq!(fetched["url"], "http://localhost:1");
    assert_eq!(fetched["check_interval_ms"], 60_000);
}

#[tokio::test]
async fn test_delete_endpoint_removes_its_checks() {
    let app = build_app().await;
    let router = app.router();
    let id = http::create_endpoint(&router, "API", "http://localhost:1").await;
    let endpoint_id = Uuid::parse_str(&id).unwrap();

    checks::record_check(app.pool(), endpoint_id, 200, 12, None)
        .await
        .unwrap();
    checks::record_check(app.pool(), endpoint_id, 0, 3, Some("refused"))
        .await
        .unwrap();

    let (status, body) = http::delete(&router, &format!("/api/endpoints/{id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Endpoint deleted successfully");

    assert_eq!(checks::count_checks(app.pool(), endpoint_id).await.unwrap(), 0);

    let (status, _) = http::get(&router, &format!("/api/endpoints/{id}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = http::delete(&router, &format!("/api/endpoints/{id}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_list_checks_newest_first_with_limit() {
    let app = build_app().await;
    let router = app.router();
    let id = http::create_endpoint(&router, "API", "http://localhost:1").await;
    let endpoint_id = Uuid::parse_str(&id).unwrap();

    let base = Utc::now() - ChronoDuration::minutes(10);
    for i in 0..60 {
        let check = Check {
            id: 0,
            endpoint_id,
            status: 200,
            response_time_ms: i,
            timestamp: base + ChronoDuration::seconds(i as i64),
            error_message: None,
        };
        checks::insert_check(app.pool(), &check).await.unwrap();
    }

    let (status, body) = http::get(&router, &format!("/api/endpoints/{id}/checks")).await;
    assert_eq!(status, StatusCode::OK);
    let items = body.as_array().unwrap();
    assert_eq!(items.len(), 50);
    assert_eq!(items[0]["response_time_ms"], 59);
    assert_eq!(items[49]["response_time_ms"], 10);

    let (_, body) = http::get(&router, &format!("/api/endpoints/{id}/checks?limit=5")).await;
    let items = body.as_array().unwrap();
    assert_eq!(items.len(), 5);
    assert_eq!(items[0]["endpoint_id"], id.as_str());
    assert_eq!(items[4]["response_time_ms"], 55);
}

#[tokio::test]
async fn test_list_checks_unknown_endpoint_is_empty() {
    let app = build_app().await;
    let (status, body) = http::get(
        &app.router(),
        &format!("/api/endpoints/{}/checks", Uuid::new_v4()),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}
