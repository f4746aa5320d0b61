//! Contract Test: ヘルスチェック実行API
//!
//! POST /api/check, GET /api/check, GET /api/check/due

use crate::support::{build_app, http};
use axum::http::StatusCode;
use healthmon::db::checks;
use serde_json::json;
use uuid::Uuid;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const UNREACHABLE_URL: &str = "http://127.0.0.1:1/health";

async fn mock_upstream(status: u16) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(status))
        .mount(&server)
        .await;
    server
}

#[tokio::test]
async fn test_post_check_requires_endpoint_id() {
    let app = build_app().await;
    let router = app.router();

    for payload in [json!({}), json!({ "endpointId": "" })] {
        let (status, body) = http::post(&router, "/api/check", payload).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Endpoint ID is required");
    }
}

#[tokio::test]
async fn test_post_check_unknown_endpoint_returns_404() {
    let app = build_app().await;
    let (status, body) = http::post(
        &app.router(),
        "/api/check",
        json!({ "endpointId": Uuid::new_v4().to_string() }),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Endpoint not found");
}

#[tokio::test]
async fn test_post_check_records_healthy_result() {
    let upstream = mock_upstream(204).await;
    let app = build_app().await;
    let router = app.router();
    let id = http::create_endpoint(&router, "API", &format!("{}/health", upstream.uri())).await;

    let (status, body) = http::post(&router, "/api/check", json!({ "endpointId": id })).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["endpoint_id"], id.as_str());
    assert_eq!(body["status"], 204);
    assert!(body["id"].as_i64().unwrap() > 0);
    assert!(body["response_time_ms"].is_u64());
    assert!(body["error_message"].is_null());
    assert!(app.alerts.sent().is_empty());

    let (_, history) = http::get(&router, &format!("/api/endpoints/{id}/checks")).await;
    assert_eq!(history.as_array().unwrap().len(), 1);
    assert_eq!(history[0]["id"], body["id"]);
}

#[tokio::test]
async fn test_post_check_http_error_is_recorded_and_alerted() {
    let upstream = mock_upstream(503).await;
    let app = build_app().await;
    let router = app.router();
    let url = format!("{}/health", upstream.uri());
    let id = http::create_endpoint(&router, "Flaky", &url).await;

    let (status, body) = http::post(&router, "/api/check", json!({ "endpoint_id": id })).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], 503);
    assert!(body["error_message"].is_null());

    let sent = app.alerts.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, "ops@example.com");
    assert_eq!(sent[0].subject, "Health check failed: Flaky");
    assert!(sent[0].body.contains(&url));
    assert!(sent[0].body.contains("Status: 503"));
    assert!(sent[0].body.contains("Error: None"));
}

#[tokio::test]
async fn test_post_check_unreachable_records_status_zero() {
    let app = build_app().await;
    let router = app.router();
    let id = http::create_endpoint(&router, "Down", UNREACHABLE_URL).await;

    let (status, body) = http::post(&router, "/api/check", json!({ "endpointId": id })).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], 0);
    assert!(!body["error_message"].as_str().unwrap().is_empty());

    let sent = app.alerts.sent();
    assert_eq!(sent.len(), 1);
    assert!(sent[0].body.contains("Status: No response"));
}

#[tokio::test]
async fn test_get_check_runs_all_endpoints() {
    let healthy = mock_upstream(200).await;
    let app = build_app().await;
    let router = app.router();
    let up = http::create_endpoint(&router, "Up", &format!("{}/health", healthy.uri())).await;
    let down = http::create_endpoint(&router, "Down", UNREACHABLE_URL).await;

    let (status, body) = http::get(&router, "/api/check").await;
    assert_eq!(status, StatusCode::OK);

    let items = body.as_array().unwrap();
    assert_eq!(items.len(), 2);

    let find = |id: &str| {
        items
            .iter()
            .find(|item| item["endpoint_id"] == id)
            .unwrap()
            .clone()
    };
    let up_summary = find(&up);
    assert_eq!(up_summary["name"], "Up");
    assert_eq!(up_summary["status"], 200);
    assert_eq!(up_summary["healthy"], true);

    let down_summary = find(&down);
    assert_eq!(down_summary["url"], UNREACHABLE_URL);
    assert_eq!(down_summary["status"], 0);
    assert_eq!(down_summary["healthy"], false);
    assert!(down_summary["error_message"].is_string());

    for id in [&up, &down] {
        let endpoint_id = Uuid::parse_str(id).unwrap();
        assert_eq!(checks::count_checks(app.pool(), endpoint_id).await.unwrap(), 1);
    }
    assert_eq!(app.alerts.sent().len(), 1);
}

#[tokio::test]
async fn test_get_check_without_endpoints_is_empty() {
    let app = build_app().await;
    let (status, body) = http::get(&app.router(), "/api/check").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn test_get_check_due_reports_pass() {
    let upstream = mock_upstream(200).await;
    let app = build_app().await;
    let router = app.router();
    http::create_endpoint(&router, "API", &format!("{}/health", upstream.uri())).await;

    let (status, body) = http::get(&router, "/api/check/due").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["outcome"], "completed");
    assert_eq!(body["evaluated"], 1);
    assert_eq!(body["due"], 1);
    assert_eq!(body["checked"], 1);
    assert_eq!(body["failed"], 0);

    // 直後のパスでは期限未到来
    let (_, body) = http::get(&router, "/api/check/due").await;
    assert_eq!(body["outcome"], "completed");
    assert_eq!(body["evaluated"], 1);
    assert_eq!(body["due"], 0);
    assert_eq!(body["checked"], 0);
}
