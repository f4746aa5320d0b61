//! Integration Test: 監視フロー
//!
//! 登録 → 定期チェック → 履歴保持 → アラート → 停止 の一連の流れ

use crate::support::{build_app_with, test_monitor_config, TestApp};
use chrono::{Duration as ChronoDuration, Utc};
use healthmon::config::MonitorConfig;
use healthmon::db::{checks, endpoints};
use healthmon::health::{PassOutcome, PassReport};
use healthmon::types::check::Check;
use healthmon::types::endpoint::Endpoint;
use std::time::Duration;
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn register(app: &TestApp, name: &str, url: &str, interval_ms: u64) -> Endpoint {
    let endpoint = Endpoint::new(name.to_string(), url.to_string()).with_interval(interval_ms);
    endpoints::create_endpoint(app.pool(), &endpoint)
        .await
        .expect("create endpoint");
    endpoint
}

async fn upstream(status: u16) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(status))
        .mount(&server)
        .await;
    server
}

#[tokio::test]
async fn test_due_pass_respects_interval_and_floor() {
    let server = upstream(200).await;
    let app = build_app_with(test_monitor_config()).await;

    // 1秒指定でも最小間隔(10秒)で下限補正される
    let fast = register(&app, "Fast", &server.uri(), 1_000).await;
    let slow = register(&app, "Slow", &server.uri(), 3_600_000).await;

    // Slowは5分前にチェック済み
    checks::insert_check(
        app.pool(),
        &Check {
            id: 0,
            endpoint_id: slow.id,
            status: 200,
            response_time_ms: 5,
            timestamp: Utc::now() - ChronoDuration::minutes(5),
            error_message: None,
        },
    )
    .await
    .unwrap();

    let first = app.state.scheduler.run_due_pass().await.unwrap();
    assert_eq!(
        first,
        PassOutcome::Completed(PassReport {
            evaluated: 2,
            due: 1,
            checked: 1,
            failed: 0,
        })
    );
    assert_eq!(checks::count_checks(app.pool(), fast.id).await.unwrap(), 1);
    assert_eq!(checks::count_checks(app.pool(), slow.id).await.unwrap(), 1);

    let second = app.state.scheduler.run_due_pass().await.unwrap();
    assert_eq!(
        second,
        PassOutcome::Completed(PassReport {
            evaluated: 2,
            due: 0,
            checked: 0,
            failed: 0,
        })
    );
}

#[tokio::test]
async fn test_retention_keeps_newest_checks() {
    let server = upstream(200).await;
    let config = MonitorConfig {
        retention: 3,
        ..test_monitor_config()
    };
    let app = build_app_with(config).await;
    let endpoint = register(&app, "API", &server.uri(), 60_000).await;

    let base = Utc::now() - ChronoDuration::hours(1);
    for i in 0..5 {
        checks::insert_check(
            app.pool(),
            &Check {
                id: 0,
                endpoint_id: endpoint.id,
                status: 200,
                response_time_ms: i,
                timestamp: base + ChronoDuration::minutes(i as i64),
                error_message: None,
            },
        )
        .await
        .unwrap();
    }

    let result = app.state.executor.execute_check(&endpoint).await.unwrap();

    let history = checks::list_recent(app.pool(), endpoint.id, 10).await.unwrap();
    assert_eq!(history.len(), 3);
    assert_eq!(history[0].id, result.check.id);
    assert_eq!(history[1].response_time_ms, 4);
    assert_eq!(history[2].response_time_ms, 3);
}

#[tokio::test]
async fn test_failed_scheduled_check_sends_alert() {
    let server = upstream(500).await;
    let app = build_app_with(test_monitor_config()).await;
    register(&app, "Broken", &server.uri(), 60_000).await;

    let outcome = app.state.scheduler.run_due_pass().await.unwrap();
    assert!(matches!(outcome, PassOutcome::Completed(report) if report.checked == 1));

    let sent = app.alerts.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].subject, "Health check failed: Broken");
    assert!(sent[0].body.contains("Status: 500"));
}

#[tokio::test]
async fn test_started_scheduler_checks_and_stops_on_shutdown() {
    let server = upstream(200).await;
    let config = MonitorConfig {
        tick_interval: Duration::from_millis(50),
        ..test_monitor_config()
    };
    let app = build_app_with(config).await;
    let endpoint = register(&app, "API", &server.uri(), 60_000).await;

    assert!(app.state.scheduler.start());
    assert!(!app.state.scheduler.start());

    // 初回ティックは即時に発火する
    let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
    loop {
        if checks::count_checks(app.pool(), endpoint.id).await.unwrap() > 0 {
            break;
        }
        assert!(tokio::time::Instant::now() < deadline, "scheduler never ran");
        tokio::time::sleep(Duration::from_millis(20)).await;
    }

    app.state.shutdown.request_shutdown();
    tokio::time::sleep(Duration::from_millis(100)).await;

    // 停止後は新しく登録しても定期チェックされない
    let late = register(&app, "Late", &server.uri(), 60_000).await;
    tokio::time::sleep(Duration::from_millis(300)).await;
    assert_eq!(checks::count_checks(app.pool(), late.id).await.unwrap(), 0);
    assert_eq!(checks::count_checks(app.pool(), endpoint.id).await.unwrap(), 1);
}
