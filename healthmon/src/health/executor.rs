//! チェック実行
//!
//! プローブ → 記録 → 保持件数で剪定 → 異常時はアラート。
//! 手動チェック・一括チェック・定期チェックはすべてここを通る。

use super::prober::Prober;
use crate::common::error::{MonitorError, MonitorResult};
use crate::db::{CheckRepository, EndpointRepository};
use crate::notify::{FailureAlert, Notifier};
use crate::types::check::CheckResult;
use crate::types::endpoint::Endpoint;
use sqlx::SqlitePool;
use std::sync::Arc;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

/// チェック実行器
#[derive(Clone)]
pub struct CheckExecutor {
    endpoints: Arc<dyn EndpointRepository>,
    checks: Arc<dyn CheckRepository>,
    prober: Prober,
    notifier: Arc<Notifier>,
    retention: u32,
}

impl CheckExecutor {
    /// リポジトリを指定して作成
    ///
    /// 保持件数は最低1件（記録直後のチェックを剪定しない）。
    pub fn new(
        endpoints: Arc<dyn EndpointRepository>,
        checks: Arc<dyn CheckRepository>,
        prober: Prober,
        notifier: Notifier,
        retention: u32,
    ) -> Self {
        Self {
            endpoints,
            checks,
            prober,
            notifier: Arc::new(notifier),
            retention: retention.max(1),
        }
    }

    /// SQLiteプールから作成
    pub fn from_pool(pool: SqlitePool, prober: Prober, notifier: Notifier, retention: u32) -> Self {
        Self::new(
            Arc::new(pool.clone()),
            Arc::new(pool),
            prober,
            notifier,
            retention,
        )
    }

    /// エンドポイントリポジトリ
    pub fn endpoints(&self) -> &Arc<dyn EndpointRepository> {
        &self.endpoints
    }

    /// チェック履歴リポジトリ
    pub fn checks(&self) -> &Arc<dyn CheckRepository> {
        &self.checks
    }

    /// 1エンドポイントをチェック
    ///
    /// 記録・剪定の失敗は操作全体の失敗になる。アラート送信の失敗は結果に影響しない。
    pub async fn execute_check(&self, endpoint: &Endpoint) -> MonitorResult<CheckResult> {
        let outcome = self.prober.probe(&endpoint.url).await;

        let check = self
            .checks
            .record_check(
                endpoint.id,
                outcome.status,
                outcome.response_time_ms,
                outcome.error_message.as_deref(),
            )
            .await?;

        let pruned = self
            .checks
            .prune_retention(endpoint.id, self.retention)
            .await?;
        if pruned > 0 {
            debug!(endpoint_id = %endpoint.id, pruned, "Pruned old checks");
        }

        let health = check.health();
        let healthy = health.is_healthy();
        if healthy {
            debug!(
                endpoint_id = %endpoint.id,
                endpoint_name = %endpoint.name,
                status = outcome.status,
                response_time_ms = outcome.response_time_ms,
                "Health check succeeded"
            );
        } else {
            warn!(
                endpoint_id = %endpoint.id,
                endpoint_name = %endpoint.name,
                status = outcome.status,
                response_time_ms = outcome.response_time_ms,
                health = %health,
                error = ?outcome.error_message,
                "Health check failed"
            );
            self.notifier
                .alert_failure(&FailureAlert {
                    endpoint_name: &endpoint.name,
                    endpoint_url: &endpoint.url,
                    status: outcome.status,
                    response_time_ms: outcome.response_time_ms,
                    error_message: outcome.error_message.as_deref(),
                })
                .await;
        }

        Ok(CheckResult {
            endpoint_id: endpoint.id,
            endpoint_name: endpoint.name.clone(),
            endpoint_url: endpoint.url.clone(),
            status: outcome.status,
            response_time_ms: outcome.response_time_ms,
            error_message: outcome.error_message,
            healthy,
            check,
        })
    }

    /// IDを指定してチェック
    pub async fn execute_check_by_id(&self, id: Uuid) -> MonitorResult<CheckResult> {
        let endpoint = self
            .endpoints
            .get_endpoint(id)
            .await?
            .ok_or(MonitorError::EndpointNotFound(id))?;
        self.execute_check(&endpoint).await
    }

    /// 全エンドポイントを並列チェック
    ///
    /// 個別の失敗はログに残して結果から除外する。結果はエンドポイント一覧の順。
    pub async fn execute_check_all(&self) -> MonitorResult<Vec<CheckResult>> {
        let endpoints = self.endpoints.list_endpoints().await?;

        if endpoints.is_empty() {
            info!("No endpoints to check");
            return Ok(Vec::new());
        }

        info!(
            count = endpoints.len(),
            "Starting parallel health check for all endpoints"
        );

        let mut handles = Vec::with_capacity(endpoints.len());
        for endpoint in endpoints {
            let executor = self.clone();
            handles.push(tokio::spawn(async move {
                let result = executor.execute_check(&endpoint).await;
                (endpoint, result)
            }));
        }

        let mut results = Vec::with_capacity(handles.len());
        let mut failure_count = 0usize;
        for handle in handles {
            match handle.await {
                Ok((_, Ok(result))) => results.push(result),
                Ok((endpoint, Err(e))) => {
                    failure_count += 1;
                    error!(
                        endpoint_id = %endpoint.id,
                        endpoint_name = %endpoint.name,
                        error = %e,
                        "Check failed during check-all"
                    );
                }
                Err(e) => {
                    failure_count += 1;
                    error!("Task join error: {}", e);
                }
            }
        }

        info!(
            checked = results.len(),
            unhealthy = results.iter().filter(|r| !r.healthy).count(),
            failure = failure_count,
            "Parallel health check completed"
        );

        Ok(results)
    }
}
