//! 期限ベースの定期チェックスケジューラ
//!
//! 一定間隔のティックごとに全エンドポイントを走査し、前回チェックから
//! 実効間隔以上経過したものだけを実行する。パスは重ならない。

use super::executor::CheckExecutor;
use crate::common::error::MonitorResult;
use crate::config::MonitorConfig;
use crate::shutdown::ShutdownController;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, error, info};

/// 1パスの集計
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PassReport {
    /// 走査したエンドポイント数
    pub evaluated: usize,
    /// 期限到来と判定した数
    pub due: usize,
    /// チェックを実行して記録できた数
    pub checked: usize,
    /// 失敗した数（履歴取得・記録の失敗）
    pub failed: usize,
}

/// パスの結果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum PassOutcome {
    /// 別のパスが実行中のためスキップ
    Skipped,
    /// 実行完了
    Completed(PassReport),
}

/// 実効チェック間隔（最小間隔で下限補正）
pub fn effective_interval_ms(check_interval_ms: u64, min_check_interval_ms: u64) -> u64 {
    check_interval_ms.max(min_check_interval_ms)
}

/// 期限到来判定
///
/// 一度もチェックされていない場合はエポック0を基準にするため常に期限到来。
pub fn is_due(now: DateTime<Utc>, last: Option<DateTime<Utc>>, effective_interval_ms: u64) -> bool {
    let last_ms = last.map(|t| t.timestamp_millis()).unwrap_or(0);
    let elapsed = i128::from(now.timestamp_millis()) - i128::from(last_ms);
    elapsed >= i128::from(effective_interval_ms)
}

#[derive(Debug, Default)]
struct SchedulerState {
    started: AtomicBool,
    running: AtomicBool,
}

/// 実行中フラグのスコープガード（エラー・パニック時も解放）
struct RunningGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> RunningGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self { flag })
    }
}

impl Drop for RunningGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

/// 期限ベースのスケジューラ
///
/// アプリケーション状態が所有し、起動は1回だけ。停止はシャットダウンコントローラ経由。
#[derive(Clone)]
pub struct DueCheckScheduler {
    executor: CheckExecutor,
    tick_interval: Duration,
    min_check_interval_ms: u64,
    shutdown: ShutdownController,
    state: Arc<SchedulerState>,
}

impl DueCheckScheduler {
    /// 新しいスケジューラを作成（未起動）
    pub fn new(executor: CheckExecutor, config: &MonitorConfig, shutdown: ShutdownController) -> Self {
        Self {
            executor,
            tick_interval: config.tick_interval,
            min_check_interval_ms: config.min_check_interval_ms,
            shutdown,
            state: Arc::new(SchedulerState::default()),
        }
    }

    /// 起動済みか
    pub fn is_started(&self) -> bool {
        self.state.started.load(Ordering::Acquire)
    }

    /// パス実行中か
    pub fn is_running(&self) -> bool {
        self.state.running.load(Ordering::Acquire)
    }

    /// バックグラウンドでティックループを開始
    ///
    /// 既に起動済みなら何もせず`false`を返す。
    pub fn start(&self) -> bool {
        if self
            .state
            .started
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            debug!("Due-check scheduler already started");
            return false;
        }

        let scheduler = self.clone();
        tokio::spawn(async move {
            scheduler.tick_loop().await;
        });
        true
    }

    async fn tick_loop(self) {
        let mut timer = interval(self.tick_interval);
        timer.set_missed_tick_behavior(MissedTickBehavior::Skip);

        info!(
            tick_interval_ms = self.tick_interval.as_millis() as u64,
            min_check_interval_ms = self.min_check_interval_ms,
            "Due-check scheduler started"
        );

        loop {
            tokio::select! {
                // 最初のティックは即時に発火する
                _ = timer.tick() => {
                    // 遅いパスでタイマーを止めないよう別タスクで実行
                    let scheduler = self.clone();
                    tokio::spawn(async move {
                        if let Err(e) = scheduler.run_due_pass().await {
                            error!(error = %e, "Scheduled due-check pass failed");
                        }
                    });
                }
                _ = self.shutdown.wait() => {
                    info!("Due-check scheduler stopped");
                    break;
                }
            }
        }
    }

    /// 期限到来したエンドポイントをチェック
    ///
    /// 実行中のパスがあればスキップする。エンドポイントは順番に処理し、
    /// 個別の失敗はログに残してパスを継続する。
    pub async fn run_due_pass(&self) -> MonitorResult<PassOutcome> {
        let Some(_guard) = RunningGuard::acquire(&self.state.running) else {
            debug!("Due-check pass already in progress; skipping");
            return Ok(PassOutcome::Skipped);
        };

        let now = Utc::now();
        let endpoints = self.executor.endpoints().list_endpoints().await?;
        let mut report = PassReport {
            evaluated: endpoints.len(),
            ..PassReport::default()
        };

        for endpoint in &endpoints {
            let effective = effective_interval_ms(endpoint.check_interval_ms, self.min_check_interval_ms);
            let last = match self
                .executor
                .checks()
                .most_recent_timestamp(endpoint.id)
                .await
            {
                Ok(last) => last,
                Err(e) => {
                    report.failed += 1;
                    error!(
                        endpoint_id = %endpoint.id,
                        error = %e,
                        "Failed to read last check time"
                    );
                    continue;
                }
            };

            if !is_due(now, last, effective) {
                continue;
            }
            report.due += 1;

            match self.executor.execute_check(endpoint).await {
                Ok(_) => report.checked += 1,
                Err(e) => {
                    report.failed += 1;
                    error!(
                        endpoint_id = %endpoint.id,
                        endpoint_name = %endpoint.name,
                        error = %e,
                        "Scheduled check failed"
                    );
                }
            }
        }

        if report.due > 0 || report.failed > 0 {
            info!(
                evaluated = report.evaluated,
                due = report.due,
                checked = report.checked,
                failed = report.failed,
                "Due-check pass completed"
            );
        } else {
            debug!(evaluated = report.evaluated, "Due-check pass completed; nothing due");
        }

        Ok(PassOutcome::Completed(report))
    }
}
