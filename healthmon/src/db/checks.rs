//! ヘルスチェック履歴のデータベース操作
//!
//! 記録時刻はエポックミリ秒（INTEGER）で保存し、数値順で並べる。
//! 同一時刻の記録はIDの降順で新しいものとみなす。

use crate::types::check::Check;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use uuid::Uuid;

/// エンドポイントごとに保持するチェック履歴のデフォルト件数
pub const DEFAULT_RETENTION: u32 = 100;

/// 現在時刻でチェック結果を記録
pub async fn record_check(
    pool: &SqlitePool,
    endpoint_id: Uuid,
    status: u16,
    response_time_ms: u64,
    error_message: Option<&str>,
) -> Result<Check, sqlx::Error> {
    let now = Utc::now();
    // 保存精度（ミリ秒）に揃えて返却値とDBの値を一致させる
    let timestamp = DateTime::from_timestamp_millis(now.timestamp_millis()).unwrap_or(now);

    let mut check = Check {
        id: 0,
        endpoint_id,
        status,
        response_time_ms,
        timestamp,
        error_message: error_message.map(str::to_string),
    };
    check.id = insert_check(pool, &check).await?;
    Ok(check)
}

/// 記録時刻を指定してチェック結果を保存
pub async fn insert_check(pool: &SqlitePool, check: &Check) -> Result<i64, sqlx::Error> {
    let result = sqlx::query(
        r#"
        INSERT INTO endpoint_checks (
            endpoint_id, status, response_time_ms, checked_at_ms, error_message
        ) VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(check.endpoint_id.to_string())
    .bind(check.status as i64)
    .bind(check.response_time_ms as i64)
    .bind(check.timestamp.timestamp_millis())
    .bind(&check.error_message)
    .execute(pool)
    .await?;

    Ok(result.last_insert_rowid())
}

/// 最新チェックの記録時刻を取得
pub async fn most_recent_timestamp(
    pool: &SqlitePool,
    endpoint_id: Uuid,
) -> Result<Option<DateTime<Utc>>, sqlx::Error> {
    let millis: Option<i64> =
        sqlx::query_scalar("SELECT MAX(checked_at_ms) FROM endpoint_checks WHERE endpoint_id = ?")
            .bind(endpoint_id.to_string())
            .fetch_one(pool)
            .await?;

    Ok(millis.and_then(DateTime::from_timestamp_millis))
}

/// チェック履歴を新しい順に取得
pub async fn list_recent(
    pool: &SqlitePool,
    endpoint_id: Uuid,
    limit: u32,
) -> Result<Vec<Check>, sqlx::Error> {
    let rows = sqlx::query_as::<_, CheckRow>(
        r#"
        SELECT id, endpoint_id, status, response_time_ms, checked_at_ms, error_message
        FROM endpoint_checks
        WHERE endpoint_id = ?
        ORDER BY checked_at_ms DESC, id DESC
        LIMIT ?
        "#,
    )
    .bind(endpoint_id.to_string())
    .bind(limit as i64)
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(|r| r.into()).collect())
}

/// 保持件数を超えた古いチェック履歴を削除
///
/// 新しい順に`keep`件をスキップした残りのID集合を削除対象とする。
/// 連続で呼んでも2回目は何も削除しない。並行実行で削除対象が重なっても、
/// 削除済みIDの再削除は無視されるだけで結果は変わらない。
pub async fn prune_retention(
    pool: &SqlitePool,
    endpoint_id: Uuid,
    keep: u32,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        r#"
        DELETE FROM endpoint_checks
        WHERE id IN (
            SELECT id FROM endpoint_checks
            WHERE endpoint_id = ?
            ORDER BY checked_at_ms DESC, id DESC
            LIMIT -1 OFFSET ?
        )
        "#,
    )
    .bind(endpoint_id.to_string())
    .bind(keep as i64)
    .execute(pool)
    .await?;

    Ok(result.rows_affected())
}

/// エンドポイントの全チェック履歴を削除
pub async fn delete_all(pool: &SqlitePool, endpoint_id: Uuid) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM endpoint_checks WHERE endpoint_id = ?")
        .bind(endpoint_id.to_string())
        .execute(pool)
        .await?;

    Ok(result.rows_affected())
}

/// エンドポイントのチェック履歴件数
pub async fn count_checks(pool: &SqlitePool, endpoint_id: Uuid) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar("SELECT COUNT(*) FROM endpoint_checks WHERE endpoint_id = ?")
        .bind(endpoint_id.to_string())
        .fetch_one(pool)
        .await
}

// --- Internal Row Types ---

#[derive(sqlx::FromRow)]
struct CheckRow {
    id: i64,
    endpoint_id: String,
    status: i64,
    response_time_ms: i64,
    checked_at_ms: i64,
    error_message: Option<String>,
}

impl From<CheckRow> for Check {
    fn from(row: CheckRow) -> Self {
        Check {
            id: row.id,
            endpoint_id: Uuid::parse_str(&row.endpoint_id).unwrap_or_default(),
            status: u16::try_from(row.status).unwrap_or(0),
            response_time_ms: row.response_time_ms.max(0) as u64,
            timestamp: DateTime::from_timestamp_millis(row.checked_at_ms).unwrap_or_default(),
            error_message: row.error_message,
        }
    }
}
