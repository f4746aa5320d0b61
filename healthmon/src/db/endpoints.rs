//! エンドポイントデータベース操作

use crate::types::endpoint::Endpoint;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use uuid::Uuid;

/// チェック間隔をINTEGERに変換（範囲外はエンコードエラー）
fn interval_to_db(check_interval_ms: u64) -> Result<i64, sqlx::Error> {
    i64::try_from(check_interval_ms).map_err(|e| sqlx::Error::Encode(Box::new(e)))
}

/// エンドポイントを登録
pub async fn create_endpoint(pool: &SqlitePool, endpoint: &Endpoint) -> Result<(), sqlx::Error> {
    let check_interval_ms = interval_to_db(endpoint.check_interval_ms)?;
    sqlx::query(
        r#"
        INSERT INTO endpoints (id, name, url, check_interval_ms, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(endpoint.id.to_string())
    .bind(&endpoint.name)
    .bind(&endpoint.url)
    .bind(check_interval_ms)
    .bind(endpoint.created_at.to_rfc3339())
    .bind(endpoint.updated_at.to_rfc3339())
    .execute(pool)
    .await?;

    Ok(())
}

/// エンドポイント一覧を取得（新しい順）
pub async fn list_endpoints(pool: &SqlitePool) -> Result<Vec<Endpoint>, sqlx::Error> {
    let rows = sqlx::query_as::<_, EndpointRow>(
        r#"
        SELECT id, name, url, check_interval_ms, created_at, updated_at
        FROM endpoints
        ORDER BY created_at DESC
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(|r| r.into()).collect())
}

/// IDでエンドポイントを取得
pub async fn get_endpoint(pool: &SqlitePool, id: Uuid) -> Result<Option<Endpoint>, sqlx::Error> {
    let row = sqlx::query_as::<_, EndpointRow>(
        r#"
        SELECT id, name, url, check_interval_ms, created_at, updated_at
        FROM endpoints
        WHERE id = ?
        "#,
    )
    .bind(id.to_string())
    .fetch_optional(pool)
    .await?;

    Ok(row.map(|r| r.into()))
}

/// エンドポイントを更新
pub async fn update_endpoint(pool: &SqlitePool, endpoint: &Endpoint) -> Result<bool, sqlx::Error> {
    let check_interval_ms = interval_to_db(endpoint.check_interval_ms)?;
    let result = sqlx::query(
        r#"
        UPDATE endpoints SET
            name = ?, url = ?, check_interval_ms = ?, updated_at = ?
        WHERE id = ?
        "#,
    )
    .bind(&endpoint.name)
    .bind(&endpoint.url)
    .bind(check_interval_ms)
    .bind(endpoint.updated_at.to_rfc3339())
    .bind(endpoint.id.to_string())
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// エンドポイントを削除
///
/// チェック履歴も同一トランザクションで削除する。
pub async fn delete_endpoint(pool: &SqlitePool, id: Uuid) -> Result<bool, sqlx::Error> {
    let id = id.to_string();
    let mut tx = pool.begin().await?;

    sqlx::query("DELETE FROM endpoint_checks WHERE endpoint_id = ?")
        .bind(&id)
        .execute(&mut *tx)
        .await?;

    let result = sqlx::query("DELETE FROM endpoints WHERE id = ?")
        .bind(&id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    Ok(result.rows_affected() > 0)
}

/// 登録済みエンドポイント数
pub async fn count_endpoints(pool: &SqlitePool) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar("SELECT COUNT(*) FROM endpoints")
        .fetch_one(pool)
        .await
}

// --- Internal Row Types ---

#[derive(sqlx::FromRow)]
struct EndpointRow {
    id: String,
    name: String,
    url: String,
    check_interval_ms: i64,
    created_at: String,
    updated_at: String,
}

fn parse_timestamp(value: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}

impl From<EndpointRow> for Endpoint {
    fn from(row: EndpointRow) -> Self {
        Endpoint {
            id: Uuid::parse_str(&row.id).unwrap_or_default(),
            name: row.name,
            url: row.url,
            check_interval_ms: row.check_interval_ms.max(0) as u64,
            created_at: parse_timestamp(&row.created_at),
            updated_at: parse_timestamp(&row.updated_at),
        }
    }
}
