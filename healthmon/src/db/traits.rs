//! Repository traitパターン定義
//!
//! DB操作を抽象化し、テスタビリティを向上させるためのtrait群。
//! 各traitは既存のフリー関数に対応する。

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::types::check::Check;
use crate::types::endpoint::Endpoint;

// ---------------------------------------------------------------------------
// EndpointRepository
// ---------------------------------------------------------------------------

/// エンドポイントCRUD操作のRepository trait
#[async_trait]
pub trait EndpointRepository: Send + Sync {
    /// エンドポイントを登録
    async fn create_endpoint(&self, endpoint: &Endpoint) -> Result<(), sqlx::Error>;
    /// エンドポイント一覧を取得
    async fn list_endpoints(&self) -> Result<Vec<Endpoint>, sqlx::Error>;
    /// IDでエンドポイントを取得
    async fn get_endpoint(&self, id: Uuid) -> Result<Option<Endpoint>, sqlx::Error>;
    /// エンドポイントを更新
    async fn update_endpoint(&self, endpoint: &Endpoint) -> Result<bool, sqlx::Error>;
    /// エンドポイントを削除（チェック履歴も削除）
    async fn delete_endpoint(&self, id: Uuid) -> Result<bool, sqlx::Error>;
}

// ---------------------------------------------------------------------------
// CheckRepository
// ---------------------------------------------------------------------------

/// チェック履歴操作のRepository trait
#[async_trait]
pub trait CheckRepository: Send + Sync {
    /// 現在時刻でチェック結果を記録
    async fn record_check(
        &self,
        endpoint_id: Uuid,
        status: u16,
        response_time_ms: u64,
        error_message: Option<&str>,
    ) -> Result<Check, sqlx::Error>;
    /// 最新チェックの記録時刻
    async fn most_recent_timestamp(
        &self,
        endpoint_id: Uuid,
    ) -> Result<Option<DateTime<Utc>>, sqlx::Error>;
    /// チェック履歴を新しい順に取得
    async fn list_recent(&self, endpoint_id: Uuid, limit: u32) -> Result<Vec<Check>, sqlx::Error>;
    /// 保持件数を超えた履歴を削除
    async fn prune_retention(&self, endpoint_id: Uuid, keep: u32) -> Result<u64, sqlx::Error>;
    /// 全チェック履歴を削除
    async fn delete_all(&self, endpoint_id: Uuid) -> Result<u64, sqlx::Error>;
}

// ===========================================================================
// SqlitePool implementations
// ===========================================================================

#[async_trait]
impl EndpointRepository for SqlitePool {
    async fn create_endpoint(&self, endpoint: &Endpoint) -> Result<(), sqlx::Error> {
        super::endpoints::create_endpoint(self, endpoint).await
    }

    async fn list_endpoints(&self) -> Result<Vec<Endpoint>, sqlx::Error> {
        super::endpoints::list_endpoints(self).await
    }

    async fn get_endpoint(&self, id: Uuid) -> Result<Option<Endpoint>, sqlx::Error> {
        super::endpoints::get_endpoint(self, id).await
    }

    async fn update_endpoint(&self, endpoint: &Endpoint) -> Result<bool, sqlx::Error> {
        super::endpoints::update_endpoint(self, endpoint).await
    }

    async fn delete_endpoint(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        super::endpoints::delete_endpoint(self, id).await
    }
}

#[async_trait]
impl CheckRepository for SqlitePool {
    async fn record_check(
        &self,
        endpoint_id: Uuid,
        status: u16,
        response_time_ms: u64,
        error_message: Option<&str>,
    ) -> Result<Check, sqlx::Error> {
        super::checks::record_check(self, endpoint_id, status, response_time_ms, error_message)
            .await
    }

    async fn most_recent_timestamp(
        &self,
        endpoint_id: Uuid,
    ) -> Result<Option<DateTime<Utc>>, sqlx::Error> {
        super::checks::most_recent_timestamp(self, endpoint_id).await
    }

    async fn list_recent(&self, endpoint_id: Uuid, limit: u32) -> Result<Vec<Check>, sqlx::Error> {
        super::checks::list_recent(self, endpoint_id, limit).await
    }

    async fn prune_retention(&self, endpoint_id: Uuid, keep: u32) -> Result<u64, sqlx::Error> {
        super::checks::prune_retention(self, endpoint_id, keep).await
    }

    async fn delete_all(&self, endpoint_id: Uuid) -> Result<u64, sqlx::Error> {
        super::checks::delete_all(self, endpoint_id).await
    }
}

// ===========================================================================
// Tests
// ===========================================================================
