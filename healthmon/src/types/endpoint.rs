//! エンドポイント型定義
//!
//! 監視対象となるHTTPエンドポイントの設定

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// チェック間隔のデフォルト値（ミリ秒）
pub const DEFAULT_CHECK_INTERVAL_MS: u64 = 60_000;

/// 保存可能なチェック間隔の上限（ミリ秒、SQLiteのINTEGER範囲）
pub const MAX_CHECK_INTERVAL_MS: u64 = i64::MAX as u64;

/// 監視対象エンドポイント
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Endpoint {
    /// 一意識別子
    pub id: Uuid,
    /// 表示名
    pub name: String,
    /// チェック対象URL
    pub url: String,
    /// チェック間隔（ミリ秒）
    ///
    /// 期限判定時には最小間隔で下限が補正される。
    pub check_interval_ms: u64,
    /// 登録日時
    pub created_at: DateTime<Utc>,
    /// 最終更新日時
    pub updated_at: DateTime<Utc>,
}

impl Endpoint {
    /// 新しいエンドポイントを作成（チェック間隔はデフォルト値）
    pub fn new(name: String, url: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name,
            url,
            check_interval_ms: DEFAULT_CHECK_INTERVAL_MS,
            created_at: now,
            updated_at: now,
        }
    }

    /// チェック間隔を指定
    pub fn with_interval(mut self, check_interval_ms: u64) -> Self {
        self.check_interval_ms = check_interval_ms;
        self
    }
}

/// エンドポイント部分更新
///
/// 指定されたフィールドのみを上書きする。
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EndpointUpdate {
    /// 表示名
    #[serde(default)]
    pub name: Option<String>,
    /// チェック対象URL
    #[serde(default)]
    pub url: Option<String>,
    /// チェック間隔（ミリ秒）
    #[serde(default, alias = "checkInterval", alias = "check_interval")]
    pub check_interval_ms: Option<u64>,
}

impl EndpointUpdate {
    /// 更新内容をエンドポイントに適用
    pub fn apply_to(&self, endpoint: &mut Endpoint) {
        if let Some(name) = &self.name {
            endpoint.name = name.clone();
        }
        if let Some(url) = &self.url {
            endpoint.url = url.clone();
        }
        if let Some(interval) = self.check_interval_ms {
            endpoint.check_interval_ms = interval;
        }
        endpoint.updated_at = Utc::now();
    }
}
