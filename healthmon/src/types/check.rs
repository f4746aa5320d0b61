//! ヘルスチェック結果の型定義

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 到達不能（ステータス未受信）を表すステータスコード
pub const STATUS_UNREACHABLE: u16 = 0;

/// ステータスコードが正常（2xx）か判定
pub fn is_healthy(status: u16) -> bool {
    (200..300).contains(&status)
}

/// ステータスコードによる判定結果
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CheckHealth {
    /// 2xx応答
    Healthy,
    /// 2xx以外のHTTP応答
    HttpError,
    /// 応答なし（タイムアウト、DNS、接続拒否など）
    Unreachable,
}

impl CheckHealth {
    /// ステータスコードから判定
    pub fn from_status(status: u16) -> Self {
        if status == STATUS_UNREACHABLE {
            Self::Unreachable
        } else if is_healthy(status) {
            Self::Healthy
        } else {
            Self::HttpError
        }
    }

    /// 正常か
    pub fn is_healthy(&self) -> bool {
        matches!(self, Self::Healthy)
    }

    /// 文字列表現
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Healthy => "healthy",
            Self::HttpError => "http_error",
            Self::Unreachable => "unreachable",
        }
    }
}

impl std::fmt::Display for CheckHealth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// 永続化されたヘルスチェック記録（作成後は不変）
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Check {
    /// 自動インクリメントID（未保存時は0）
    pub id: i64,
    /// エンドポイントID
    pub endpoint_id: Uuid,
    /// HTTPステータスコード（0 = 到達不能）
    pub status: u16,
    /// 応答時間（ミリ秒）
    pub response_time_ms: u64,
    /// 記録時刻
    pub timestamp: DateTime<Utc>,
    /// エラーメッセージ（ステータス未受信時のみ）
    pub error_message: Option<String>,
}

impl Check {
    /// 判定結果
    pub fn health(&self) -> CheckHealth {
        CheckHealth::from_status(self.status)
    }
}

/// 1回のヘルスチェック実行結果
///
/// 手動チェック・一括チェック・定期チェックで共通の形。
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CheckResult {
    /// エンドポイントID
    pub endpoint_id: Uuid,
    /// エンドポイント表示名
    pub endpoint_name: String,
    /// エンドポイントURL
    pub endpoint_url: String,
    /// HTTPステータスコード（0 = 到達不能）
    pub status: u16,
    /// 応答時間（ミリ秒）
    pub response_time_ms: u64,
    /// エラーメッセージ
    pub error_message: Option<String>,
    /// 正常判定
    pub healthy: bool,
    /// 保存されたチェック記録
    pub check: Check,
}
