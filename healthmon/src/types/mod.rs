//! 型定義モジュール
//!
//! ドメインエンティティの型定義を提供

/// エンドポイント関連の型定義
pub mod endpoint;

/// ヘルスチェック結果の型定義
pub mod check;

pub use check::{is_healthy, Check, CheckHealth, CheckResult, STATUS_UNREACHABLE};
pub use endpoint::{Endpoint, EndpointUpdate, DEFAULT_CHECK_INTERVAL_MS, MAX_CHECK_INTERVAL_MS};
