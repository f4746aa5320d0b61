//! データベースアクセス層
//!
//! SQLiteベースのデータ永続化

/// データベースマイグレーション
pub mod migrations;

/// エンドポイント管理
pub mod endpoints;

/// チェック履歴管理
pub mod checks;

/// Repository traitパターン（テスタビリティ向上）
pub mod traits;

pub use traits::{CheckRepository, EndpointRepository};
