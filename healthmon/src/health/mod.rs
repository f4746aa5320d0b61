//! ヘルスチェック監視
//!
//! - [`prober`]: 1回のHTTP GETで到達性を判定
//! - [`executor`]: プローブ結果を記録し、剪定し、異常時に通知
//! - [`scheduler`]: 期限到来したエンドポイントを定期的にチェック

pub mod executor;
pub mod prober;
pub mod scheduler;

pub use executor::CheckExecutor;
pub use prober::{ProbeOutcome, Prober};
pub use scheduler::{DueCheckScheduler, PassOutcome, PassReport};
