//! check-all / due サブコマンド
//!
//! サーバーを起動せずに1回だけチェックを実行し、結果をJSONで標準出力に書く。

use super::DatabaseArgs;
use crate::api::checks::CheckSummary;
use crate::bootstrap;

/// Execute the check-all command
pub async fn execute_check_all(args: &DatabaseArgs) -> Result<(), anyhow::Error> {
    let state = bootstrap::initialize(&args.resolve()).await?;
    let results = state.executor.execute_check_all().await?;

    let summaries: Vec<CheckSummary> = results.into_iter().map(CheckSummary::from).collect();
    println!("{}", serde_json::to_string_pretty(&summaries)?);
    Ok(())
}

/// Execute the due command
pub async fn execute_due(args: &DatabaseArgs) -> Result<(), anyhow::Error> {
    let state = bootstrap::initialize(&args.resolve()).await?;
    let outcome = state.scheduler.run_due_pass().await?;

    println!("{}", serde_json::to_string_pretty(&outcome)?);
    Ok(())
}
