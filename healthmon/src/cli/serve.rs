//! serve サブコマンド
//!
//! HTTPサーバーと期限ベースのスケジューラを起動します。

use crate::config::ServerConfig;
use crate::{bootstrap, server};
use clap::Args;
use tracing::info;

/// serve サブコマンドの引数
#[derive(Args, Debug, Clone, Default)]
pub struct ServeArgs {
    /// Listen port (overrides HEALTHMON_PORT)
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Bind address (overrides HEALTHMON_HOST)
    #[arg(short = 'H', long)]
    pub host: Option<String>,

    /// Database URL (overrides HEALTHMON_DATABASE_URL)
    #[arg(long)]
    pub database_url: Option<String>,
}

impl ServeArgs {
    /// 環境変数の設定に引数を上書きする
    pub fn resolve(&self) -> ServerConfig {
        let mut config = ServerConfig::from_env();
        if let Some(host) = &self.host {
            config.host = host.clone();
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(url) = &self.database_url {
            config.database_url = url.clone();
        }
        config
    }
}

/// Execute the serve command
pub async fn execute(args: &ServeArgs) -> Result<(), anyhow::Error> {
    let config = args.resolve();
    let state = bootstrap::initialize(&config.database_url).await?;

    if state.scheduler.start() {
        info!("Due-check scheduler running");
    }

    server::run(state, &config.bind_addr()).await?;
    Ok(())
}
