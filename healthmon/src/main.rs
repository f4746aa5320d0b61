//! healthmon entry point

use clap::Parser;
use healthmon::cli::{check, serve, Cli, Commands};
use healthmon::logging;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let _log_guard = match logging::init() {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Error: failed to initialize logging: {}", e);
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Some(Commands::Serve(args)) => serve::execute(&args).await,
        Some(Commands::CheckAll(args)) => check::execute_check_all(&args).await,
        Some(Commands::Due(args)) => check::execute_due(&args).await,
        // No subcommand - default to serve
        None => serve::execute(&serve::ServeArgs::default()).await,
    };

    if let Err(e) = result {
        tracing::error!("{:#}", e);
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
