// src/main.rs
use clap::Parser;
use court_standings::cli::{Args, is_config_operation};
use court_standings::commands::{
    handle_config_update_command, handle_list_config_command, handle_list_seasons_command,
    handle_standings_command,
};
use court_standings::config::Config;
use court_standings::error::AppError;
use court_standings::logging::setup_logging;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    let args = Args::parse();

    let (log_file_path, _guard) = setup_logging(&args).await?;
    tracing::info!("Logs are being written to: {log_file_path}");

    if args.list_seasons {
        handle_list_seasons_command();
        return Ok(());
    }

    if is_config_operation(&args) {
        if args.list_config {
            return handle_list_config_command().await;
        }
        return handle_config_update_command(&args).await;
    }

    let config = Config::load().await?;
    handle_standings_command(&args, &config).await
}
