use anyhow::Result;
use clap::Parser;
use tracing::info;

use gallery::app::cli::Args;
use gallery::app::commands;
use gallery::app::config::AppConfig;
use gallery::app::lock::StateLock;
use gallery::app::logging;

#[tokio::main]
async fn main() -> Result<()> {
    human_panic::setup_panic!();

    let args = Args::parse();
    let config = AppConfig::new(args.config_dir.clone());

    // Held until exit: no other invocation touches state.toml meanwhile.
    let _lock = StateLock::acquire(&config.get_lock_path())?;

    let (user_config, state) = config.load();

    let log_dir = config.get_log_dir();
    std::fs::create_dir_all(&log_dir)?;
    let _guard = logging::init_logger(&log_dir, &user_config.log_level)?;
    info!("gallery {} starting", env!("CARGO_PKG_VERSION"));

    commands::run(args.command, args.api_url, &config, &user_config, state).await
}
