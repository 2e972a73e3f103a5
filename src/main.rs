//! Paper trading toolkit CLI application.

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use scalper_config::load_config;
use scalper_monitor::setup_logging;
use std::path::Path;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let loaded = load_config(&cli.config);

    // CLI flags win over the [logging] section
    let logging = loaded
        .as_ref()
        .map(|c| c.logging.clone())
        .unwrap_or_default();
    let level = cli
        .log_level
        .map(|l| l.as_str().to_string())
        .unwrap_or(logging.level.clone());
    let json = cli.json_logs || logging.is_json();
    let _guard = setup_logging(&level, json, logging.file.as_deref().map(Path::new));

    if let Commands::ValidateConfig = cli.command {
        return cli::commands::validate::run(&cli.config, loaded).await;
    }

    let config = loaded.with_context(|| {
        format!("Failed to load configuration from {}", cli.config.display())
    })?;

    match cli.command {
        Commands::Backtest(args) => cli::commands::backtest::run(args, &config).await,
        Commands::Optimize(args) => cli::commands::optimize::run(args, &config).await,
        Commands::Stream(args) => cli::commands::stream::run(args, &config).await,
        Commands::Rules => cli::commands::rules::run(&config).await,
        Commands::ValidateConfig => Ok(()),
    }
}
