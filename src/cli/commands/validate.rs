//! Validate configuration command.

use anyhow::Result;
use scalper_config::{AppConfig, ConfigError};
use std::path::Path;

pub async fn run(config_path: &Path, loaded: Result<AppConfig, ConfigError>) -> Result<()> {
    println!("Validating configuration: {:?}", config_path);

    match loaded {
        Ok(config) => {
            println!("Configuration is valid!");
            println!();
            println!("App: {}", config.app.name);
            println!("Environment: {}", config.app.environment);
            println!("Log level: {}", config.logging.level);
            println!(
                "Polygon key variable: {} ({})",
                config.polygon.api_key_env,
                if std::env::var(&config.polygon.api_key_env).is_ok() {
                    "set"
                } else {
                    "not set"
                }
            );
            println!(
                "Market: {} {} {} from {} to {}",
                config.market.ticker,
                config.market.multiplier,
                config.market.timespan,
                config.market.from,
                config.market.to
            );
            println!("Initial balance: ${:.2}", config.simulation.initial_balance);
            println!("Rule: {}", config.strategy.rule);
            println!();
            println!("Effective configuration:");
            println!("{}", toml::to_string_pretty(&config)?);
        }
        Err(e) => {
            println!("Configuration error: {}", e);
            return Err(e.into());
        }
    }

    Ok(())
}
