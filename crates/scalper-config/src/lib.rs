//! Configuration management.

mod settings;

pub use settings::{
    AppConfig, AppSettings, LoggingConfig, MarketSettings, PolygonSettings, SimulationSettings,
    StrategySettings, SweepConfig,
};

pub use config::ConfigError;

use config::{Config, Environment, File};
use std::path::Path;

/// Environment variable prefix, e.g. `SCALPER__MARKET__TICKER=AAPL`.
pub const ENV_PREFIX: &str = "SCALPER";

/// Load configuration from file and environment.
pub fn load_config(path: &Path) -> Result<AppConfig, ConfigError> {
    let config = Config::builder()
        .add_source(File::from(path).required(true))
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    let config: AppConfig = config.try_deserialize()?;
    config.validate()?;
    Ok(config)
}
