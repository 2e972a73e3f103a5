//! Configuration structures.

use chrono::NaiveDate;
use config::ConfigError;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use scalper_core::traits::BarRequest;
use scalper_core::types::Timespan;

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub app: AppSettings,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub polygon: PolygonSettings,
    #[serde(default)]
    pub market: MarketSettings,
    #[serde(default)]
    pub simulation: SimulationSettings,
    #[serde(default)]
    pub strategy: StrategySettings,
    #[serde(default)]
    pub sweep: SweepConfig,
}

impl AppConfig {
    /// Reject settings no run could use.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.market.ticker.trim().is_empty() {
            return Err(ConfigError::Message("market.ticker must not be empty".into()));
        }
        if self.market.multiplier == 0 {
            return Err(ConfigError::Message(
                "market.multiplier must be greater than 0".into(),
            ));
        }
        if self.market.from > self.market.to {
            return Err(ConfigError::Message(format!(
                "market.from ({}) is after market.to ({})",
                self.market.from, self.market.to
            )));
        }
        if self.simulation.initial_balance < Decimal::ZERO {
            return Err(ConfigError::Message(format!(
                "simulation.initial_balance must not be negative, got {}",
                self.simulation.initial_balance
            )));
        }
        if self.sweep.threads == Some(0) {
            return Err(ConfigError::Message(
                "sweep.threads must be greater than 0 when set".into(),
            ));
        }
        Ok(())
    }
}

/// General app settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppSettings {
    pub name: String,
    pub environment: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            name: "scalper".to_string(),
            environment: "development".to_string(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    /// `pretty` or `json`
    pub format: String,
    /// Optional log file, written in addition to stdout
    pub file: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
            file: None,
        }
    }
}

impl LoggingConfig {
    pub fn is_json(&self) -> bool {
        self.format.eq_ignore_ascii_case("json")
    }
}

/// Polygon.io API configuration. The key itself is read from the
/// environment variable named by `api_key_env`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolygonSettings {
    pub api_key_env: String,
    pub rest_url: String,
    pub ws_url: String,
    pub adjusted: bool,
    pub limit: u32,
}

impl Default for PolygonSettings {
    fn default() -> Self {
        Self {
            api_key_env: "POLYGON_API_KEY".to_string(),
            rest_url: "https://api.polygon.io".to_string(),
            ws_url: "wss://socket.polygon.io/stocks".to_string(),
            adjusted: true,
            limit: 50_000,
        }
    }
}

/// Instrument and bar range.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketSettings {
    pub ticker: String,
    pub multiplier: u32,
    pub timespan: Timespan,
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl Default for MarketSettings {
    fn default() -> Self {
        Self {
            ticker: "TSLA".to_string(),
            multiplier: 1,
            timespan: Timespan::Minute,
            from: NaiveDate::from_ymd_opt(2024, 12, 1).unwrap_or_default(),
            to: NaiveDate::from_ymd_opt(2024, 12, 27).unwrap_or_default(),
        }
    }
}

impl MarketSettings {
    pub fn bar_request(&self) -> BarRequest {
        BarRequest {
            ticker: self.ticker.clone(),
            multiplier: self.multiplier,
            timespan: self.timespan,
            from: self.from,
            to: self.to,
        }
    }
}

/// Simulation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationSettings {
    pub initial_balance: Decimal,
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            initial_balance: dec!(100000),
        }
    }
}

/// Signal rule selection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrategySettings {
    /// Registry key of the rule
    pub rule: String,
    /// Rule parameters; missing keys take the rule's defaults
    #[serde(default)]
    pub params: toml::Table,
}

impl Default for StrategySettings {
    fn default() -> Self {
        Self {
            rule: "ema_rsi".to_string(),
            params: toml::Table::new(),
        }
    }
}

impl StrategySettings {
    /// Parameters as JSON, the form the rule registry accepts.
    pub fn params_json(&self) -> serde_json::Value {
        serde_json::to_value(&self.params).unwrap_or_default()
    }
}

/// Parameter sweep grid and execution settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepConfig {
    pub ema_short: Vec<usize>,
    pub ema_long: Vec<usize>,
    pub rsi_lower: Vec<f64>,
    pub rsi_upper: Vec<f64>,
    pub rsi_window: usize,
    /// Worker threads; all cores when unset
    pub threads: Option<usize>,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            ema_short: vec![5, 9],
            ema_long: vec![20, 21],
            rsi_lower: vec![30.0, 40.0],
            rsi_upper: vec![60.0, 70.0],
            rsi_window: 14,
            threads: None,
        }
    }
}
