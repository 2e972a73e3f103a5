//! Simple Moving Average crossover rule.
//!
//! Holds a buy flag while the short SMA is above the long SMA and a sell flag
//! otherwise. Only the relative position matters, not the crossing bar.

use serde::{Deserialize, Serialize};
use scalper_core::traits::Indicator;
use scalper_core::{
    error::StrategyError,
    traits::{RuleConfig, SignalRule},
    types::{Bar, BarColumns, Signal},
};
use scalper_indicators::Sma;
use tracing::debug;

use crate::invalid_window;

/// Configuration for the SMA crossover rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SmaCrossoverConfig {
    /// Short moving average window
    pub short_window: usize,
    /// Long moving average window
    pub long_window: usize,
}

impl Default for SmaCrossoverConfig {
    fn default() -> Self {
        Self {
            short_window: 50,
            long_window: 200,
        }
    }
}

impl RuleConfig for SmaCrossoverConfig {
    fn validate(&self) -> Result<(), StrategyError> {
        if self.short_window == 0 || self.long_window == 0 {
            return Err(StrategyError::InvalidConfig(
                "SMA windows must be greater than 0".into(),
            ));
        }
        Ok(())
    }
}

/// SMA crossover rule.
pub struct SmaCrossoverRule {
    config: SmaCrossoverConfig,
    short: Sma,
    long: Sma,
}

impl SmaCrossoverRule {
    pub fn new(config: SmaCrossoverConfig) -> Result<Self, StrategyError> {
        config.validate()?;
        let short = Sma::new(config.short_window).map_err(invalid_window)?;
        let long = Sma::new(config.long_window).map_err(invalid_window)?;
        Ok(Self {
            config,
            short,
            long,
        })
    }
}

impl SignalRule for SmaCrossoverRule {
    fn name(&self) -> &str {
        "ma_crossover"
    }

    fn description(&self) -> &str {
        "Buys while the short SMA is above the long SMA, sells otherwise"
    }

    fn generate(&self, bars: &[Bar]) -> Vec<Signal> {
        let closes = bars.closes();
        let short = self.short.calculate(&closes);
        let long = self.long.calculate(&closes);

        let signals: Vec<Signal> = short
            .iter()
            .zip(&long)
            .map(|(&s, &l)| Signal::new(s > l, s <= l))
            .collect();

        debug!(
            rule = self.name(),
            bars = bars.len(),
            buys = signals.iter().filter(|s| s.buy).count(),
            sells = signals.iter().filter(|s| s.sell).count(),
            "Generated signals"
        );

        signals
    }

    fn warmup_period(&self) -> usize {
        self.config.short_window.max(self.config.long_window)
    }

    fn parameters(&self) -> serde_json::Value {
        serde_json::json!({
            "short_window": self.config.short_window,
            "long_window": self.config.long_window,
        })
    }
}
