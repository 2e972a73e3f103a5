//! EMA crossover inside an RSI band.
//!
//! Entry needs every condition (fast EMA above slow EMA and RSI strictly
//! inside the band). Exit needs any one of them to fail.

use serde::{Deserialize, Serialize};
use scalper_core::traits::Indicator;
use scalper_core::{
    error::StrategyError,
    traits::{RuleConfig, SignalRule},
    types::{Bar, BarColumns, Signal},
};
use scalper_indicators::{Ema, Rsi};
use tracing::debug;

use crate::invalid_window;

/// Configuration for the EMA/RSI band rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmaRsiConfig {
    /// Fast EMA window
    pub ema_short: usize,
    /// Slow EMA window
    pub ema_long: usize,
    /// RSI window
    pub rsi_window: usize,
    /// Lower RSI bound (exclusive)
    pub rsi_lower: f64,
    /// Upper RSI bound (exclusive)
    pub rsi_upper: f64,
}

impl Default for EmaRsiConfig {
    fn default() -> Self {
        Self {
            ema_short: 9,
            ema_long: 21,
            rsi_window: 14,
            rsi_lower: 30.0,
            rsi_upper: 70.0,
        }
    }
}

impl RuleConfig for EmaRsiConfig {
    fn validate(&self) -> Result<(), StrategyError> {
        if self.ema_short == 0 || self.ema_long == 0 || self.rsi_window == 0 {
            return Err(StrategyError::InvalidConfig(
                "EMA and RSI windows must be greater than 0".into(),
            ));
        }
        Ok(())
    }
}

/// EMA/RSI band rule.
pub struct EmaRsiRule {
    config: EmaRsiConfig,
    fast: Ema,
    slow: Ema,
    rsi: Rsi,
}

impl EmaRsiRule {
    pub fn new(config: EmaRsiConfig) -> Result<Self, StrategyError> {
        config.validate()?;
        Ok(Self {
            fast: Ema::new(config.ema_short).map_err(invalid_window)?,
            slow: Ema::new(config.ema_long).map_err(invalid_window)?,
            rsi: Rsi::new(config.rsi_window).map_err(invalid_window)?,
            config,
        })
    }
}

impl SignalRule for EmaRsiRule {
    fn name(&self) -> &str {
        "ema_rsi"
    }

    fn description(&self) -> &str {
        "Buys on a fast/slow EMA uptrend with RSI inside the band, sells when either fails"
    }

    fn generate(&self, bars: &[Bar]) -> Vec<Signal> {
        let closes = bars.closes();
        let fast = self.fast.calculate(&closes);
        let slow = self.slow.calculate(&closes);
        let rsi = self.rsi.calculate(&closes);
        let (lower, upper) = (self.config.rsi_lower, self.config.rsi_upper);

        let signals: Vec<Signal> = (0..bars.len())
            .map(|i| {
                let buy = fast[i] > slow[i] && rsi[i] > lower && rsi[i] < upper;
                let sell = fast[i] < slow[i] || rsi[i] > upper || rsi[i] < lower;
                Signal::new(buy, sell)
            })
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
        self.config
            .ema_short
            .max(self.config.ema_long)
            .max(self.config.rsi_window)
    }

    fn parameters(&self) -> serde_json::Value {
        serde_json::to_value(&self.config).unwrap_or_default()
    }
}
