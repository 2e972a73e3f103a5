//! EMA/RSI band confirmed by VWAP and a trend SMA, with ATR-sized exits.
//!
//! Each bar carries a stop at `close - stop_multiplier * ATR` and a target
//! at `close + target_multiplier * ATR`. Entry needs every confirmation;
//! exit needs any single condition.

use serde::{Deserialize, Serialize};
use scalper_core::traits::Indicator;
use scalper_core::{
    error::StrategyError,
    traits::{RuleConfig, SignalRule},
    types::{Bar, BarColumns, Signal},
};
use scalper_indicators::{Atr, Ema, Rsi, Sma, Vwap};
use tracing::debug;

use crate::invalid_window;

/// Configuration for the trend/ATR rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrendAtrConfig {
    pub ema_short: usize,
    pub ema_long: usize,
    pub rsi_window: usize,
    pub rsi_lower: f64,
    pub rsi_upper: f64,
    pub atr_window: usize,
    /// Trend filter SMA window
    pub trend_window: usize,
    /// ATR multiple below the close for the stop level
    pub stop_multiplier: f64,
    /// ATR multiple above the close for the target level
    pub target_multiplier: f64,
}

impl Default for TrendAtrConfig {
    fn default() -> Self {
        Self {
            ema_short: 7,
            ema_long: 14,
            rsi_window: 14,
            rsi_lower: 20.0,
            rsi_upper: 80.0,
            atr_window: 14,
            trend_window: 20,
            stop_multiplier: 1.2,
            target_multiplier: 2.5,
        }
    }
}

impl RuleConfig for TrendAtrConfig {
    fn validate(&self) -> Result<(), StrategyError> {
        let windows = [
            self.ema_short,
            self.ema_long,
            self.rsi_window,
            self.atr_window,
            self.trend_window,
        ];
        if windows.contains(&0) {
            return Err(StrategyError::InvalidConfig(
                "Indicator windows must be greater than 0".into(),
            ));
        }
        Ok(())
    }
}

/// Trend/ATR rule.
pub struct TrendAtrRule {
    config: TrendAtrConfig,
    fast: Ema,
    slow: Ema,
    rsi: Rsi,
    atr: Atr,
    trend: Sma,
    vwap: Vwap,
}

impl TrendAtrRule {
    pub fn new(config: TrendAtrConfig) -> Result<Self, StrategyError> {
        config.validate()?;
        Ok(Self {
            fast: Ema::new(config.ema_short).map_err(invalid_window)?,
            slow: Ema::new(config.ema_long).map_err(invalid_window)?,
            rsi: Rsi::new(config.rsi_window).map_err(invalid_window)?,
            atr: Atr::new(config.atr_window).map_err(invalid_window)?,
            trend: Sma::new(config.trend_window).map_err(invalid_window)?,
            vwap: Vwap::new(),
            config,
        })
    }
}

impl SignalRule for TrendAtrRule {
    fn name(&self) -> &str {
        "trend_atr"
    }

    fn description(&self) -> &str {
        "EMA/RSI band entries above VWAP and the trend SMA, exits on band, trend, ATR stop or target"
    }

    fn generate(&self, bars: &[Bar]) -> Vec<Signal> {
        let closes = bars.closes();
        let fast = self.fast.calculate(&closes);
        let slow = self.slow.calculate(&closes);
        let rsi = self.rsi.calculate(&closes);
        let trend = self.trend.calculate(&closes);
        let atr = self
            .atr
            .calculate_ohlc(&bars.highs(), &bars.lows(), &closes);
        let vwap = self.vwap.calculate_cv(&closes, &bars.volumes());

        let TrendAtrConfig {
            rsi_lower: lower,
            rsi_upper: upper,
            stop_multiplier,
            target_multiplier,
            ..
        } = self.config;

        let signals: Vec<Signal> = closes
            .iter()
            .enumerate()
            .map(|(i, &close)| {
                let stop = close - stop_multiplier * atr[i];
                let target = close + target_multiplier * atr[i];

                let buy = fast[i] > slow[i]
                    && rsi[i] > lower
                    && rsi[i] < upper
                    && close > vwap[i]
                    && close > trend[i];
                let sell = fast[i] < slow[i]
                    || rsi[i] > upper
                    || rsi[i] < lower
                    || close >= target
                    || close <= stop
                    || close < trend[i];
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
        [
            self.config.ema_short,
            self.config.ema_long,
            self.config.rsi_window,
            self.config.atr_window,
            self.config.trend_window,
        ]
        .into_iter()
        .max()
        .unwrap_or(0)
    }

    fn parameters(&self) -> serde_json::Value {
        serde_json::to_value(&self.config).unwrap_or_default()
    }
}
