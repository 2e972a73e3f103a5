//! Signal rule implementations.
//!
//! This crate provides the rule sets that turn a bar table into per-bar
//! buy/sell flags:
//! - SMA crossover
//! - EMA crossover inside an RSI band
//! - EMA/RSI band confirmed by VWAP and a trend SMA, with ATR stop/target exits

mod ema_rsi;
mod ma_crossover;
mod registry;
mod trend_atr;

pub use ema_rsi::{EmaRsiConfig, EmaRsiRule};
pub use ma_crossover::{SmaCrossoverConfig, SmaCrossoverRule};
pub use registry::{RuleInfo, RuleRegistry};
pub use trend_atr::{TrendAtrConfig, TrendAtrRule};

use scalper_core::error::{IndicatorError, StrategyError};

pub(crate) fn invalid_window(err: IndicatorError) -> StrategyError {
    StrategyError::InvalidConfig(err.to_string())
}

#[cfg(test)]
pub(crate) mod test_support {
    use scalper_core::types::Bar;

    /// Minute bars with flat high/low spread and constant volume.
    pub fn bars_from_closes(closes: &[f64]) -> Vec<Bar> {
        closes
            .iter()
            .enumerate()
            .map(|(i, &close)| {
                Bar::new(
                    1_733_149_800_000 + i as i64 * 60_000,
                    close,
                    close + 0.5,
                    close - 0.5,
                    close,
                    1_000.0,
                )
            })
            .collect()
    }
}
