//! Technical indicators.
//!
//! Every indicator returns a series with the same length as its input, with
//! `f64::NAN` in the positions that precede a full window:
//! - Moving averages (SMA, EMA)
//! - Momentum (RSI)
//! - Volatility (ATR)
//! - Volume (cumulative VWAP)
//!
//! The definitions follow the common dataframe conventions: EMA is seeded
//! with the first observation, RSI uses Wilder smoothing (`alpha = 1/n`),
//! ATR is seeded with the mean of the first `n` true ranges.

pub mod momentum;
pub mod moving_average;
pub mod volatility;
pub mod volume;

pub use momentum::Rsi;
pub use moving_average::{Ema, Sma};
pub use volatility::Atr;
pub use volume::Vwap;

use scalper_core::error::IndicatorError;

pub(crate) fn check_period(name: &str, period: usize) -> Result<(), IndicatorError> {
    if period == 0 {
        return Err(IndicatorError::InvalidParameter(format!(
            "{} period must be greater than 0",
            name
        )));
    }
    Ok(())
}
