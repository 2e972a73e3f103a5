//! Volatility indicators.

use scalper_core::error::IndicatorError;

use crate::check_period;

/// Average True Range (ATR).
///
/// Measures market volatility by decomposing the entire range
/// of an asset price for that period.
#[derive(Debug, Clone)]
pub struct Atr {
    period: usize,
}

impl Atr {
    /// Create a new ATR indicator.
    ///
    /// Common period is 14.
    pub fn new(period: usize) -> Result<Self, IndicatorError> {
        check_period("ATR", period)?;
        Ok(Self { period })
    }

    pub fn period(&self) -> usize {
        self.period
    }

    /// Calculate ATR from OHLC data.
    ///
    /// The first true range has no previous close and is `high - low`.
    /// `atr[period-1]` is the mean of the first `period` true ranges, then
    /// Wilder's smoothing applies. Earlier positions are NaN.
    pub fn calculate_ohlc(&self, high: &[f64], low: &[f64], close: &[f64]) -> Vec<f64> {
        let len = high.len().min(low.len()).min(close.len());
        let mut result = vec![f64::NAN; len];
        if len < self.period {
            return result;
        }

        // Calculate True Range
        let mut tr = Vec::with_capacity(len);
        tr.push(high[0] - low[0]);
        for i in 1..len {
            let high_low = high[i] - low[i];
            let high_close = (high[i] - close[i - 1]).abs();
            let low_close = (low[i] - close[i - 1]).abs();
            tr.push(high_low.max(high_close).max(low_close));
        }

        let period_f64 = self.period as f64;

        // Initial ATR is SMA of first 'period' true ranges
        let mut atr: f64 = tr[..self.period].iter().sum::<f64>() / period_f64;
        result[self.period - 1] = atr;

        // Wilder's smoothing
        for i in self.period..len {
            atr = (atr * (period_f64 - 1.0) + tr[i]) / period_f64;
            result[i] = atr;
        }

        result
    }
}
