//! Momentum indicators.

use scalper_core::error::IndicatorError;
use scalper_core::traits::Indicator;

use crate::check_period;

/// Relative Strength Index (RSI).
///
/// Measures the speed and magnitude of recent price changes
/// to evaluate overbought or oversold conditions.
#[derive(Debug, Clone)]
pub struct Rsi {
    period: usize,
}

impl Rsi {
    /// Create a new RSI indicator.
    ///
    /// Common periods are 14 (default) or 9.
    pub fn new(period: usize) -> Result<Self, IndicatorError> {
        check_period("RSI", period)?;
        Ok(Self { period })
    }
}

impl Indicator for Rsi {
    /// Gains and losses are smoothed recursively with `alpha = 1/period`,
    /// both seeded with zero at the first bar (which has no change).
    /// A window without losses reads 100.
    fn calculate(&self, data: &[f64]) -> Vec<f64> {
        let mut result = vec![f64::NAN; data.len()];
        if data.is_empty() {
            return result;
        }

        let alpha = 1.0 / self.period as f64;
        let mut avg_gain = 0.0;
        let mut avg_loss = 0.0;

        for i in 0..data.len() {
            if i > 0 {
                let change = data[i] - data[i - 1];
                let (gain, loss) = if change > 0.0 {
                    (change, 0.0)
                } else {
                    (0.0, -change)
                };
                avg_gain = alpha * gain + (1.0 - alpha) * avg_gain;
                avg_loss = alpha * loss + (1.0 - alpha) * avg_loss;
            }

            if i + 1 >= self.period {
                result[i] = if avg_loss == 0.0 {
                    100.0
                } else {
                    100.0 - 100.0 / (1.0 + avg_gain / avg_loss)
                };
            }
        }

        result
    }

    fn period(&self) -> usize {
        self.period
    }

    fn name(&self) -> &str {
        "RSI"
    }
}
