//! OHLCV (Open, High, Low, Close, Volume) data types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::DataError;

/// A single OHLCV sample.
/// Prices stay in f64 for indicator math; money is converted at the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    /// Unix timestamp in milliseconds
    pub timestamp: i64,
    /// Opening price
    pub open: f64,
    /// Highest price
    pub high: f64,
    /// Lowest price
    pub low: f64,
    /// Closing price
    pub close: f64,
    /// Trading volume
    pub volume: f64,
}

impl Bar {
    /// Create a new bar.
    pub fn new(timestamp: i64, open: f64, high: f64, low: f64, close: f64, volume: f64) -> Self {
        Self {
            timestamp,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    /// Get the timestamp as a DateTime.
    pub fn datetime(&self) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(self.timestamp).unwrap_or_default()
    }
}

/// Column extraction over a bar table.
pub trait BarColumns {
    fn closes(&self) -> Vec<f64>;
    fn highs(&self) -> Vec<f64>;
    fn lows(&self) -> Vec<f64>;
    fn volumes(&self) -> Vec<f64>;
}

impl BarColumns for [Bar] {
    fn closes(&self) -> Vec<f64> {
        self.iter().map(|b| b.close).collect()
    }

    fn highs(&self) -> Vec<f64> {
        self.iter().map(|b| b.high).collect()
    }

    fn lows(&self) -> Vec<f64> {
        self.iter().map(|b| b.low).collect()
    }

    fn volumes(&self) -> Vec<f64> {
        self.iter().map(|b| b.volume).collect()
    }
}

/// Check that a bar table is usable by the simulator.
///
/// Timestamps must be strictly increasing, every field finite and
/// non-negative, and the close strictly positive (it is a divisor when
/// sizing buys).
pub fn validate_bars(bars: &[Bar]) -> Result<(), DataError> {
    let mut previous: Option<i64> = None;

    for (index, bar) in bars.iter().enumerate() {
        let fields = [
            ("open", bar.open),
            ("high", bar.high),
            ("low", bar.low),
            ("volume", bar.volume),
        ];
        for (name, value) in fields {
            if !value.is_finite() || value < 0.0 {
                return Err(DataError::InvalidBar {
                    index,
                    reason: format!("{} is {}", name, value),
                });
            }
        }

        if !bar.close.is_finite() || bar.close <= 0.0 {
            return Err(DataError::InvalidBar {
                index,
                reason: format!("close is {}", bar.close),
            });
        }

        if let Some(prev) = previous {
            if bar.timestamp <= prev {
                return Err(DataError::OutOfOrder {
                    index,
                    previous: prev,
                    current: bar.timestamp,
                });
            }
        }
        previous = Some(bar.timestamp);
    }

    Ok(())
}
