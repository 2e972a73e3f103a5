//! Trade log entries and live trade ticks.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Trade side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Side {
    Buy,
    Sell,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Buy => write!(f, "BUY"),
            Side::Sell => write!(f, "SELL"),
        }
    }
}

/// One entry of the trade log. Entries are appended and never changed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeRecord {
    pub timestamp: DateTime<Utc>,
    pub side: Side,
    /// Whole shares traded
    pub quantity: u64,
    /// Execution price (the bar close)
    pub price: Decimal,
    /// Cash balance after the trade
    pub balance: Decimal,
}

impl TradeRecord {
    /// Notional value of the trade.
    pub fn value(&self) -> Decimal {
        Decimal::from(self.quantity) * self.price
    }
}

impl fmt::Display for TradeRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} {} shares at ${:.2}, Balance: ${:.2}",
            self.timestamp.format("%Y-%m-%d %H:%M:%S"),
            self.side,
            self.quantity,
            self.price,
            self.balance
        )
    }
}

/// A single trade print received from the live feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeTick {
    /// Symbol
    pub symbol: String,
    /// Trade price
    pub price: f64,
    /// Trade size in shares
    pub size: f64,
    /// Timestamp (Unix milliseconds)
    pub timestamp: i64,
}

impl TradeTick {
    /// Get the timestamp as a DateTime.
    pub fn datetime(&self) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(self.timestamp).unwrap_or_default()
    }

    /// Notional value of the print.
    pub fn notional(&self) -> f64 {
        self.price * self.size
    }
}
