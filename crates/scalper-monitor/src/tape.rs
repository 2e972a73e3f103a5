//! Running summary of live trade prints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use scalper_core::types::TradeTick;

/// Aggregates the trades seen on a live feed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TradeTape {
    pub symbol: String,
    pub trades: u64,
    pub volume: f64,
    notional: f64,
    pub last_price: Option<f64>,
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub last_timestamp: Option<i64>,
}

impl TradeTape {
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            ..Default::default()
        }
    }

    /// Add a print to the tape. Prints for other symbols are ignored.
    pub fn record(&mut self, tick: &TradeTick) -> bool {
        if tick.symbol != self.symbol {
            return false;
        }

        self.trades += 1;
        self.volume += tick.size;
        self.notional += tick.notional();
        self.last_price = Some(tick.price);
        self.high = Some(self.high.map_or(tick.price, |h| h.max(tick.price)));
        self.low = Some(self.low.map_or(tick.price, |l| l.min(tick.price)));
        self.last_timestamp = Some(tick.timestamp);
        true
    }

    /// Volume-weighted average price of the session so far.
    pub fn vwap(&self) -> Option<f64> {
        (self.volume > 0.0).then(|| self.notional / self.volume)
    }

    pub fn last_time(&self) -> Option<DateTime<Utc>> {
        self.last_timestamp
            .and_then(DateTime::from_timestamp_millis)
    }

    /// One-line summary for periodic logging.
    pub fn summary_line(&self) -> String {
        match (self.last_price, self.vwap(), self.high, self.low) {
            (Some(last), Some(vwap), Some(high), Some(low)) => format!(
                "{}: {} trades, {:.0} shares, last ${:.2}, VWAP ${:.2}, range ${:.2}-${:.2}",
                self.symbol, self.trades, self.volume, last, vwap, low, high
            ),
            _ => format!("{}: no trades yet", self.symbol),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tick(price: f64, size: f64, timestamp: i64) -> TradeTick {
        TradeTick {
            symbol: "TSLA".to_string(),
            price,
            size,
            timestamp,
        }
    }

    #[test]
    fn test_tape_aggregates() {
        let mut tape = TradeTape::new("TSLA");
        assert_eq!(tape.summary_line(), "TSLA: no trades yet");

        assert!(tape.record(&tick(100.0, 10.0, 1)));
        assert!(tape.record(&tick(110.0, 30.0, 2)));
        assert!(tape.record(&tick(95.0, 10.0, 3)));

        assert_eq!(tape.trades, 3);
        assert_eq!(tape.volume, 50.0);
        assert_eq!(tape.high, Some(110.0));
        assert_eq!(tape.low, Some(95.0));
        assert_eq!(tape.last_price, Some(95.0));
        // (1000 + 3300 + 950) / 50
        assert!((tape.vwap().unwrap() - 105.0).abs() < 1e-9);
        assert_eq!(tape.last_time().unwrap().timestamp_millis(), 3);
        assert_eq!(
            tape.summary_line(),
            "TSLA: 3 trades, 50 shares, last $95.00, VWAP $105.00, range $95.00-$110.00"
        );
    }

    #[test]
    fn test_other_symbols_ignored() {
        let mut tape = TradeTape::new("AAPL");
        assert!(!tape.record(&tick(100.0, 1.0, 1)));
        assert_eq!(tape.trades, 0);
        assert_eq!(tape.vwap(), None);
    }
}
