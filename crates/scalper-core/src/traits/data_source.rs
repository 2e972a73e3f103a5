//! Data source trait definitions.

use crate::error::DataError;
use crate::types::{Bar, Timespan, TradeTick};
use async_trait::async_trait;
use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

/// Request for a range of aggregate bars.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BarRequest {
    /// Ticker symbol
    pub ticker: String,
    /// Number of timespan units per bar
    pub multiplier: u32,
    /// Bar unit
    pub timespan: Timespan,
    /// First day of the range (inclusive)
    pub from: NaiveDate,
    /// Last day of the range (inclusive)
    pub to: NaiveDate,
}

impl BarRequest {
    /// Create a request for 1-minute bars.
    pub fn minutes(ticker: impl Into<String>, from: NaiveDate, to: NaiveDate) -> Self {
        Self {
            ticker: ticker.into(),
            multiplier: 1,
            timespan: Timespan::Minute,
            from,
            to,
        }
    }

    /// Millisecond bounds covered by the request: `[start, end)`, where `end`
    /// is midnight UTC after the `to` day.
    pub fn range_millis(&self) -> (i64, i64) {
        let start = self.from.and_time(chrono::NaiveTime::MIN).and_utc();
        let end = self
            .to
            .checked_add_days(Days::new(1))
            .unwrap_or(self.to)
            .and_time(chrono::NaiveTime::MIN)
            .and_utc();
        (start.timestamp_millis(), end.timestamp_millis())
    }

    /// Check whether a timestamp falls within the requested days.
    pub fn contains(&self, timestamp: i64) -> bool {
        let (start, end) = self.range_millis();
        timestamp >= start && timestamp < end
    }
}

/// Trait for historical bar sources.
#[async_trait]
pub trait HistoricalSource: Send + Sync {
    /// Fetch historical bars.
    ///
    /// # Returns
    /// Bars ordered from oldest to newest; an empty result is
    /// [`DataError::NoDataAvailable`].
    async fn fetch_bars(&self, request: &BarRequest) -> Result<Vec<Bar>, DataError>;

    /// Get the data source name.
    fn name(&self) -> &str;
}

/// Trait for live trade feeds.
#[async_trait]
pub trait TradeFeed: Send + Sync {
    /// Subscribe to trade prints for a ticker.
    ///
    /// # Returns
    /// A channel receiver fed by a background listener. The channel closes
    /// when the upstream connection ends.
    async fn subscribe_trades(&self, ticker: &str) -> Result<mpsc::Receiver<TradeTick>, DataError>;

    /// Get the feed name.
    fn name(&self) -> &str;
}
