//! Core data types.

mod ohlcv;
mod signal;
mod timespan;
mod trade;

pub use ohlcv::{validate_bars, Bar, BarColumns};
pub use signal::{Signal, SignaledBar};
pub use timespan::Timespan;
pub use trade::{Side, TradeRecord, TradeTick};
