//! Core traits.

mod data_source;
mod indicator;
mod signal_rule;

pub use data_source::{BarRequest, HistoricalSource, TradeFeed};
pub use indicator::Indicator;
pub use signal_rule::{RuleConfig, SignalRule};
