//! Core types and traits for the paper trading toolkit.
//!
//! This crate provides the foundational building blocks including:
//! - Market data types (Bar, Timespan, TradeTick)
//! - Per-bar signals and trade records
//! - Core traits for indicators, signal rules and data sources

pub mod types;
pub mod traits;
pub mod error;

pub use types::*;
pub use traits::*;
