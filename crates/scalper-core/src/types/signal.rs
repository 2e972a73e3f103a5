//! Per-bar trading signals.

use serde::{Deserialize, Serialize};

use super::Bar;

/// Buy/sell flags derived for one bar.
///
/// Nothing prevents both flags from being set; the simulator resolves that
/// case by checking the buy side first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Signal {
    pub buy: bool,
    pub sell: bool,
}

impl Signal {
    /// No action for this bar.
    pub const NONE: Signal = Signal {
        buy: false,
        sell: false,
    };

    pub fn new(buy: bool, sell: bool) -> Self {
        Self { buy, sell }
    }

    pub fn buy() -> Self {
        Self::new(true, false)
    }

    pub fn sell() -> Self {
        Self::new(false, true)
    }

    /// True when neither flag is set.
    pub fn is_none(&self) -> bool {
        !self.buy && !self.sell
    }
}

/// A bar with its signal attached, as consumed by the simulator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SignaledBar {
    pub bar: Bar,
    pub signal: Signal,
}

impl SignaledBar {
    pub fn new(bar: Bar, signal: Signal) -> Self {
        Self { bar, signal }
    }
}
