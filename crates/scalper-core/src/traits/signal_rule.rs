//! Signal rule trait definitions.

use crate::error::StrategyError;
use crate::types::{Bar, Signal, SignaledBar};

/// Configuration trait for signal rules.
pub trait RuleConfig: Send + Sync + Clone + 'static {
    /// Validate the configuration.
    fn validate(&self) -> Result<(), StrategyError>;
}

/// A rule set that maps a bar table to per-bar buy/sell flags.
///
/// Rules compute their indicator columns from the whole table, then evaluate
/// their predicates bar by bar. A bar whose indicators are still warming up
/// must produce [`Signal::NONE`].
pub trait SignalRule: Send + Sync {
    /// Get the registry key of this rule.
    fn name(&self) -> &str;

    /// Generate one signal per bar, aligned with `bars`.
    fn generate(&self, bars: &[Bar]) -> Vec<Signal>;

    /// Number of bars needed before every indicator of the rule is defined.
    fn warmup_period(&self) -> usize;

    /// Current parameters, for reports.
    fn parameters(&self) -> serde_json::Value;

    /// Get a description of the rule.
    fn description(&self) -> &str {
        ""
    }

    /// Attach the generated signals to their bars.
    fn annotate(&self, bars: &[Bar]) -> Vec<SignaledBar> {
        bars.iter()
            .zip(self.generate(bars))
            .map(|(bar, signal)| SignaledBar::new(*bar, signal))
            .collect()
    }
}
