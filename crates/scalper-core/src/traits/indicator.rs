//! Indicator trait definitions.

/// Trait for technical indicators over a single input series.
///
/// Output is aligned with the input: `calculate(data).len() == data.len()`,
/// and positions that do not yet have enough history hold `f64::NAN`.
pub trait Indicator: Send + Sync {
    /// Calculate indicator values for the given data.
    fn calculate(&self, data: &[f64]) -> Vec<f64>;

    /// Get the window length.
    fn period(&self) -> usize;

    /// Get the name of the indicator.
    fn name(&self) -> &str;

    /// Number of leading NaN values in the output.
    fn warmup(&self) -> usize {
        self.period().saturating_sub(1)
    }
}
