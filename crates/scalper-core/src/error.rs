//! Error types for the paper trading toolkit.

use thiserror::Error;

/// Signal rule errors.
#[derive(Error, Debug)]
pub enum StrategyError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Signal rule not found: {0}")]
    NotFound(String),
}

/// Market data errors.
#[derive(Error, Debug)]
pub enum DataError {
    /// The provider answered with a non-success status.
    #[error("Error fetching data: {status}, {body}")]
    Fetch { status: u16, body: String },

    #[error("No data found in the response")]
    NoDataAvailable,

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Stream error: {0}")]
    Stream(String),

    #[error("Invalid bar at index {index}: {reason}")]
    InvalidBar { index: usize, reason: String },

    #[error("Bar at index {index} is out of order: timestamp {current} does not follow {previous}")]
    OutOfOrder {
        index: usize,
        previous: i64,
        current: i64,
    },

    #[error("Missing API key: environment variable {0} is not set")]
    MissingApiKey(String),
}

/// Indicator calculation errors.
#[derive(Error, Debug)]
pub enum IndicatorError {
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}

/// Errors raised before or during a simulation run.
#[derive(Error, Debug)]
pub enum SimulationError {
    #[error("Cannot simulate an empty bar series")]
    EmptySeries,

    #[error("Initial balance must not be negative, got {0}")]
    NegativeBalance(rust_decimal::Decimal),

    #[error("Invalid input: {0}")]
    InvalidInput(#[from] DataError),

    #[error("Share quantity at index {index} does not fit in u64")]
    QuantityOverflow { index: usize },

    #[error("Account value at index {index} overflows the decimal range")]
    ValueOverflow { index: usize },

    #[error("Signal count {signals} does not match bar count {bars}")]
    LengthMismatch { bars: usize, signals: usize },
}

/// Parameter sweep errors.
#[derive(Error, Debug)]
pub enum SweepError {
    #[error("Parameter grid has no valid combination ({skipped} skipped)")]
    EmptyGrid { skipped: usize },

    #[error("Run failed: {0}")]
    Simulation(#[from] SimulationError),

    #[error("Invalid rule configuration: {0}")]
    Strategy(#[from] StrategyError),

    #[error("Thread pool error: {0}")]
    ThreadPool(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run() -> Result<(), SweepError> {
        let simulation: Result<(), SimulationError> = Err(SimulationError::EmptySeries);
        simulation?;
        Ok(())
    }

    #[test]
    fn test_sweep_wraps_simulation_errors() {
        let err = run().unwrap_err();
        assert!(matches!(
            err,
            SweepError::Simulation(SimulationError::EmptySeries)
        ));
        assert_eq!(err.to_string(), "Run failed: Cannot simulate an empty bar series");
    }

    #[test]
    fn test_simulation_wraps_invalid_bars() {
        let err = SimulationError::from(DataError::InvalidBar {
            index: 3,
            reason: "close is not positive".to_string(),
        });
        assert_eq!(
            err.to_string(),
            "Invalid input: Invalid bar at index 3: close is not positive"
        );
    }
}
