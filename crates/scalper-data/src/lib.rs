//! Market data sources.
//!
//! - [`PolygonClient`]: historical aggregates over the REST API
//! - [`PolygonTradeStream`]: live trade prints over the WebSocket API
//! - [`CsvDataSource`]: bars from a local CSV export

mod csv_source;
mod polygon;
mod stream;

pub use csv_source::CsvDataSource;
pub use polygon::{PolygonClient, PolygonConfig, DEFAULT_REST_URL};
pub use stream::{parse_stream_events, PolygonTradeStream, StreamEvent, DEFAULT_WS_URL};

use scalper_core::error::DataError;
use scalper_core::traits::{BarRequest, HistoricalSource};
use scalper_core::types::Bar;
use std::path::Path;

/// Load the bars of a request from a CSV file.
pub async fn load_csv(path: impl AsRef<Path>, request: &BarRequest) -> Result<Vec<Bar>, DataError> {
    let source = CsvDataSource::new(path)?;
    source.fetch_bars(request).await
}

/// Read an API key from the named environment variable.
pub fn api_key_from_env(var: &str) -> Result<String, DataError> {
    match std::env::var(var) {
        Ok(key) if !key.trim().is_empty() => Ok(key),
        _ => Err(DataError::MissingApiKey(var.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_key_from_env() {
        std::env::set_var("SCALPER_TEST_POLYGON_KEY", "abc123");
        assert_eq!(api_key_from_env("SCALPER_TEST_POLYGON_KEY").unwrap(), "abc123");

        std::env::set_var("SCALPER_TEST_POLYGON_KEY", "  ");
        assert!(matches!(
            api_key_from_env("SCALPER_TEST_POLYGON_KEY"),
            Err(DataError::MissingApiKey(var)) if var == "SCALPER_TEST_POLYGON_KEY"
        ));
        std::env::remove_var("SCALPER_TEST_POLYGON_KEY");
    }
}
