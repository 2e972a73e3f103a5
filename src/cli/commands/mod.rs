//! CLI command implementations.

pub mod backtest;
pub mod optimize;
pub mod rules;
pub mod stream;
pub mod validate;

use anyhow::{Context, Result};
use scalper_config::AppConfig;
use scalper_core::traits::{BarRequest, HistoricalSource};
use scalper_core::types::Bar;
use scalper_data::{api_key_from_env, CsvDataSource, PolygonClient, PolygonConfig};
use tracing::info;

use crate::cli::MarketArgs;

/// Merge the command line bar selection over the `[market]` section.
pub fn bar_request(config: &AppConfig, args: &MarketArgs) -> BarRequest {
    let mut request = config.market.bar_request();
    if let Some(ticker) = &args.ticker {
        request.ticker = ticker.to_uppercase();
    }
    if let Some(from) = args.from {
        request.from = from;
    }
    if let Some(to) = args.to {
        request.to = to;
    }
    request
}

/// Build the historical source: the CSV file when given, Polygon otherwise.
pub fn historical_source(
    config: &AppConfig,
    args: &MarketArgs,
) -> Result<Box<dyn HistoricalSource>> {
    if let Some(path) = &args.data {
        let source = CsvDataSource::new(path)
            .with_context(|| format!("Cannot open data file {}", path.display()))?;
        return Ok(Box::new(source));
    }

    let polygon = &config.polygon;
    let api_key = api_key_from_env(&polygon.api_key_env)
        .context("Set the Polygon API key or pass --data with a CSV file")?;
    let mut client_config = PolygonConfig::new(api_key).with_rest_url(&polygon.rest_url);
    client_config.adjusted = polygon.adjusted;
    client_config.limit = polygon.limit;

    Ok(Box::new(PolygonClient::new(client_config)?))
}

/// Resolve the request and fetch its bars.
pub async fn load_bars(config: &AppConfig, args: &MarketArgs) -> Result<(BarRequest, Vec<Bar>)> {
    let request = bar_request(config, args);
    if request.from > request.to {
        anyhow::bail!("--from ({}) is after --to ({})", request.from, request.to);
    }

    let source = historical_source(config, args)?;
    let bars = source.fetch_bars(&request).await.with_context(|| {
        format!(
            "Failed to fetch {} bars from {} ({} to {})",
            request.ticker,
            source.name(),
            request.from,
            request.to
        )
    })?;

    info!(
        ticker = %request.ticker,
        source = source.name(),
        bars = bars.len(),
        "Bars loaded"
    );
    Ok((request, bars))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_bar_request_uses_config_defaults() {
        let config = AppConfig::default();
        let request = bar_request(&config, &MarketArgs::default());
        assert_eq!(request, config.market.bar_request());
    }

    #[test]
    fn test_bar_request_overrides() {
        let config = AppConfig::default();
        let args = MarketArgs {
            ticker: Some("aapl".to_string()),
            from: NaiveDate::from_ymd_opt(2024, 12, 10),
            to: None,
            data: None,
        };
        let request = bar_request(&config, &args);
        assert_eq!(request.ticker, "AAPL");
        assert_eq!(request.from, NaiveDate::from_ymd_opt(2024, 12, 10).unwrap());
        assert_eq!(request.to, config.market.to);
    }

    #[tokio::test]
    async fn test_inverted_range_rejected() {
        let config = AppConfig::default();
        let args = MarketArgs {
            from: NaiveDate::from_ymd_opt(2025, 1, 10),
            to: NaiveDate::from_ymd_opt(2025, 1, 1),
            ..Default::default()
        };
        assert!(load_bars(&config, &args).await.is_err());
    }
}
