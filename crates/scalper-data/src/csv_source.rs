//! CSV data source.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use csv::ReaderBuilder;
use serde::Deserialize;
use scalper_core::error::DataError;
use scalper_core::traits::{BarRequest, HistoricalSource};
use scalper_core::types::Bar;
use std::path::{Path, PathBuf};
use tracing::info;

/// CSV record format.
#[derive(Debug, Deserialize)]
struct CsvRecord {
    #[serde(alias = "Date", alias = "timestamp", alias = "Timestamp", alias = "t")]
    date: String,
    #[serde(alias = "Open", alias = "o")]
    open: f64,
    #[serde(alias = "High", alias = "h")]
    high: f64,
    #[serde(alias = "Low", alias = "l")]
    low: f64,
    #[serde(alias = "Close", alias = "c")]
    close: f64,
    #[serde(alias = "Volume", alias = "v", default)]
    volume: f64,
}

/// CSV data source for historical bars.
///
/// Rows must already be in ascending time order.
pub struct CsvDataSource {
    path: PathBuf,
}

impl CsvDataSource {
    /// Create a new CSV data source.
    pub fn new(path: impl AsRef<Path>) -> Result<Self, DataError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(DataError::Parse(format!(
                "CSV file not found: {}",
                path.display()
            )));
        }
        Ok(Self {
            path: path.to_path_buf(),
        })
    }

    /// Load every bar in the file, in file order.
    pub fn load_all(&self) -> Result<Vec<Bar>, DataError> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_path(&self.path)
            .map_err(|e| DataError::Parse(e.to_string()))?;

        let mut bars: Vec<Bar> = Vec::new();

        for (index, result) in reader.deserialize().enumerate() {
            let record: CsvRecord = result.map_err(|e| DataError::Parse(e.to_string()))?;
            let timestamp = parse_timestamp(&record.date)?;

            if let Some(prev) = bars.last() {
                if timestamp <= prev.timestamp {
                    return Err(DataError::OutOfOrder {
                        index,
                        previous: prev.timestamp,
                        current: timestamp,
                    });
                }
            }

            bars.push(Bar::new(
                timestamp,
                record.open,
                record.high,
                record.low,
                record.close,
                record.volume,
            ));
        }

        Ok(bars)
    }
}

#[async_trait]
impl HistoricalSource for CsvDataSource {
    async fn fetch_bars(&self, request: &BarRequest) -> Result<Vec<Bar>, DataError> {
        let bars: Vec<Bar> = self
            .load_all()?
            .into_iter()
            .filter(|b| request.contains(b.timestamp))
            .collect();

        if bars.is_empty() {
            return Err(DataError::NoDataAvailable);
        }

        info!(
            path = %self.path.display(),
            from = %request.from,
            to = %request.to,
            bars = bars.len(),
            "Loaded bars from CSV"
        );

        Ok(bars)
    }

    fn name(&self) -> &str {
        "csv"
    }
}

/// Parse various timestamp formats into Unix milliseconds (UTC).
fn parse_timestamp(date_str: &str) -> Result<i64, DataError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(date_str) {
        return Ok(dt.timestamp_millis());
    }

    let datetime_formats = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];
    for format in datetime_formats {
        if let Ok(dt) = NaiveDateTime::parse_from_str(date_str, format) {
            return Ok(dt.and_utc().timestamp_millis());
        }
    }

    let date_formats = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d-%m-%Y"];
    for format in date_formats {
        if let Ok(d) = NaiveDate::parse_from_str(date_str, format) {
            return Ok(d.and_time(chrono::NaiveTime::MIN).and_utc().timestamp_millis());
        }
    }

    // Unix timestamp; milliseconds if > 10 digits
    if let Ok(ts) = date_str.parse::<i64>() {
        if ts > 10_000_000_000 {
            return Ok(ts);
        } else {
            return Ok(ts * 1000);
        }
    }

    Err(DataError::Parse(format!(
        "Could not parse date: {}",
        date_str
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::load_csv;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn csv_file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    fn december(from: u32, to: u32) -> BarRequest {
        BarRequest::minutes(
            "TSLA",
            NaiveDate::from_ymd_opt(2024, 12, from).unwrap(),
            NaiveDate::from_ymd_opt(2024, 12, to).unwrap(),
        )
    }

    #[test]
    fn test_parse_timestamp() {
        assert_eq!(parse_timestamp("2024-12-02").unwrap(), 1_733_097_600_000);
        assert_eq!(
            parse_timestamp("2024-12-02 14:30:00").unwrap(),
            1_733_149_800_000
        );
        assert_eq!(
            parse_timestamp("2024-12-02T14:30:00Z").unwrap(),
            1_733_149_800_000
        );
        assert_eq!(parse_timestamp("1733149800000").unwrap(), 1_733_149_800_000); // Unix ms
        assert_eq!(parse_timestamp("1733149800").unwrap(), 1_733_149_800_000); // Unix sec
        assert!(parse_timestamp("yesterday").is_err());
    }

    #[tokio::test]
    async fn test_fetch_filters_to_range() {
        let file = csv_file(
            "Date,Open,High,Low,Close,Volume\n\
             2024-11-29 20:59:00,340.0,341.0,339.5,340.5,1000\n\
             2024-12-02 14:30:00,351.0,352.0,350.5,351.5,1200\n\
             2024-12-02 14:31:00,351.5,351.6,350.7,350.9,800\n\
             2024-12-03 14:30:00,352.0,353.0,351.0,352.5,900\n",
        );

        let bars = load_csv(file.path(), &december(1, 2)).await.unwrap();
        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0].timestamp, 1_733_149_800_000);
        assert_eq!(bars[1].close, 350.9);
    }

    #[tokio::test]
    async fn test_export_with_adjusted_close_column() {
        let file = csv_file(
            "Date,Open,High,Low,Close,Adj Close,Volume\n\
             2024-12-02,351.0,352.0,350.5,351.5,349.8,1200\n\
             2024-12-03,351.5,353.0,350.7,352.9,351.2,800\n",
        );

        let bars = load_csv(file.path(), &december(1, 3)).await.unwrap();
        assert_eq!(bars.len(), 2);
        // the unadjusted close is used
        assert_eq!(bars[0].close, 351.5);
        assert_eq!(bars[1].close, 352.9);
        assert_eq!(bars[1].volume, 800.0);
    }

    #[tokio::test]
    async fn test_lowercase_headers_and_missing_volume() {
        let file = csv_file("timestamp,open,high,low,close\n1733149800000,1.0,2.0,0.5,1.5\n");
        let bars = load_csv(file.path(), &december(2, 2)).await.unwrap();
        assert_eq!(bars[0].volume, 0.0);
    }

    #[tokio::test]
    async fn test_empty_range_is_no_data() {
        let file = csv_file("Date,Open,High,Low,Close,Volume\n2024-12-02,1,1,1,1,1\n");
        let result = load_csv(file.path(), &december(10, 12)).await;
        assert!(matches!(result, Err(DataError::NoDataAvailable)));
    }

    #[test]
    fn test_out_of_order_rows_rejected() {
        let file = csv_file(
            "Date,Open,High,Low,Close,Volume\n\
             2024-12-03,1,1,1,1,1\n\
             2024-12-02,1,1,1,1,1\n",
        );
        let result = CsvDataSource::new(file.path()).unwrap().load_all();
        assert!(matches!(result, Err(DataError::OutOfOrder { index: 1, .. })));
    }

    #[test]
    fn test_missing_file() {
        assert!(CsvDataSource::new("/nonexistent/bars.csv").is_err());
    }
}
