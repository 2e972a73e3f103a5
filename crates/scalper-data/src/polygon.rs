//! Polygon.io aggregates (bars) over REST.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use scalper_core::error::DataError;
use scalper_core::traits::{BarRequest, HistoricalSource};
use scalper_core::types::Bar;
use tracing::{debug, info};

/// Production REST endpoint.
pub const DEFAULT_REST_URL: &str = "https://api.polygon.io";

/// Polygon REST configuration.
#[derive(Debug, Clone)]
pub struct PolygonConfig {
    pub api_key: String,
    pub rest_url: String,
    /// Request split-adjusted prices
    pub adjusted: bool,
    /// Page size (the API caps this at 50000)
    pub limit: u32,
}

impl PolygonConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            rest_url: DEFAULT_REST_URL.to_string(),
            adjusted: true,
            limit: 50_000,
        }
    }

    pub fn with_rest_url(mut self, url: impl Into<String>) -> Self {
        self.rest_url = url.into();
        self
    }
}

#[derive(Debug, Deserialize)]
struct AggregatesResponse {
    #[serde(default)]
    results: Option<Vec<AggregateBar>>,
    #[serde(default)]
    next_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AggregateBar {
    t: i64,
    o: f64,
    h: f64,
    l: f64,
    c: f64,
    v: f64,
}

impl From<AggregateBar> for Bar {
    fn from(a: AggregateBar) -> Self {
        Bar::new(a.t, a.o, a.h, a.l, a.c, a.v)
    }
}

/// One page of the aggregates endpoint.
#[derive(Debug, PartialEq)]
pub(crate) struct AggregatesPage {
    pub bars: Vec<Bar>,
    pub next_url: Option<String>,
}

/// Parse an aggregates response body. A body without `results` has no data.
pub(crate) fn parse_aggregates(body: &str) -> Result<AggregatesPage, DataError> {
    let response: AggregatesResponse =
        serde_json::from_str(body).map_err(|e| DataError::Parse(e.to_string()))?;

    let results = response.results.ok_or(DataError::NoDataAvailable)?;
    Ok(AggregatesPage {
        bars: results.into_iter().map(Bar::from).collect(),
        next_url: response.next_url.filter(|u| !u.is_empty()),
    })
}

/// Polygon REST client.
pub struct PolygonClient {
    config: PolygonConfig,
    client: Client,
}

impl PolygonClient {
    pub fn new(config: PolygonConfig) -> Result<Self, DataError> {
        let client = Client::builder()
            .build()
            .map_err(|e| DataError::Connection(e.to_string()))?;
        Ok(Self { config, client })
    }

    /// Aggregates endpoint for a request, without query parameters.
    pub fn aggregates_url(&self, request: &BarRequest) -> String {
        format!(
            "{}/v2/aggs/ticker/{}/range/{}/{}/{}/{}",
            self.config.rest_url.trim_end_matches('/'),
            request.ticker,
            request.multiplier,
            request.timespan,
            request.from.format("%Y-%m-%d"),
            request.to.format("%Y-%m-%d"),
        )
    }

    async fn get_page(&self, url: &str, first: bool) -> Result<String, DataError> {
        let mut builder = self
            .client
            .get(url)
            .query(&[("apiKey", self.config.api_key.as_str())]);
        if first {
            builder = builder.query(&[
                ("adjusted", self.config.adjusted.to_string()),
                ("sort", "asc".to_string()),
                ("limit", self.config.limit.to_string()),
            ]);
        }

        let resp = builder
            .send()
            .await
            .map_err(|e| DataError::Connection(e.to_string()))?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| DataError::Connection(e.to_string()))?;

        if !status.is_success() {
            return Err(DataError::Fetch {
                status: status.as_u16(),
                body,
            });
        }

        Ok(body)
    }
}

#[async_trait]
impl HistoricalSource for PolygonClient {
    async fn fetch_bars(&self, request: &BarRequest) -> Result<Vec<Bar>, DataError> {
        let mut url = self.aggregates_url(request);
        let mut bars = Vec::new();
        let mut pages = 0usize;

        loop {
            let body = self.get_page(&url, pages == 0).await?;
            let page = match parse_aggregates(&body) {
                Ok(page) => page,
                // Later pages may legitimately come back empty
                Err(DataError::NoDataAvailable) if pages > 0 => break,
                Err(e) => return Err(e),
            };
            pages += 1;
            debug!(page = pages, bars = page.bars.len(), "Fetched aggregates page");
            bars.extend(page.bars);

            match page.next_url {
                Some(next) => url = next,
                None => break,
            }
        }

        if bars.is_empty() {
            return Err(DataError::NoDataAvailable);
        }

        info!(
            ticker = %request.ticker,
            from = %request.from,
            to = %request.to,
            bars = bars.len(),
            pages,
            "Fetched historical bars"
        );

        Ok(bars)
    }

    fn name(&self) -> &str {
        "polygon"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use scalper_core::types::Timespan;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    fn request() -> BarRequest {
        BarRequest::minutes(
            "TSLA",
            NaiveDate::from_ymd_opt(2024, 12, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 12, 27).unwrap(),
        )
    }

    #[test]
    fn test_aggregates_url() {
        let client = PolygonClient::new(PolygonConfig::new("KEY")).unwrap();
        assert_eq!(
            client.aggregates_url(&request()),
            "https://api.polygon.io/v2/aggs/ticker/TSLA/range/1/minute/2024-12-01/2024-12-27"
        );

        let client =
            PolygonClient::new(PolygonConfig::new("KEY").with_rest_url("http://localhost:8080/"))
                .unwrap();
        let mut daily = request();
        daily.multiplier = 5;
        daily.timespan = Timespan::Day;
        assert_eq!(
            client.aggregates_url(&daily),
            "http://localhost:8080/v2/aggs/ticker/TSLA/range/5/day/2024-12-01/2024-12-27"
        );
    }

    #[test]
    fn test_parse_aggregates() {
        let body = r#"{
            "ticker": "TSLA",
            "status": "OK",
            "resultsCount": 2,
            "results": [
                {"v": 1200, "vw": 351.2, "o": 351.0, "c": 351.5, "h": 352.0, "l": 350.5, "t": 1733149800000, "n": 40},
                {"v": 800.5, "o": 351.5, "c": 350.9, "h": 351.6, "l": 350.7, "t": 1733149860000}
            ],
            "next_url": "https://api.polygon.io/v2/aggs/ticker/TSLA/range/1/minute/1733149920000/2024-12-27?cursor=abc"
        }"#;

        let page = parse_aggregates(body).unwrap();
        assert_eq!(page.bars.len(), 2);
        assert_eq!(
            page.bars[0],
            Bar::new(1_733_149_800_000, 351.0, 352.0, 350.5, 351.5, 1200.0)
        );
        assert_eq!(page.bars[1].volume, 800.5);
        assert!(page.next_url.unwrap().ends_with("cursor=abc"));
    }

    #[test]
    fn test_parse_without_results() {
        let body = r#"{"ticker": "TSLA", "status": "OK", "resultsCount": 0}"#;
        assert!(matches!(
            parse_aggregates(body),
            Err(DataError::NoDataAvailable)
        ));
    }

    #[test]
    fn test_parse_missing_field_is_error() {
        let body = r#"{"results": [{"o": 1.0, "h": 1.0, "l": 1.0, "c": 1.0, "t": 0}]}"#;
        assert!(matches!(parse_aggregates(body), Err(DataError::Parse(_))));
    }

    #[test]
    fn test_fetch_error_message() {
        let err = DataError::Fetch {
            status: 403,
            body: "NOT_AUTHORIZED".to_string(),
        };
        assert_eq!(err.to_string(), "Error fetching data: 403, NOT_AUTHORIZED");
    }

    /// Serve one canned HTTP response per connection, in order, and return
    /// the request lines received. Responses are built from the fixture's
    /// base URL so that `next_url` can point back at it.
    async fn serve<F>(responses: F) -> (String, JoinHandle<Vec<String>>)
    where
        F: FnOnce(&str) -> Vec<(u16, String)>,
    {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());
        let responses = responses(&base);

        let handle = tokio::spawn(async move {
            let mut requests = Vec::new();
            for (status, body) in responses {
                let (mut socket, _) = listener.accept().await.unwrap();

                let mut head = Vec::new();
                let mut buf = [0u8; 1024];
                while !head.windows(4).any(|w| w == b"\r\n\r\n") {
                    let n = socket.read(&mut buf).await.unwrap();
                    if n == 0 {
                        break;
                    }
                    head.extend_from_slice(&buf[..n]);
                }
                let head = String::from_utf8_lossy(&head).to_string();
                requests.push(head.lines().next().unwrap_or_default().to_string());

                let reason = if status == 200 { "OK" } else { "Error" };
                let response = format!(
                    "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status,
                    reason,
                    body.len(),
                    body
                );
                socket.write_all(response.as_bytes()).await.unwrap();
                socket.shutdown().await.unwrap();
            }
            requests
        });

        (base, handle)
    }

    fn client(base: &str) -> PolygonClient {
        PolygonClient::new(PolygonConfig::new("KEY").with_rest_url(base)).unwrap()
    }

    #[tokio::test]
    async fn test_fetch_non_success_status() {
        let body = r#"{"status":"NOT_AUTHORIZED","message":"Unknown API Key"}"#;
        let (base, server) = serve(|_| vec![(403, body.to_string())]).await;

        let result = client(&base).fetch_bars(&request()).await;
        match result {
            Err(DataError::Fetch { status, body: text }) => {
                assert_eq!(status, 403);
                assert_eq!(text, body);
            }
            other => panic!("expected a fetch error, got {:?}", other),
        }
        assert_eq!(server.await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_fetch_follows_next_url() {
        let (base, server) = serve(|base| {
            let first = format!(
                r#"{{"status":"OK","results":[
                    {{"v":1200,"o":351.0,"c":351.5,"h":352.0,"l":350.5,"t":1733149800000}},
                    {{"v":800,"o":351.5,"c":350.9,"h":351.6,"l":350.7,"t":1733149860000}}
                ],"next_url":"{}/v2/aggs/ticker/TSLA/range/1/minute/1733149920000/2024-12-27?cursor=abc"}}"#,
                base
            );
            let second = r#"{"status":"OK","results":[
                {"v":500,"o":350.9,"c":351.2,"h":351.3,"l":350.8,"t":1733149920000}
            ]}"#
            .to_string();
            vec![(200, first), (200, second)]
        })
        .await;

        let bars = client(&base).fetch_bars(&request()).await.unwrap();
        assert_eq!(bars.len(), 3);
        assert_eq!(bars[0].timestamp, 1_733_149_800_000);
        assert_eq!(bars[2].close, 351.2);

        let requests = server.await.unwrap();
        assert_eq!(requests.len(), 2);

        let first = &requests[0];
        assert!(first.starts_with(
            "GET /v2/aggs/ticker/TSLA/range/1/minute/2024-12-01/2024-12-27?"
        ));
        assert!(first.contains("apiKey=KEY"));
        assert!(first.contains("adjusted=true"));
        assert!(first.contains("sort=asc"));
        assert!(first.contains("limit=50000"));

        // the cursor URL carries its own query; only the key is re-added
        let second = &requests[1];
        assert!(second.contains("cursor=abc"));
        assert!(second.contains("apiKey=KEY"));
        assert!(!second.contains("sort="));
    }

    #[tokio::test]
    async fn test_fetch_empty_first_page_is_no_data() {
        let (base, server) = serve(|_| {
            vec![(200, r#"{"ticker":"TSLA","status":"OK","resultsCount":0}"#.to_string())]
        })
        .await;

        let result = client(&base).fetch_bars(&request()).await;
        assert!(matches!(result, Err(DataError::NoDataAvailable)));
        assert_eq!(server.await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_fetch_stops_on_empty_later_page() {
        let (base, server) = serve(|base| {
            let first = format!(
                r#"{{"results":[{{"v":10,"o":1.0,"c":1.5,"h":2.0,"l":0.5,"t":1733149800000}}],"next_url":"{}/v2/aggs/next?cursor=end"}}"#,
                base
            );
            let second = r#"{"status":"OK","resultsCount":0}"#.to_string();
            vec![(200, first), (200, second)]
        })
        .await;

        let bars = client(&base).fetch_bars(&request()).await.unwrap();
        assert_eq!(bars.len(), 1);
        assert_eq!(server.await.unwrap().len(), 2);
    }
}
