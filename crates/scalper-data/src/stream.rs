//! Polygon.io live trades over WebSocket.

use async_trait::async_trait;
use futures::{SinkExt, StreamExt};
use serde::Deserialize;
use scalper_core::error::DataError;
use scalper_core::traits::TradeFeed;
use scalper_core::types::TradeTick;
use tokio::sync::mpsc;
use tokio_tungstenite::{connect_async, tungstenite::Message};
use tracing::{debug, info, warn};

/// Stocks cluster endpoint.
pub const DEFAULT_WS_URL: &str = "wss://socket.polygon.io/stocks";

const CHANNEL_CAPACITY: usize = 1024;

/// A decoded event from a stream frame.
#[derive(Debug, Clone, PartialEq)]
pub enum StreamEvent {
    Trade(TradeTick),
    Status { status: String, message: String },
    Other,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "ev")]
enum WsEvent {
    #[serde(rename = "T")]
    Trade { sym: String, p: f64, s: f64, t: i64 },
    #[serde(rename = "status")]
    Status {
        status: String,
        #[serde(default)]
        message: String,
    },
    #[serde(other)]
    Other,
}

impl From<WsEvent> for StreamEvent {
    fn from(event: WsEvent) -> Self {
        match event {
            WsEvent::Trade { sym, p, s, t } => StreamEvent::Trade(TradeTick {
                symbol: sym,
                price: p,
                size: s,
                timestamp: t,
            }),
            WsEvent::Status { status, message } => StreamEvent::Status { status, message },
            WsEvent::Other => StreamEvent::Other,
        }
    }
}

/// Decode a text frame. Frames normally hold an array of events; a bare
/// event object is accepted too.
pub fn parse_stream_events(text: &str) -> Result<Vec<StreamEvent>, DataError> {
    let events: Vec<WsEvent> = match serde_json::from_str::<Vec<WsEvent>>(text) {
        Ok(events) => events,
        Err(_) => vec![serde_json::from_str::<WsEvent>(text)
            .map_err(|e| DataError::Parse(e.to_string()))?],
    };
    Ok(events.into_iter().map(StreamEvent::from).collect())
}

/// Live trade feed backed by the Polygon WebSocket API.
pub struct PolygonTradeStream {
    api_key: String,
    ws_url: String,
}

impl PolygonTradeStream {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ws_url: DEFAULT_WS_URL.to_string(),
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.ws_url = url.into();
        self
    }

    fn auth_message(&self) -> String {
        serde_json::json!({ "action": "auth", "params": self.api_key }).to_string()
    }

    fn subscribe_message(ticker: &str) -> String {
        serde_json::json!({ "action": "subscribe", "params": format!("T.{}", ticker) })
            .to_string()
    }
}

#[async_trait]
impl TradeFeed for PolygonTradeStream {
    async fn subscribe_trades(&self, ticker: &str) -> Result<mpsc::Receiver<TradeTick>, DataError> {
        let (ws_stream, _) = connect_async(self.ws_url.as_str())
            .await
            .map_err(|e| DataError::Connection(e.to_string()))?;
        let (mut write, mut read) = ws_stream.split();

        info!(url = %self.ws_url, ticker, "Connected to trade stream");

        write
            .send(Message::Text(self.auth_message()))
            .await
            .map_err(|e| DataError::Stream(e.to_string()))?;
        write
            .send(Message::Text(Self::subscribe_message(ticker)))
            .await
            .map_err(|e| DataError::Stream(e.to_string()))?;

        let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);

        tokio::spawn(async move {
            // The write half stays alive with the listener
            let _write = write;

            while let Some(msg) = read.next().await {
                match msg {
                    Ok(Message::Text(text)) => {
                        let events = match parse_stream_events(&text) {
                            Ok(events) => events,
                            Err(e) => {
                                warn!(error = %e, "Unreadable stream frame");
                                continue;
                            }
                        };
                        for event in events {
                            match event {
                                StreamEvent::Trade(tick) => {
                                    if tx.send(tick).await.is_err() {
                                        debug!("Trade receiver dropped, stopping listener");
                                        return;
                                    }
                                }
                                StreamEvent::Status { status, message } => {
                                    info!(%status, %message, "Stream status");
                                }
                                StreamEvent::Other => {}
                            }
                        }
                    }
                    Ok(Message::Close(frame)) => {
                        info!(?frame, "Trade stream closed");
                        break;
                    }
                    Ok(_) => {}
                    Err(e) => {
                        warn!(error = %e, "Trade stream error");
                        break;
                    }
                }
            }
        });

        Ok(rx)
    }

    fn name(&self) -> &str {
        "polygon-ws"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handshake_messages() {
        let stream = PolygonTradeStream::new("KEY");
        let auth: serde_json::Value = serde_json::from_str(&stream.auth_message()).unwrap();
        assert_eq!(auth, serde_json::json!({ "action": "auth", "params": "KEY" }));

        let sub: serde_json::Value =
            serde_json::from_str(&PolygonTradeStream::subscribe_message("TSLA")).unwrap();
        assert_eq!(sub, serde_json::json!({ "action": "subscribe", "params": "T.TSLA" }));
    }

    #[test]
    fn test_parse_trade_frame() {
        let text = r#"[
            {"ev":"T","sym":"TSLA","i":"52983525029461","x":4,"p":351.23,"s":100,"c":[12,37],"t":1733149800123,"q":1000,"z":3},
            {"ev":"T","sym":"TSLA","i":"52983525029462","x":11,"p":351.25,"s":5,"t":1733149800456,"z":3}
        ]"#;

        let events = parse_stream_events(text).unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(
            events[0],
            StreamEvent::Trade(TradeTick {
                symbol: "TSLA".to_string(),
                price: 351.23,
                size: 100.0,
                timestamp: 1_733_149_800_123,
            })
        );
        assert!(matches!(&events[1], StreamEvent::Trade(t) if t.size == 5.0));
    }

    #[test]
    fn test_parse_status_and_other_events() {
        let text = r#"[
            {"ev":"status","status":"auth_success","message":"authenticated"},
            {"ev":"Q","sym":"TSLA","bp":351.2,"ap":351.3}
        ]"#;

        let events = parse_stream_events(text).unwrap();
        assert_eq!(
            events[0],
            StreamEvent::Status {
                status: "auth_success".to_string(),
                message: "authenticated".to_string(),
            }
        );
        assert_eq!(events[1], StreamEvent::Other);
    }

    #[test]
    fn test_parse_single_object_frame() {
        let events = parse_stream_events(r#"{"ev":"status","status":"connected"}"#).unwrap();
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn test_parse_garbage() {
        assert!(matches!(
            parse_stream_events("not json"),
            Err(DataError::Parse(_))
        ));
    }
}
