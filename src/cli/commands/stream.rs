//! Live trade stream command implementation.

use anyhow::{Context, Result};
use scalper_config::AppConfig;
use scalper_core::traits::TradeFeed;
use scalper_data::{api_key_from_env, PolygonTradeStream};
use scalper_monitor::TradeTape;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::cli::StreamArgs;

pub async fn run(args: StreamArgs, config: &AppConfig) -> Result<()> {
    let (request, bars) = super::load_bars(config, &args.market).await?;

    println!("Historical Data: {} ({} bars)", request.ticker, bars.len());
    println!(
        "  {:<20} {:>10} {:>10} {:>10} {:>10} {:>12}",
        "Timestamp", "Open", "High", "Low", "Close", "Volume"
    );
    for bar in bars.iter().take(args.head) {
        println!(
            "  {:<20} {:>10.2} {:>10.2} {:>10.2} {:>10.2} {:>12.0}",
            bar.datetime().format("%Y-%m-%d %H:%M:%S"),
            bar.open,
            bar.high,
            bar.low,
            bar.close,
            bar.volume
        );
    }
    println!();

    let api_key = api_key_from_env(&config.polygon.api_key_env)
        .context("The live stream needs a Polygon API key")?;
    let feed = PolygonTradeStream::new(api_key).with_url(&config.polygon.ws_url);
    let mut trades = feed
        .subscribe_trades(&request.ticker)
        .await
        .context("Failed to start trade stream")?;

    info!(ticker = %request.ticker, feed = feed.name(), "Streaming trades, Ctrl-C to stop");

    let mut tape = TradeTape::new(&request.ticker);
    let mut summary_timer = tokio::time::interval(Duration::from_secs(args.summary_secs.max(1)));
    summary_timer.tick().await;
    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            msg = trades.recv() => match msg {
                Some(tick) => {
                    if tape.record(&tick) {
                        debug!(
                            price = tick.price,
                            size = tick.size,
                            time = %tick.datetime(),
                            "Trade"
                        );
                    }
                }
                None => {
                    warn!("Trade stream ended");
                    break;
                }
            },
            _ = summary_timer.tick() => {
                info!("{}", tape.summary_line());
            }
            _ = &mut shutdown => {
                info!("Stopping trade stream");
                break;
            }
        }
    }

    println!("{}", tape.summary_line());
    if let Some(time) = tape.last_time() {
        println!("Last trade at {}", time.format("%Y-%m-%d %H:%M:%S%.3f UTC"));
    }
    Ok(())
}
