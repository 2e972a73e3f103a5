//! Parameter sweep command implementation.

use anyhow::{Context, Result};
use scalper_config::AppConfig;
use scalper_sim::{optimize, SweepGrid, SweepSettings};
use tracing::info;

use crate::cli::{OptimizeArgs, OutputFormat};

pub async fn run(args: OptimizeArgs, config: &AppConfig) -> Result<()> {
    let (request, bars) = super::load_bars(config, &args.market).await?;

    let sweep = &config.sweep;
    let grid = SweepGrid::cartesian(
        &sweep.ema_short,
        &sweep.ema_long,
        &sweep.rsi_lower,
        &sweep.rsi_upper,
    );
    let settings = SweepSettings {
        initial_balance: args.capital.unwrap_or(config.simulation.initial_balance),
        rsi_window: sweep.rsi_window,
        threads: args.threads.or(sweep.threads),
    };

    info!(
        ticker = %request.ticker,
        combinations = grid.len(),
        "Optimizing EMA/RSI parameters"
    );

    // The sweep is CPU bound
    let outcome = tokio::task::spawn_blocking(move || optimize(&bars, &grid, &settings))
        .await
        .context("Sweep task panicked")?
        .context("Parameter sweep failed")?;

    if let OutputFormat::Json = args.output {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
        return Ok(());
    }

    println!("Parameter Sweep: {}", request.ticker);
    println!("═══════════════════════════════════════════════════════════");
    println!(
        "  {:>4}  {:>9}  {:>9}  {:>12}  {:>8}  {:>14}",
        "#", "EMA", "RSI", "Final", "Trades", "Net Profit"
    );
    println!("  ───────────────────────────────────────────────────────");
    for (rank, run) in outcome.leaderboard().iter().take(args.top).enumerate() {
        let p = &run.params;
        println!(
            "  {:>4}  {:>9}  {:>9}  {:>12.2}  {:>8}  {:>14.2}",
            rank + 1,
            format!("{}/{}", p.ema_short, p.ema_long),
            format!("{}/{}", p.rsi_lower, p.rsi_upper),
            run.final_balance,
            run.trades,
            run.net_profit
        );
    }
    println!();
    println!(
        "  Evaluated {} combinations, skipped {}",
        outcome.runs.len(),
        outcome.skipped
    );

    let best = &outcome.best.params;
    println!(
        "Best Parameters: EMA Short={}, EMA Long={}, RSI Lower={}, RSI Upper={}",
        best.ema_short, best.ema_long, best.rsi_lower, best.rsi_upper
    );
    println!("Best Profit: ${:.2}", outcome.best.net_profit);

    Ok(())
}
