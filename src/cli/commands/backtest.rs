//! Backtest command implementation.

use anyhow::{Context, Result};
use scalper_config::AppConfig;
use scalper_signals::RuleRegistry;
use scalper_sim::{simulate, SimulationReport};
use tracing::info;

use crate::cli::{BacktestArgs, OutputFormat};

pub async fn run(args: BacktestArgs, config: &AppConfig) -> Result<()> {
    let (request, bars) = super::load_bars(config, &args.market).await?;

    // A rule named on the command line starts from its defaults; the
    // [strategy.params] table only applies to the configured rule.
    let registry = RuleRegistry::new();
    let rule = match &args.rule {
        Some(name) if name != &config.strategy.rule => registry.create_default(name),
        _ => registry.create(&config.strategy.rule, config.strategy.params_json()),
    }
    .context("Failed to create signal rule")?;

    info!(
        rule = rule.name(),
        ticker = %request.ticker,
        warmup = rule.warmup_period(),
        "Starting backtest"
    );

    let signaled = rule.annotate(&bars);
    let capital = args.capital.unwrap_or(config.simulation.initial_balance);
    let outcome = simulate(&signaled, capital).context("Simulation failed")?;
    let report = SimulationReport::new(rule.name(), rule.parameters(), &request.ticker, outcome);

    match args.output {
        OutputFormat::Json => println!("{}", report.to_json()?),
        OutputFormat::Text => {
            println!("{}", report.ledger());
            println!("{}", report.summary());
        }
    }

    if let Some(path) = &args.save {
        std::fs::write(path, report.to_json()?)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        info!("Report saved to {:?}", path);
    }

    if let Some(path) = &args.equity_csv {
        std::fs::write(path, report.equity_to_csv())
            .with_context(|| format!("Failed to write {}", path.display()))?;
        info!("Equity curve saved to {:?}", path);
    }

    Ok(())
}
