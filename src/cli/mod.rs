//! CLI definitions.

pub mod commands;

use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use rust_decimal::Decimal;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "scalper")]
#[command(author, version, about = "Signal-driven paper trading over Polygon.io bars")]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: PathBuf,

    /// Log level (overrides the configuration file)
    #[arg(short, long)]
    pub log_level: Option<LogLevel>,

    /// Enable JSON log format
    #[arg(long)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

#[derive(Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Simulate one signal rule over historical bars
    Backtest(BacktestArgs),
    /// Search EMA/RSI parameters for the most profitable setting
    Optimize(OptimizeArgs),
    /// Show recent bars, then follow live trades until Ctrl-C
    Stream(StreamArgs),
    /// List available signal rules
    Rules,
    /// Validate configuration
    ValidateConfig,
}

/// Bar selection shared by the data-driven commands. Unset values come
/// from the `[market]` section of the configuration.
#[derive(clap::Args, Clone, Default)]
pub struct MarketArgs {
    /// Ticker symbol
    #[arg(short, long)]
    pub ticker: Option<String>,

    /// First day (YYYY-MM-DD)
    #[arg(long)]
    pub from: Option<NaiveDate>,

    /// Last day, inclusive (YYYY-MM-DD)
    #[arg(long)]
    pub to: Option<NaiveDate>,

    /// Read bars from a CSV file instead of Polygon
    #[arg(long)]
    pub data: Option<PathBuf>,
}

#[derive(clap::Args)]
pub struct BacktestArgs {
    #[command(flatten)]
    pub market: MarketArgs,

    /// Signal rule (see `scalper rules`)
    #[arg(short, long)]
    pub rule: Option<String>,

    /// Initial capital
    #[arg(long)]
    pub capital: Option<Decimal>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub output: OutputFormat,

    /// Save the JSON report to a file
    #[arg(long)]
    pub save: Option<PathBuf>,

    /// Save the per-bar equity curve as CSV
    #[arg(long)]
    pub equity_csv: Option<PathBuf>,
}

#[derive(clap::Args)]
pub struct OptimizeArgs {
    #[command(flatten)]
    pub market: MarketArgs,

    /// Initial capital for every run
    #[arg(long)]
    pub capital: Option<Decimal>,

    /// Worker threads (overrides `sweep.threads`)
    #[arg(long)]
    pub threads: Option<usize>,

    /// Number of leaderboard rows to print
    #[arg(long, default_value = "10")]
    pub top: usize,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub output: OutputFormat,
}

#[derive(clap::Args)]
pub struct StreamArgs {
    #[command(flatten)]
    pub market: MarketArgs,

    /// Number of historical bars to print before streaming
    #[arg(long, default_value = "5")]
    pub head: usize,

    /// Seconds between tape summaries
    #[arg(long, default_value = "30")]
    pub summary_secs: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_backtest_args() {
        let cli = Cli::try_parse_from([
            "scalper",
            "--log-level",
            "debug",
            "backtest",
            "--ticker",
            "AAPL",
            "--from",
            "2024-12-02",
            "--rule",
            "trend_atr",
            "--capital",
            "2500.50",
            "--output",
            "json",
        ])
        .unwrap();

        assert!(matches!(cli.log_level, Some(LogLevel::Debug)));
        let Commands::Backtest(args) = cli.command else {
            panic!("expected backtest");
        };
        assert_eq!(args.market.ticker.as_deref(), Some("AAPL"));
        assert_eq!(args.market.from, NaiveDate::from_ymd_opt(2024, 12, 2));
        assert_eq!(args.market.to, None);
        assert_eq!(args.rule.as_deref(), Some("trend_atr"));
        assert_eq!(args.capital, Some(dec!(2500.50)));
        assert!(matches!(args.output, OutputFormat::Json));
    }

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["scalper", "stream"]).unwrap();
        assert_eq!(cli.config, PathBuf::from("config/default.toml"));
        assert!(cli.log_level.is_none());
        let Commands::Stream(args) = cli.command else {
            panic!("expected stream");
        };
        assert_eq!(args.head, 5);
    }

    #[test]
    fn test_bad_date_rejected() {
        assert!(Cli::try_parse_from(["scalper", "optimize", "--from", "12/02/2024"]).is_err());
    }
}
