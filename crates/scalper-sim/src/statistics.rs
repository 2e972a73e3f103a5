//! Run statistics.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use scalper_core::types::Side;

use crate::SimulationOutcome;

/// Summary statistics of one simulation run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunStatistics {
    /// Number of bars processed
    pub bars_processed: usize,
    /// Total number of trade records
    pub total_trades: usize,
    pub buys: usize,
    pub sells: usize,
    /// Sells that closed a position opened by one or more buys
    pub round_trips: usize,
    /// Round trips whose proceeds exceeded their cost
    pub winning_trips: usize,
    /// Round trips whose proceeds fell short of their cost
    pub losing_trips: usize,
    /// Winning round trips as a percentage of all round trips
    pub win_rate_pct: Decimal,
    /// Realized profit of all round trips
    pub realized_pnl: Decimal,
    /// Largest peak-to-trough decline of the equity curve, in percent
    pub max_drawdown_pct: Decimal,
    /// Net profit relative to the initial balance, in percent
    pub total_return_pct: Decimal,
}

impl RunStatistics {
    /// Calculate statistics for a completed run.
    pub fn from_outcome(outcome: &SimulationOutcome) -> Self {
        let mut stats = Self {
            bars_processed: outcome.bars_processed(),
            total_trades: outcome.trades.len(),
            ..Default::default()
        };

        // Cost of the shares bought since the account was last flat
        let mut open_cost = Decimal::ZERO;
        for trade in &outcome.trades {
            match trade.side {
                Side::Buy => {
                    stats.buys += 1;
                    open_cost += trade.value();
                }
                Side::Sell => {
                    stats.sells += 1;
                    stats.round_trips += 1;
                    let pnl = trade.value() - open_cost;
                    if pnl > Decimal::ZERO {
                        stats.winning_trips += 1;
                    } else if pnl < Decimal::ZERO {
                        stats.losing_trips += 1;
                    }
                    stats.realized_pnl += pnl;
                    open_cost = Decimal::ZERO;
                }
            }
        }

        if stats.round_trips > 0 {
            stats.win_rate_pct =
                Decimal::from(stats.winning_trips * 100) / Decimal::from(stats.round_trips);
        }

        stats.max_drawdown_pct = max_drawdown_pct(outcome.initial_balance, &outcome.equity_curve);

        if outcome.initial_balance > Decimal::ZERO {
            stats.total_return_pct = outcome.net_profit / outcome.initial_balance * dec!(100);
        }

        stats
    }
}

fn max_drawdown_pct(initial: Decimal, equity_curve: &[(i64, Decimal)]) -> Decimal {
    let mut peak = initial;
    let mut max_drawdown = Decimal::ZERO;

    for &(_, equity) in equity_curve {
        if equity > peak {
            peak = equity;
        }
        if peak > Decimal::ZERO {
            let drawdown = (peak - equity) / peak * dec!(100);
            if drawdown > max_drawdown {
                max_drawdown = drawdown;
            }
        }
    }

    max_drawdown
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulate;
    use scalper_core::types::{Bar, Signal, SignaledBar};

    fn run(closes_and_signals: &[(f64, Signal)], balance: Decimal) -> SimulationOutcome {
        let bars: Vec<SignaledBar> = closes_and_signals
            .iter()
            .enumerate()
            .map(|(i, &(close, signal))| {
                SignaledBar::new(Bar::new(i as i64, close, close, close, close, 1.0), signal)
            })
            .collect();
        simulate(&bars, balance).unwrap()
    }

    #[test]
    fn test_round_trip_counts() {
        let outcome = run(
            &[
                (100.0, Signal::buy()),
                (110.0, Signal::sell()),
                (100.0, Signal::buy()),
                (80.0, Signal::sell()),
            ],
            dec!(1000),
        );
        let stats = RunStatistics::from_outcome(&outcome);

        assert_eq!(stats.bars_processed, 4);
        assert_eq!(stats.total_trades, 4);
        assert_eq!((stats.buys, stats.sells), (2, 2));
        assert_eq!(stats.round_trips, 2);
        assert_eq!(stats.winning_trips, 1);
        assert_eq!(stats.losing_trips, 1);
        assert_eq!(stats.win_rate_pct, dec!(50));
        // +100, then 11 shares: 880 - 1100 = -220
        assert_eq!(stats.realized_pnl, dec!(-120));
        assert_eq!(stats.total_return_pct, dec!(-12));
    }

    #[test]
    fn test_accumulated_buys_share_one_trip() {
        let outcome = run(
            &[
                (100.0, Signal::buy()),
                (50.0, Signal::buy()),
                (60.0, Signal::sell()),
            ],
            dec!(150),
        );
        let stats = RunStatistics::from_outcome(&outcome);

        // 1 share at 100, 1 at 50, both sold at 60: 120 - 150
        assert_eq!(stats.round_trips, 1);
        assert_eq!(stats.losing_trips, 1);
        assert_eq!(stats.realized_pnl, dec!(-30));
    }

    #[test]
    fn test_drawdown_from_equity_curve() {
        let outcome = run(
            &[
                (100.0, Signal::buy()),
                (120.0, Signal::NONE),
                (90.0, Signal::NONE),
                (130.0, Signal::NONE),
            ],
            dec!(1000),
        );
        let stats = RunStatistics::from_outcome(&outcome);

        // equity 1000, 1200, 900, 1300: peak 1200 to 900 is 25%
        assert_eq!(stats.max_drawdown_pct, dec!(25));
        assert_eq!(stats.round_trips, 0);
        assert_eq!(stats.win_rate_pct, Decimal::ZERO);
    }

    #[test]
    fn test_zero_balance_has_no_return() {
        let outcome = run(&[(10.0, Signal::buy())], Decimal::ZERO);
        let stats = RunStatistics::from_outcome(&outcome);
        assert_eq!(stats.total_return_pct, Decimal::ZERO);
        assert_eq!(stats.max_drawdown_pct, Decimal::ZERO);
    }
}
