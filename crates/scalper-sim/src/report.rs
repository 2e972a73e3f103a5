//! Simulation report generation.

use serde::{Deserialize, Serialize};

use crate::{RunStatistics, SimulationOutcome};

/// Complete report of one simulation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationReport {
    /// Registry key of the rule that produced the signals
    pub rule: String,
    /// Rule parameters used
    pub parameters: serde_json::Value,
    pub ticker: String,
    pub outcome: SimulationOutcome,
    pub statistics: RunStatistics,
}

impl SimulationReport {
    pub fn new(
        rule: impl Into<String>,
        parameters: serde_json::Value,
        ticker: impl Into<String>,
        outcome: SimulationOutcome,
    ) -> Self {
        let statistics = RunStatistics::from_outcome(&outcome);
        Self {
            rule: rule.into(),
            parameters,
            ticker: ticker.into(),
            outcome,
            statistics,
        }
    }

    /// One line per trade, in execution order.
    pub fn trade_log(&self) -> Vec<String> {
        self.outcome.trades.iter().map(|t| t.to_string()).collect()
    }

    /// Trade log followed by the final balance and net profit.
    pub fn ledger(&self) -> String {
        let mut s = String::from("Trade Log:\n");
        for line in self.trade_log() {
            s.push_str(&line);
            s.push('\n');
        }
        s.push_str(&format!(
            "\nFinal Balance: ${:.2}\n",
            self.outcome.final_balance
        ));
        s.push_str(&format!("Net Profit: ${:.2}\n", self.outcome.net_profit));
        s
    }

    /// Generate a text summary.
    pub fn summary(&self) -> String {
        let stats = &self.statistics;
        let mut s = String::new();

        s.push_str("═══════════════════════════════════════════════════════════\n");
        s.push_str("                    SIMULATION REPORT                      \n");
        s.push_str("═══════════════════════════════════════════════════════════\n\n");

        s.push_str(&format!("  Ticker:              {}\n", self.ticker));
        s.push_str(&format!("  Rule:                {}\n", self.rule));
        s.push_str(&format!("  Parameters:          {}\n", self.parameters));
        s.push('\n');

        s.push_str("PERFORMANCE\n");
        s.push_str("───────────────────────────────────────────────────────────\n");
        s.push_str(&format!(
            "  Initial Balance:     ${:.2}\n",
            self.outcome.initial_balance
        ));
        s.push_str(&format!(
            "  Final Balance:       ${:.2}\n",
            self.outcome.final_balance
        ));
        s.push_str(&format!(
            "  Net Profit:          ${:.2}\n",
            self.outcome.net_profit
        ));
        s.push_str(&format!(
            "  Total Return:        {:.2}%\n",
            stats.total_return_pct
        ));
        s.push_str(&format!(
            "  Max Drawdown:        {:.2}%\n",
            stats.max_drawdown_pct
        ));
        s.push_str(&format!(
            "  Open Shares:         {}\n",
            self.outcome.account.shares
        ));
        s.push('\n');

        s.push_str("TRADE STATISTICS\n");
        s.push_str("───────────────────────────────────────────────────────────\n");
        s.push_str(&format!("  Total Trades:        {}\n", stats.total_trades));
        s.push_str(&format!(
            "  Buys / Sells:        {} / {}\n",
            stats.buys, stats.sells
        ));
        s.push_str(&format!("  Round Trips:         {}\n", stats.round_trips));
        s.push_str(&format!("  Winning Trips:       {}\n", stats.winning_trips));
        s.push_str(&format!("  Losing Trips:        {}\n", stats.losing_trips));
        s.push_str(&format!(
            "  Win Rate:            {:.2}%\n",
            stats.win_rate_pct
        ));
        s.push_str(&format!(
            "  Realized P&L:        ${:.2}\n",
            stats.realized_pnl
        ));
        s.push_str(&format!("  Bars Processed:      {}\n", stats.bars_processed));
        s.push('\n');

        s.push_str("═══════════════════════════════════════════════════════════\n");

        s
    }

    /// Export to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Export the equity curve as CSV.
    pub fn equity_to_csv(&self) -> String {
        let mut csv = String::from("timestamp,equity\n");
        for (ts, equity) in &self.outcome.equity_curve {
            csv.push_str(&format!("{},{}\n", ts, equity));
        }
        csv
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulate;
    use rust_decimal_macros::dec;
    use scalper_core::types::{Bar, Signal, SignaledBar};

    fn report() -> SimulationReport {
        let bars = vec![
            SignaledBar::new(
                Bar::new(1_733_142_600_000, 100.0, 100.0, 100.0, 100.0, 10.0),
                Signal::buy(),
            ),
            SignaledBar::new(
                Bar::new(1_733_142_660_000, 110.0, 110.0, 110.0, 110.0, 10.0),
                Signal::sell(),
            ),
        ];
        let outcome = simulate(&bars, dec!(100000)).unwrap();
        SimulationReport::new("ema_rsi", serde_json::json!({ "ema_short": 9 }), "TSLA", outcome)
    }

    #[test]
    fn test_ledger_lines() {
        let report = report();

        assert_eq!(
            report.trade_log(),
            vec![
                "2024-12-02 12:30:00: BUY 1000 shares at $100.00, Balance: $0.00",
                "2024-12-02 12:31:00: SELL 1000 shares at $110.00, Balance: $110000.00",
            ]
        );
        let ledger = report.ledger();
        assert!(ledger.contains("Final Balance: $110000.00"));
        assert!(ledger.contains("Net Profit: $10000.00"));
    }

    #[test]
    fn test_report_summary() {
        let summary = report().summary();
        assert!(summary.contains("Total Return"));
        assert!(summary.contains("10.00%"));
        assert!(summary.contains("TSLA"));
    }

    #[test]
    fn test_report_json() {
        let json: serde_json::Value = serde_json::from_str(&report().to_json().unwrap()).unwrap();
        assert_eq!(json["rule"], "ema_rsi");
        assert_eq!(json["statistics"]["round_trips"], 1);
        assert_eq!(json["outcome"]["trades"][0]["side"], "BUY");
    }

    #[test]
    fn test_equity_csv() {
        let csv = report().equity_to_csv();
        assert!(csv.starts_with("timestamp,equity\n"));
        assert_eq!(csv.lines().count(), 3);
    }
}
