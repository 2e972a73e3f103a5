//! Parameter grid search over the EMA/RSI band rule.
//!
//! Every combination is an independent run over the same read-only bars, so
//! runs execute in parallel and are collected back in enumeration order.

use rayon::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use scalper_core::error::{SimulationError, SweepError};
use scalper_core::traits::SignalRule;
use scalper_core::types::{validate_bars, Bar};
use scalper_signals::{EmaRsiConfig, EmaRsiRule};
use tracing::{debug, info};

use crate::simulate;

/// One point of the grid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SweepCombination {
    pub ema_short: usize,
    pub ema_long: usize,
    pub rsi_lower: f64,
    pub rsi_upper: f64,
}

impl SweepCombination {
    fn rule_config(&self, rsi_window: usize) -> EmaRsiConfig {
        EmaRsiConfig {
            ema_short: self.ema_short,
            ema_long: self.ema_long,
            rsi_window,
            rsi_lower: self.rsi_lower,
            rsi_upper: self.rsi_upper,
        }
    }
}

/// Grid of EMA pairs crossed with RSI bands.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SweepGrid {
    pub ema_pairs: Vec<(usize, usize)>,
    pub rsi_bands: Vec<(f64, f64)>,
}

impl SweepGrid {
    pub fn new(ema_pairs: Vec<(usize, usize)>, rsi_bands: Vec<(f64, f64)>) -> Self {
        Self {
            ema_pairs,
            rsi_bands,
        }
    }

    /// Build the grid from independent value lists.
    pub fn cartesian(
        ema_short: &[usize],
        ema_long: &[usize],
        rsi_lower: &[f64],
        rsi_upper: &[f64],
    ) -> Self {
        let ema_pairs = ema_short
            .iter()
            .flat_map(|&s| ema_long.iter().map(move |&l| (s, l)))
            .collect();
        let rsi_bands = rsi_lower
            .iter()
            .flat_map(|&lo| rsi_upper.iter().map(move |&hi| (lo, hi)))
            .collect();
        Self::new(ema_pairs, rsi_bands)
    }

    /// Valid combinations in enumeration order (EMA pair major), and the
    /// number skipped because the short EMA is not shorter than the long one.
    pub fn combinations(&self) -> (Vec<SweepCombination>, usize) {
        let mut combos = Vec::new();
        let mut skipped = 0;

        for &(ema_short, ema_long) in &self.ema_pairs {
            for &(rsi_lower, rsi_upper) in &self.rsi_bands {
                if ema_short >= ema_long {
                    debug!(ema_short, ema_long, "Skipping EMA pair");
                    skipped += 1;
                    continue;
                }
                combos.push(SweepCombination {
                    ema_short,
                    ema_long,
                    rsi_lower,
                    rsi_upper,
                });
            }
        }

        (combos, skipped)
    }

    pub fn len(&self) -> usize {
        self.ema_pairs.len() * self.rsi_bands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Settings shared by every run of a sweep.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepSettings {
    pub initial_balance: Decimal,
    pub rsi_window: usize,
    /// Worker threads; the global rayon pool when unset
    pub threads: Option<usize>,
}

impl Default for SweepSettings {
    fn default() -> Self {
        Self {
            initial_balance: dec!(100000),
            rsi_window: 14,
            threads: None,
        }
    }
}

/// Result of one combination.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepRun {
    pub params: SweepCombination,
    pub net_profit: Decimal,
    pub final_balance: Decimal,
    pub trades: usize,
}

/// Result of a whole sweep.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepOutcome {
    /// Highest net profit, first enumerated on ties
    pub best: SweepRun,
    /// Every run in enumeration order
    pub runs: Vec<SweepRun>,
    /// Combinations skipped as invalid
    pub skipped: usize,
}

impl SweepOutcome {
    /// Runs ordered by net profit, best first.
    pub fn leaderboard(&self) -> Vec<&SweepRun> {
        let mut runs: Vec<&SweepRun> = self.runs.iter().collect();
        runs.sort_by(|a, b| b.net_profit.cmp(&a.net_profit));
        runs
    }
}

/// Evaluate every valid combination of the grid and pick the most profitable.
pub fn optimize(
    bars: &[Bar],
    grid: &SweepGrid,
    settings: &SweepSettings,
) -> Result<SweepOutcome, SweepError> {
    if bars.is_empty() {
        return Err(SimulationError::EmptySeries.into());
    }
    validate_bars(bars).map_err(SimulationError::from)?;

    let (combos, skipped) = grid.combinations();
    if combos.is_empty() {
        return Err(SweepError::EmptyGrid { skipped });
    }

    info!(
        combinations = combos.len(),
        skipped,
        bars = bars.len(),
        "Starting parameter sweep"
    );

    let runs = match settings.threads {
        Some(threads) => rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build()
            .map_err(|e| SweepError::ThreadPool(e.to_string()))?
            .install(|| run_all(bars, &combos, settings))?,
        None => run_all(bars, &combos, settings)?,
    };

    let mut best = &runs[0];
    for run in &runs[1..] {
        if run.net_profit > best.net_profit {
            best = run;
        }
    }
    let best = best.clone();

    info!(
        ema_short = best.params.ema_short,
        ema_long = best.params.ema_long,
        rsi_lower = best.params.rsi_lower,
        rsi_upper = best.params.rsi_upper,
        net_profit = %best.net_profit,
        "Sweep complete"
    );

    Ok(SweepOutcome {
        best,
        runs,
        skipped,
    })
}

fn run_all(
    bars: &[Bar],
    combos: &[SweepCombination],
    settings: &SweepSettings,
) -> Result<Vec<SweepRun>, SweepError> {
    combos
        .par_iter()
        .map(|combo| run_one(bars, combo, settings))
        .collect()
}

fn run_one(
    bars: &[Bar],
    combo: &SweepCombination,
    settings: &SweepSettings,
) -> Result<SweepRun, SweepError> {
    let rule = EmaRsiRule::new(combo.rule_config(settings.rsi_window))?;
    let outcome = simulate(&rule.annotate(bars), settings.initial_balance)?;

    debug!(
        ema_short = combo.ema_short,
        ema_long = combo.ema_long,
        rsi_lower = combo.rsi_lower,
        rsi_upper = combo.rsi_upper,
        net_profit = %outcome.net_profit,
        "Combination evaluated"
    );

    Ok(SweepRun {
        params: *combo,
        net_profit: outcome.net_profit,
        final_balance: outcome.final_balance,
        trades: outcome.trades.len(),
    })
}
