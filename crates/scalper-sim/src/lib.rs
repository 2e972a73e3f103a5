//! Paper trading simulator.
//!
//! Walks a signaled bar table against a cash/shares ledger, summarizes the
//! run, and searches indicator parameters for the most profitable setting.

mod report;
mod simulator;
mod statistics;
mod sweep;

pub use report::SimulationReport;
pub use simulator::{simulate, simulate_signals, Account, SimulationOutcome};
pub use statistics::RunStatistics;
pub use sweep::{optimize, SweepCombination, SweepGrid, SweepOutcome, SweepRun, SweepSettings};
