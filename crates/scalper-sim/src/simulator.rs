//! Signal-driven trade simulator.
//!
//! A single pass over the bars in order. On each bar the buy side is checked
//! first: with a buy flag and cash on hand, as many whole shares as the cash
//! covers are bought at the close. Only when that branch is not taken is the
//! sell side checked, which liquidates the whole position.

use num_traits::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use scalper_core::error::{DataError, SimulationError};
use scalper_core::types::{validate_bars, Bar, Side, Signal, SignaledBar, TradeRecord};
use tracing::{debug, info};

/// Cash/share ledger of one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub cash: Decimal,
    pub shares: u64,
}

impl Account {
    pub fn new(cash: Decimal) -> Self {
        Self { cash, shares: 0 }
    }

    /// Mark-to-market value at `price`, `None` when it leaves the decimal range.
    pub fn equity(&self, price: Decimal) -> Option<Decimal> {
        Decimal::from(self.shares)
            .checked_mul(price)?
            .checked_add(self.cash)
    }
}

/// Result of a completed run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationOutcome {
    pub initial_balance: Decimal,
    /// Trades in execution order
    pub trades: Vec<TradeRecord>,
    /// Ledger after the last bar
    pub account: Account,
    /// Close of the last bar
    pub last_close: Decimal,
    /// `cash + shares * last_close`
    pub final_balance: Decimal,
    /// `final_balance - initial_balance`
    pub net_profit: Decimal,
    /// Mark-to-market equity after each bar
    pub equity_curve: Vec<(i64, Decimal)>,
}

impl SimulationOutcome {
    pub fn bars_processed(&self) -> usize {
        self.equity_curve.len()
    }
}

/// Run the simulator over bars with attached signals.
///
/// The input is validated first; any invalid bar fails the run without
/// producing a partial outcome.
pub fn simulate(
    bars: &[SignaledBar],
    initial_balance: Decimal,
) -> Result<SimulationOutcome, SimulationError> {
    if initial_balance < Decimal::ZERO {
        return Err(SimulationError::NegativeBalance(initial_balance));
    }
    if bars.is_empty() {
        return Err(SimulationError::EmptySeries);
    }
    let raw: Vec<Bar> = bars.iter().map(|b| b.bar).collect();
    validate_bars(&raw)?;

    let mut account = Account::new(initial_balance);
    let mut trades = Vec::new();
    let mut equity_curve = Vec::with_capacity(bars.len());
    let mut last_close = Decimal::ZERO;
    let mut final_balance = initial_balance;

    for (index, SignaledBar { bar, signal }) in bars.iter().enumerate() {
        let price = to_price(index, bar.close)?;

        if signal.buy && account.cash > Decimal::ZERO {
            let quantity = account
                .cash
                .checked_div(price)
                .ok_or(SimulationError::QuantityOverflow { index })?
                .floor()
                .to_u64()
                .ok_or(SimulationError::QuantityOverflow { index })?;

            if quantity > 0 {
                let cost = Decimal::from(quantity)
                    .checked_mul(price)
                    .ok_or(SimulationError::QuantityOverflow { index })?;
                account.cash -= cost;
                account.shares = account
                    .shares
                    .checked_add(quantity)
                    .ok_or(SimulationError::QuantityOverflow { index })?;
                trades.push(record(bar, Side::Buy, quantity, price, account.cash));
                debug!(index, quantity, %price, cash = %account.cash, "BUY");
            }
        } else if signal.sell && account.shares > 0 {
            let quantity = account.shares;
            let proceeds = Decimal::from(quantity)
                .checked_mul(price)
                .ok_or(SimulationError::ValueOverflow { index })?;
            account.cash = account
                .cash
                .checked_add(proceeds)
                .ok_or(SimulationError::ValueOverflow { index })?;
            account.shares = 0;
            trades.push(record(bar, Side::Sell, quantity, price, account.cash));
            debug!(index, quantity, %price, cash = %account.cash, "SELL");
        }

        let equity = account
            .equity(price)
            .ok_or(SimulationError::ValueOverflow { index })?;
        equity_curve.push((bar.timestamp, equity));
        last_close = price;
        final_balance = equity;
    }

    let net_profit = final_balance - initial_balance;

    info!(
        bars = bars.len(),
        trades = trades.len(),
        %final_balance,
        %net_profit,
        "Simulation complete"
    );

    Ok(SimulationOutcome {
        initial_balance,
        trades,
        account,
        last_close,
        final_balance,
        net_profit,
        equity_curve,
    })
}

/// Run the simulator over bars and a separately computed signal column.
pub fn simulate_signals(
    bars: &[Bar],
    signals: &[Signal],
    initial_balance: Decimal,
) -> Result<SimulationOutcome, SimulationError> {
    if bars.len() != signals.len() {
        return Err(SimulationError::LengthMismatch {
            bars: bars.len(),
            signals: signals.len(),
        });
    }
    let annotated: Vec<SignaledBar> = bars
        .iter()
        .zip(signals)
        .map(|(bar, signal)| SignaledBar::new(*bar, *signal))
        .collect();
    simulate(&annotated, initial_balance)
}

fn to_price(index: usize, close: f64) -> Result<Decimal, SimulationError> {
    Decimal::try_from(close).map_err(|e| {
        SimulationError::InvalidInput(DataError::InvalidBar {
            index,
            reason: format!("close {} is not representable: {}", close, e),
        })
    })
}

fn record(bar: &Bar, side: Side, quantity: u64, price: Decimal, balance: Decimal) -> TradeRecord {
    TradeRecord {
        timestamp: bar.datetime(),
        side,
        quantity,
        price,
        balance,
    }
}
