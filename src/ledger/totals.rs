//! All-time account totals. A direct flat sum over every trade and deposit,
//! deliberately independent of the monthly carry-forward; the two must agree
//! at the latest month with data.

use serde::{Deserialize, Serialize};

use crate::models::{DepositLedger, TradeRecord};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TotalBalance {
    pub initial_capital: f64,
    pub total_deposits: f64,
    pub all_time_pnl: f64,
    pub current_balance: f64,
}

pub fn compute_total_balance(
    trades: &[TradeRecord],
    deposits: &DepositLedger,
    initial_capital: f64,
) -> TotalBalance {
    let all_time_pnl: f64 = trades.iter().map(|t| t.final_result).sum();
    let total_deposits: f64 = deposits.values().map(|d| d.deposit).sum();

    TotalBalance {
        initial_capital,
        total_deposits,
        all_time_pnl,
        current_balance: initial_capital + total_deposits + all_time_pnl,
    }
}
