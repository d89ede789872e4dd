//! Balance carry-forward. Balances are never stored; they are derived from
//! the trade list, the deposit ledger and the settings on every call, so
//! edits to historical months ripple forward without any invalidation pass.

use crate::models::{DepositLedger, MonthKey, Settings, TradeRecord};

/// Anchor month at which `initial_account_balance` applies directly:
/// the explicitly configured base month, else the earliest month with a
/// trade, else the current month.
pub fn base_month(trades: &[TradeRecord], settings: &Settings) -> MonthKey {
    if let Some(base) = settings.base_month {
        return base;
    }
    trades
        .iter()
        .map(|t| t.month_key())
        .min()
        .unwrap_or_else(MonthKey::current)
}

/// Realized P&L of one calendar month: commission-inclusive sum over the
/// trades dated inside it.
pub fn month_pnl(trades: &[TradeRecord], month: MonthKey) -> f64 {
    trades
        .iter()
        .filter(|t| month.contains(t.date))
        .map(|t| t.final_result)
        .sum()
}

pub fn month_deposit(deposits: &DepositLedger, month: MonthKey) -> f64 {
    deposits.get(&month).map(|d| d.deposit).unwrap_or(0.0)
}

/// Balance at the start of `month`, before that month's deposit and trades.
///
/// Walks backward one month at a time to the base month, folding in each
/// elapsed month's deposit and P&L. Months before or at the base month
/// start at `initial_account_balance`; trades dated strictly before the
/// base month never enter the running balance.
pub fn starting_balance(
    trades: &[TradeRecord],
    deposits: &DepositLedger,
    settings: &Settings,
    month: MonthKey,
) -> f64 {
    let base = base_month(trades, settings);

    if month <= base {
        return settings.initial_account_balance;
    }

    let prev = month.previous();
    if prev == base {
        return settings.initial_account_balance
            + month_deposit(deposits, base)
            + month_pnl(trades, base);
    }

    starting_balance(trades, deposits, settings, prev)
        + month_deposit(deposits, prev)
        + month_pnl(trades, prev)
}

/// Balance at the end of `month`: starting balance plus that month's
/// deposit and P&L.
pub fn ending_balance(
    trades: &[TradeRecord],
    deposits: &DepositLedger,
    settings: &Settings,
    month: MonthKey,
) -> f64 {
    starting_balance(trades, deposits, settings, month)
        + month_deposit(deposits, month)
        + month_pnl(trades, month)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Direction, MonthDeposit};
    use chrono::NaiveDate;

    fn trade(date: &str, balance_trade: f64, commission: f64) -> TradeRecord {
        let date = NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap();
        TradeRecord {
            id: format!("T-{}-{}", date, balance_trade),
            date,
            pair: "BTC/USDT".to_string(),
            direction: Direction::Long,
            balance_trade,
            commission,
            final_result: balance_trade - commission,
            notes: None,
            created_at: 0,
        }
    }

    fn month(s: &str) -> MonthKey {
        MonthKey::parse(s).unwrap()
    }

    fn settings(initial: f64, base: Option<&str>) -> Settings {
        Settings {
            initial_account_balance: initial,
            base_month: base.map(month),
            ..Settings::default()
        }
    }

    #[test]
    fn test_base_month_prefers_explicit_setting() {
        let trades = vec![trade("2024-03-10", 50.0, 0.0)];
        let s = settings(0.0, Some("2024-01"));
        assert_eq!(base_month(&trades, &s), month("2024-01"));
    }

    #[test]
    fn test_base_month_falls_back_to_earliest_trade() {
        let trades = vec![
            trade("2024-05-02", 10.0, 0.0),
            trade("2024-02-17", -5.0, 0.0),
            trade("2024-03-10", 50.0, 0.0),
        ];
        assert_eq!(base_month(&trades, &settings(0.0, None)), month("2024-02"));
    }

    #[test]
    fn test_base_month_defaults_to_current_month() {
        assert_eq!(base_month(&[], &settings(0.0, None)), MonthKey::current());
    }

    #[test]
    fn test_starting_balance_at_or_before_base_is_initial() {
        let trades = vec![trade("2024-01-05", 999.0, 0.0)];
        let s = settings(150.0, Some("2024-01"));
        let deposits = DepositLedger::new();

        // Trade content in the base month never affects its starting balance.
        assert_eq!(starting_balance(&trades, &deposits, &s, month("2024-01")), 150.0);
        assert_eq!(starting_balance(&trades, &deposits, &s, month("2023-06")), 150.0);
    }

    #[test]
    fn test_three_month_carry_forward() {
        // Deposits 100, 0, 50 and P&L -20, +30, +10 from a zero start.
        let trades = vec![
            trade("2024-01-10", -20.0, 0.0),
            trade("2024-02-15", 30.0, 0.0),
            trade("2024-03-20", 10.0, 0.0),
        ];
        let mut deposits = DepositLedger::new();
        deposits.insert(month("2024-01"), MonthDeposit { deposit: 100.0 });
        deposits.insert(month("2024-03"), MonthDeposit { deposit: 50.0 });
        let s = settings(0.0, Some("2024-01"));

        assert_eq!(starting_balance(&trades, &deposits, &s, month("2024-03")), 110.0);
        assert_eq!(ending_balance(&trades, &deposits, &s, month("2024-03")), 170.0);
    }

    #[test]
    fn test_invariant_over_six_months_with_gaps() {
        // Months 2024-01..2024-06; 03 and 05 have no trades and no deposits.
        let trades = vec![
            trade("2024-01-03", 40.0, 5.0),
            trade("2024-02-11", -30.0, 2.0),
            trade("2024-04-09", 75.0, 3.0),
            trade("2024-06-28", -10.0, 1.0),
        ];
        let mut deposits = DepositLedger::new();
        deposits.insert(month("2024-01"), MonthDeposit { deposit: 200.0 });
        deposits.insert(month("2024-04"), MonthDeposit { deposit: 80.0 });
        let s = settings(100.0, None);

        for key in ["2024-01", "2024-02", "2024-03", "2024-04", "2024-05", "2024-06"] {
            let m = month(key);
            let expected = starting_balance(&trades, &deposits, &s, m)
                + month_deposit(&deposits, m)
                + month_pnl(&trades, m);
            assert_eq!(ending_balance(&trades, &deposits, &s, m), expected);
        }

        // Pass-through month: no trades, no deposit.
        assert_eq!(
            starting_balance(&trades, &deposits, &s, month("2024-03")),
            ending_balance(&trades, &deposits, &s, month("2024-02"))
        );
        assert_eq!(
            starting_balance(&trades, &deposits, &s, month("2024-04")),
            ending_balance(&trades, &deposits, &s, month("2024-03"))
        );
    }

    #[test]
    fn test_trades_before_base_month_are_excluded() {
        let trades = vec![
            trade("2023-11-05", 1000.0, 0.0),
            trade("2024-01-10", 25.0, 0.0),
        ];
        let s = settings(50.0, Some("2024-01"));
        let deposits = DepositLedger::new();

        assert_eq!(starting_balance(&trades, &deposits, &s, month("2024-02")), 75.0);
    }

    #[test]
    fn test_historical_edit_ripples_forward() {
        let mut trades = vec![trade("2024-01-10", 20.0, 0.0)];
        let s = settings(0.0, Some("2024-01"));
        let deposits = DepositLedger::new();

        assert_eq!(starting_balance(&trades, &deposits, &s, month("2024-04")), 20.0);

        // Amending the historical month changes every later month.
        trades[0].balance_trade = 120.0;
        trades[0].final_result = 120.0;
        assert_eq!(starting_balance(&trades, &deposits, &s, month("2024-04")), 120.0);
    }
}
