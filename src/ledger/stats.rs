//! Month-scoped aggregate statistics over a set of trades.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::models::{Direction, TradeRecord};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PairStats {
    pub trades: usize,
    pub profit: f64,
    pub wins: usize,
}

/// The full statistics bundle for one month of trading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyStats {
    pub total_trades: usize,
    pub winning_trades: usize,
    pub losing_trades: usize,
    pub win_rate: f64,
    pub total_profit: f64,
    pub total_loss: f64,
    pub net_result: f64,
    pub total_commissions: f64,
    pub average_win: f64,
    pub average_loss: f64,
    pub profit_factor: f64,
    pub largest_win: f64,
    pub largest_loss: f64,
    pub month_starting_balance: f64,
    pub month_deposit: f64,
    pub operating_capital: f64,
    pub month_ending_balance: f64,
    pub month_pnl: f64,
    pub month_pnl_percent: f64,
    pub long_trades: usize,
    pub short_trades: usize,
    pub long_win_rate: f64,
    pub short_win_rate: f64,
    pub by_pair: HashMap<String, PairStats>,
}

impl MonthlyStats {
    /// Bundle for a month with no trades: every rate and average is zero and
    /// the ending balance is just the operating capital.
    fn empty(starting_balance: f64, month_deposit: f64) -> Self {
        let operating_capital = starting_balance + month_deposit;
        MonthlyStats {
            total_trades: 0,
            winning_trades: 0,
            losing_trades: 0,
            win_rate: 0.0,
            total_profit: 0.0,
            total_loss: 0.0,
            net_result: 0.0,
            total_commissions: 0.0,
            average_win: 0.0,
            average_loss: 0.0,
            profit_factor: 0.0,
            largest_win: 0.0,
            largest_loss: 0.0,
            month_starting_balance: starting_balance,
            month_deposit,
            operating_capital,
            month_ending_balance: operating_capital,
            month_pnl: 0.0,
            month_pnl_percent: 0.0,
            long_trades: 0,
            short_trades: 0,
            long_win_rate: 0.0,
            short_win_rate: 0.0,
            by_pair: HashMap::new(),
        }
    }
}

fn win_rate(wins: usize, total: usize) -> f64 {
    if total > 0 {
        wins as f64 / total as f64 * 100.0
    } else {
        0.0
    }
}

/// Aggregate one month's trades against its starting balance and deposit.
///
/// A winner is `balance_trade > 0`, a loser `balance_trade < 0`; breakeven
/// trades count toward the total only. Division-by-zero cases are defined
/// results, never errors: empty buckets yield 0, and a month with wins but
/// no losses has an infinite profit factor.
pub fn compute_stats(
    month_trades: &[TradeRecord],
    starting_balance: f64,
    month_deposit: f64,
) -> MonthlyStats {
    if month_trades.is_empty() {
        return MonthlyStats::empty(starting_balance, month_deposit);
    }

    let operating_capital = starting_balance + month_deposit;

    let winners: Vec<&TradeRecord> =
        month_trades.iter().filter(|t| t.balance_trade > 0.0).collect();
    let losers: Vec<&TradeRecord> =
        month_trades.iter().filter(|t| t.balance_trade < 0.0).collect();

    let total_profit: f64 = winners.iter().map(|t| t.balance_trade).sum();
    let total_loss: f64 = losers.iter().map(|t| t.balance_trade).sum::<f64>().abs();
    let total_commissions: f64 = month_trades.iter().map(|t| t.commission).sum();
    let net_result: f64 = month_trades.iter().map(|t| t.final_result).sum();

    // "No losses, only wins" is meaningfully different from "no trades":
    // the former is an infinite factor, the latter zero.
    let profit_factor = if total_loss > 0.0 {
        total_profit / total_loss
    } else if total_profit > 0.0 {
        f64::INFINITY
    } else {
        0.0
    };

    let largest_win = winners
        .iter()
        .map(|t| t.balance_trade)
        .fold(f64::NEG_INFINITY, f64::max);
    let largest_loss = losers
        .iter()
        .map(|t| t.balance_trade)
        .fold(f64::INFINITY, f64::min);

    let long_trades: Vec<&TradeRecord> = month_trades
        .iter()
        .filter(|t| t.direction == Direction::Long)
        .collect();
    let short_trades: Vec<&TradeRecord> = month_trades
        .iter()
        .filter(|t| t.direction == Direction::Short)
        .collect();
    let long_wins = long_trades.iter().filter(|t| t.balance_trade > 0.0).count();
    let short_wins = short_trades.iter().filter(|t| t.balance_trade > 0.0).count();

    let mut by_pair: HashMap<String, PairStats> = HashMap::new();
    for trade in month_trades {
        let entry = by_pair.entry(trade.pair.clone()).or_default();
        entry.trades += 1;
        entry.profit += trade.final_result;
        if trade.balance_trade > 0.0 {
            entry.wins += 1;
        }
    }

    let month_ending_balance = operating_capital + net_result;
    let month_pnl_percent = if operating_capital > 0.0 {
        net_result / operating_capital * 100.0
    } else {
        0.0
    };

    MonthlyStats {
        total_trades: month_trades.len(),
        winning_trades: winners.len(),
        losing_trades: losers.len(),
        win_rate: win_rate(winners.len(), month_trades.len()),
        total_profit,
        total_loss,
        net_result,
        total_commissions,
        average_win: if winners.is_empty() { 0.0 } else { total_profit / winners.len() as f64 },
        average_loss: if losers.is_empty() { 0.0 } else { total_loss / losers.len() as f64 },
        profit_factor,
        largest_win: if winners.is_empty() { 0.0 } else { largest_win },
        largest_loss: if losers.is_empty() { 0.0 } else { largest_loss },
        month_starting_balance: starting_balance,
        month_deposit,
        operating_capital,
        month_ending_balance,
        month_pnl: net_result,
        month_pnl_percent,
        long_trades: long_trades.len(),
        short_trades: short_trades.len(),
        long_win_rate: win_rate(long_wins, long_trades.len()),
        short_win_rate: win_rate(short_wins, short_trades.len()),
        by_pair,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn trade(pair: &str, direction: Direction, balance_trade: f64, commission: f64) -> TradeRecord {
        TradeRecord {
            id: format!("T-{}-{}", pair, balance_trade),
            date: NaiveDate::from_ymd_opt(2024, 5, 10).unwrap(),
            pair: pair.to_string(),
            direction,
            balance_trade,
            commission,
            final_result: balance_trade - commission,
            notes: None,
            created_at: 0,
        }
    }

    #[test]
    fn test_mixed_month_scenario() {
        let trades = vec![
            trade("BTC/USDT", Direction::Long, 100.0, 5.0),
            trade("ETH/USDT", Direction::Short, -40.0, 2.0),
        ];
        let stats = compute_stats(&trades, 0.0, 0.0);

        assert_eq!(stats.total_trades, 2);
        assert_eq!(stats.winning_trades, 1);
        assert_eq!(stats.losing_trades, 1);
        assert_eq!(stats.total_profit, 100.0);
        assert_eq!(stats.total_loss, 40.0);
        assert_eq!(stats.profit_factor, 2.5);
        assert_eq!(stats.net_result, 53.0);
        assert_eq!(stats.total_commissions, 7.0);
        assert_eq!(stats.month_ending_balance, 53.0);
        assert_eq!(stats.win_rate, 50.0);
        assert_eq!(stats.largest_win, 100.0);
        assert_eq!(stats.largest_loss, -40.0);
    }

    #[test]
    fn test_empty_month_passes_capital_through() {
        let stats = compute_stats(&[], 200.0, 50.0);

        assert_eq!(stats.operating_capital, 250.0);
        assert_eq!(stats.month_ending_balance, 250.0);
        assert_eq!(stats.win_rate, 0.0);
        assert_eq!(stats.profit_factor, 0.0);
        assert_eq!(stats.average_win, 0.0);
        assert_eq!(stats.average_loss, 0.0);
        assert_eq!(stats.month_pnl_percent, 0.0);
        assert!(stats.by_pair.is_empty());
    }

    #[test]
    fn test_profit_factor_infinite_when_no_losses() {
        let trades = vec![trade("BTC/USDT", Direction::Long, 60.0, 1.0)];
        let stats = compute_stats(&trades, 0.0, 0.0);
        assert!(stats.profit_factor.is_infinite() && stats.profit_factor > 0.0);
    }

    #[test]
    fn test_profit_factor_zero_when_only_breakevens() {
        let trades = vec![trade("BTC/USDT", Direction::Long, 0.0, 1.0)];
        let stats = compute_stats(&trades, 0.0, 0.0);
        assert_eq!(stats.profit_factor, 0.0);
        assert_eq!(stats.winning_trades, 0);
        assert_eq!(stats.losing_trades, 0);
        assert_eq!(stats.total_trades, 1);
    }

    #[test]
    fn test_breakeven_counts_toward_total_only() {
        let trades = vec![
            trade("BTC/USDT", Direction::Long, 10.0, 0.0),
            trade("BTC/USDT", Direction::Long, 0.0, 0.0),
        ];
        let stats = compute_stats(&trades, 0.0, 0.0);
        assert_eq!(stats.total_trades, 2);
        assert_eq!(stats.winning_trades, 1);
        assert_eq!(stats.win_rate, 50.0);
    }

    #[test]
    fn test_direction_split() {
        let trades = vec![
            trade("BTC/USDT", Direction::Long, 30.0, 0.0),
            trade("BTC/USDT", Direction::Long, -10.0, 0.0),
            trade("ETH/USDT", Direction::Short, 20.0, 0.0),
        ];
        let stats = compute_stats(&trades, 0.0, 0.0);
        assert_eq!(stats.long_trades, 2);
        assert_eq!(stats.short_trades, 1);
        assert_eq!(stats.long_win_rate, 50.0);
        assert_eq!(stats.short_win_rate, 100.0);
    }

    #[test]
    fn test_by_pair_breakdown() {
        let trades = vec![
            trade("BTC/USDT", Direction::Long, 30.0, 2.0),
            trade("BTC/USDT", Direction::Long, -10.0, 1.0),
            trade("ETH/USDT", Direction::Short, 20.0, 0.5),
        ];
        let stats = compute_stats(&trades, 0.0, 0.0);

        let btc = &stats.by_pair["BTC/USDT"];
        assert_eq!(btc.trades, 2);
        assert_eq!(btc.profit, 28.0 + -11.0);
        assert_eq!(btc.wins, 1);

        let eth = &stats.by_pair["ETH/USDT"];
        assert_eq!(eth.trades, 1);
        assert_eq!(eth.profit, 19.5);
        assert_eq!(eth.wins, 1);
    }

    #[test]
    fn test_pnl_percent_over_operating_capital() {
        let trades = vec![trade("BTC/USDT", Direction::Long, 50.0, 0.0)];
        let stats = compute_stats(&trades, 150.0, 50.0);
        assert_eq!(stats.operating_capital, 200.0);
        assert_eq!(stats.month_pnl_percent, 25.0);
        assert_eq!(stats.month_ending_balance, 250.0);
    }

    #[test]
    fn test_zero_operating_capital_gives_zero_percent() {
        let trades = vec![trade("BTC/USDT", Direction::Long, 50.0, 0.0)];
        let stats = compute_stats(&trades, 0.0, 0.0);
        assert_eq!(stats.month_pnl_percent, 0.0);
    }

    #[test]
    fn test_order_independence_and_idempotence() {
        let trades = vec![
            trade("BTC/USDT", Direction::Long, 100.0, 5.0),
            trade("ETH/USDT", Direction::Short, -40.0, 2.0),
            trade("SOL/USDT", Direction::Long, 0.0, 1.0),
            trade("BTC/USDT", Direction::Short, 15.0, 0.5),
        ];
        let mut reversed = trades.clone();
        reversed.reverse();

        let a = compute_stats(&trades, 100.0, 20.0);
        let b = compute_stats(&reversed, 100.0, 20.0);
        let c = compute_stats(&trades, 100.0, 20.0);

        assert_eq!(a, b);
        assert_eq!(a, c);
    }
}
