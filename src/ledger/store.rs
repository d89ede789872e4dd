//! The owned in-memory ledger. All mutation goes through the entry points
//! here so that validation and the `final_result = balance_trade - commission`
//! invariant hold for every record in the store.

use chrono::Utc;

use crate::error::LedgerError;
use crate::ledger::{balance, stats, totals};
use crate::models::{
    CreateTradeInput, DepositLedger, MonthDeposit, MonthKey, Settings, TradeRecord,
    UpdateSettingsInput, UpdateTradeInput,
};

#[derive(Debug, Clone, Default)]
pub struct Ledger {
    trades: Vec<TradeRecord>,
    deposits: DepositLedger,
    settings: Settings,
}

fn validate_trade_fields(pair: &str, balance_trade: f64, commission: f64) -> Result<(), LedgerError> {
    if pair.trim().is_empty() {
        return Err(LedgerError::Validation("Pair must not be empty".to_string()));
    }
    if !balance_trade.is_finite() {
        return Err(LedgerError::Validation(format!(
            "Balance must be a finite number, got {}",
            balance_trade
        )));
    }
    if !commission.is_finite() || commission < 0.0 {
        return Err(LedgerError::Validation(format!(
            "Commission must be a non-negative number, got {}",
            commission
        )));
    }
    Ok(())
}

fn validate_fraction(name: &str, value: f64) -> Result<(), LedgerError> {
    if !value.is_finite() || !(0.0..=1.0).contains(&value) {
        return Err(LedgerError::Validation(format!(
            "{} must be a fraction in [0, 1], got {}",
            name, value
        )));
    }
    Ok(())
}

fn new_trade_id() -> String {
    format!("TRADE-{}-{}", Utc::now().timestamp_millis(), uuid::Uuid::new_v4())
}

impl Ledger {
    pub fn new(settings: Settings) -> Self {
        Ledger {
            trades: Vec::new(),
            deposits: DepositLedger::new(),
            settings,
        }
    }

    /// Reassemble a ledger from persisted state. Every trade's
    /// `final_result` is recomputed; stored values are display copies only.
    pub fn from_parts(trades: Vec<TradeRecord>, deposits: DepositLedger, settings: Settings) -> Self {
        let mut ledger = Ledger {
            trades,
            deposits,
            settings,
        };
        for trade in &mut ledger.trades {
            trade.final_result = trade.balance_trade - trade.commission;
        }
        ledger
    }

    pub fn trades(&self) -> &[TradeRecord] {
        &self.trades
    }

    pub fn deposits(&self) -> &DepositLedger {
        &self.deposits
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn add_trade(&mut self, input: CreateTradeInput) -> Result<TradeRecord, LedgerError> {
        validate_trade_fields(&input.pair, input.balance_trade, input.commission)?;

        let record = TradeRecord {
            id: new_trade_id(),
            date: input.date,
            pair: input.pair,
            direction: input.direction,
            balance_trade: input.balance_trade,
            commission: input.commission,
            final_result: input.balance_trade - input.commission,
            notes: input.notes,
            created_at: Utc::now().timestamp(),
        };

        log::info!("Added trade {} ({} {} on {})", record.id, record.direction.as_str(), record.pair, record.date);
        self.trades.push(record.clone());
        Ok(record)
    }

    pub fn update_trade(&mut self, id: &str, update: UpdateTradeInput) -> Result<TradeRecord, LedgerError> {
        let index = self
            .trades
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(|| LedgerError::UnknownTrade(id.to_string()))?;

        // Validate the candidate before touching the stored record so a
        // rejected update leaves the store unchanged.
        let mut candidate = self.trades[index].clone();
        if let Some(date) = update.date {
            candidate.date = date;
        }
        if let Some(pair) = update.pair {
            candidate.pair = pair;
        }
        if let Some(direction) = update.direction {
            candidate.direction = direction;
        }
        if let Some(balance_trade) = update.balance_trade {
            candidate.balance_trade = balance_trade;
        }
        if let Some(commission) = update.commission {
            candidate.commission = commission;
        }
        if let Some(notes) = update.notes {
            candidate.notes = Some(notes);
        }

        validate_trade_fields(&candidate.pair, candidate.balance_trade, candidate.commission)?;
        candidate.final_result = candidate.balance_trade - candidate.commission;

        log::info!("Updated trade {}", candidate.id);
        self.trades[index] = candidate.clone();
        Ok(candidate)
    }

    pub fn delete_trade(&mut self, id: &str) -> Result<(), LedgerError> {
        let index = self
            .trades
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(|| LedgerError::UnknownTrade(id.to_string()))?;
        self.trades.remove(index);
        log::info!("Deleted trade {}", id);
        Ok(())
    }

    pub fn set_month_deposit(&mut self, month: MonthKey, deposit: f64) -> Result<(), LedgerError> {
        if !deposit.is_finite() || deposit < 0.0 {
            return Err(LedgerError::Validation(format!(
                "Deposit must be a non-negative number, got {}",
                deposit
            )));
        }
        self.deposits.insert(month, MonthDeposit { deposit });
        log::info!("Set deposit for {} to {}", month, deposit);
        Ok(())
    }

    pub fn month_deposit(&self, month: MonthKey) -> f64 {
        balance::month_deposit(&self.deposits, month)
    }

    pub fn update_settings(&mut self, input: UpdateSettingsInput) -> Result<&Settings, LedgerError> {
        if let Some(v) = input.risk_per_trade {
            validate_fraction("risk_per_trade", v)?;
        }
        if let Some(v) = input.max_daily_risk {
            validate_fraction("max_daily_risk", v)?;
        }
        if let Some(v) = input.max_margin_percent {
            validate_fraction("max_margin_percent", v)?;
        }

        if let Some(v) = input.initial_account_balance {
            self.settings.initial_account_balance = v;
        }
        if let Some(v) = input.base_month {
            self.settings.base_month = Some(v);
        }
        if let Some(v) = input.account_capital {
            self.settings.account_capital = v;
        }
        if let Some(v) = input.risk_per_trade {
            self.settings.risk_per_trade = v;
        }
        if let Some(v) = input.max_daily_risk {
            self.settings.max_daily_risk = v;
        }
        if let Some(v) = input.default_leverage {
            self.settings.default_leverage = v;
        }
        if let Some(v) = input.max_margin_percent {
            self.settings.max_margin_percent = v;
        }

        Ok(&self.settings)
    }

    /// Trades dated in `month`, sorted by date. Store order is insertion
    /// order and never carries meaning.
    pub fn monthly_trades(&self, month: MonthKey) -> Vec<TradeRecord> {
        let mut trades: Vec<TradeRecord> = self
            .trades
            .iter()
            .filter(|t| month.contains(t.date))
            .cloned()
            .collect();
        trades.sort_by_key(|t| t.date);
        trades
    }

    pub fn base_month(&self) -> MonthKey {
        balance::base_month(&self.trades, &self.settings)
    }

    pub fn starting_balance(&self, month: MonthKey) -> f64 {
        balance::starting_balance(&self.trades, &self.deposits, &self.settings, month)
    }

    pub fn ending_balance(&self, month: MonthKey) -> f64 {
        balance::ending_balance(&self.trades, &self.deposits, &self.settings, month)
    }

    pub fn stats_for(&self, month: MonthKey) -> stats::MonthlyStats {
        stats::compute_stats(
            &self.monthly_trades(month),
            self.starting_balance(month),
            self.month_deposit(month),
        )
    }

    pub fn total_balance(&self) -> totals::TotalBalance {
        totals::compute_total_balance(
            &self.trades,
            &self.deposits,
            self.settings.initial_account_balance,
        )
    }

    pub(crate) fn replace_all(
        &mut self,
        trades: Vec<TradeRecord>,
        deposits: DepositLedger,
        settings: Settings,
    ) {
        *self = Ledger::from_parts(trades, deposits, settings);
    }
}
