//! Whole-state export/import. A snapshot is the plain JSON form of the
//! ledger; import validates the shape first and replaces state wholesale,
//! never partially.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::error::LedgerError;
use crate::ledger::Ledger;
use crate::models::{DepositLedger, Settings, TradeRecord};

pub const SNAPSHOT_VERSION: &str = "1.0.0";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub settings: Settings,
    pub trades: Vec<TradeRecord>,
    pub monthly_deposits: DepositLedger,
    pub export_date: String,
    #[serde(default)]
    pub version: Option<String>,
}

impl Ledger {
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            settings: self.settings().clone(),
            trades: self.trades().to_vec(),
            monthly_deposits: self.deposits().clone(),
            export_date: Utc::now().to_rfc3339(),
            version: Some(SNAPSHOT_VERSION.to_string()),
        }
    }

    pub fn export_json(&self) -> Result<String, LedgerError> {
        serde_json::to_string_pretty(&self.snapshot())
            .map_err(|e| LedgerError::InvalidSnapshot(e.to_string()))
    }

    /// Replace the entire in-memory state from a snapshot. The shape is
    /// checked before anything is deserialized, and nothing is applied
    /// unless the whole snapshot is valid. Returns (trades, deposit months)
    /// imported.
    pub fn import_json(&mut self, json: &str) -> Result<(usize, usize), LedgerError> {
        let value: serde_json::Value =
            serde_json::from_str(json).map_err(|e| LedgerError::InvalidSnapshot(e.to_string()))?;

        if !value.get("trades").map(|v| v.is_array()).unwrap_or(false) {
            return Err(LedgerError::InvalidSnapshot(
                "`trades` must be an array".to_string(),
            ));
        }
        if !value
            .get("monthly_deposits")
            .map(|v| v.is_object())
            .unwrap_or(false)
        {
            return Err(LedgerError::InvalidSnapshot(
                "`monthly_deposits` must be an object".to_string(),
            ));
        }

        let snapshot: Snapshot = serde_json::from_value(value)
            .map_err(|e| LedgerError::InvalidSnapshot(e.to_string()))?;

        for trade in &snapshot.trades {
            if trade.pair.trim().is_empty() {
                return Err(LedgerError::InvalidSnapshot(format!(
                    "Trade {} has an empty pair",
                    trade.id
                )));
            }
            if !trade.balance_trade.is_finite() || !trade.commission.is_finite() || trade.commission < 0.0 {
                return Err(LedgerError::InvalidSnapshot(format!(
                    "Trade {} has invalid amounts",
                    trade.id
                )));
            }
        }
        for (month, deposit) in &snapshot.monthly_deposits {
            if !deposit.deposit.is_finite() || deposit.deposit < 0.0 {
                return Err(LedgerError::InvalidSnapshot(format!(
                    "Deposit for {} must be non-negative",
                    month
                )));
            }
        }

        let trades = snapshot.trades.len();
        let deposits = snapshot.monthly_deposits.len();
        self.replace_all(snapshot.trades, snapshot.monthly_deposits, snapshot.settings);
        log::info!("Imported snapshot: {} trades, {} deposit months", trades, deposits);
        Ok((trades, deposits))
    }
}
