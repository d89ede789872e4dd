use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::month::MonthKey;

/// External capital contributed during one month. Kept as a struct rather
/// than a bare number so the stored shape can grow without a migration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MonthDeposit {
    pub deposit: f64,
}

/// Month-keyed deposit ledger. A missing key means no deposit that month.
pub type DepositLedger = BTreeMap<MonthKey, MonthDeposit>;
