use serde::{Deserialize, Serialize};

use super::month::MonthKey;

/// Account configuration. `initial_account_balance` and `base_month` drive
/// the balance carry-forward; the remaining fields are risk-sizing inputs
/// consumed by presentation layers. All percentages are fractions in [0, 1].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    pub initial_account_balance: f64,
    #[serde(default)]
    pub base_month: Option<MonthKey>,
    pub account_capital: f64,
    pub risk_per_trade: f64,
    pub max_daily_risk: f64,
    pub default_leverage: i32,
    pub max_margin_percent: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            initial_account_balance: 0.0,
            base_month: None,
            account_capital: 170.0,
            risk_per_trade: 0.01,
            max_daily_risk: 0.03,
            default_leverage: 3,
            max_margin_percent: 0.25,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateSettingsInput {
    pub initial_account_balance: Option<f64>,
    pub base_month: Option<MonthKey>,
    pub account_capital: Option<f64>,
    pub risk_per_trade: Option<f64>,
    pub max_daily_risk: Option<f64>,
    pub default_leverage: Option<i32>,
    pub max_margin_percent: Option<f64>,
}
