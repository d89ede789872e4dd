use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::month::MonthKey;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Long,
    Short,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Long => "Long",
            Direction::Short => "Short",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Long" => Some(Direction::Long),
            "Short" => Some(Direction::Short),
            _ => None,
        }
    }
}

/// A single logged trade. `final_result` is always derived as
/// `balance_trade - commission` by the store; caller-supplied values are
/// never trusted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeRecord {
    pub id: String,
    pub date: NaiveDate,
    pub pair: String,
    pub direction: Direction,
    pub balance_trade: f64,
    pub commission: f64,
    pub final_result: f64,
    #[serde(default)]
    pub notes: Option<String>,
    pub created_at: i64,
}

impl TradeRecord {
    pub fn month_key(&self) -> MonthKey {
        MonthKey::of(self.date)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTradeInput {
    pub date: NaiveDate,
    pub pair: String,
    pub direction: Direction,
    pub balance_trade: f64,
    pub commission: f64,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Partial update; omitted fields keep their current value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateTradeInput {
    pub date: Option<NaiveDate>,
    pub pair: Option<String>,
    pub direction: Option<Direction>,
    pub balance_trade: Option<f64>,
    pub commission: Option<f64>,
    pub notes: Option<String>,
}
