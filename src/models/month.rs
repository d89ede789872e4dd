use std::fmt;

use chrono::{Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::LedgerError;

/// Calendar-month identifier, rendered as `YYYY-MM`. The derived `Ord` over
/// (year, month) matches the lexicographic order of the rendered form, so
/// month keys compare chronologically everywhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MonthKey {
    year: i32,
    month: u32,
}

impl MonthKey {
    /// Canonical month bucketing for a trade date. Every consumer that needs
    /// to place a date in a month goes through here.
    pub fn of(date: NaiveDate) -> Self {
        MonthKey {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn current() -> Self {
        Self::of(Utc::now().date_naive())
    }

    pub fn parse(s: &str) -> Result<Self, LedgerError> {
        let (year, month) = s
            .split_once('-')
            .ok_or_else(|| LedgerError::Validation(format!("Invalid month key: {}", s)))?;
        let year: i32 = year
            .parse()
            .map_err(|_| LedgerError::Validation(format!("Invalid month key: {}", s)))?;
        let month: u32 = month
            .parse()
            .map_err(|_| LedgerError::Validation(format!("Invalid month key: {}", s)))?;
        if !(1..=12).contains(&month) || !(0..=9999).contains(&year) {
            return Err(LedgerError::Validation(format!("Invalid month key: {}", s)));
        }
        Ok(MonthKey { year, month })
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn previous(&self) -> Self {
        if self.month == 1 {
            MonthKey {
                year: self.year - 1,
                month: 12,
            }
        } else {
            MonthKey {
                year: self.year,
                month: self.month - 1,
            }
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        Self::of(date) == *self
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl TryFrom<String> for MonthKey {
    type Error = LedgerError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<MonthKey> for String {
    fn from(key: MonthKey) -> Self {
        key.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_of_and_display() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        assert_eq!(MonthKey::of(date).to_string(), "2024-03");
    }

    #[test]
    fn test_parse_roundtrip() {
        let key = MonthKey::parse("2023-11").unwrap();
        assert_eq!(key.year(), 2023);
        assert_eq!(key.month(), 11);
        assert_eq!(key.to_string(), "2023-11");
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(MonthKey::parse("2023").is_err());
        assert!(MonthKey::parse("2023-13").is_err());
        assert!(MonthKey::parse("2023-00").is_err());
        assert!(MonthKey::parse("abcd-01").is_err());
    }

    #[test]
    fn test_previous_crosses_year_boundary() {
        let jan = MonthKey::parse("2024-01").unwrap();
        assert_eq!(jan.previous().to_string(), "2023-12");
        let jun = MonthKey::parse("2024-06").unwrap();
        assert_eq!(jun.previous().to_string(), "2024-05");
    }

    #[test]
    fn test_order_is_chronological() {
        let a = MonthKey::parse("2023-12").unwrap();
        let b = MonthKey::parse("2024-01").unwrap();
        let c = MonthKey::parse("2024-10").unwrap();
        assert!(a < b && b < c);
    }

    #[test]
    fn test_serde_as_string() {
        let key = MonthKey::parse("2024-07").unwrap();
        assert_eq!(serde_json::to_string(&key).unwrap(), "\"2024-07\"");
        let back: MonthKey = serde_json::from_str("\"2024-07\"").unwrap();
        assert_eq!(back, key);
    }
}
