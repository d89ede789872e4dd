//! Local SQLite-backed store.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::NaiveDate;
use rusqlite::Connection;

use crate::error::StorageError;
use crate::models::{DepositLedger, Direction, MonthDeposit, MonthKey, Settings, TradeRecord};
use crate::storage::StorageBackend;

pub struct LocalStore {
    conn: Mutex<Connection>,
}

fn lock_err() -> StorageError {
    StorageError::Database("connection lock poisoned".to_string())
}

fn conversion_failure(index: usize, message: String) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(
        index,
        rusqlite::types::Type::Text,
        Box::new(std::io::Error::new(std::io::ErrorKind::InvalidData, message)),
    )
}

fn map_row_to_trade(row: &rusqlite::Row) -> rusqlite::Result<TradeRecord> {
    let date: String = row.get(1)?;
    let direction: String = row.get(3)?;

    Ok(TradeRecord {
        id: row.get(0)?,
        date: NaiveDate::parse_from_str(&date, "%Y-%m-%d")
            .map_err(|_| conversion_failure(1, format!("Invalid trade date: {}", date)))?,
        pair: row.get(2)?,
        direction: Direction::parse(&direction)
            .ok_or_else(|| conversion_failure(3, format!("Invalid direction: {}", direction)))?,
        balance_trade: row.get(4)?,
        commission: row.get(5)?,
        final_result: row.get(6)?,
        notes: row.get(7)?,
        created_at: row.get(8)?,
    })
}

impl LocalStore {
    pub fn open(path: &str) -> Result<Self, StorageError> {
        let conn = Connection::open(path)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        Self::init_schema(&conn)?;
        log::info!("Opened local store at {}", path);
        Ok(LocalStore {
            conn: Mutex::new(conn),
        })
    }

    pub fn open_in_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory()?;
        Self::init_schema(&conn)?;
        Ok(LocalStore {
            conn: Mutex::new(conn),
        })
    }

    fn init_schema(conn: &Connection) -> Result<(), StorageError> {
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS trades (
                id TEXT PRIMARY KEY,
                date TEXT NOT NULL,
                pair TEXT NOT NULL,
                direction TEXT NOT NULL,
                balance_trade REAL NOT NULL,
                commission REAL NOT NULL,
                final_result REAL NOT NULL,
                notes TEXT,
                created_at INTEGER NOT NULL
            );
            CREATE TABLE IF NOT EXISTS monthly_deposits (
                month TEXT PRIMARY KEY,
                deposit REAL NOT NULL
            );
            CREATE TABLE IF NOT EXISTS app_settings (
                id TEXT PRIMARY KEY,
                payload TEXT NOT NULL
            );",
        )?;
        Ok(())
    }
}

#[async_trait]
impl StorageBackend for LocalStore {
    async fn load_trades(&self) -> Result<Vec<TradeRecord>, StorageError> {
        let conn = self.conn.lock().map_err(|_| lock_err())?;
        let mut stmt = conn.prepare(
            "SELECT id, date, pair, direction, balance_trade, commission, final_result, notes, created_at
             FROM trades ORDER BY created_at ASC",
        )?;

        let trades = stmt
            .query_map([], map_row_to_trade)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(trades)
    }

    async fn save_trades(&self, trades: &[TradeRecord]) -> Result<(), StorageError> {
        let mut conn = self.conn.lock().map_err(|_| lock_err())?;
        let tx = conn.transaction()?;

        tx.execute("DELETE FROM trades", [])?;
        for trade in trades {
            tx.execute(
                "INSERT INTO trades (id, date, pair, direction, balance_trade, commission, final_result, notes, created_at)
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
                rusqlite::params![
                    trade.id,
                    trade.date.to_string(),
                    trade.pair,
                    trade.direction.as_str(),
                    trade.balance_trade,
                    trade.commission,
                    trade.final_result,
                    trade.notes,
                    trade.created_at,
                ],
            )?;
        }
        tx.commit()?;
        Ok(())
    }

    async fn load_deposits(&self) -> Result<DepositLedger, StorageError> {
        let conn = self.conn.lock().map_err(|_| lock_err())?;
        let mut stmt = conn.prepare("SELECT month, deposit FROM monthly_deposits")?;
        let rows = stmt
            .query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, f64>(1)?)))?
            .collect::<Result<Vec<_>, _>>()?;

        let mut deposits = DepositLedger::new();
        for (month, deposit) in rows {
            let key = MonthKey::parse(&month)
                .map_err(|e| StorageError::Parse(e.to_string()))?;
            deposits.insert(key, MonthDeposit { deposit });
        }
        Ok(deposits)
    }

    async fn save_deposits(&self, deposits: &DepositLedger) -> Result<(), StorageError> {
        let mut conn = self.conn.lock().map_err(|_| lock_err())?;
        let tx = conn.transaction()?;

        tx.execute("DELETE FROM monthly_deposits", [])?;
        for (month, deposit) in deposits {
            tx.execute(
                "INSERT INTO monthly_deposits (month, deposit) VALUES (?, ?)",
                rusqlite::params![month.to_string(), deposit.deposit],
            )?;
        }
        tx.commit()?;
        Ok(())
    }

    async fn load_settings(&self) -> Result<Option<Settings>, StorageError> {
        let conn = self.conn.lock().map_err(|_| lock_err())?;
        let payload: Option<String> = conn
            .query_row(
                "SELECT payload FROM app_settings WHERE id = 'main'",
                [],
                |row| row.get(0),
            )
            .map(Some)
            .or_else(|err| match err {
                rusqlite::Error::QueryReturnedNoRows => Ok(None),
                other => Err(other),
            })?;

        match payload {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    async fn save_settings(&self, settings: &Settings) -> Result<(), StorageError> {
        let conn = self.conn.lock().map_err(|_| lock_err())?;
        let payload = serde_json::to_string(settings)?;
        conn.execute(
            "INSERT OR REPLACE INTO app_settings (id, payload) VALUES ('main', ?)",
            [payload],
        )?;
        Ok(())
    }
}
