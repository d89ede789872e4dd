//! Trading performance ledger: an in-memory trade store plus the pure
//! computations that derive monthly balance carry-forward, month-scoped
//! statistics and all-time totals from it. Persistence is a pluggable
//! collaborator behind [`storage::StorageBackend`].

pub mod error;
pub mod ledger;
pub mod models;
pub mod storage;

pub use error::{LedgerError, StorageError};
pub use ledger::{
    compute_stats, compute_total_balance, Ledger, MonthlyStats, PairStats, Snapshot, TotalBalance,
};
pub use models::{
    CreateTradeInput, DepositLedger, Direction, MonthDeposit, MonthKey, Settings, TradeRecord,
    UpdateSettingsInput, UpdateTradeInput,
};
pub use storage::{
    LocalStore, PersistenceManager, RemoteConfig, RemoteStore, StorageBackend, StorageConfig,
};
