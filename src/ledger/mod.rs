pub mod balance;
pub mod snapshot;
pub mod stats;
pub mod store;
pub mod totals;

pub use balance::{base_month, ending_balance, month_pnl, starting_balance};
pub use snapshot::{Snapshot, SNAPSHOT_VERSION};
pub use stats::{compute_stats, MonthlyStats, PairStats};
pub use store::Ledger;
pub use totals::{compute_total_balance, TotalBalance};
