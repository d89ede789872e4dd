//! Persistence collaborators. The core never assumes which backend is
//! active: both stores implement the same trait and are selected by
//! configuration. A failed save or load surfaces an error and leaves the
//! in-memory ledger untouched; it stays the source of truth throughout.

pub mod local;
pub mod remote;

use async_trait::async_trait;

use crate::error::StorageError;
use crate::ledger::Ledger;
use crate::models::{DepositLedger, Settings, TradeRecord};

pub use local::LocalStore;
pub use remote::{RemoteConfig, RemoteStore};

#[async_trait]
pub trait StorageBackend: Send + Sync {
    async fn load_trades(&self) -> Result<Vec<TradeRecord>, StorageError>;
    async fn save_trades(&self, trades: &[TradeRecord]) -> Result<(), StorageError>;

    async fn load_deposits(&self) -> Result<DepositLedger, StorageError>;
    async fn save_deposits(&self, deposits: &DepositLedger) -> Result<(), StorageError>;

    /// `None` when the backend holds no settings yet.
    async fn load_settings(&self) -> Result<Option<Settings>, StorageError>;
    async fn save_settings(&self, settings: &Settings) -> Result<(), StorageError>;
}

/// Backend selection, by configuration rather than inheritance.
#[derive(Debug, Clone)]
pub enum StorageConfig {
    Local { path: String },
    /// Remote store with an optional local file to fall back to when the
    /// remote is unreachable.
    Remote {
        remote: RemoteConfig,
        fallback_path: Option<String>,
    },
}

/// Owns the active backend and the optional fallback. Load and save each
/// try the primary first; on a transient failure the fallback is used and
/// a warning logged. Operations are idempotent and safe to re-issue, so
/// there is no automatic retry.
pub struct PersistenceManager {
    primary: Box<dyn StorageBackend>,
    fallback: Option<Box<dyn StorageBackend>>,
}

impl PersistenceManager {
    pub fn new(primary: Box<dyn StorageBackend>) -> Self {
        PersistenceManager {
            primary,
            fallback: None,
        }
    }

    pub fn with_fallback(primary: Box<dyn StorageBackend>, fallback: Box<dyn StorageBackend>) -> Self {
        PersistenceManager {
            primary,
            fallback: Some(fallback),
        }
    }

    pub fn from_config(config: StorageConfig) -> Result<Self, StorageError> {
        match config {
            StorageConfig::Local { path } => {
                Ok(Self::new(Box::new(LocalStore::open(&path)?)))
            }
            StorageConfig::Remote {
                remote,
                fallback_path,
            } => {
                let primary = Box::new(RemoteStore::new(remote));
                match fallback_path {
                    Some(path) => Ok(Self::with_fallback(
                        primary,
                        Box::new(LocalStore::open(&path)?),
                    )),
                    None => Ok(Self::new(primary)),
                }
            }
        }
    }

    async fn load_from(&self, backend: &dyn StorageBackend) -> Result<Ledger, StorageError> {
        let trades = backend.load_trades().await?;
        let deposits = backend.load_deposits().await?;
        let settings = backend.load_settings().await?.unwrap_or_default();
        Ok(Ledger::from_parts(trades, deposits, settings))
    }

    async fn save_to(&self, backend: &dyn StorageBackend, ledger: &Ledger) -> Result<(), StorageError> {
        backend.save_trades(ledger.trades()).await?;
        backend.save_deposits(ledger.deposits()).await?;
        backend.save_settings(ledger.settings()).await?;
        Ok(())
    }

    pub async fn load_ledger(&self) -> Result<Ledger, StorageError> {
        match self.load_from(&*self.primary).await {
            Ok(ledger) => Ok(ledger),
            Err(err) => match &self.fallback {
                Some(fallback) => {
                    log::warn!("Primary store failed to load ({}), using fallback", err);
                    self.load_from(&**fallback).await
                }
                None => Err(err),
            },
        }
    }

    pub async fn save_ledger(&self, ledger: &Ledger) -> Result<(), StorageError> {
        match self.save_to(&*self.primary, ledger).await {
            Ok(()) => Ok(()),
            Err(err) => match &self.fallback {
                Some(fallback) => {
                    log::warn!("Primary store failed to save ({}), using fallback", err);
                    self.save_to(&**fallback, ledger).await
                }
                None => Err(err),
            },
        }
    }
}
