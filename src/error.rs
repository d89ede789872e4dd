use thiserror::Error;

/// Errors produced by the in-memory ledger itself.
#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Unknown trade id: {0}")]
    UnknownTrade(String),

    #[error("Invalid snapshot: {0}")]
    InvalidSnapshot(String),
}

/// Errors produced by the persistence collaborators.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Invalid stored data: {0}")]
    Parse(String),

    #[error("Unexpected response: {status} - {message}")]
    Response { status: u16, message: String },
}

impl From<rusqlite::Error> for StorageError {
    fn from(err: rusqlite::Error) -> Self {
        StorageError::Database(err.to_string())
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        StorageError::Parse(err.to_string())
    }
}
