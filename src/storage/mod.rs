mod csv_store;

pub use csv_store::*;

use std::path::PathBuf;

use thiserror::Error;

use crate::domain::Transaction;

/// Load/save contract between the ledger and wherever its rows live.
pub trait TransactionStore {
    /// Read every stored transaction. Fails as a whole on the first bad row.
    fn load(&self) -> Result<Vec<Transaction>, StorageError>;

    /// Overwrite the stored set with `transactions`.
    fn save(&self, transactions: &[Transaction]) -> Result<(), StorageError>;
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error: {0}")]
    Stream(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Malformed row at line {line}: {reason}")]
    Malformed { line: u64, reason: String },

    #[error("Missing column: {0}")]
    MissingColumn(&'static str),
}
