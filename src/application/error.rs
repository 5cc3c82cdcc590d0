use thiserror::Error;

use crate::domain::{LedgerError, ParseCentsError, ValidationError};
use crate::storage::StorageError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid transaction: {0}")]
    Validation(#[from] ValidationError),

    #[error("Transaction not found: {0}")]
    TransactionNotFound(String),

    #[error("Transaction id prefix is ambiguous: {0}")]
    AmbiguousId(String),

    #[error("Invalid amount: {0}")]
    InvalidAmount(#[from] ParseCentsError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

impl From<LedgerError> for AppError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::Validation(e) => AppError::Validation(e),
            LedgerError::NotFound(id) => AppError::TransactionNotFound(id.to_string()),
            LedgerError::NoMatch => AppError::TransactionNotFound("no matching entry".to_string()),
        }
    }
}
