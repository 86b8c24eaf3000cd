use thiserror::Error;

use crate::sender::SubmitError;

/// Errors raised by a `MessageStore` or `BlockStore` implementation.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(String),
    #[error("more than one block found at height {0}")]
    AmbiguousHeight(u64),
}

/// Top-level error for anything that must propagate out of relayer
/// construction. Scan passes and the confirmation reactor never return
/// these — they log and continue, per the propagation policy in spec.md §7.
#[derive(Debug, Error)]
pub enum RelayerError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Submit(#[from] SubmitError),
    #[error("fatal startup error: {0}")]
    Fatal(String),
}
