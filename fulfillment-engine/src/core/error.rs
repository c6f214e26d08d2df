//! Engine error taxonomy
//!
//! Every collaborator failure is classified into one of six variants at the
//! engine boundary; raw storage errors never leak to callers.
//!
//! - `Validation` — malformed/missing input, a caller bug
//! - `NotFound` — referenced entity absent
//! - `Unauthorized` — identity mismatch against an owned resource
//! - `Conflict` — insufficient stock, duplicate payment, illegal transition
//! - `Transient` — storage busy/unavailable; safe to retry the whole call
//!   because partial reservations are rolled back before returning
//! - `Internal` — everything else; logged, not exposed in detail

use crate::storage::StorageError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("validation error: {0}")]
    Validation(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("not authorized")]
    Unauthorized,

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("transient storage failure: {0}")]
    Transient(String),

    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

/// Result type used across the engine services
pub type EngineResult<T> = std::result::Result<T, EngineError>;

/// Classify a storage error into the caller-facing taxonomy
///
/// Serialization failures and corruption are internal bugs; lock, IO and
/// busy conditions are transient and retryable.
fn classify(e: StorageError) -> EngineError {
    if let StorageError::Serialization(_) = e {
        tracing::error!(error = %e, "Storage serialization failure");
        return EngineError::Internal(anyhow::Error::new(e));
    }

    let text = e.to_string().to_lowercase();
    if text.contains("corrupt") || text.contains("invalid database") {
        tracing::error!(error = %e, "Storage corruption detected");
        return EngineError::Internal(anyhow::Error::new(e));
    }

    // Remaining redb errors (database/transaction/table/storage/commit) are
    // treated as busy-or-unavailable.
    tracing::warn!(error = %e, "Transient storage failure");
    EngineError::Transient(e.to_string())
}

impl From<StorageError> for EngineError {
    fn from(e: StorageError) -> Self {
        classify(e)
    }
}

impl From<redb::CommitError> for EngineError {
    fn from(e: redb::CommitError) -> Self {
        classify(StorageError::Commit(e))
    }
}
