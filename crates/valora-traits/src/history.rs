//! Valuation history persistence interface.
//!
//! History is a key-value store keyed by `(symbol, valuation_date)` per
//! valuation kind, with create, list and delete operations. The engine only
//! defines the record shape; storage lives behind this trait.

use std::future::Future;

use crate::{Date, Result, ValuationHistoryEntry, ValuationKind};

/// Storage for saved valuation runs.
///
/// Every call is a single request/response. Implementations do not retry;
/// failures are returned to the caller.
pub trait HistoryStore: Send + Sync {
    /// List saved runs for a symbol. An unknown symbol yields an empty list.
    fn list(
        &self,
        kind: ValuationKind,
        symbol: &str,
    ) -> impl Future<Output = Result<Vec<ValuationHistoryEntry>>> + Send;

    /// Persist a run. Saved runs are immutable: saving a key that already
    /// exists fails with [`ValoraError::DuplicateEntry`](crate::ValoraError::DuplicateEntry)
    /// and leaves the earlier entry untouched.
    fn save(
        &self,
        kind: ValuationKind,
        entry: &ValuationHistoryEntry,
    ) -> impl Future<Output = Result<()>> + Send;

    /// Delete a run. Deleting a missing entry succeeds.
    fn delete(
        &self,
        kind: ValuationKind,
        symbol: &str,
        valuation_date: Date,
    ) -> impl Future<Output = Result<()>> + Send;
}
