//! In-process history store.

use std::collections::{BTreeMap, btree_map::Entry};

use tokio::sync::RwLock;
use valora_traits::{
    Date, HistoryStore, Result, Symbol, ValoraError, ValuationHistoryEntry, ValuationKind,
};

type Key = (ValuationKind, Symbol, Date);

/// History store held in memory.
///
/// Entries are keyed by `(kind, symbol, valuation_date)` and never
/// overwritten. Listings come back oldest first.
#[derive(Debug, Default)]
pub struct InMemoryHistoryStore {
    entries: RwLock<BTreeMap<Key, ValuationHistoryEntry>>,
}

impl InMemoryHistoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of saved entries across all kinds.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Whether the store is empty.
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

impl HistoryStore for InMemoryHistoryStore {
    async fn list(&self, kind: ValuationKind, symbol: &str) -> Result<Vec<ValuationHistoryEntry>> {
        let symbol = symbol.to_uppercase();
        let entries = self.entries.read().await;
        Ok(entries
            .iter()
            .filter(|((k, s, _), _)| *k == kind && *s == symbol)
            .map(|(_, entry)| entry.clone())
            .collect())
    }

    async fn save(&self, kind: ValuationKind, entry: &ValuationHistoryEntry) -> Result<()> {
        if entry.kind() != kind {
            return Err(ValoraError::InvalidInput(format!(
                "cannot save a {} entry under {kind}",
                entry.kind()
            )));
        }
        let key = (kind, entry.symbol.to_uppercase(), entry.valuation_date);
        match self.entries.write().await.entry(key) {
            Entry::Occupied(slot) => {
                let (_, symbol, date) = slot.key();
                Err(ValoraError::DuplicateEntry(format!(
                    "{kind} valuation for {symbol} on {date} is already saved"
                )))
            }
            Entry::Vacant(slot) => {
                slot.insert(entry.clone());
                Ok(())
            }
        }
    }

    async fn delete(&self, kind: ValuationKind, symbol: &str, valuation_date: Date) -> Result<()> {
        let key = (kind, symbol.to_uppercase(), valuation_date);
        self.entries.write().await.remove(&key);
        Ok(())
    }
}
