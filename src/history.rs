//! Process-lifetime record of successful fits.
//!
//! The store is created once at startup and handed to request handlers by
//! reference. Nothing is persisted: a restart (or `clear`) forgets every fit.

use std::sync::{PoisonError, RwLock};

use crate::domain::FitHistoryEntry;

#[derive(Debug, Default)]
pub struct FitHistory {
    entries: RwLock<Vec<FitHistoryEntry>>,
}

impl FitHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry and return the new length.
    pub fn record(&self, entry: FitHistoryEntry) -> usize {
        // Entries are only ever pushed whole, so a writer that panicked
        // cannot leave a half-written entry behind; recover the guard.
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        entries.push(entry);
        entries.len()
    }

    /// All entries in insertion order.
    pub fn snapshot(&self) -> Vec<FitHistoryEntry> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Forget every entry; returns how many were dropped.
    pub fn clear(&self) -> usize {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        let dropped = entries.len();
        entries.clear();
        dropped
    }
}
