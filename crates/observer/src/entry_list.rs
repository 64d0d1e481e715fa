//! Immutable snapshot views over delivered performance entries.

use entries::{EntryType, PerformanceEntry};

/// A point-in-time view over a batch of performance entries.
///
/// The snapshot takes its entries by value at construction, so later
/// mutation of the source buffer cannot reach a snapshot already handed
/// out. [`get_entries`](Self::get_entries) returns a fresh copy on every
/// call, so callers cannot reach the backing sequence either.
#[derive(Debug, Clone, PartialEq)]
pub struct PerformanceObserverEntryList {
    entries: Vec<PerformanceEntry>,
}

impl PerformanceObserverEntryList {
    /// Capture a snapshot of the given entries.
    pub fn new(entries: Vec<PerformanceEntry>) -> Self {
        Self { entries }
    }

    /// All entries in the snapshot, insertion order preserved.
    pub fn get_entries(&self) -> Vec<PerformanceEntry> {
        self.entries.clone()
    }

    /// Entries of the given type, order preserved.
    pub fn get_entries_by_type(&self, entry_type: &EntryType) -> Vec<PerformanceEntry> {
        self.entries
            .iter()
            .filter(|entry| entry.entry_type == *entry_type)
            .cloned()
            .collect()
    }

    /// Entries with the given name, order preserved.
    ///
    /// A `None` type matches any type.
    pub fn get_entries_by_name(
        &self,
        name: &str,
        entry_type: Option<&EntryType>,
    ) -> Vec<PerformanceEntry> {
        self.entries
            .iter()
            .filter(|entry| {
                entry.name == name && entry_type.is_none_or(|t| entry.entry_type == *t)
            })
            .cloned()
            .collect()
    }

    /// Number of entries in the snapshot.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the snapshot holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
