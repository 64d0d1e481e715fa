//! Bounded store of already-recorded performance entries.

use crate::entry::{EntryType, PerformanceEntry};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

/// Default retention cap for a store.
pub const DEFAULT_MAX_ENTRIES: usize = 1024;

/// Ordered store of recorded entries with a drop-oldest retention policy.
///
/// The store is the query surface for buffered replay: observers created
/// after an entry was recorded can still receive it by asking the store.
/// Clones are handles onto the same underlying buffer; the subsystem is
/// single-threaded and callback-driven, so no locking is involved.
#[derive(Clone)]
pub struct EntryStore {
    inner: Rc<RefCell<StoreInner>>,
}

struct StoreInner {
    entries: VecDeque<PerformanceEntry>,
    max_entries: usize,
}

impl EntryStore {
    /// Create a store with the default retention cap.
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(StoreInner {
                entries: VecDeque::new(),
                max_entries: DEFAULT_MAX_ENTRIES,
            })),
        }
    }

    /// Set the retention cap.
    pub fn with_max_entries(self, max_entries: usize) -> Self {
        self.inner.borrow_mut().max_entries = max_entries;
        self
    }

    /// Record an entry, evicting the oldest entries once the cap is hit.
    pub fn record(&self, entry: PerformanceEntry) {
        let mut inner = self.inner.borrow_mut();
        inner.entries.push_back(entry);
        while inner.entries.len() > inner.max_entries {
            if let Some(evicted) = inner.entries.pop_front() {
                tracing::trace!(name = %evicted.name, entry_type = %evicted.entry_type, "entry evicted from store");
            }
        }
    }

    /// All recorded entries, in recording order.
    pub fn entries(&self) -> Vec<PerformanceEntry> {
        self.inner.borrow().entries.iter().cloned().collect()
    }

    /// Recorded entries of the given type, in recording order.
    pub fn entries_by_type(&self, entry_type: &EntryType) -> Vec<PerformanceEntry> {
        self.inner
            .borrow()
            .entries
            .iter()
            .filter(|entry| entry.entry_type == *entry_type)
            .cloned()
            .collect()
    }

    /// The most recently recorded mark with the given name.
    pub fn latest_mark(&self, name: &str) -> Option<PerformanceEntry> {
        self.inner
            .borrow()
            .entries
            .iter()
            .rev()
            .find(|entry| entry.entry_type == EntryType::Mark && entry.name == name)
            .cloned()
    }

    /// Remove every recorded entry.
    pub fn clear(&self) {
        self.inner.borrow_mut().entries.clear();
    }

    /// Remove recorded entries of the given type.
    pub fn clear_type(&self, entry_type: &EntryType) {
        self.inner
            .borrow_mut()
            .entries
            .retain(|entry| entry.entry_type != *entry_type);
    }

    /// Number of recorded entries.
    pub fn len(&self) -> usize {
        self.inner.borrow().entries.len()
    }

    /// Whether the store holds no entries.
    pub fn is_empty(&self) -> bool {
        self.inner.borrow().entries.is_empty()
    }
}

impl Default for EntryStore {
    fn default() -> Self {
        Self::new()
    }
}
