//! Recording surface: marks, measures, and metrics on a monotonic clock.

use crate::emitter::RecordEmitter;
use crate::entry::{EntryType, PerformanceEntry};
use crate::error::{TimelineError, TimelineResult};
use crate::store::EntryStore;
use std::time::Instant;

/// Records performance entries against a monotonic millisecond clock and
/// feeds them to both the store and the live emitter.
///
/// Timestamps are milliseconds since the timeline was created. Clones share
/// the same store and emitter, so a clone handed to another component
/// records onto the same timeline.
#[derive(Clone)]
pub struct Timeline {
    store: EntryStore,
    emitter: RecordEmitter,
    origin: Instant,
}

impl Timeline {
    /// Create a timeline with a fresh store and emitter. The clock origin is
    /// now.
    pub fn new() -> Self {
        Self {
            store: EntryStore::new(),
            emitter: RecordEmitter::new(),
            origin: Instant::now(),
        }
    }

    /// Milliseconds elapsed since the timeline origin.
    pub fn now(&self) -> f64 {
        self.origin.elapsed().as_secs_f64() * 1000.0
    }

    /// Handle onto the store of recorded entries.
    pub fn store(&self) -> EntryStore {
        self.store.clone()
    }

    /// Handle onto the live record emitter.
    pub fn emitter(&self) -> RecordEmitter {
        self.emitter.clone()
    }

    /// Record a mark at the current time.
    pub fn mark(&self, name: impl Into<String>) -> PerformanceEntry {
        let entry = PerformanceEntry::mark(name, self.now());
        self.record(entry.clone());
        entry
    }

    /// Record a measure between two marks.
    ///
    /// A `None` start falls back to the timeline origin, a `None` end to the
    /// current time. Named marks resolve to the most recent mark with that
    /// name; a name that was never marked is an error and nothing is
    /// recorded.
    pub fn measure(
        &self,
        name: impl Into<String>,
        start_mark: Option<&str>,
        end_mark: Option<&str>,
    ) -> TimelineResult<PerformanceEntry> {
        let start_time = match start_mark {
            Some(mark) => self.resolve_mark(mark)?.start_time,
            None => 0.0,
        };
        let end_time = match end_mark {
            Some(mark) => self.resolve_mark(mark)?.start_time,
            None => self.now(),
        };

        let entry = PerformanceEntry::measure(name, start_time, end_time - start_time);
        self.record(entry.clone());
        Ok(entry)
    }

    /// Record a named numeric sample.
    pub fn metric(&self, name: impl Into<String>, value: f64) -> PerformanceEntry {
        let entry =
            PerformanceEntry::new(name, EntryType::Metric, self.now(), 0.0).with_detail(value);
        self.record(entry.clone());
        entry
    }

    /// Record an arbitrary entry.
    ///
    /// The entry lands in the store before it is emitted, so a buffered
    /// query issued from a listener already sees it.
    pub fn record(&self, entry: PerformanceEntry) {
        self.store.record(entry.clone());
        self.emitter.emit(entry);
    }

    fn resolve_mark(&self, name: &str) -> TimelineResult<PerformanceEntry> {
        self.store
            .latest_mark(name)
            .ok_or_else(|| TimelineError::MarkNotFound(name.to_string()))
    }
}

impl Default for Timeline {
    fn default() -> Self {
        Self::new()
    }
}
