//! The observer engine: subscription, filtering, buffering, and coalesced
//! delivery.

use crate::entry_list::PerformanceObserverEntryList;
use crate::error::{ObserverError, ObserverResult};
use crate::options::ObserveOptions;
use crate::scheduler::FrameScheduler;
use entries::{EntryStore, EntryType, ListenerId, PerformanceEntry, RecordEmitter};
use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;

type ObserverCallback = Box<dyn FnMut(PerformanceObserverEntryList, &PerformanceObserver)>;

/// Shared wiring observers are created against: the live record feed, the
/// store of already-recorded entries, and the host frame clock.
#[derive(Clone)]
pub struct ObserverContext {
    emitter: RecordEmitter,
    store: EntryStore,
    scheduler: Rc<dyn FrameScheduler>,
}

impl ObserverContext {
    /// Bundle the collaborators every observer in this context will use.
    pub fn new(
        emitter: RecordEmitter,
        store: EntryStore,
        scheduler: Rc<dyn FrameScheduler>,
    ) -> Self {
        Self {
            emitter,
            store,
            scheduler,
        }
    }

    /// Create an observer delivering coalesced batches to `callback`.
    ///
    /// The observer is inert until [`observe`](PerformanceObserver::observe)
    /// succeeds. The callback receives the batch snapshot and the observer
    /// itself, so it can drain remaining records or change criteria from
    /// inside the delivery.
    pub fn observer<F>(&self, callback: F) -> PerformanceObserver
    where
        F: FnMut(PerformanceObserverEntryList, &PerformanceObserver) + 'static,
    {
        PerformanceObserver {
            state: Rc::new(RefCell::new(ObserverState::default())),
            callback: Rc::new(RefCell::new(Box::new(callback))),
            emitter: self.emitter.clone(),
            store: self.store.clone(),
            scheduler: Rc::clone(&self.scheduler),
        }
    }
}

#[derive(Default)]
struct ObserverState {
    entry_types: HashSet<EntryType>,
    buffer: Vec<PerformanceEntry>,
    /// True while a coalesced emission is scheduled. At most one scheduled
    /// emission is outstanding at any time.
    pending: bool,
    /// Bumped on every schedule; a tick whose epoch no longer matches is
    /// stale and does nothing.
    epoch: u64,
    listener: Option<ListenerId>,
}

/// A consumer subscription over the performance entry feed.
///
/// Incoming entries are filtered against the watched type set, accumulated,
/// and delivered in one callback per frame boundary rather than one per
/// entry. Clones are handles onto the same subscription; all state lives on
/// the single logical thread of callback delivery.
#[derive(Clone)]
pub struct PerformanceObserver {
    state: Rc<RefCell<ObserverState>>,
    callback: Rc<RefCell<ObserverCallback>>,
    emitter: RecordEmitter,
    store: EntryStore,
    scheduler: Rc<dyn FrameScheduler>,
}

impl PerformanceObserver {
    /// Start or re-target the subscription.
    ///
    /// The watched type set is replaced wholesale on every call; it is never
    /// merged across calls. The multi-type form starts from an empty buffer.
    /// The single-type form keeps whatever was buffered, unless `buffered`
    /// replay was requested, in which case the buffer is set to the store's
    /// current entries of that type and one delivery is scheduled
    /// immediately.
    ///
    /// An empty multi-type list is the one malformed call still
    /// representable; it fails without touching any state. Watching a type
    /// outside the recognized set is advisory only: the subscription stands,
    /// but no host source records such entries.
    ///
    /// Registration with the record feed happens once per observer, on the
    /// first successful call; later calls only replace criteria. The
    /// registration keeps the observer alive even after the consumer drops
    /// its handle, until [`disconnect`](Self::disconnect) is called.
    pub fn observe(&self, options: ObserveOptions) -> ObserverResult<()> {
        match options {
            ObserveOptions::EntryTypes(types) => {
                if types.is_empty() {
                    return Err(ObserverError::MissingEntryTypes);
                }
                let mut state = self.state.borrow_mut();
                state.entry_types = types.into_iter().collect();
                state.buffer.clear();
            }
            ObserveOptions::SingleType {
                entry_type,
                buffered,
            } => {
                {
                    let mut state = self.state.borrow_mut();
                    state.entry_types = HashSet::from([entry_type.clone()]);
                    if buffered {
                        state.buffer = self.store.entries_by_type(&entry_type);
                    }
                }
                if buffered {
                    self.schedule_emission();
                }
            }
        }

        self.warn_unsupported();
        self.register();
        Ok(())
    }

    /// Drain the buffer into a snapshot.
    ///
    /// Draining is idempotent: a second call with no entries in between
    /// returns an empty snapshot. Safe to call from inside the delivery
    /// callback.
    pub fn take_records(&self) -> PerformanceObserverEntryList {
        let entries = std::mem::take(&mut self.state.borrow_mut().buffer);
        PerformanceObserverEntryList::new(entries)
    }

    /// End the subscription.
    ///
    /// Unregisters from the record feed, cancels any scheduled delivery, and
    /// drops whatever had accumulated, so no callback fires afterwards. The
    /// watched type set survives; a later [`observe`](Self::observe) call
    /// re-registers and resumes delivery.
    pub fn disconnect(&self) {
        let listener = self.state.borrow_mut().listener.take();
        if let Some(id) = listener {
            self.emitter.remove_listener(id);
        }

        let mut state = self.state.borrow_mut();
        state.pending = false;
        state.buffer.clear();
    }

    /// Currently watched entry types.
    pub fn observed_types(&self) -> Vec<EntryType> {
        self.state.borrow().entry_types.iter().cloned().collect()
    }

    /// Whether the observer is registered with the record feed.
    pub fn is_connected(&self) -> bool {
        self.state.borrow().listener.is_some()
    }

    /// Subscription callback: filter, accumulate, request a coalesced
    /// delivery. Entries of unwatched types are dropped silently.
    fn receive_record(&self, entry: PerformanceEntry) {
        let accepted = {
            let mut state = self.state.borrow_mut();
            if state.entry_types.contains(&entry.entry_type) {
                state.buffer.push(entry);
                true
            } else {
                false
            }
        };
        if accepted {
            self.schedule_emission();
        }
    }

    /// Request one delivery at the next frame boundary. While one is
    /// already pending, further requests coalesce into it.
    fn schedule_emission(&self) {
        let epoch = {
            let mut state = self.state.borrow_mut();
            if state.pending {
                return;
            }
            state.pending = true;
            state.epoch += 1;
            state.epoch
        };

        let observer = self.clone();
        self.scheduler
            .schedule_once(Box::new(move || observer.run_scheduled(epoch)));
    }

    fn run_scheduled(&self, epoch: u64) {
        {
            let mut state = self.state.borrow_mut();
            // A tick from before a disconnect no longer matches.
            if !state.pending || state.epoch != epoch {
                return;
            }
            // Cleared before the flush so a delivery requested during the
            // callback schedules a fresh tick.
            state.pending = false;
        }
        self.emit_records();
    }

    fn emit_records(&self) {
        let records = self.take_records();
        // No state borrow is held here; the callback may re-enter the
        // observer freely.
        let callback = Rc::clone(&self.callback);
        let mut callback = callback.borrow_mut();
        (*callback)(records, self);
    }

    fn warn_unsupported(&self) {
        let state = self.state.borrow();
        for entry_type in &state.entry_types {
            if !entry_type.is_supported() {
                tracing::warn!(
                    entry_type = %entry_type,
                    "entry type does not exist or isn't supported"
                );
            }
        }
    }

    /// Register the receive hook with the record feed, once per observer.
    fn register(&self) {
        if self.state.borrow().listener.is_some() {
            return;
        }
        let observer = self.clone();
        let id = self
            .emitter
            .add_listener(move |entry| observer.receive_record(entry));
        self.state.borrow_mut().listener = Some(id);
    }
}
