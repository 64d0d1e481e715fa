//! Live fan-out of recorded entries to registered listeners.

use crate::entry::PerformanceEntry;
use std::cell::RefCell;
use std::rc::Rc;

/// Identity handle for a registered listener.
///
/// Removal goes through the handle returned at registration time, which is
/// what lets a subscriber keep its registration state explicit instead of
/// relying on callback identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Listener = Rc<RefCell<Box<dyn FnMut(PerformanceEntry)>>>;

/// Delivers each recorded entry to every registered listener, in
/// registration order.
///
/// Clones are handles onto the same listener table.
#[derive(Clone, Default)]
pub struct RecordEmitter {
    inner: Rc<RefCell<EmitterInner>>,
}

#[derive(Default)]
struct EmitterInner {
    next_id: u64,
    listeners: Vec<(ListenerId, Listener)>,
}

impl RecordEmitter {
    /// Create an emitter with no listeners.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener; the returned handle removes it again.
    pub fn add_listener(&self, listener: impl FnMut(PerformanceEntry) + 'static) -> ListenerId {
        let mut inner = self.inner.borrow_mut();
        let id = ListenerId(inner.next_id);
        inner.next_id += 1;
        let listener: Listener = Rc::new(RefCell::new(Box::new(listener)));
        inner.listeners.push((id, listener));
        id
    }

    /// Remove a listener by handle. A stale or unknown handle is a no-op.
    pub fn remove_listener(&self, id: ListenerId) {
        self.inner
            .borrow_mut()
            .listeners
            .retain(|(listener_id, _)| *listener_id != id);
    }

    /// Deliver one entry to every listener, in registration order.
    ///
    /// The listener table is snapshotted before delivery, so a listener that
    /// registers or removes listeners mid-delivery cannot disturb the
    /// iteration; table changes take effect from the next `emit`. A listener
    /// must not record new entries from inside its own invocation; defer
    /// such work to a scheduler tick instead.
    pub fn emit(&self, entry: PerformanceEntry) {
        let listeners: Vec<Listener> = self
            .inner
            .borrow()
            .listeners
            .iter()
            .map(|(_, listener)| Rc::clone(listener))
            .collect();
        for listener in listeners {
            let mut listener = listener.borrow_mut();
            (*listener)(entry.clone());
        }
    }

    /// Number of registered listeners.
    pub fn listener_count(&self) -> usize {
        self.inner.borrow().listeners.len()
    }
}
