//! Performance Observer Core
//!
//! This crate implements the observation side of the performance subsystem:
//! consumers subscribe to the live entry feed, filtered by entry type, and
//! receive coalesced batches once per frame boundary instead of one callback
//! per entry.
//!
//! - [`ObserverContext`] bundles the injected collaborators (record emitter,
//!   entry store, frame scheduler) and creates observers against them
//! - [`PerformanceObserver`] owns the subscription: criteria, accumulation
//!   buffer, and the single pending coalesced delivery
//! - [`PerformanceObserverEntryList`] is the immutable snapshot handed to
//!   the delivery callback
//! - [`ObserveOptions`] models the two accepted observe() argument forms
//! - [`FrameScheduler`] is the injectable "next frame" port, with
//!   [`ManualScheduler`] as the deterministic implementation
//!
//! # Example
//!
//! ```rust
//! use std::cell::RefCell;
//! use std::rc::Rc;
//! use entries::Timeline;
//! use observer::{ManualScheduler, ObserveOptions, ObserverContext};
//!
//! let timeline = Timeline::new();
//! let scheduler = Rc::new(ManualScheduler::new());
//! let context = ObserverContext::new(timeline.emitter(), timeline.store(), scheduler.clone());
//!
//! let seen = Rc::new(RefCell::new(Vec::new()));
//! let sink = seen.clone();
//! let observer = context.observer(move |list, _| sink.borrow_mut().extend(list.get_entries()));
//! observer.observe(ObserveOptions::entry_types(["mark", "measure"])).unwrap();
//!
//! timeline.mark("first-paint");
//! timeline.mark("first-input");
//! scheduler.run_frame();
//!
//! // Two marks, one coalesced delivery.
//! assert_eq!(seen.borrow().len(), 2);
//! ```

mod entry_list;
mod error;
mod observer;
mod options;
mod scheduler;

pub use entry_list::PerformanceObserverEntryList;
pub use error::{ObserverError, ObserverResult};
pub use observer::{ObserverContext, PerformanceObserver};
pub use options::{ObserveOptions, RawObserveOptions};
pub use scheduler::{FrameScheduler, ManualScheduler};
