//! Integration tests for the observer engine
//!
//! These tests drive the full wiring - timeline recording, live emission,
//! criteria filtering, and frame-driven coalesced delivery - through a
//! deterministic manual scheduler.

use entries::{EntryType, PerformanceEntry, Timeline};
use observer::{
    ManualScheduler, ObserveOptions, ObserverContext, ObserverError, PerformanceObserver,
};
use std::cell::RefCell;
use std::rc::Rc;

/// Test harness wiring a timeline to an observer context.
struct ObserverHarness {
    timeline: Timeline,
    scheduler: Rc<ManualScheduler>,
    context: ObserverContext,
}

type DeliveryLog = Rc<RefCell<Vec<Vec<PerformanceEntry>>>>;

impl ObserverHarness {
    fn new() -> Self {
        let timeline = Timeline::new();
        let scheduler = Rc::new(ManualScheduler::new());
        let context =
            ObserverContext::new(timeline.emitter(), timeline.store(), scheduler.clone());
        Self {
            timeline,
            scheduler,
            context,
        }
    }

    /// An observer whose callback appends each delivered batch to the log.
    fn logging_observer(&self) -> (PerformanceObserver, DeliveryLog) {
        let deliveries: DeliveryLog = Rc::new(RefCell::new(Vec::new()));
        let sink = deliveries.clone();
        let observer = self
            .context
            .observer(move |list, _| sink.borrow_mut().push(list.get_entries()));
        (observer, deliveries)
    }

    /// Record an entry with the given name and type at time zero.
    fn push(&self, name: &str, entry_type: EntryType) {
        self.timeline
            .record(PerformanceEntry::new(name, entry_type, 0.0, 0.0));
    }
}

fn names(batch: &[PerformanceEntry]) -> Vec<&str> {
    batch.iter().map(|entry| entry.name.as_str()).collect()
}

#[test]
fn filters_by_type_and_preserves_order() {
    let harness = ObserverHarness::new();
    let (observer, deliveries) = harness.logging_observer();
    observer
        .observe(ObserveOptions::entry_types(["mark", "measure"]))
        .unwrap();

    harness.push("a", EntryType::Mark);
    harness.push("b", EntryType::Resource);
    harness.push("c", EntryType::Measure);
    harness.scheduler.run_frame();

    let log = deliveries.borrow();
    assert_eq!(log.len(), 1);
    assert_eq!(names(&log[0]), ["a", "c"]);
    assert_eq!(log[0][0].entry_type, EntryType::Mark);
    assert_eq!(log[0][1].entry_type, EntryType::Measure);
}

#[test]
fn many_records_coalesce_into_one_delivery() {
    let harness = ObserverHarness::new();
    let (observer, deliveries) = harness.logging_observer();
    observer.observe(ObserveOptions::single("mark")).unwrap();

    for i in 0..10 {
        harness.push(&format!("m{i}"), EntryType::Mark);
    }
    // All ten records share a single scheduled delivery.
    assert_eq!(harness.scheduler.queued(), 1);

    harness.scheduler.run_frame();
    let log = deliveries.borrow();
    assert_eq!(log.len(), 1);
    assert_eq!(log[0].len(), 10);
}

#[test]
fn frame_without_records_delivers_nothing() {
    let harness = ObserverHarness::new();
    let (observer, deliveries) = harness.logging_observer();
    observer.observe(ObserveOptions::single("mark")).unwrap();

    harness.push("a", EntryType::Mark);
    harness.scheduler.run_frame();
    harness.scheduler.run_frame();

    assert_eq!(deliveries.borrow().len(), 1);
}

#[test]
fn take_records_drains_idempotently() {
    let harness = ObserverHarness::new();
    let (observer, _deliveries) = harness.logging_observer();
    observer.observe(ObserveOptions::single("mark")).unwrap();

    harness.push("a", EntryType::Mark);
    harness.push("b", EntryType::Mark);

    let first = observer.take_records();
    assert_eq!(names(&first.get_entries()), ["a", "b"]);

    let second = observer.take_records();
    assert!(second.is_empty());
}

#[test]
fn multi_type_observe_resets_the_buffer() {
    let harness = ObserverHarness::new();
    let (observer, _deliveries) = harness.logging_observer();
    observer.observe(ObserveOptions::single("mark")).unwrap();
    harness.push("before", EntryType::Mark);

    observer
        .observe(ObserveOptions::entry_types(["mark"]))
        .unwrap();

    assert!(observer.take_records().is_empty());
}

#[test]
fn single_type_observe_keeps_the_buffer() {
    let harness = ObserverHarness::new();
    let (observer, _deliveries) = harness.logging_observer();
    observer.observe(ObserveOptions::single("mark")).unwrap();
    harness.push("before", EntryType::Mark);

    observer.observe(ObserveOptions::single("mark")).unwrap();

    assert_eq!(names(&observer.take_records().get_entries()), ["before"]);
}

#[test]
fn buffered_replay_seeds_history_and_schedules_one_delivery() {
    let harness = ObserverHarness::new();
    harness.push("early-a", EntryType::Mark);
    harness.push("early-b", EntryType::Mark);
    harness.push("early-c", EntryType::Measure);

    let (observer, deliveries) = harness.logging_observer();
    observer.observe(ObserveOptions::buffered("mark")).unwrap();

    // The replay delivery is scheduled even though no new entries arrive.
    assert_eq!(harness.scheduler.queued(), 1);
    harness.scheduler.run_frame();

    let log = deliveries.borrow();
    assert_eq!(log.len(), 1);
    assert_eq!(names(&log[0]), ["early-a", "early-b"]);
}

#[test]
fn buffered_replay_then_live_records_keep_flowing() {
    let harness = ObserverHarness::new();
    harness.push("early", EntryType::Mark);

    let (observer, deliveries) = harness.logging_observer();
    observer.observe(ObserveOptions::buffered("mark")).unwrap();
    harness.scheduler.run_frame();

    harness.push("late", EntryType::Mark);
    harness.scheduler.run_frame();

    let log = deliveries.borrow();
    assert_eq!(log.len(), 2);
    assert_eq!(names(&log[0]), ["early"]);
    assert_eq!(names(&log[1]), ["late"]);
}

#[test]
fn observe_without_criteria_fails_and_changes_nothing() {
    let harness = ObserverHarness::new();
    let (observer, deliveries) = harness.logging_observer();

    let err = observer
        .observe(ObserveOptions::EntryTypes(Vec::new()))
        .unwrap_err();

    assert!(matches!(err, ObserverError::MissingEntryTypes));
    assert!(!observer.is_connected());
    assert!(observer.observed_types().is_empty());
    assert_eq!(harness.timeline.emitter().listener_count(), 0);

    harness.push("a", EntryType::Mark);
    harness.scheduler.run_frame();
    assert!(deliveries.borrow().is_empty());
}

#[test]
fn repeated_observe_registers_once() {
    let harness = ObserverHarness::new();
    let (observer, deliveries) = harness.logging_observer();

    observer.observe(ObserveOptions::single("mark")).unwrap();
    observer
        .observe(ObserveOptions::entry_types(["mark", "measure"]))
        .unwrap();
    assert_eq!(harness.timeline.emitter().listener_count(), 1);

    harness.push("a", EntryType::Mark);
    harness.scheduler.run_frame();

    // One registration means the entry is delivered exactly once.
    let log = deliveries.borrow();
    assert_eq!(log.len(), 1);
    assert_eq!(names(&log[0]), ["a"]);
}

#[test]
fn observe_replaces_criteria_wholesale() {
    let harness = ObserverHarness::new();
    let (observer, deliveries) = harness.logging_observer();
    observer.observe(ObserveOptions::single("mark")).unwrap();
    observer.observe(ObserveOptions::single("measure")).unwrap();

    harness.push("dropped", EntryType::Mark);
    harness.push("kept", EntryType::Measure);
    harness.scheduler.run_frame();

    let log = deliveries.borrow();
    assert_eq!(log.len(), 1);
    assert_eq!(names(&log[0]), ["kept"]);
}

#[test]
fn disconnect_cancels_pending_delivery_and_clears_buffer() {
    let harness = ObserverHarness::new();
    let (observer, deliveries) = harness.logging_observer();
    observer.observe(ObserveOptions::single("mark")).unwrap();

    harness.push("a", EntryType::Mark);
    assert_eq!(harness.scheduler.queued(), 1);

    observer.disconnect();
    harness.scheduler.run_frame();

    assert!(deliveries.borrow().is_empty());
    assert!(observer.take_records().is_empty());
    assert!(!observer.is_connected());
    assert_eq!(harness.timeline.emitter().listener_count(), 0);
}

#[test]
fn no_records_are_received_after_disconnect() {
    let harness = ObserverHarness::new();
    let (observer, deliveries) = harness.logging_observer();
    observer.observe(ObserveOptions::single("mark")).unwrap();
    observer.disconnect();

    harness.push("a", EntryType::Mark);
    harness.scheduler.run_frame();

    assert!(deliveries.borrow().is_empty());
}

#[test]
fn observe_after_disconnect_resumes_delivery() {
    let harness = ObserverHarness::new();
    let (observer, deliveries) = harness.logging_observer();
    observer.observe(ObserveOptions::single("mark")).unwrap();

    // A delivery is pending when the observer disconnects; its tick is
    // stale by the time the frame runs and must not fire early or twice.
    harness.push("before", EntryType::Mark);
    observer.disconnect();

    observer.observe(ObserveOptions::single("mark")).unwrap();
    harness.push("after", EntryType::Mark);
    harness.scheduler.run_frame();

    let log = deliveries.borrow();
    assert_eq!(log.len(), 1);
    assert_eq!(names(&log[0]), ["after"]);
}

#[test]
fn unrecognized_type_still_subscribes() {
    let harness = ObserverHarness::new();
    let (observer, deliveries) = harness.logging_observer();

    // Advisory only: the subscription is established even though no host
    // source records this tag.
    observer
        .observe(ObserveOptions::single("frame-drop"))
        .unwrap();
    assert!(observer.is_connected());

    harness.push("synthetic", EntryType::Other("frame-drop".to_string()));
    harness.scheduler.run_frame();

    let log = deliveries.borrow();
    assert_eq!(log.len(), 1);
    assert_eq!(names(&log[0]), ["synthetic"]);
}

#[test]
fn callback_may_drain_and_disconnect_the_observer() {
    let harness = ObserverHarness::new();
    let drained = Rc::new(RefCell::new(Vec::new()));

    let sink = drained.clone();
    let observer = harness.context.observer(move |list, observer| {
        sink.borrow_mut().push(list.len());
        // Re-entering the engine from the delivery callback must be safe.
        let leftover = observer.take_records();
        assert!(leftover.is_empty());
        observer.disconnect();
    });
    observer.observe(ObserveOptions::single("mark")).unwrap();

    harness.push("a", EntryType::Mark);
    harness.scheduler.run_frame();

    assert_eq!(*drained.borrow(), [1]);
    assert!(!observer.is_connected());
}

#[test]
fn records_arriving_during_delivery_schedule_the_next_frame() {
    let harness = ObserverHarness::new();
    let deliveries: DeliveryLog = Rc::new(RefCell::new(Vec::new()));

    let sink = deliveries.clone();
    let timeline = harness.timeline.clone();
    let observer = harness.context.observer(move |list, _| {
        let batch = list.get_entries();
        // Recording from inside the callback must coalesce into a fresh
        // delivery on the next frame, not recurse into this one.
        if batch.len() == 1 && batch[0].name == "first" {
            timeline.record(PerformanceEntry::mark("echo", 1.0));
        }
        sink.borrow_mut().push(batch);
    });
    observer.observe(ObserveOptions::single("mark")).unwrap();

    harness.push("first", EntryType::Mark);
    harness.scheduler.run_frame();
    assert_eq!(deliveries.borrow().len(), 1);
    assert_eq!(harness.scheduler.queued(), 1);

    harness.scheduler.run_frame();
    let log = deliveries.borrow();
    assert_eq!(log.len(), 2);
    assert_eq!(names(&log[1]), ["echo"]);
}

#[test]
fn two_observers_filter_independently() {
    let harness = ObserverHarness::new();
    let (marks_observer, mark_deliveries) = harness.logging_observer();
    let (measures_observer, measure_deliveries) = harness.logging_observer();
    marks_observer
        .observe(ObserveOptions::single("mark"))
        .unwrap();
    measures_observer
        .observe(ObserveOptions::single("measure"))
        .unwrap();

    harness.push("m", EntryType::Mark);
    harness.push("s", EntryType::Measure);
    harness.scheduler.run_frame();

    assert_eq!(names(&mark_deliveries.borrow()[0]), ["m"]);
    assert_eq!(names(&measure_deliveries.borrow()[0]), ["s"]);
}
