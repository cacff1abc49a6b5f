//! Bounded priority queue for pending events.
//!
//! Holds accepted events and yields them to the dispatch worker in
//! priority order. Capacity is fixed at construction; publishing into a
//! full queue is rejected, never blocked. The internal guard is only ever
//! acquired with a timeout on the producer and dispatch paths.

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::time::Duration;

use parking_lot::Mutex;

use super::event::BusEvent;
use crate::error::PublishError;

/// An accepted event awaiting dispatch.
///
/// `seq` is assigned under the queue guard at acceptance and breaks
/// priority ties in FIFO order.
struct QueuedEvent {
    event: Box<dyn BusEvent>,
    seq: u64,
}

impl Ord for QueuedEvent {
    fn cmp(&self, other: &Self) -> Ordering {
        // Historical ordering, kept as-is: a numerically larger priority
        // value ranks as less urgent, so the smallest rank is dequeued
        // first. Equal ranks dequeue FIFO by acceptance sequence.
        other
            .event
            .priority()
            .cmp(&self.event.priority())
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for QueuedEvent {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for QueuedEvent {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for QueuedEvent {}

/// Result of a dequeue attempt.
pub(crate) enum PopOutcome {
    /// The highest-ranked pending event.
    Event(Box<dyn BusEvent>),
    /// No events pending.
    Empty,
    /// The queue guard was not acquired within the budget.
    LockTimeout,
}

struct Heap {
    entries: BinaryHeap<QueuedEvent>,
    next_seq: u64,
}

/// Capacity-bounded, priority-ordered container for accepted events.
pub(crate) struct EventQueue {
    heap: Mutex<Heap>,
    capacity: usize,
}

impl EventQueue {
    pub(crate) fn new(capacity: usize) -> Self {
        Self {
            heap: Mutex::new(Heap {
                entries: BinaryHeap::with_capacity(capacity),
                next_seq: 0,
            }),
            capacity,
        }
    }

    /// Insert an event, failing with `LockTimeout` or `Full`.
    ///
    /// On failure the event travels back to the caller inside the error.
    pub(crate) fn try_push(
        &self,
        event: Box<dyn BusEvent>,
        lock_timeout: Duration,
    ) -> Result<(), PublishError> {
        let Some(mut heap) = self.heap.try_lock_for(lock_timeout) else {
            return Err(PublishError::LockTimeout(event));
        };
        if heap.entries.len() >= self.capacity {
            return Err(PublishError::Full(event));
        }
        let seq = heap.next_seq;
        heap.next_seq += 1;
        heap.entries.push(QueuedEvent { event, seq });
        Ok(())
    }

    /// Remove and return the highest-ranked pending event.
    pub(crate) fn try_pop(&self, lock_timeout: Duration) -> PopOutcome {
        let Some(mut heap) = self.heap.try_lock_for(lock_timeout) else {
            return PopOutcome::LockTimeout;
        };
        match heap.entries.pop() {
            Some(entry) => PopOutcome::Event(entry.event),
            None => PopOutcome::Empty,
        }
    }

    /// Remove every pending event, for disposal during the shutdown drain.
    ///
    /// Acquires the guard unbounded; by the time this runs the bus has
    /// stopped accepting events, so the guard is uncontended.
    pub(crate) fn drain(&self) -> Vec<Box<dyn BusEvent>> {
        let mut heap = self.heap.lock();
        heap.entries.drain().map(|entry| entry.event).collect()
    }

    /// Number of events currently pending.
    pub(crate) fn len(&self) -> usize {
        self.heap.lock().entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::any::Any;
    use std::time::Duration;

    struct Ranked {
        name: &'static str,
        rank: i8,
    }

    impl Ranked {
        fn boxed(name: &'static str, rank: i8) -> Box<dyn BusEvent> {
            Box::new(Self { name, rank })
        }
    }

    impl BusEvent for Ranked {
        fn name(&self) -> &str {
            self.name
        }

        fn priority(&self) -> i8 {
            self.rank
        }

        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    const BUDGET: Duration = Duration::from_millis(100);

    fn pop_rank(queue: &EventQueue) -> i8 {
        match queue.try_pop(BUDGET) {
            PopOutcome::Event(event) => event.priority(),
            _ => panic!("expected a pending event"),
        }
    }

    #[test]
    fn smallest_rank_dequeues_first() {
        let queue = EventQueue::new(8);
        for rank in [5, 1, 3] {
            queue.try_push(Ranked::boxed("q.rank", rank), BUDGET).unwrap();
        }

        assert_eq!(pop_rank(&queue), 1);
        assert_eq!(pop_rank(&queue), 3);
        assert_eq!(pop_rank(&queue), 5);
        assert!(matches!(queue.try_pop(BUDGET), PopOutcome::Empty));
    }

    #[test]
    fn equal_ranks_dequeue_fifo() {
        let queue = EventQueue::new(8);
        for name in ["q.first", "q.second", "q.third"] {
            queue.try_push(Ranked::boxed(name, 2), BUDGET).unwrap();
        }

        let mut names = Vec::new();
        while let PopOutcome::Event(event) = queue.try_pop(BUDGET) {
            names.push(event.name().to_string());
        }
        assert_eq!(names, ["q.first", "q.second", "q.third"]);
    }

    #[test]
    fn full_queue_rejects_and_returns_the_event() {
        let queue = EventQueue::new(2);
        queue.try_push(Ranked::boxed("q.a", 0), BUDGET).unwrap();
        queue.try_push(Ranked::boxed("q.b", 0), BUDGET).unwrap();

        let err = queue
            .try_push(Ranked::boxed("q.c", 0), BUDGET)
            .unwrap_err();
        match err {
            PublishError::Full(event) => assert_eq!(event.name(), "q.c"),
            other => panic!("expected Full, got {:?}", other),
        }
        assert_eq!(queue.len(), 2);
    }

    #[test]
    fn contended_guard_times_out() {
        let queue = EventQueue::new(8);
        let guard = queue.heap.lock();

        let err = queue
            .try_push(Ranked::boxed("q.blocked", 0), Duration::from_millis(10))
            .unwrap_err();
        assert!(matches!(err, PublishError::LockTimeout(_)));
        assert!(matches!(
            queue.try_pop(Duration::from_millis(10)),
            PopOutcome::LockTimeout
        ));
        drop(guard);
    }

    #[test]
    fn drain_empties_the_queue() {
        let queue = EventQueue::new(8);
        for rank in [4, 2, 9] {
            queue.try_push(Ranked::boxed("q.drain", rank), BUDGET).unwrap();
        }

        let drained = queue.drain();
        assert_eq!(drained.len(), 3);
        assert_eq!(queue.len(), 0);
    }
}
