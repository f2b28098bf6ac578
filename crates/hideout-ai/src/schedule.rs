//! Frame-driven timers.
//!
//! A [`Scheduler`] holds one-shot and repeating events keyed by the time
//! they fall due. The clock is virtual: it only moves when the owner calls
//! [`Scheduler::advance`] with the frame's delta. Events due at the same
//! instant fire in the order they were scheduled.

use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::time::Duration;

/// An entry in the timer queue.
#[derive(Debug)]
struct Entry<E> {
    event: E,
    due: Duration,
    /// Scheduling order, for ties on `due`.
    seq: u64,
    /// Re-arm interval for repeating events.
    period: Option<Duration>,
}

impl<E> PartialEq for Entry<E> {
    fn eq(&self, other: &Self) -> bool {
        self.due == other.due && self.seq == other.seq
    }
}

impl<E> Eq for Entry<E> {}

impl<E> PartialOrd for Entry<E> {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl<E> Ord for Entry<E> {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        // Wrapped in Reverse for the BinaryHeap: earlier due first, then
        // earlier insertion.
        self.due.cmp(&other.due).then(self.seq.cmp(&other.seq))
    }
}

/// A timer queue driven by explicit time steps.
pub struct Scheduler<E> {
    heap: BinaryHeap<Reverse<Entry<E>>>,
    seq: u64,
    now: Duration,
}

impl<E> Scheduler<E> {
    /// Create an empty scheduler at time zero.
    pub fn new() -> Self {
        Self {
            heap: BinaryHeap::new(),
            seq: 0,
            now: Duration::ZERO,
        }
    }

    /// Time elapsed since creation, as seen by the scheduler.
    pub fn now(&self) -> Duration {
        self.now
    }

    fn push(&mut self, event: E, due: Duration, period: Option<Duration>) {
        let seq = self.seq;
        self.seq += 1;
        self.heap.push(Reverse(Entry {
            event,
            due,
            seq,
            period,
        }));
    }

    /// Fire `event` once, `delay` from now.
    pub fn schedule(&mut self, event: E, delay: Duration) {
        self.push(event, self.now + delay, None);
    }

    /// Fire `event` after `delay`, then every `interval` after that.
    ///
    /// A zero interval is treated as one millisecond.
    pub fn every(&mut self, event: E, delay: Duration, interval: Duration) {
        let interval = interval.max(Duration::from_millis(1));
        self.push(event, self.now + delay, Some(interval));
    }

    /// Whether no events are pending.
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Number of pending events.
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// Remove all pending events that do **not** satisfy the predicate.
    pub fn retain(&mut self, predicate: impl Fn(&E) -> bool) {
        self.heap = std::mem::take(&mut self.heap)
            .into_iter()
            .filter(|Reverse(entry)| predicate(&entry.event))
            .collect();
    }
}

impl<E: Clone> Scheduler<E> {
    /// Move time forward by `dt` and return every event that fell due, in
    /// firing order. Repeating events are re-armed and may fire several
    /// times within one large step.
    pub fn advance(&mut self, dt: Duration) -> Vec<E> {
        let target = self.now + dt;
        let mut fired = Vec::new();

        while self
            .heap
            .peek()
            .is_some_and(|Reverse(entry)| entry.due <= target)
        {
            let Some(Reverse(entry)) = self.heap.pop() else {
                break;
            };
            self.now = entry.due;
            if let Some(period) = entry.period {
                self.push(entry.event.clone(), entry.due + period, Some(period));
            }
            fired.push(entry.event);
        }

        self.now = target;
        fired
    }
}

impl<E> Default for Scheduler<E> {
    fn default() -> Self {
        Self::new()
    }
}
