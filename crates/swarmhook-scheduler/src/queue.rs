//! Pending-firing queue.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;
use std::sync::Arc;
use swarmhook_core::IntervalJob;
use tokio::time::Instant;

/// One scheduled run of an interval job.
#[derive(Debug, Clone)]
pub struct Firing {
    pub due: Instant,
    pub priority: i32,
    /// Insertion order, breaks ties between equal due time and priority.
    pub seq: u64,
    pub job: Arc<IntervalJob>,
}

impl Firing {
    fn key(&self) -> (Instant, i32, u64) {
        (self.due, self.priority, self.seq)
    }
}

impl PartialEq for Firing {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for Firing {}

impl Ord for Firing {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key().cmp(&other.key())
    }
}

impl PartialOrd for Firing {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Min-queue of firings: earliest due first, then lowest priority value.
///
/// Not synchronized on its own; the scheduler keeps it behind one mutex.
#[derive(Debug, Default)]
pub struct FiringQueue {
    heap: BinaryHeap<Reverse<Firing>>,
    next_seq: u64,
}

impl FiringQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enqueue a firing of `job` at `due`.
    pub fn push(&mut self, due: Instant, job: Arc<IntervalJob>) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(Reverse(Firing {
            due,
            priority: job.priority,
            seq,
            job,
        }));
    }

    /// Due time of the earliest firing.
    pub fn next_due(&self) -> Option<Instant> {
        self.heap.peek().map(|Reverse(f)| f.due)
    }

    /// Remove and return the earliest firing if it is due at `now`.
    pub fn pop_due(&mut self, now: Instant) -> Option<Firing> {
        match self.heap.peek() {
            Some(Reverse(f)) if f.due <= now => self.heap.pop().map(|Reverse(f)| f),
            _ => None,
        }
    }

    /// Drop every pending firing, returning how many were cancelled.
    pub fn clear(&mut self) -> usize {
        let cancelled = self.heap.len();
        self.heap.clear();
        cancelled
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}
