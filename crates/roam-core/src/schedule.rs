use core::cmp::Ordering;
use std::collections::BinaryHeap;

/// Deferred events owned by a single agent.
///
/// Nothing fires on its own: the owner advances the clock at the top of its
/// tick and drains due events, so event order relative to `update` is fully
/// deterministic. Every entry carries the generation stamp that was current
/// when it was scheduled; the owner compares it against its live generation
/// and drops stale events.
#[derive(Debug, Clone)]
pub struct Schedule<E> {
    now: f64,
    seq: u64,
    pending: BinaryHeap<Pending<E>>,
}

/// An event whose due time has passed.
#[derive(Debug, Clone, PartialEq)]
pub struct Fired<E> {
    pub generation: u64,
    pub event: E,
}

#[derive(Debug, Clone)]
struct Pending<E> {
    due: f64,
    seq: u64,
    generation: u64,
    event: E,
}

impl<E> Pending<E> {
    fn key(&self) -> (f64, u64) {
        (self.due, self.seq)
    }
}

impl<E> PartialEq for Pending<E> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<E> Eq for Pending<E> {}

impl<E> PartialOrd for Pending<E> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<E> Ord for Pending<E> {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering to make BinaryHeap behave like a min-heap.
        let (a_due, a_seq) = self.key();
        let (b_due, b_seq) = other.key();
        b_due.total_cmp(&a_due).then(b_seq.cmp(&a_seq))
    }
}

impl<E> Default for Schedule<E> {
    fn default() -> Self {
        Self {
            now: 0.0,
            seq: 0,
            pending: BinaryHeap::new(),
        }
    }
}

impl<E> Schedule<E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seconds elapsed since the schedule was created.
    pub fn now(&self) -> f64 {
        self.now
    }

    pub fn advance(&mut self, dt_seconds: f32) {
        self.now += f64::from(dt_seconds.max(0.0));
    }

    pub fn schedule_in(&mut self, delay_seconds: f32, generation: u64, event: E) {
        let due = self.now + f64::from(delay_seconds.max(0.0));
        self.pending.push(Pending {
            due,
            seq: self.seq,
            generation,
            event,
        });
        self.seq += 1;
    }

    /// Pop the earliest event whose due time is `<= now`. Events due at the
    /// same instant come out in scheduling order.
    pub fn pop_due(&mut self) -> Option<Fired<E>> {
        if self.pending.peek()?.due > self.now {
            return None;
        }
        let entry = self.pending.pop()?;
        Some(Fired {
            generation: entry.generation,
            event: entry.event,
        })
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }
}
