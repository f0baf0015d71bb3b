use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use crate::buffer::{InsertOutcome, OrderedBuffer};
use crate::event::Event;

/// Min-heap entry ordered by timestamp alone; payloads never participate in
/// the ordering, so equal timestamps drain in arbitrary order.
#[derive(Debug, Clone, Copy)]
struct OrderedByTime(Event);

impl PartialEq for OrderedByTime {
    fn eq(&self, other: &Self) -> bool {
        self.0.timestamp_us == other.0.timestamp_us
    }
}

impl Eq for OrderedByTime {}

impl PartialOrd for OrderedByTime {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OrderedByTime {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.timestamp_us.cmp(&other.0.timestamp_us)
    }
}

/// Exact strategy: a capacity-bounded binary min-heap.
///
/// `remove_min` is correct regardless of arrival order, at logarithmic cost
/// per operation. When full, the incoming event is rejected; capacity is
/// expected to be provisioned well above steady-state load, and rejections
/// surface through the journal's drop counters.
pub struct ExactHeapBuffer {
    heap: BinaryHeap<Reverse<OrderedByTime>>,
    capacity: usize,
}

impl ExactHeapBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            heap: BinaryHeap::new(),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl OrderedBuffer for ExactHeapBuffer {
    fn insert(&mut self, event: Event) -> InsertOutcome {
        if self.heap.len() >= self.capacity {
            return InsertOutcome::DroppedNewest;
        }
        self.heap.push(Reverse(OrderedByTime(event)));
        InsertOutcome::Stored
    }

    fn remove_min(&mut self) -> Option<Event> {
        self.heap.pop().map(|Reverse(OrderedByTime(event))| event)
    }

    fn len(&self) -> usize {
        self.heap.len()
    }
}
