use std::collections::VecDeque;

use crate::buffer::{InsertOutcome, OrderedBuffer};
use crate::config::OverflowPolicy;
use crate::event::Event;

/// Approximate strategy: a fixed ring of FIFO buckets indexed by
/// `timestamp mod bucket_count`.
///
/// Insert and remove are O(1) amortized. Ordering holds only while buffered
/// timestamps span fewer than `bucket_count` distinct indices; timestamps
/// separated by more than the bucket count that alias to the same index can
/// drain out of true order. Unlike the exact strategy's silent rejection,
/// this buffer supports either rejecting the incoming event or evicting the
/// current minimum when full.
pub struct BucketedRingBuffer {
    buckets: Vec<VecDeque<Event>>,
    head: usize,
    len: usize,
    capacity: usize,
    policy: OverflowPolicy,
    drift_repairs: u64,
}

impl BucketedRingBuffer {
    pub fn new(bucket_count: usize, capacity: usize, policy: OverflowPolicy) -> Self {
        assert!(bucket_count > 0, "bucket count must be > 0");
        assert!(capacity > 0, "capacity must be > 0");
        Self {
            buckets: (0..bucket_count).map(|_| VecDeque::new()).collect(),
            head: 0,
            len: 0,
            capacity,
            policy,
            drift_repairs: 0,
        }
    }

    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    fn bucket_index(&self, timestamp_us: u64) -> usize {
        (timestamp_us % self.buckets.len() as u64) as usize
    }

    /// Pops the front of the first non-empty bucket at or after the cursor.
    ///
    /// The scan is bounded to one full revolution. `len > 0` implies some
    /// bucket is non-empty; if the scan still comes up dry the size
    /// bookkeeping has drifted, so it is rebuilt from the buckets and the
    /// repair is recorded instead of looping forever.
    fn pop_front_from_cursor(&mut self) -> Option<Event> {
        let bucket_count = self.buckets.len();
        for probe in 0..bucket_count {
            let index = (self.head + probe) % bucket_count;
            if let Some(event) = self.buckets[index].pop_front() {
                self.head = index;
                self.len -= 1;
                return Some(event);
            }
        }
        self.drift_repairs += 1;
        self.len = self.buckets.iter().map(VecDeque::len).sum();
        debug_assert_eq!(self.len, 0, "scan missed a resident bucket");
        None
    }
}

impl OrderedBuffer for BucketedRingBuffer {
    fn insert(&mut self, event: Event) -> InsertOutcome {
        let mut outcome = InsertOutcome::Stored;
        if self.len >= self.capacity {
            match self.policy {
                OverflowPolicy::DropNewest => return InsertOutcome::DroppedNewest,
                OverflowPolicy::DropOldest => {
                    if self.pop_front_from_cursor().is_none() {
                        return InsertOutcome::DroppedNewest;
                    }
                    outcome = InsertOutcome::DroppedOldest;
                }
            }
        }
        let index = self.bucket_index(event.timestamp_us);
        let retarget_cursor = self.len == 0
            || self.buckets[self.head]
                .front()
                .is_some_and(|front| event.timestamp_us < front.timestamp_us);
        if retarget_cursor {
            self.head = index;
        }
        self.buckets[index].push_back(event);
        self.len += 1;
        outcome
    }

    fn remove_min(&mut self) -> Option<Event> {
        if self.len == 0 {
            return None;
        }
        self.pop_front_from_cursor()
    }

    fn len(&self) -> usize {
        self.len
    }

    fn drift_repairs(&self) -> u64 {
        self.drift_repairs
    }
}
