//! Bounded time-ordered buffering.
//!
//! Two interchangeable strategies live behind the [`OrderedBuffer`] trait:
//! an exact min-heap (`exact`) and an approximate bucketed ring (`bucketed`).
//! Callers select one through [`BufferConfig`] and must not depend on which
//! is active beyond its documented ordering guarantee. [`SharedBuffer`] wraps
//! a strategy in the spin lock that serializes every producer and the drain
//! loop.

pub mod bucketed;
pub mod exact;

pub use bucketed::BucketedRingBuffer;
pub use exact::ExactHeapBuffer;

use crate::config::BufferConfig;
use crate::event::Event;
use crate::sync::SpinMutex;

/// Result of offering an event to a bounded buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    /// The event was admitted.
    Stored,
    /// The buffer was full and the incoming event was rejected.
    DroppedNewest,
    /// The buffer was full; the current minimum was evicted to admit the
    /// incoming event.
    DroppedOldest,
}

/// Contract shared by both buffering strategies.
///
/// Implementations are single-threaded; concurrency is provided exclusively
/// by [`SharedBuffer`].
pub trait OrderedBuffer: Send {
    /// Offers an event, applying the strategy's capacity policy.
    fn insert(&mut self, event: Event) -> InsertOutcome;

    /// Removes the minimum-timestamp event per the strategy's guarantee,
    /// or `None` when the buffer holds nothing.
    fn remove_min(&mut self) -> Option<Event>;

    /// Number of events currently owned by the buffer.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Count of bookkeeping repairs performed by the strategy. Zero for
    /// strategies that cannot drift.
    fn drift_repairs(&self) -> u64 {
        0
    }
}

/// Builds the strategy selected by configuration.
pub fn build_buffer(config: &BufferConfig) -> Box<dyn OrderedBuffer> {
    match config {
        BufferConfig::Exact { capacity } => Box::new(ExactHeapBuffer::new(*capacity)),
        BufferConfig::Bucketed {
            buckets,
            capacity,
            overflow,
        } => Box::new(BucketedRingBuffer::new(*buckets, *capacity, *overflow)),
    }
}

/// Spin-lock-guarded buffer shared between producers and the drain loop.
///
/// Every operation, including the size reads, runs inside the critical
/// section; there is no lock-free path.
pub struct SharedBuffer {
    inner: SpinMutex<Box<dyn OrderedBuffer>>,
}

impl SharedBuffer {
    pub fn new(buffer: Box<dyn OrderedBuffer>) -> Self {
        Self {
            inner: SpinMutex::new(buffer),
        }
    }

    pub fn from_config(config: &BufferConfig) -> Self {
        Self::new(build_buffer(config))
    }

    pub fn insert(&self, event: Event) -> InsertOutcome {
        self.inner.lock().insert(event)
    }

    pub fn remove_min(&self) -> Option<Event> {
        self.inner.lock().remove_min()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    pub fn drift_repairs(&self) -> u64 {
        self.inner.lock().drift_repairs()
    }
}
