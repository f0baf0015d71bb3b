use serde::{Deserialize, Serialize};

/// Immutable timestamped sample destined for order-preserving persistence.
///
/// The total order over events is induced by `timestamp_us`; ties are broken
/// arbitrarily by the exact buffer strategy and by insertion order within a
/// bucket for the approximate strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// Monotonic timestamp in microseconds, stamped by the producer.
    pub timestamp_us: u64,
    /// Application payload.
    pub value: i64,
}

impl Event {
    pub fn new(timestamp_us: u64, value: i64) -> Self {
        Self {
            timestamp_us,
            value,
        }
    }
}

/// Record handed to a sink for one drained event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SinkRecord {
    pub timestamp_us: u64,
    pub value: i64,
}

impl From<Event> for SinkRecord {
    fn from(event: Event) -> Self {
        Self {
            timestamp_us: event.timestamp_us,
            value: event.value,
        }
    }
}
