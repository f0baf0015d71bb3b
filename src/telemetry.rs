use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::buffer::InsertOutcome;

/// Shared counters exported by the journal.
///
/// The overflow policy drops events without signalling the submitting
/// caller; these counters are what makes that policy observable. Counters
/// are updated outside the buffer's critical section with relaxed ordering.
#[derive(Debug, Default)]
pub struct JournalMetrics {
    submitted: AtomicU64,
    stored: AtomicU64,
    dropped_newest: AtomicU64,
    dropped_oldest: AtomicU64,
    rejected_after_shutdown: AtomicU64,
    drained: AtomicU64,
    empty_cycles: AtomicU64,
    drift_repairs: AtomicU64,
}

impl JournalMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one submission and its buffer outcome.
    pub fn record_submit(&self, outcome: InsertOutcome) {
        self.submitted.fetch_add(1, Ordering::Relaxed);
        match outcome {
            InsertOutcome::Stored => {
                self.stored.fetch_add(1, Ordering::Relaxed);
            }
            InsertOutcome::DroppedNewest => {
                self.dropped_newest.fetch_add(1, Ordering::Relaxed);
            }
            InsertOutcome::DroppedOldest => {
                // The incoming event was stored; its predecessor was evicted.
                self.stored.fetch_add(1, Ordering::Relaxed);
                self.dropped_oldest.fetch_add(1, Ordering::Relaxed);
            }
        }
    }

    pub fn record_rejected_after_shutdown(&self) {
        self.rejected_after_shutdown.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_drained(&self) {
        self.drained.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_empty_cycle(&self) {
        self.empty_cycles.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_drift_repairs(&self, total: u64) {
        self.drift_repairs.store(total, Ordering::Relaxed);
    }

    pub fn submitted(&self) -> u64 {
        self.submitted.load(Ordering::Relaxed)
    }

    pub fn stored(&self) -> u64 {
        self.stored.load(Ordering::Relaxed)
    }

    pub fn drained(&self) -> u64 {
        self.drained.load(Ordering::Relaxed)
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            submitted: self.submitted.load(Ordering::Relaxed),
            stored: self.stored.load(Ordering::Relaxed),
            dropped_newest: self.dropped_newest.load(Ordering::Relaxed),
            dropped_oldest: self.dropped_oldest.load(Ordering::Relaxed),
            rejected_after_shutdown: self.rejected_after_shutdown.load(Ordering::Relaxed),
            drained: self.drained.load(Ordering::Relaxed),
            empty_cycles: self.empty_cycles.load(Ordering::Relaxed),
            drift_repairs: self.drift_repairs.load(Ordering::Relaxed),
        }
    }

    /// Renders the counters in Prometheus text exposition format.
    pub fn render_metrics(&self) -> String {
        self.snapshot().render()
    }
}

/// Point-in-time copy of the journal counters.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub submitted: u64,
    pub stored: u64,
    pub dropped_newest: u64,
    pub dropped_oldest: u64,
    pub rejected_after_shutdown: u64,
    pub drained: u64,
    pub empty_cycles: u64,
    pub drift_repairs: u64,
}

impl MetricsSnapshot {
    /// Events dropped by the overflow policy, either side.
    pub fn dropped(&self) -> u64 {
        self.dropped_newest + self.dropped_oldest
    }

    pub fn render(&self) -> String {
        format!(
            "journal_submitted_total {}\njournal_stored_total {}\njournal_dropped_total{{policy=\"newest\"}} {}\njournal_dropped_total{{policy=\"oldest\"}} {}\njournal_rejected_after_shutdown_total {}\njournal_drained_total {}\njournal_empty_cycles_total {}\njournal_drift_repairs_total {}\n",
            self.submitted,
            self.stored,
            self.dropped_newest,
            self.dropped_oldest,
            self.rejected_after_shutdown,
            self.drained,
            self.empty_cycles,
            self.drift_repairs
        )
    }
}
