//! Paceline: paced, time-ordered event journaling.
//!
//! Concurrent producers stamp and submit timestamped events into a bounded
//! time-ordered buffer guarded by a spin lock; a single paced drain worker
//! removes the minimum-timestamp event each cycle and appends it to an
//! append-only sink. The buffer's ordering strategy, an exact min-heap or
//! an approximate bucketed ring, is selected by configuration behind one
//! interface.

pub mod app;
pub mod buffer;
pub mod clock;
pub mod config;
pub mod diagnostics;
pub mod drain;
pub mod event;
pub mod journal;
pub mod producer;
pub mod sink;
pub mod sync;
pub mod telemetry;

pub use buffer::{
    build_buffer, BucketedRingBuffer, ExactHeapBuffer, InsertOutcome, OrderedBuffer, SharedBuffer,
};
pub use clock::{ManualClock, MonotonicClock, SystemMonotonicClock};
pub use config::{
    load_app_config, AppConfig, BufferConfig, ConfigError, JournalConfig, OverflowPolicy,
    SessionConfig, DEFAULT_CAPACITY, DEFAULT_EVENTS_PER_PRODUCER, DEFAULT_PACING_INTERVAL_US,
    DEFAULT_PRODUCERS,
};
pub use diagnostics::{DiagnosticLog, DiagnosticsError, LogLevel, LogRotationPolicy, LogSegment};
pub use drain::DrainReport;
pub use event::{Event, SinkRecord};
pub use journal::{EventJournal, JournalError, JournalHandle};
pub use producer::ProducerPool;
pub use sink::{CsvFileSink, EventSink, MemorySink, SinkError};
pub use sync::{ShutdownSignal, SpinGuard, SpinMutex};
pub use telemetry::{JournalMetrics, MetricsSnapshot};
