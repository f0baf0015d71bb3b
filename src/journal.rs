use std::sync::Arc;
use thiserror::Error;

use crate::buffer::SharedBuffer;
use crate::clock::{MonotonicClock, SystemMonotonicClock};
use crate::config::{ConfigError, JournalConfig};
use crate::diagnostics::{DiagnosticLog, LogLevel};
use crate::drain::{DrainContext, DrainReport, DrainWorker};
use crate::event::Event;
use crate::sink::{CsvFileSink, EventSink, SinkError};
use crate::sync::ShutdownSignal;
use crate::telemetry::{JournalMetrics, MetricsSnapshot};

/// Cloneable submission surface handed to producer threads.
///
/// Mirrors the construction-time split between ownership and use: the
/// journal owns the drain worker and the shutdown protocol; handles only
/// stamp-and-insert.
#[derive(Clone)]
pub struct JournalHandle {
    buffer: Arc<SharedBuffer>,
    shutdown: Arc<ShutdownSignal>,
    metrics: Arc<JournalMetrics>,
    clock: Arc<dyn MonotonicClock>,
}

impl JournalHandle {
    /// Enqueues one event. Fire-and-forget: overflow is counted by the
    /// journal metrics, never signalled to the caller. Submissions after
    /// shutdown has been requested are rejected and counted.
    pub fn submit(&self, timestamp_us: u64, value: i64) {
        if self.shutdown.is_requested() {
            self.metrics.record_rejected_after_shutdown();
            return;
        }
        let outcome = self.buffer.insert(Event::new(timestamp_us, value));
        self.metrics.record_submit(outcome);
    }

    /// The journal's clock, for stamping events just before submission.
    pub fn clock(&self) -> Arc<dyn MonotonicClock> {
        self.clock.clone()
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }
}

/// Paced, time-ordered event journal.
///
/// Accepts bursty out-of-order submissions from any number of threads and
/// persists them in approximately timestamp order through one rate-limited
/// drain worker. Strategy, capacity, and pacing come from [`JournalConfig`].
pub struct EventJournal {
    handle: JournalHandle,
    shutdown: Arc<ShutdownSignal>,
    worker: Option<DrainWorker>,
    diagnostics: DiagnosticLog,
}

impl EventJournal {
    /// Opens the journal with a CSV file sink at the configured path and
    /// starts the drain worker.
    pub fn open(config: JournalConfig) -> Result<Self, JournalError> {
        config.validate()?;
        let sink = CsvFileSink::create(&config.sink_path)?;
        Self::with_sink(&config, Box::new(sink))
    }

    /// Opens the journal over an injected sink. Used by tests and by
    /// embedders with their own persistence.
    pub fn with_sink(
        config: &JournalConfig,
        sink: Box<dyn EventSink>,
    ) -> Result<Self, JournalError> {
        Self::with_sink_and_clock(config, sink, Arc::new(SystemMonotonicClock::new()))
    }

    /// Opens the journal over an injected sink and clock, so tests can pin
    /// the timestamps producers and diagnostics observe.
    pub fn with_sink_and_clock(
        config: &JournalConfig,
        sink: Box<dyn EventSink>,
        clock: Arc<dyn MonotonicClock>,
    ) -> Result<Self, JournalError> {
        config.validate()?;
        let buffer = Arc::new(SharedBuffer::from_config(&config.buffer));
        let shutdown = Arc::new(ShutdownSignal::new());
        let metrics = Arc::new(JournalMetrics::new());
        let diagnostics = DiagnosticLog::default();
        let worker = DrainWorker::spawn(DrainContext {
            buffer: buffer.clone(),
            sink,
            shutdown: shutdown.clone(),
            metrics: metrics.clone(),
            diagnostics: diagnostics.clone(),
            clock: clock.clone(),
            pacing_interval: crate::drain::pacing_duration(config.pacing_interval_us),
        });
        Ok(Self {
            handle: JournalHandle {
                buffer,
                shutdown: shutdown.clone(),
                metrics,
                clock,
            },
            shutdown,
            worker: Some(worker),
            diagnostics,
        })
    }

    /// Returns a cloneable submission handle for producer threads.
    pub fn handle(&self) -> JournalHandle {
        self.handle.clone()
    }

    /// Enqueues one event; see [`JournalHandle::submit`].
    pub fn submit(&self, timestamp_us: u64, value: i64) {
        self.handle.submit(timestamp_us, value);
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        self.handle.metrics()
    }

    pub fn diagnostics(&self) -> &DiagnosticLog {
        &self.diagnostics
    }

    /// Requests stop, blocks until the drain worker has emptied the buffer
    /// and closed the sink, and returns the drain report. Further submits
    /// are invalid (they are counted and ignored). A sink failure that
    /// halted the worker surfaces here.
    pub fn shutdown(mut self) -> Result<DrainReport, JournalError> {
        let snapshot = self.handle.metrics();
        let _ = self.diagnostics.record(
            self.handle.clock.now_us(),
            LogLevel::Info,
            "journal",
            &format!(
                "shutdown requested: submitted={} stored={} dropped={}",
                snapshot.submitted,
                snapshot.stored,
                snapshot.dropped()
            ),
        );
        self.shutdown.request();
        let worker = self.worker.take().ok_or(JournalError::AlreadyClosed)?;
        match worker.join() {
            Ok(result) => result.map_err(JournalError::from),
            Err(_panic) => Err(JournalError::DrainPanicked),
        }
    }
}

impl Drop for EventJournal {
    fn drop(&mut self) {
        if let Some(worker) = self.worker.take() {
            self.shutdown.request();
            let _ = worker.join();
        }
    }
}

/// Errors surfaced by the journal lifecycle.
#[derive(Debug, Error)]
pub enum JournalError {
    #[error("invalid journal config: {0}")]
    Config(#[from] ConfigError),
    #[error("sink failure: {0}")]
    Sink(#[from] SinkError),
    #[error("journal already closed")]
    AlreadyClosed,
    #[error("drain worker panicked")]
    DrainPanicked,
}
