use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use crate::buffer::SharedBuffer;
use crate::clock::MonotonicClock;
use crate::diagnostics::{DiagnosticLog, LogLevel};
use crate::sink::{EventSink, SinkError};
use crate::sync::ShutdownSignal;
use crate::telemetry::{JournalMetrics, MetricsSnapshot};

/// Everything the drain thread owns or shares.
pub(crate) struct DrainContext {
    pub buffer: Arc<SharedBuffer>,
    pub sink: Box<dyn EventSink>,
    pub shutdown: Arc<ShutdownSignal>,
    pub metrics: Arc<JournalMetrics>,
    pub diagnostics: DiagnosticLog,
    pub clock: Arc<dyn MonotonicClock>,
    pub pacing_interval: Duration,
}

/// Summary returned once the drain loop has exited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrainReport {
    pub records_written: u64,
    pub empty_cycles: u64,
    pub dropped: u64,
    pub drift_repairs: u64,
}

impl DrainReport {
    fn from_snapshot(snapshot: MetricsSnapshot) -> Self {
        Self {
            records_written: snapshot.drained,
            empty_cycles: snapshot.empty_cycles,
            dropped: snapshot.dropped(),
            drift_repairs: snapshot.drift_repairs,
        }
    }
}

/// Single consumer that removes the minimum buffered event each cycle and
/// appends it to the sink, self-throttled to a minimum cycle duration.
pub(crate) struct DrainWorker {
    join: thread::JoinHandle<Result<DrainReport, SinkError>>,
}

impl DrainWorker {
    pub(crate) fn spawn(ctx: DrainContext) -> Self {
        let join = thread::Builder::new()
            .name("paceline_drain".to_string())
            .spawn(move || run(ctx))
            .expect("failed to spawn drain worker");
        Self { join }
    }

    /// Blocks until the drain thread exits.
    pub(crate) fn join(self) -> Result<Result<DrainReport, SinkError>, JoinPanic> {
        self.join.join().map_err(|_| JoinPanic)
    }
}

/// Marker for a drain thread that died by panic rather than by protocol.
#[derive(Debug)]
pub(crate) struct JoinPanic;

fn run(mut ctx: DrainContext) -> Result<DrainReport, SinkError> {
    let _ = ctx.diagnostics.record(
        ctx.clock.now_us(),
        LogLevel::Info,
        "drain",
        "drain worker started",
    );
    let result = drain_cycles(&mut ctx);
    ctx.metrics.record_drift_repairs(ctx.buffer.drift_repairs());
    match result {
        Ok(()) => {
            ctx.sink.flush()?;
            let report = DrainReport::from_snapshot(ctx.metrics.snapshot());
            let _ = ctx.diagnostics.record(
                ctx.clock.now_us(),
                LogLevel::Info,
                "drain",
                &format!(
                    "drain worker stopped after writing {} records",
                    report.records_written
                ),
            );
            Ok(report)
        }
        Err(err) => {
            let _ = ctx.diagnostics.record(
                ctx.clock.now_us(),
                LogLevel::Error,
                "drain",
                &format!("sink failure halted the drain worker: {err}"),
            );
            // Salvage whatever the sink already buffered; the write error is
            // the one that surfaces.
            let _ = ctx.sink.flush();
            Err(err)
        }
    }
}

/// Core cycle loop.
///
/// Exits only when shutdown has been requested and the buffer was observed
/// empty in the same cycle. The journal contract requires producers to stop
/// before shutdown is requested, and the submit gate rejects anything later,
/// so for conforming callers the empty observation is decisive.
fn drain_cycles(ctx: &mut DrainContext) -> Result<(), SinkError> {
    loop {
        let deadline = Instant::now() + ctx.pacing_interval;
        match ctx.buffer.remove_min() {
            Some(event) => {
                ctx.sink.append(event.into())?;
                ctx.metrics.record_drained();
                // The post-write wait always runs to its deadline so
                // consecutive sink writes stay at least one pacing interval
                // apart, even while shutting down.
                sleep_until(deadline);
            }
            None => {
                ctx.metrics.record_empty_cycle();
                if ctx.shutdown.is_requested() {
                    return Ok(());
                }
                // Nothing was written, so shutdown may cut this wait short.
                ctx.shutdown.wait_until(deadline);
            }
        }
    }
}

fn sleep_until(deadline: Instant) {
    loop {
        let now = Instant::now();
        if now >= deadline {
            return;
        }
        thread::sleep(deadline - now);
    }
}

/// Pacing interval as a `Duration`.
pub(crate) fn pacing_duration(pacing_interval_us: u64) -> Duration {
    Duration::from_micros(pacing_interval_us)
}
