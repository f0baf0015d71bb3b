use paceline::{
    BufferConfig, EventJournal, JournalConfig, JournalError, MemorySink, ProducerPool,
    SessionConfig, SinkError, SinkRecord,
};
use std::io;

fn journal_config() -> JournalConfig {
    JournalConfig::for_sink("unused-by-memory-sink")
        .with_buffer(BufferConfig::Exact { capacity: 100_000 })
        .with_pacing_interval_us(1)
}

#[test]
fn shutdown_drains_the_buffer_before_exiting() {
    let sink = MemorySink::new();
    let journal =
        EventJournal::with_sink(&journal_config(), Box::new(sink.clone())).expect("open journal");
    for ts in [40u64, 12, 93, 5, 77, 30, 61, 2, 88, 19] {
        journal.submit(ts, ts as i64);
    }
    let report = journal.shutdown().expect("journal shutdown");
    assert_eq!(report.records_written, 10);
    assert_eq!(report.dropped, 0);
    assert_eq!(sink.len(), 10);
}

#[test]
fn concurrent_producers_lose_nothing_without_overflow() {
    let sink = MemorySink::new();
    let journal =
        EventJournal::with_sink(&journal_config(), Box::new(sink.clone())).expect("open journal");
    let handle = journal.handle();
    let session = SessionConfig {
        producers: 4,
        events_per_producer: 500,
    };
    let producers = ProducerPool::spawn(&handle, session);
    producers.join();

    let report = journal.shutdown().expect("journal shutdown");
    let expected = (session.producers * session.events_per_producer) as u64;
    assert_eq!(report.records_written, expected);
    assert_eq!(sink.len() as u64, expected);

    let metrics = handle.metrics();
    assert_eq!(metrics.submitted, expected);
    assert_eq!(metrics.stored, expected);
    assert_eq!(metrics.dropped(), 0);
    assert_eq!(metrics.drained, expected);
}

#[test]
fn submits_after_shutdown_are_rejected_and_counted() {
    let sink = MemorySink::new();
    let journal =
        EventJournal::with_sink(&journal_config(), Box::new(sink.clone())).expect("open journal");
    let handle = journal.handle();
    journal.submit(1, 1);
    journal.shutdown().expect("journal shutdown");

    handle.submit(2, 2);
    let metrics = handle.metrics();
    assert_eq!(metrics.rejected_after_shutdown, 1);
    assert_eq!(sink.len(), 1);
}

#[test]
fn overflow_drops_are_observable_in_the_report() {
    let sink = MemorySink::new();
    let config = JournalConfig::for_sink("unused-by-memory-sink")
        .with_buffer(BufferConfig::Exact { capacity: 1 })
        // Slow pacing keeps the single slot occupied while the burst lands.
        .with_pacing_interval_us(50_000);
    let journal =
        EventJournal::with_sink(&config, Box::new(sink.clone())).expect("open journal");
    let handle = journal.handle();
    for ts in 0..50u64 {
        handle.submit(ts, ts as i64);
    }
    let report = journal.shutdown().expect("journal shutdown");
    let metrics = handle.metrics();
    assert_eq!(metrics.submitted, 50);
    assert_eq!(metrics.stored + metrics.dropped_newest, 50);
    assert!(report.dropped > 0, "burst into a one-slot buffer must drop");
    assert_eq!(report.records_written, metrics.stored);
    assert_eq!(sink.len() as u64, metrics.stored);
}

/// Sink that fails every append after the first `allowed` records.
struct FailingSink {
    allowed: usize,
    written: usize,
}

impl paceline::EventSink for FailingSink {
    fn append(&mut self, _record: SinkRecord) -> Result<(), SinkError> {
        if self.written >= self.allowed {
            return Err(SinkError::Write(io::Error::new(
                io::ErrorKind::Other,
                "backing store rejected the record",
            )));
        }
        self.written += 1;
        Ok(())
    }

    fn flush(&mut self) -> Result<(), SinkError> {
        Ok(())
    }
}

#[test]
fn sink_failure_is_fatal_and_surfaces_at_shutdown() {
    let journal = EventJournal::with_sink(
        &journal_config(),
        Box::new(FailingSink {
            allowed: 0,
            written: 0,
        }),
    )
    .expect("open journal");
    journal.submit(1, 1);
    let err = journal.shutdown().expect_err("sink failure must surface");
    assert!(matches!(err, JournalError::Sink(SinkError::Write(_))));
}
