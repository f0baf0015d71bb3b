use paceline::{
    BufferConfig, EventJournal, EventSink, JournalConfig, SinkError, SinkRecord,
};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

/// Sink that stamps the arrival instant of every append.
#[derive(Clone, Default)]
struct TimedSink {
    stamps: Arc<Mutex<Vec<Instant>>>,
}

impl TimedSink {
    fn stamps(&self) -> Vec<Instant> {
        self.stamps.lock().unwrap().clone()
    }
}

impl EventSink for TimedSink {
    fn append(&mut self, _record: SinkRecord) -> Result<(), SinkError> {
        self.stamps.lock().unwrap().push(Instant::now());
        Ok(())
    }

    fn flush(&mut self) -> Result<(), SinkError> {
        Ok(())
    }
}

#[test]
fn consecutive_writes_respect_the_pacing_floor() {
    let pacing = Duration::from_millis(10);
    let sink = TimedSink::default();
    let config = JournalConfig::for_sink("unused-by-timed-sink")
        .with_buffer(BufferConfig::Exact { capacity: 1024 })
        .with_pacing_interval_us(pacing.as_micros() as u64);
    let journal =
        EventJournal::with_sink(&config, Box::new(sink.clone())).expect("open journal");
    for ts in 0..8u64 {
        journal.submit(ts, ts as i64);
    }
    let report = journal.shutdown().expect("journal shutdown");
    assert_eq!(report.records_written, 8);

    let stamps = sink.stamps();
    assert_eq!(stamps.len(), 8);
    let gaps: Vec<Duration> = stamps.windows(2).map(|pair| pair[1] - pair[0]).collect();
    // The floor is statistical per the pacing contract; allow a small
    // scheduling epsilon below the configured interval, never half of it.
    let floor = pacing - Duration::from_millis(1);
    assert!(
        gaps.iter().all(|gap| *gap >= floor),
        "pacing floor violated: {gaps:?}"
    );
    let mean = gaps.iter().sum::<Duration>() / gaps.len() as u32;
    assert!(mean >= pacing, "mean inter-write gap {mean:?} below {pacing:?}");
}

#[test]
fn shutdown_cuts_an_empty_cycle_wait_short() {
    let sink = TimedSink::default();
    let config = JournalConfig::for_sink("unused-by-timed-sink")
        .with_buffer(BufferConfig::Exact { capacity: 16 })
        .with_pacing_interval_us(300_000);
    let journal =
        EventJournal::with_sink(&config, Box::new(sink.clone())).expect("open journal");
    // Let the drain worker settle into an empty-cycle wait.
    thread::sleep(Duration::from_millis(20));

    let requested_at = Instant::now();
    let report = journal.shutdown().expect("journal shutdown");
    let latency = requested_at.elapsed();
    assert!(
        latency < Duration::from_millis(150),
        "shutdown waited out the pacing interval: {latency:?}"
    );
    assert!(report.empty_cycles >= 1);
    assert_eq!(report.records_written, 0);
}
