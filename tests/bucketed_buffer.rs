use paceline::{
    BucketedRingBuffer, BufferConfig, Event, EventJournal, InsertOutcome, JournalConfig,
    MemorySink, OrderedBuffer, OverflowPolicy,
};

fn drain_timestamps(buffer: &mut dyn OrderedBuffer) -> Vec<u64> {
    let mut timestamps = Vec::new();
    while let Some(event) = buffer.remove_min() {
        timestamps.push(event.timestamp_us);
    }
    timestamps
}

#[test]
fn bounded_span_drains_in_order() {
    let mut buffer = BucketedRingBuffer::new(64, 1024, OverflowPolicy::DropNewest);
    // All timestamps fall within a span smaller than the bucket count.
    for ts in [40u64, 7, 23, 55, 12, 3, 61, 30, 18, 49] {
        assert_eq!(buffer.insert(Event::new(ts, ts as i64)), InsertOutcome::Stored);
    }
    let timestamps = drain_timestamps(&mut buffer);
    assert_eq!(timestamps.len(), 10);
    assert!(timestamps.windows(2).all(|pair| pair[0] <= pair[1]));
    assert_eq!(buffer.drift_repairs(), 0);
}

#[test]
fn wraparound_aliasing_can_reorder() {
    let mut buffer = BucketedRingBuffer::new(4, 16, OverflowPolicy::DropNewest);
    // 6 and 2 alias to the same bucket (index 2) while being more than one
    // revolution apart in bucket terms; the FIFO preserves arrival order, so
    // the drain is out of true timestamp order. This is the documented
    // trade-off of the approximate strategy.
    buffer.insert(Event::new(6, 0));
    buffer.insert(Event::new(2, 0));
    assert_eq!(drain_timestamps(&mut buffer), [6, 2]);
}

#[test]
fn cursor_follows_a_smaller_timestamp() {
    let mut buffer = BucketedRingBuffer::new(8, 16, OverflowPolicy::DropNewest);
    buffer.insert(Event::new(5, 0));
    buffer.insert(Event::new(1, 0));
    assert_eq!(buffer.remove_min().map(|e| e.timestamp_us), Some(1));
    assert_eq!(buffer.remove_min().map(|e| e.timestamp_us), Some(5));
}

#[test]
fn drop_newest_rejects_when_full() {
    let mut buffer = BucketedRingBuffer::new(8, 2, OverflowPolicy::DropNewest);
    assert_eq!(buffer.insert(Event::new(1, 1)), InsertOutcome::Stored);
    assert_eq!(buffer.insert(Event::new(2, 2)), InsertOutcome::Stored);
    assert_eq!(buffer.insert(Event::new(3, 3)), InsertOutcome::DroppedNewest);
    assert_eq!(buffer.len(), 2);
    assert_eq!(drain_timestamps(&mut buffer), [1, 2]);
}

#[test]
fn drop_oldest_evicts_the_minimum() {
    let mut buffer = BucketedRingBuffer::new(8, 2, OverflowPolicy::DropOldest);
    assert_eq!(buffer.insert(Event::new(1, 1)), InsertOutcome::Stored);
    assert_eq!(buffer.insert(Event::new(2, 2)), InsertOutcome::Stored);
    assert_eq!(buffer.insert(Event::new(3, 3)), InsertOutcome::DroppedOldest);
    assert_eq!(buffer.len(), 2);
    assert_eq!(drain_timestamps(&mut buffer), [2, 3]);
}

#[test]
fn empty_remove_is_a_normal_outcome() {
    let mut buffer = BucketedRingBuffer::new(4, 4, OverflowPolicy::DropNewest);
    assert_eq!(buffer.remove_min(), None);
    buffer.insert(Event::new(9, 9));
    assert_eq!(buffer.remove_min(), Some(Event::new(9, 9)));
    assert_eq!(buffer.remove_min(), None);
    assert!(buffer.is_empty());
}

#[test]
fn journal_delivers_every_event_through_a_bucketed_buffer() {
    let sink = MemorySink::new();
    let config = JournalConfig::for_sink("unused-by-memory-sink")
        .with_buffer(BufferConfig::Bucketed {
            buckets: 128,
            capacity: 1024,
            overflow: OverflowPolicy::DropNewest,
        })
        .with_pacing_interval_us(1);
    let journal =
        EventJournal::with_sink(&config, Box::new(sink.clone())).expect("open journal");
    let submitted = [90u64, 14, 33, 77, 5, 61, 42, 108, 25, 50];
    for ts in submitted {
        journal.submit(ts, ts as i64);
    }
    let report = journal.shutdown().expect("journal shutdown");
    assert_eq!(report.records_written, submitted.len() as u64);
    // The drain runs concurrently with the submissions, so global order is
    // not asserted here (the buffer tests above cover it); delivery must be
    // lossless either way.
    let mut drained: Vec<u64> = sink.records().iter().map(|r| r.timestamp_us).collect();
    drained.sort_unstable();
    let mut expected = submitted.to_vec();
    expected.sort_unstable();
    assert_eq!(drained, expected);
}
