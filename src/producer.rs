use std::thread;

use crate::config::SessionConfig;
use crate::journal::JournalHandle;

/// Uncoordinated producer threads driving a load session.
///
/// Each worker stamps "now" through the journal's clock immediately before
/// every submission and emits a fixed number of sequential payload values.
/// Nothing relates one producer's lock-acquisition order to its timestamp
/// order relative to the others; the buffer strategy absorbs the skew.
pub struct ProducerPool {
    workers: Vec<thread::JoinHandle<()>>,
}

impl ProducerPool {
    /// Spawns one named worker per configured producer.
    pub fn spawn(handle: &JournalHandle, session: SessionConfig) -> Self {
        let mut workers = Vec::with_capacity(session.producers);
        for producer_id in 0..session.producers {
            let handle = handle.clone();
            let clock = handle.clock();
            let count = session.events_per_producer;
            let worker = thread::Builder::new()
                .name(format!("paceline_producer_{producer_id}"))
                .spawn(move || {
                    for value in 0..count {
                        handle.submit(clock.now_us(), value as i64);
                    }
                })
                .expect("failed to spawn producer worker");
            workers.push(worker);
        }
        Self { workers }
    }

    pub fn worker_count(&self) -> usize {
        self.workers.len()
    }

    /// Blocks until every producer has issued all of its submissions.
    pub fn join(self) {
        for worker in self.workers {
            let _ = worker.join();
        }
    }
}
