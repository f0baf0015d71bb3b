use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use thiserror::Error;

use crate::event::SinkRecord;

/// Append-only destination for drained records.
///
/// One record is appended per successfully removed event, exactly once;
/// record order reflects removal order, not insertion order. Write failures
/// are fatal to the drain loop and are never swallowed.
pub trait EventSink: Send {
    fn append(&mut self, record: SinkRecord) -> Result<(), SinkError>;

    /// Flushes buffered records to the destination.
    fn flush(&mut self) -> Result<(), SinkError>;
}

/// File sink emitting one `timestamp,value` line per record.
pub struct CsvFileSink {
    writer: BufWriter<File>,
    path: PathBuf,
}

impl CsvFileSink {
    /// Creates (or truncates) the destination file.
    pub fn create(path: impl AsRef<Path>) -> Result<Self, SinkError> {
        let path_ref = path.as_ref();
        let file = File::create(path_ref).map_err(|source| SinkError::Open {
            path: path_ref.to_path_buf(),
            source,
        })?;
        Ok(Self {
            writer: BufWriter::new(file),
            path: path_ref.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl EventSink for CsvFileSink {
    fn append(&mut self, record: SinkRecord) -> Result<(), SinkError> {
        writeln!(self.writer, "{},{}", record.timestamp_us, record.value)
            .map_err(SinkError::Write)
    }

    fn flush(&mut self) -> Result<(), SinkError> {
        self.writer.flush().map_err(SinkError::Flush)
    }
}

/// In-memory sink retaining records for inspection after the journal closes.
#[derive(Debug, Default, Clone)]
pub struct MemorySink {
    records: Arc<Mutex<Vec<SinkRecord>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<SinkRecord> {
        self.records.lock().unwrap().clone()
    }

    pub fn len(&self) -> usize {
        self.records.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.lock().unwrap().is_empty()
    }
}

impl EventSink for MemorySink {
    fn append(&mut self, record: SinkRecord) -> Result<(), SinkError> {
        self.records.lock().unwrap().push(record);
        Ok(())
    }

    fn flush(&mut self) -> Result<(), SinkError> {
        Ok(())
    }
}

/// Errors surfaced by sink implementations.
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("failed to open sink {path}: {source}")]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to append record: {0}")]
    Write(#[source] std::io::Error),
    #[error("failed to flush sink: {0}")]
    Flush(#[source] std::io::Error),
}
