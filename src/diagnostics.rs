use serde::Serialize;
use std::collections::VecDeque;
use std::fmt;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Severity levels for diagnostic records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// Returns the canonical uppercase representation.
    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Trace => "TRACE",
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Size-based rotation policy for the in-memory diagnostic journal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogRotationPolicy {
    pub max_bytes: usize,
    pub max_segments: usize,
}

impl Default for LogRotationPolicy {
    fn default() -> Self {
        Self {
            max_bytes: 1 << 20,
            max_segments: 8,
        }
    }
}

/// Accumulated lines for one rotated segment.
#[derive(Debug, Default, Clone)]
pub struct LogSegment {
    lines: Vec<String>,
    bytes_written: usize,
}

impl LogSegment {
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn bytes_written(&self) -> usize {
        self.bytes_written
    }
}

#[derive(Debug)]
struct LogState {
    current_level: LogLevel,
    segments: VecDeque<LogSegment>,
    active: LogSegment,
}

/// JSON-line diagnostic journal with deterministic rotation semantics.
///
/// Shared by the journal facade and the drain worker; records lifecycle
/// transitions and overflow summaries. Kept in memory so sessions and tests
/// can inspect it deterministically.
#[derive(Debug, Clone)]
pub struct DiagnosticLog {
    policy: LogRotationPolicy,
    state: Arc<Mutex<LogState>>,
}

impl Default for DiagnosticLog {
    fn default() -> Self {
        Self::new(LogRotationPolicy::default())
    }
}

impl DiagnosticLog {
    pub fn new(policy: LogRotationPolicy) -> Self {
        Self {
            policy,
            state: Arc::new(Mutex::new(LogState {
                current_level: LogLevel::Info,
                segments: VecDeque::new(),
                active: LogSegment::default(),
            })),
        }
    }

    pub fn level(&self) -> LogLevel {
        self.state.lock().unwrap().current_level
    }

    /// Applies a dynamic level override.
    pub fn set_level(&self, level: LogLevel) {
        self.state.lock().unwrap().current_level = level;
    }

    /// Emits a JSON-line record; entries below the current level are skipped.
    pub fn record(
        &self,
        ts_us: u64,
        level: LogLevel,
        module: &str,
        message: &str,
    ) -> Result<(), DiagnosticsError> {
        let mut state = self.state.lock().unwrap();
        if level < state.current_level {
            return Ok(());
        }
        let entry = LogRecord {
            ts_us,
            level: level.as_str(),
            module,
            message,
        };
        let line = serde_json::to_string(&entry).map_err(DiagnosticsError::Serialize)?;
        rotate_if_needed(&mut state, &self.policy, line.len());
        state.active.bytes_written = state.active.bytes_written.saturating_add(line.len());
        state.active.lines.push(line);
        Ok(())
    }

    /// Returns all rotated segments followed by the active one.
    pub fn segments(&self) -> Vec<LogSegment> {
        let state = self.state.lock().unwrap();
        state
            .segments
            .iter()
            .cloned()
            .chain(std::iter::once(state.active.clone()))
            .collect()
    }

    /// All retained lines in emission order.
    pub fn lines(&self) -> Vec<String> {
        self.segments()
            .iter()
            .flat_map(|segment| segment.lines().to_vec())
            .collect()
    }
}

fn rotate_if_needed(state: &mut LogState, policy: &LogRotationPolicy, next_line_len: usize) {
    if state.active.bytes_written + next_line_len <= policy.max_bytes {
        return;
    }
    if !state.active.lines.is_empty() {
        let full = std::mem::take(&mut state.active);
        state.segments.push_back(full);
        while state.segments.len() > policy.max_segments {
            state.segments.pop_front();
        }
    }
    state.active = LogSegment::default();
}

/// Errors surfaced while serializing diagnostic records.
#[derive(Debug, Error)]
pub enum DiagnosticsError {
    #[error("failed to serialize diagnostic record: {0}")]
    Serialize(#[from] serde_json::Error),
}

#[derive(Debug, Serialize)]
struct LogRecord<'a> {
    ts_us: u64,
    level: &'a str,
    module: &'a str,
    message: &'a str,
}
