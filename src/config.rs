use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Capacity provisioned when none is configured (well above expected load).
pub const DEFAULT_CAPACITY: usize = 4_000_000;
/// Minimum drain cycle duration when none is configured.
pub const DEFAULT_PACING_INTERVAL_US: u64 = 1;
/// Producer thread count for the default load session.
pub const DEFAULT_PRODUCERS: usize = 2;
/// Events each producer submits in the default load session.
pub const DEFAULT_EVENTS_PER_PRODUCER: usize = 500_000;

/// What a full bucketed buffer does with the next event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverflowPolicy {
    /// Reject the incoming event.
    #[default]
    DropNewest,
    /// Evict the current minimum to admit the incoming event.
    DropOldest,
}

/// Buffer strategy selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "strategy", rename_all = "snake_case")]
pub enum BufferConfig {
    /// Min-heap with exact ordering.
    Exact {
        #[serde(default = "default_capacity")]
        capacity: usize,
    },
    /// Bucketed ring with approximate ordering.
    Bucketed {
        buckets: usize,
        #[serde(default = "default_capacity")]
        capacity: usize,
        #[serde(default)]
        overflow: OverflowPolicy,
    },
}

impl Default for BufferConfig {
    fn default() -> Self {
        BufferConfig::Exact {
            capacity: DEFAULT_CAPACITY,
        }
    }
}

impl BufferConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        match self {
            BufferConfig::Exact { capacity } => {
                if *capacity == 0 {
                    return Err(ConfigError::ZeroCapacity);
                }
            }
            BufferConfig::Bucketed {
                buckets, capacity, ..
            } => {
                if *buckets == 0 {
                    return Err(ConfigError::ZeroBuckets);
                }
                if *capacity == 0 {
                    return Err(ConfigError::ZeroCapacity);
                }
            }
        }
        Ok(())
    }
}

/// Construction parameters for [`crate::journal::EventJournal`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalConfig {
    /// Destination the drained records are appended to.
    pub sink_path: PathBuf,
    /// Minimum wall-clock duration of one drain cycle, in microseconds.
    #[serde(default = "default_pacing_interval_us")]
    pub pacing_interval_us: u64,
    #[serde(default)]
    pub buffer: BufferConfig,
}

impl JournalConfig {
    /// Builds a config with defaults for everything but the sink path.
    pub fn for_sink(sink_path: impl Into<PathBuf>) -> Self {
        Self {
            sink_path: sink_path.into(),
            pacing_interval_us: DEFAULT_PACING_INTERVAL_US,
            buffer: BufferConfig::default(),
        }
    }

    pub fn with_buffer(mut self, buffer: BufferConfig) -> Self {
        self.buffer = buffer;
        self
    }

    pub fn with_pacing_interval_us(mut self, pacing_interval_us: u64) -> Self {
        self.pacing_interval_us = pacing_interval_us;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sink_path.as_os_str().is_empty() {
            return Err(ConfigError::EmptySinkPath);
        }
        if self.pacing_interval_us == 0 {
            return Err(ConfigError::ZeroPacingInterval);
        }
        self.buffer.validate()
    }
}

/// Load-generation session executed by the binary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    #[serde(default = "default_producers")]
    pub producers: usize,
    #[serde(default = "default_events_per_producer")]
    pub events_per_producer: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            producers: DEFAULT_PRODUCERS,
            events_per_producer: DEFAULT_EVENTS_PER_PRODUCER,
        }
    }
}

/// Top-level application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(flatten)]
    pub journal: JournalConfig,
    #[serde(default)]
    pub run: SessionConfig,
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.journal.validate()
    }
}

/// Reads and validates an [`AppConfig`] from a JSON file.
pub fn load_app_config(path: impl AsRef<Path>) -> Result<AppConfig, ConfigError> {
    let path_ref = path.as_ref();
    let payload = fs::read_to_string(path_ref).map_err(|source| ConfigError::Read {
        path: path_ref.to_path_buf(),
        source,
    })?;
    let config: AppConfig =
        serde_json::from_str(&payload).map_err(|source| ConfigError::Parse {
            path: path_ref.to_path_buf(),
            source,
        })?;
    config.validate()?;
    Ok(config)
}

/// Errors surfaced while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("sink path must not be empty")]
    EmptySinkPath,
    #[error("pacing interval must be at least 1 microsecond")]
    ZeroPacingInterval,
    #[error("buffer capacity must be > 0")]
    ZeroCapacity,
    #[error("bucket count must be > 0")]
    ZeroBuckets,
}

fn default_capacity() -> usize {
    DEFAULT_CAPACITY
}

fn default_pacing_interval_us() -> u64 {
    DEFAULT_PACING_INTERVAL_US
}

fn default_producers() -> usize {
    DEFAULT_PRODUCERS
}

fn default_events_per_producer() -> usize {
    DEFAULT_EVENTS_PER_PRODUCER
}
