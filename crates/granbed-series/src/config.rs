//! Aggregation configuration and validation.

use std::error::Error;
use std::fmt;

use granbed_dump::DecodeOptions;

/// How the aggregator decodes the blocks of a dump.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Strategy {
    /// Decode every block on the calling thread.
    #[default]
    Sequential,
    /// Decode blocks on a pool of worker threads.
    Concurrent,
}

/// Configuration for an [`Aggregator`](crate::Aggregator).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AggregateConfig {
    /// Decode strategy. Default: sequential.
    pub strategy: Strategy,
    /// Number of decode workers for [`Strategy::Concurrent`]. `None` =
    /// auto-detect (`available_parallelism`, clamped to `[2, 16]`).
    pub worker_count: Option<usize>,
    /// Convert `xs`/`ys` to absolute `x`/`y` while decoding. Default: true.
    pub absolute_coordinates: bool,
}

impl Default for AggregateConfig {
    fn default() -> Self {
        Self {
            strategy: Strategy::Sequential,
            worker_count: None,
            absolute_coordinates: true,
        }
    }
}

impl AggregateConfig {
    /// Sequential aggregation in absolute coordinates.
    pub fn sequential() -> Self {
        Self::default()
    }

    /// Concurrent aggregation in absolute coordinates.
    pub fn concurrent(worker_count: Option<usize>) -> Self {
        Self {
            strategy: Strategy::Concurrent,
            worker_count,
            ..Self::default()
        }
    }

    /// Check structural invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.worker_count == Some(0) {
            return Err(ConfigError::NoWorkers);
        }
        Ok(())
    }

    /// Resolve the actual worker count, applying auto-detection if `None`.
    ///
    /// Explicit values are clamped to `[1, 64]`.
    pub fn resolved_worker_count(&self) -> usize {
        match self.worker_count {
            Some(n) => n.clamp(1, 64),
            None => std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(4)
                .clamp(2, 16),
        }
    }

    /// Decode options applied to every block.
    pub fn decode_options(&self) -> DecodeOptions {
        DecodeOptions {
            include_only: None,
            absolute_coordinates: self.absolute_coordinates,
        }
    }
}

/// Errors detected during [`AggregateConfig::validate()`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// `worker_count` was explicitly set to zero.
    NoWorkers,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoWorkers => write!(f, "worker_count must be at least 1"),
        }
    }
}

impl Error for ConfigError {}
