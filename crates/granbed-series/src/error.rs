//! Error types for aggregation and rendering.

use std::error::Error;
use std::fmt;

use granbed_dump::DumpError;

use crate::config::ConfigError;
use crate::differentiate::DifferentiateError;

/// Errors from aggregating, differentiating, or querying a simulation.
#[derive(Debug)]
pub enum SeriesError {
    /// Indexing or decoding the dump failed.
    Dump(DumpError),
    /// The aggregation configuration is invalid.
    Config(ConfigError),
    /// Differentiation of the aggregated series failed.
    Differentiate(DifferentiateError),
    /// A decode worker panicked.
    WorkerPanicked {
        /// Index of the worker thread.
        worker: usize,
    },
    /// A decode worker thread could not be spawned.
    ThreadSpawnFailed {
        /// Description of the failure.
        reason: String,
    },
    /// A rendered series was requested before [`render`](crate::Simulation::render).
    NotRendered,
    /// A series position past the last timestep was requested.
    IndexOutOfRange {
        /// The requested position.
        index: usize,
        /// Number of timesteps.
        len: usize,
    },
}

impl fmt::Display for SeriesError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Dump(e) => write!(f, "dump error: {e}"),
            Self::Config(e) => write!(f, "invalid config: {e}"),
            Self::Differentiate(e) => write!(f, "differentiation failed: {e}"),
            Self::WorkerPanicked { worker } => write!(f, "decode worker {worker} panicked"),
            Self::ThreadSpawnFailed { reason } => {
                write!(f, "failed to spawn decode worker: {reason}")
            }
            Self::NotRendered => write!(f, "simulation has not been rendered"),
            Self::IndexOutOfRange { index, len } => {
                write!(f, "timestep position {index} out of range (0..{len})")
            }
        }
    }
}

impl Error for SeriesError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Dump(e) => Some(e),
            Self::Config(e) => Some(e),
            Self::Differentiate(e) => Some(e),
            _ => None,
        }
    }
}

impl From<DumpError> for SeriesError {
    fn from(e: DumpError) -> Self {
        Self::Dump(e)
    }
}

impl From<ConfigError> for SeriesError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

impl From<DifferentiateError> for SeriesError {
    fn from(e: DifferentiateError) -> Self {
        Self::Differentiate(e)
    }
}
