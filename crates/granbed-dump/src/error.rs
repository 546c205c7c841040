//! Error types for dump indexing and decoding.

use std::fmt;
use std::io;

use crate::index::Marker;

/// Errors that can occur while indexing or decoding a dump.
#[derive(Debug)]
pub enum DumpError {
    /// The dump file could not be read.
    Io(io::Error),
    /// A structural marker needed for this operation is absent.
    MarkerMissing {
        /// The missing marker.
        marker: Marker,
    },
    /// The requested timestep position is past the end of the index.
    TimestepOutOfRange {
        /// The requested position.
        index: usize,
        /// Number of timesteps in the index.
        count: usize,
    },
    /// The timestep value in the text disagrees with the requested one.
    InconsistentTimestep {
        /// Position of the timestep in the index.
        index: usize,
        /// Zero-based line holding the timestep value.
        line: usize,
        /// The value the caller asked for.
        requested: i64,
        /// The value actually found in the text.
        recorded: i64,
    },
    /// A token could not be parsed as the expected type.
    MalformedValue {
        /// Zero-based line number.
        line: usize,
        /// The offending token (empty when the line had none).
        token: String,
        /// What the token should have been.
        expected: &'static str,
    },
    /// An atom line has fewer columns than the header declares.
    MissingColumn {
        /// Zero-based line number.
        line: usize,
        /// Field whose column is missing.
        field: String,
        /// Column position of that field.
        column: usize,
    },
}

impl fmt::Display for DumpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::MarkerMissing { marker } => write!(f, "marker '{marker}' not found"),
            Self::TimestepOutOfRange { index, count } => {
                write!(f, "timestep index {index} out of range (0..{count})")
            }
            Self::InconsistentTimestep {
                index,
                line,
                requested,
                recorded,
            } => write!(
                f,
                "the TIMESTEP at index {index}, line {line} is {recorded} \
                 but {requested} was requested"
            ),
            Self::MalformedValue {
                line,
                token,
                expected,
            } => write!(f, "line {line}: expected {expected}, found '{token}'"),
            Self::MissingColumn {
                line,
                field,
                column,
            } => write!(f, "line {line}: no column {column} for field '{field}'"),
        }
    }
}

impl std::error::Error for DumpError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for DumpError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}
