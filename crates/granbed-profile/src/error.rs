//! Error types for profile construction.

use std::fmt;

use granbed_core::ParticleId;

/// Errors arising while building a profile from decoded particle data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProfileError {
    /// A particle lacks a field the profile needs.
    MissingField {
        /// The particle missing the field.
        particle: ParticleId,
        /// The absent field name.
        field: String,
    },
}

impl fmt::Display for ProfileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingField { particle, field } => {
                write!(f, "particle {particle} has no '{field}' field")
            }
        }
    }
}

impl std::error::Error for ProfileError {}
