//! Strongly-typed particle identifier.

use std::fmt;

/// Identifies a particle within a dump file.
///
/// Taken verbatim from the first column of each atom line. Ids are
/// unique within a timestep and stable across timesteps.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ParticleId(pub u64);

impl fmt::Display for ParticleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for ParticleId {
    fn from(v: u64) -> Self {
        Self(v)
    }
}
