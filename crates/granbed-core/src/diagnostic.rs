//! Recoverable conditions collected during bulk operations.
//!
//! Decoding and aggregation never abort on a missing scaled coordinate
//! or on a field that drifts into the schema after seeding. Those cases
//! are recorded as [`Diagnostic`] values in a [`Diagnostics`] buffer that
//! travels with the result. The caller decides when to surface them;
//! [`Diagnostics::emit`] logs each distinct entry exactly once.

use std::fmt;

use indexmap::IndexSet;

use crate::id::ParticleId;

/// A single recoverable condition.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Diagnostic {
    /// Absolute conversion was requested but the scaled coordinate
    /// column (`xs` or `ys`) is absent for this particle.
    MissingScaledCoordinate {
        /// Particle whose absolute coordinate was left unset.
        particle: ParticleId,
        /// The missing scaled field.
        field: &'static str,
    },
    /// A particle/field pair appeared at a later timestep but was not
    /// present when the series was seeded. The value was dropped.
    SchemaDrift {
        /// Field whose value was dropped.
        field: String,
        /// Particle the value belonged to.
        particle: ParticleId,
        /// Position of the timestep in the trajectory index.
        timestep_index: usize,
        /// Simulation-reported timestep value.
        timestep_value: i64,
    },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingScaledCoordinate { particle, field } => {
                write!(f, "scaled field '{field}' not found for particle {particle}")
            }
            Self::SchemaDrift {
                field,
                particle,
                timestep_index,
                timestep_value,
            } => write!(
                f,
                "{field:15} for p{particle} at t{timestep_index}-->{timestep_value} not added"
            ),
        }
    }
}

/// Ordered buffer of diagnostics, possibly with repeats.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    /// Create an empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one diagnostic.
    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.entries.push(diagnostic);
    }

    /// Move every entry of `other` to the end of this buffer.
    pub fn append(&mut self, other: &mut Diagnostics) {
        self.entries.append(&mut other.entries);
    }

    /// Number of recorded entries, repeats included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate entries in recording order.
    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter()
    }

    /// Distinct entries, in the order each was first recorded.
    pub fn deduplicated(&self) -> Vec<Diagnostic> {
        self.entries
            .iter()
            .cloned()
            .collect::<IndexSet<_>>()
            .into_iter()
            .collect()
    }

    /// Drop repeated entries in place, keeping first occurrences.
    pub fn dedup(&mut self) {
        self.entries = self.deduplicated();
    }

    /// Log every distinct entry once at `warn` level.
    ///
    /// Returns the number of distinct entries logged.
    pub fn emit(&self, context: &str) -> usize {
        let unique = self.deduplicated();
        for diagnostic in &unique {
            log::warn!("{context}: {diagnostic}");
        }
        unique.len()
    }
}

impl Extend<Diagnostic> for Diagnostics {
    fn extend<I: IntoIterator<Item = Diagnostic>>(&mut self, iter: I) {
        self.entries.extend(iter);
    }
}

impl FromIterator<Diagnostic> for Diagnostics {
    fn from_iter<I: IntoIterator<Item = Diagnostic>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn drift(particle: u64, t: usize) -> Diagnostic {
        Diagnostic::SchemaDrift {
            field: "omegaz".into(),
            particle: ParticleId(particle),
            timestep_index: t,
            timestep_value: (t as i64) * 100,
        }
    }

    #[test]
    fn dedup_keeps_first_seen_order() {
        let diags: Diagnostics = [drift(1, 2), drift(3, 1), drift(1, 2), drift(3, 1)]
            .into_iter()
            .collect();
        assert_eq!(diags.len(), 4);
        assert_eq!(diags.deduplicated(), vec![drift(1, 2), drift(3, 1)]);
    }

    #[test]
    fn missing_coordinate_message_names_particle_and_field() {
        let d = Diagnostic::MissingScaledCoordinate {
            particle: ParticleId(17),
            field: "ys",
        };
        let msg = d.to_string();
        assert!(msg.contains("17"));
        assert!(msg.contains("'ys'"));
    }

    #[test]
    fn append_moves_entries() {
        let mut a: Diagnostics = [drift(1, 1)].into_iter().collect();
        let mut b: Diagnostics = [drift(2, 1)].into_iter().collect();
        a.append(&mut b);
        assert_eq!(a.len(), 2);
        assert!(b.is_empty());
    }

    #[test]
    fn emit_counts_distinct_entries() {
        let diags: Diagnostics = [drift(1, 1), drift(1, 1)].into_iter().collect();
        assert_eq!(diags.emit("test"), 1);
    }

    proptest! {
        #[test]
        fn dedup_is_idempotent(raw in proptest::collection::vec((0u64..4, 0usize..4), 0..32)) {
            let mut diags: Diagnostics = raw.iter().map(|&(p, t)| drift(p, t)).collect();
            diags.dedup();
            let once = diags.clone();
            diags.dedup();
            prop_assert_eq!(&once, &diags);
            prop_assert!(once.len() <= 16);
        }
    }
}
