//! Per-timestep snapshots and per-particle series.
//!
//! Both containers key particles by [`ParticleId`] in a `BTreeMap`, so
//! iteration is always in ascending id order. Two snapshots (or series)
//! built from the same input therefore compare equal and iterate
//! identically, regardless of how they were produced.

use std::collections::btree_map;
use std::collections::{BTreeMap, BTreeSet};

use crate::field::{FieldMap, SeriesFieldMap};
use crate::id::ParticleId;

/// Field state of every particle at a single timestep.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ParticleSnapshot {
    particles: BTreeMap<ParticleId, FieldMap>,
}

impl ParticleSnapshot {
    /// Create an empty snapshot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert (or replace) a particle's field map.
    pub fn insert(&mut self, id: ParticleId, fields: FieldMap) -> Option<FieldMap> {
        self.particles.insert(id, fields)
    }

    /// Remove a particle, returning its fields if it was present.
    pub fn remove(&mut self, id: ParticleId) -> Option<FieldMap> {
        self.particles.remove(&id)
    }

    /// Field map of a particle.
    pub fn get(&self, id: ParticleId) -> Option<&FieldMap> {
        self.particles.get(&id)
    }

    /// A single field value of a particle.
    pub fn value(&self, id: ParticleId, field: &str) -> Option<f64> {
        self.particles.get(&id)?.get(field).copied()
    }

    /// Whether the particle is present.
    pub fn contains(&self, id: ParticleId) -> bool {
        self.particles.contains_key(&id)
    }

    /// Number of particles.
    pub fn len(&self) -> usize {
        self.particles.len()
    }

    /// Whether the snapshot holds no particles.
    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Particle ids in ascending order.
    pub fn ids(&self) -> impl Iterator<Item = ParticleId> + '_ {
        self.particles.keys().copied()
    }

    /// Iterate `(id, fields)` in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = (ParticleId, &FieldMap)> {
        self.particles.iter().map(|(id, fields)| (*id, fields))
    }
}

impl FromIterator<(ParticleId, FieldMap)> for ParticleSnapshot {
    fn from_iter<I: IntoIterator<Item = (ParticleId, FieldMap)>>(iter: I) -> Self {
        Self {
            particles: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for ParticleSnapshot {
    type Item = (ParticleId, FieldMap);
    type IntoIter = btree_map::IntoIter<ParticleId, FieldMap>;

    fn into_iter(self) -> Self::IntoIter {
        self.particles.into_iter()
    }
}

/// Field sequences of every particle across all timesteps.
///
/// Each sequence holds one value per timestep in which the particle
/// reported that field, in ascending timestep order. Sequences are never
/// back-filled, so a field missing at some timesteps is simply shorter.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ParticleSeries {
    particles: BTreeMap<ParticleId, SeriesFieldMap>,
}

impl ParticleSeries {
    /// Create an empty series.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a series from one snapshot, wrapping every scalar as a
    /// length-1 sequence.
    ///
    /// The seed fixes the schema: [`append`](Self::append) only extends
    /// particle/field pairs that exist here.
    pub fn seed(snapshot: &ParticleSnapshot) -> Self {
        let particles = snapshot
            .iter()
            .map(|(id, fields)| {
                let seq = fields
                    .iter()
                    .map(|(name, value)| (name.clone(), vec![*value]))
                    .collect();
                (id, seq)
            })
            .collect();
        Self { particles }
    }

    /// Append a value to an existing particle/field sequence.
    ///
    /// Returns `false` (and changes nothing) when the pair was not seeded.
    pub fn append(&mut self, id: ParticleId, field: &str, value: f64) -> bool {
        match self
            .particles
            .get_mut(&id)
            .and_then(|fields| fields.get_mut(field))
        {
            Some(seq) => {
                seq.push(value);
                true
            }
            None => false,
        }
    }

    /// Insert (or replace) a whole field sequence on an existing particle.
    ///
    /// Returns `false` when the particle is unknown.
    pub fn insert_field(&mut self, id: ParticleId, field: &str, values: Vec<f64>) -> bool {
        match self.particles.get_mut(&id) {
            Some(fields) => {
                fields.insert(field.to_string(), values);
                true
            }
            None => false,
        }
    }

    /// All field sequences of a particle.
    pub fn get(&self, id: ParticleId) -> Option<&SeriesFieldMap> {
        self.particles.get(&id)
    }

    /// One field sequence of a particle.
    pub fn sequence(&self, id: ParticleId, field: &str) -> Option<&[f64]> {
        self.particles
            .get(&id)?
            .get(field)
            .map(|seq| seq.as_slice())
    }

    /// Number of particles.
    pub fn len(&self) -> usize {
        self.particles.len()
    }

    /// Whether the series holds no particles.
    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Particle ids in ascending order.
    pub fn ids(&self) -> impl Iterator<Item = ParticleId> + '_ {
        self.particles.keys().copied()
    }

    /// Iterate `(id, sequences)` in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = (ParticleId, &SeriesFieldMap)> {
        self.particles.iter().map(|(id, fields)| (*id, fields))
    }

    /// Take the value at position `idx` of every sequence.
    ///
    /// Sequences shorter than `idx + 1` are left out of the particle's
    /// field map. When `include_only` is given, other particles are skipped.
    pub fn slice_at(
        &self,
        idx: usize,
        include_only: Option<&BTreeSet<ParticleId>>,
    ) -> ParticleSnapshot {
        self.particles
            .iter()
            .filter(|(id, _)| include_only.is_none_or(|set| set.contains(id)))
            .map(|(id, fields)| {
                let at: FieldMap = fields
                    .iter()
                    .filter_map(|(name, seq)| seq.get(idx).map(|v| (name.clone(), *v)))
                    .collect();
                (*id, at)
            })
            .collect()
    }
}
