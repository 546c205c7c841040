//! One handle per dump file.
//!
//! [`Simulation`] indexes a dump once, decodes its initial state, and
//! on [`render`](Simulation::render) aggregates and differentiates the
//! whole trajectory. Static snapshots are decoded on demand from the
//! text; dynamic snapshots are slices of the rendered series.

use std::collections::BTreeSet;
use std::path::Path;
use std::sync::Arc;

use granbed_core::{ParticleId, ParticleSnapshot};
use granbed_dump::{
    BoxDimensions, DecodeOptions, DecodedSnapshot, SnapshotDecoder, Timestep, TrajectoryIndex,
};

use crate::aggregate::{Aggregation, Aggregator};
use crate::config::AggregateConfig;
use crate::differentiate::differentiate;
use crate::error::SeriesError;

/// State of one granular bed simulation, backed by its dump.
#[derive(Debug)]
pub struct Simulation {
    index: Arc<TrajectoryIndex>,
    initial: DecodedSnapshot,
    rendered: Option<Aggregation>,
}

impl Simulation {
    /// Read and index a dump file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, SeriesError> {
        Self::from_index(Arc::new(TrajectoryIndex::open(path)?))
    }

    /// Index dump text already in memory.
    pub fn from_text(text: &str) -> Result<Self, SeriesError> {
        Self::from_index(Arc::new(TrajectoryIndex::from_text(text)?))
    }

    /// Wrap an existing index, decoding timestep 0 in absolute coordinates.
    pub fn from_index(index: Arc<TrajectoryIndex>) -> Result<Self, SeriesError> {
        let initial = SnapshotDecoder::new(&index)?.decode_at(0, &DecodeOptions::default())?;
        initial.diagnostics.emit("initial state");
        Ok(Self {
            index,
            initial,
            rendered: None,
        })
    }

    /// The shared trajectory index.
    pub fn index(&self) -> &Arc<TrajectoryIndex> {
        &self.index
    }

    /// Particles at timestep 0, absolute coordinates, disc removed.
    pub fn initial_state(&self) -> &ParticleSnapshot {
        &self.initial.snapshot
    }

    /// Particles at timestep 0 in box-scaled coordinates.
    pub fn initial_state_scaled(&self) -> Result<ParticleSnapshot, SeriesError> {
        Ok(self.snapshot(0, &DecodeOptions::scaled())?.snapshot)
    }

    /// Disc id of the initial state.
    pub fn disc_id(&self) -> Option<ParticleId> {
        self.initial.disc_id
    }

    /// The timestep table.
    pub fn timesteps(&self) -> &[Timestep] {
        self.index.timesteps()
    }

    /// Number of timesteps in the dump.
    pub fn num_timesteps(&self) -> usize {
        self.index.num_timesteps()
    }

    /// Particle count from the first `NUMBER OF ATOMS` marker.
    pub fn num_particles(&self) -> Result<usize, SeriesError> {
        Ok(self.index.number_of_particles()?)
    }

    /// Box extent used for absolute coordinates.
    pub fn box_dimensions(&self) -> Result<BoxDimensions, SeriesError> {
        Ok(self.index.box_dimensions()?)
    }

    /// Line after the first `BOX BOUNDS` marker.
    pub fn box_bounds_offset(&self) -> Option<usize> {
        self.index.box_bounds_offset()
    }

    /// Line of the first atom record.
    pub fn atoms_offset(&self) -> Option<usize> {
        self.index.atoms_offset()
    }

    /// Field names from the `ATOMS` header, `id` included.
    pub fn fields(&self) -> &[String] {
        self.index.fields()
    }

    /// Decode the block at position `idx`, validated against its recorded
    /// timestep value.
    pub fn snapshot(
        &self,
        idx: usize,
        options: &DecodeOptions,
    ) -> Result<DecodedSnapshot, SeriesError> {
        let value = self.index.timestep(idx)?.value;
        let decoded = SnapshotDecoder::new(&self.index)?.decode(idx, value, options)?;
        decoded.diagnostics.emit("snapshot");
        Ok(decoded)
    }

    /// Aggregate every timestep and derive velocities and accelerations.
    ///
    /// The result replaces any previous render. On error the previous
    /// render, if any, is kept.
    pub fn render(&mut self, config: AggregateConfig) -> Result<&Aggregation, SeriesError> {
        let mut aggregation = Aggregator::new(Arc::clone(&self.index), config)?.run()?;
        differentiate(&mut aggregation.series, self.num_timesteps())?;
        Ok(self.rendered.insert(aggregation))
    }

    /// The most recent render.
    pub fn rendered(&self) -> Option<&Aggregation> {
        self.rendered.as_ref()
    }

    /// Slice the rendered series at timestep position `idx`.
    pub fn dynamic_snapshot(
        &self,
        idx: usize,
        include_only: Option<&BTreeSet<ParticleId>>,
    ) -> Result<ParticleSnapshot, SeriesError> {
        let rendered = self.rendered.as_ref().ok_or(SeriesError::NotRendered)?;
        let len = self.num_timesteps();
        if idx >= len {
            return Err(SeriesError::IndexOutOfRange { index: idx, len });
        }
        Ok(rendered.series.slice_at(idx, include_only))
    }
}
