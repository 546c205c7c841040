//! Per-timestep snapshot decoding.
//!
//! [`SnapshotDecoder`] resolves the column layout once and then decodes
//! any block of the indexed dump. Decoding only reads the shared index
//! and writes into a fresh [`DecodedSnapshot`], so one decoder can be
//! used from several threads at once.

use std::collections::BTreeSet;

use smallvec::SmallVec;

use granbed_core::field::{FIELD_ID, FIELD_X, FIELD_XS, FIELD_Y, FIELD_YS};
use granbed_core::{Diagnostic, Diagnostics, FieldMap, ParticleId, ParticleSnapshot};

use crate::error::DumpError;
use crate::index::{BoxDimensions, Marker, Timestep, TrajectoryIndex};

/// Options controlling a single decode.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecodeOptions {
    /// Only materialize these particles. `None` or an empty set keeps all.
    ///
    /// Filtered-out particles still take part in disc detection.
    pub include_only: Option<BTreeSet<ParticleId>>,
    /// Replace `xs`/`ys` with absolute `x`/`y` using the box dimensions.
    pub absolute_coordinates: bool,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            include_only: None,
            absolute_coordinates: true,
        }
    }
}

impl DecodeOptions {
    /// Keep coordinates in box units.
    pub fn scaled() -> Self {
        Self {
            include_only: None,
            absolute_coordinates: false,
        }
    }

    /// Restrict decoding to the given particle ids.
    pub fn include_only<I: IntoIterator<Item = ParticleId>>(mut self, ids: I) -> Self {
        self.include_only = Some(ids.into_iter().collect());
        self
    }

    fn admits(&self, id: ParticleId) -> bool {
        match &self.include_only {
            Some(set) if !set.is_empty() => set.contains(&id),
            _ => true,
        }
    }
}

/// Result of decoding one block.
#[derive(Clone, Debug, PartialEq)]
pub struct DecodedSnapshot {
    /// The timestep this block belongs to.
    pub timestep: Timestep,
    /// Every regular particle of the block, disc removed.
    pub snapshot: ParticleSnapshot,
    /// Highest particle id seen in the block, or `None` for an empty block.
    pub disc_id: Option<ParticleId>,
    /// Recoverable conditions hit while decoding.
    pub diagnostics: Diagnostics,
}

/// Decodes blocks of an indexed dump into particle snapshots.
#[derive(Clone, Debug)]
pub struct SnapshotDecoder<'a> {
    index: &'a TrajectoryIndex,
    /// `(column, name)` for every data field, `id` excluded.
    columns: Vec<(usize, String)>,
}

impl<'a> SnapshotDecoder<'a> {
    /// Resolve the column layout of `index`.
    ///
    /// Fails when the dump has no `ATOMS` header, since no block can be
    /// decoded without field names.
    pub fn new(index: &'a TrajectoryIndex) -> Result<Self, DumpError> {
        let fields = index.fields();
        if fields.is_empty() {
            return Err(DumpError::MarkerMissing {
                marker: Marker::Atoms,
            });
        }
        let mut columns: Vec<(usize, String)> = Vec::with_capacity(fields.len());
        for (col, name) in fields.iter().enumerate() {
            if name == FIELD_ID || columns.iter().any(|(_, seen)| seen == name) {
                continue;
            }
            columns.push((col, name.clone()));
        }
        Ok(Self { index, columns })
    }

    /// The index this decoder reads from.
    pub fn index(&self) -> &'a TrajectoryIndex {
        self.index
    }

    /// Decode the block at position `index` using its recorded value.
    pub fn decode_at(
        &self,
        index: usize,
        options: &DecodeOptions,
    ) -> Result<DecodedSnapshot, DumpError> {
        let requested = self.index.timestep(index)?.value;
        self.decode(index, requested, options)
    }

    /// Decode the block at position `index`, checking that its timestep
    /// value in the text equals `requested`.
    pub fn decode(
        &self,
        index: usize,
        requested: i64,
        options: &DecodeOptions,
    ) -> Result<DecodedSnapshot, DumpError> {
        let timestep = *self.index.timestep(index)?;
        let recorded = self.index.recorded_value(index)?;
        if recorded != requested {
            return Err(DumpError::InconsistentTimestep {
                index,
                line: timestep.line_offset,
                requested,
                recorded,
            });
        }

        let dims = if options.absolute_coordinates {
            Some(self.index.box_dimensions()?)
        } else {
            None
        };

        let start = self.index.data_offset(index)?;
        let mut snapshot = ParticleSnapshot::new();
        let mut diagnostics = Diagnostics::new();
        let mut disc_id: Option<ParticleId> = None;

        for (line_no, line) in self.index.lines().iter().enumerate().skip(start) {
            if line.contains(Marker::Timestep.text()) {
                break;
            }
            let tokens: SmallVec<[&str; 16]> = line.split_whitespace().collect();
            let Some(first) = tokens.first() else {
                continue;
            };
            let id = ParticleId(first.parse().map_err(|_| DumpError::MalformedValue {
                line: line_no,
                token: first.to_string(),
                expected: "integer particle id",
            })?);
            disc_id = disc_id.max(Some(id));

            if !options.admits(id) {
                continue;
            }

            let mut fields = self.read_fields(line_no, &tokens)?;
            if let Some(dims) = dims {
                to_absolute(&mut fields, id, dims, &mut diagnostics);
            }
            snapshot.insert(id, fields);
        }

        if let Some(disc) = disc_id {
            snapshot.remove(disc);
        }

        Ok(DecodedSnapshot {
            timestep,
            snapshot,
            disc_id,
            diagnostics,
        })
    }

    fn read_fields(&self, line_no: usize, tokens: &[&str]) -> Result<FieldMap, DumpError> {
        let mut fields = FieldMap::with_capacity(self.columns.len() + 2);
        for (col, name) in &self.columns {
            let token = tokens.get(*col).ok_or_else(|| DumpError::MissingColumn {
                line: line_no,
                field: name.clone(),
                column: *col,
            })?;
            let value: f64 = token.parse().map_err(|_| DumpError::MalformedValue {
                line: line_no,
                token: token.to_string(),
                expected: "floating-point field value",
            })?;
            fields.insert(name.clone(), value);
        }
        Ok(fields)
    }
}

/// Replace `xs`/`ys` by `x = width * xs` and `y = height * ys`.
fn to_absolute(
    fields: &mut FieldMap,
    id: ParticleId,
    dims: BoxDimensions,
    diagnostics: &mut Diagnostics,
) {
    for (scaled, absolute, extent) in [
        (FIELD_XS, FIELD_X, dims.width),
        (FIELD_YS, FIELD_Y, dims.height),
    ] {
        match fields.shift_remove(scaled) {
            Some(value) => {
                fields.insert(absolute.to_string(), extent * value);
            }
            None => diagnostics.push(Diagnostic::MissingScaledCoordinate {
                particle: id,
                field: scaled,
            }),
        }
    }
}
