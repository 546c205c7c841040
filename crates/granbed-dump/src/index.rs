//! One-pass structural index over dump text.
//!
//! [`TrajectoryIndex`] owns the lines of a dump and records, in a single
//! scan, the position of every marker the decoder needs. Markers that
//! are absent are stored as `None`; the error is raised only when an
//! accessor that needs the value is called.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::error::DumpError;

/// Structural markers recognised in a dump.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Marker {
    /// Start of a block; the next line holds the timestep value.
    Timestep,
    /// The next line holds the particle count.
    NumberOfAtoms,
    /// The next two lines hold the x and y bounds.
    BoxBounds,
    /// Column header; the following lines are atom records.
    Atoms,
}

impl Marker {
    /// The literal text searched for in each line.
    pub const fn text(self) -> &'static str {
        match self {
            Marker::Timestep => "ITEM: TIMESTEP",
            Marker::NumberOfAtoms => "ITEM: NUMBER OF ATOMS",
            Marker::BoxBounds => "ITEM: BOX BOUNDS",
            Marker::Atoms => "ITEM: ATOMS",
        }
    }
}

impl fmt::Display for Marker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text())
    }
}

/// Header tokens of the `ITEM: ATOMS` line that are not field names.
const ATOMS_MARKER_TOKENS: [&str; 2] = ["ITEM:", "ATOMS"];

/// One entry of the timestep table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Timestep {
    /// Position in file order, starting at 0.
    pub index: usize,
    /// Zero-based line holding the timestep value.
    pub line_offset: usize,
    /// Simulation-reported timestep.
    pub value: i64,
}

/// Simulation box extent used for scaled → absolute conversion.
///
/// Each dimension is the second token of its bounds line (the `high`
/// bound as written), not `high - low`. Dumps from the granular runs
/// this targets always start the box at zero.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoxDimensions {
    /// Extent along x.
    pub width: f64,
    /// Extent along y.
    pub height: f64,
}

/// Immutable structural index over the lines of a dump.
#[derive(Clone, Debug)]
pub struct TrajectoryIndex {
    lines: Vec<String>,
    number_of_particles: Option<usize>,
    box_bounds_offset: Option<usize>,
    atoms_offset: Option<usize>,
    fields: Vec<String>,
    timesteps: Vec<Timestep>,
}

impl TrajectoryIndex {
    /// Read a dump file and index it.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, DumpError> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Self::from_text(&text)
    }

    /// Index dump text already in memory.
    pub fn from_text(text: &str) -> Result<Self, DumpError> {
        Self::from_lines(text.lines().map(str::to_owned).collect())
    }

    /// Index a sequence of lines (without trailing newlines).
    ///
    /// Fails only when the value following a `TIMESTEP` or
    /// `NUMBER OF ATOMS` marker cannot be parsed. Missing markers are
    /// recorded and reported later by the accessors that need them.
    pub fn from_lines(lines: Vec<String>) -> Result<Self, DumpError> {
        let mut number_of_particles = None;
        let mut box_bounds_offset = None;
        let mut atoms_offset = None;
        let mut fields = Vec::new();
        let mut timesteps = Vec::new();

        for (i, line) in lines.iter().enumerate() {
            if line.contains(Marker::Timestep.text()) {
                let value = parse_first_token(&lines, i + 1, "integer timestep")?;
                timesteps.push(Timestep {
                    index: timesteps.len(),
                    line_offset: i + 1,
                    value,
                });
            } else if line.contains(Marker::NumberOfAtoms.text()) {
                if number_of_particles.is_none() {
                    number_of_particles =
                        Some(parse_first_token(&lines, i + 1, "integer atom count")?);
                }
            } else if line.contains(Marker::BoxBounds.text()) {
                box_bounds_offset.get_or_insert(i + 1);
            } else if line.contains(Marker::Atoms.text()) && atoms_offset.is_none() {
                atoms_offset = Some(i + 1);
                fields = line
                    .split_whitespace()
                    .filter(|tok| !ATOMS_MARKER_TOKENS.contains(tok))
                    .map(str::to_owned)
                    .collect();
            }
        }

        Ok(Self {
            lines,
            number_of_particles,
            box_bounds_offset,
            atoms_offset,
            fields,
            timesteps,
        })
    }

    /// All lines of the dump.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// A single line, if in range.
    pub fn line(&self, n: usize) -> Option<&str> {
        self.lines.get(n).map(String::as_str)
    }

    /// Particle count from the first `NUMBER OF ATOMS` marker.
    pub fn number_of_particles(&self) -> Result<usize, DumpError> {
        self.number_of_particles.ok_or(DumpError::MarkerMissing {
            marker: Marker::NumberOfAtoms,
        })
    }

    /// Line after the first `BOX BOUNDS` marker.
    pub fn box_bounds_offset(&self) -> Option<usize> {
        self.box_bounds_offset
    }

    /// Line after the first `ATOMS` header, i.e. the first atom record.
    pub fn atoms_offset(&self) -> Option<usize> {
        self.atoms_offset
    }

    /// Field names from the first `ATOMS` header, in column order.
    ///
    /// Includes `id`. Empty when the header is absent.
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// The timestep table in file order.
    pub fn timesteps(&self) -> &[Timestep] {
        &self.timesteps
    }

    /// Number of `TIMESTEP` markers.
    pub fn num_timesteps(&self) -> usize {
        self.timesteps.len()
    }

    /// The timestep at position `index`.
    pub fn timestep(&self, index: usize) -> Result<&Timestep, DumpError> {
        self.timesteps
            .get(index)
            .ok_or(DumpError::TimestepOutOfRange {
                index,
                count: self.timesteps.len(),
            })
    }

    /// Re-read the timestep value at position `index` from the text.
    pub fn recorded_value(&self, index: usize) -> Result<i64, DumpError> {
        let ts = self.timestep(index)?;
        parse_first_token(&self.lines, ts.line_offset, "integer timestep")
    }

    /// First atom line of the block at position `index`.
    ///
    /// Every block is assumed to share the header layout of the first:
    /// the distance from the timestep value to the first atom record is
    /// measured once on block 0 and applied to all blocks.
    pub fn data_offset(&self, index: usize) -> Result<usize, DumpError> {
        let atoms = self.atoms_offset.ok_or(DumpError::MarkerMissing {
            marker: Marker::Atoms,
        })?;
        let first = self.timestep(0).map_err(|_| DumpError::MarkerMissing {
            marker: Marker::Timestep,
        })?;
        let header_len = atoms
            .checked_sub(first.line_offset)
            .ok_or(DumpError::MarkerMissing {
                marker: Marker::Timestep,
            })?;
        Ok(self.timestep(index)?.line_offset + header_len)
    }

    /// Box extent read from the two lines after `BOX BOUNDS`.
    pub fn box_dimensions(&self) -> Result<BoxDimensions, DumpError> {
        let offset = self.box_bounds_offset.ok_or(DumpError::MarkerMissing {
            marker: Marker::BoxBounds,
        })?;
        Ok(BoxDimensions {
            width: parse_token(&self.lines, offset, 1, "box bound")?,
            height: parse_token(&self.lines, offset + 1, 1, "box bound")?,
        })
    }
}

fn parse_first_token<T: FromStr>(
    lines: &[String],
    line: usize,
    expected: &'static str,
) -> Result<T, DumpError> {
    parse_token(lines, line, 0, expected)
}

fn parse_token<T: FromStr>(
    lines: &[String],
    line: usize,
    position: usize,
    expected: &'static str,
) -> Result<T, DumpError> {
    let token = lines
        .get(line)
        .and_then(|l| l.split_whitespace().nth(position))
        .unwrap_or("");
    token.parse().map_err(|_| DumpError::MalformedValue {
        line,
        token: token.to_string(),
        expected,
    })
}
