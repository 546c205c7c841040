//! Dump-text fixtures.
//!
//! [`DumpBuilder`] writes the repeating block layout of a 2D granular
//! dump:
//!
//! ```text
//! ITEM: TIMESTEP
//! <value>
//! ITEM: NUMBER OF ATOMS
//! <count>
//! ITEM: BOX BOUNDS pp pp
//! <low> <high>
//! <low> <high>
//! ITEM: ATOMS id <col1> <col2> ...
//! <id> <v1> <v2> ...
//! ```

use std::fmt::Write;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

struct Block {
    timestep: i64,
    columns: Option<Vec<String>>,
    rows: Vec<(u64, Vec<f64>)>,
}

/// Builder for in-memory dump text.
pub struct DumpBuilder {
    columns: Vec<String>,
    bounds: [(f64, f64); 2],
    blocks: Vec<Block>,
}

impl DumpBuilder {
    /// Start a dump whose atom columns are `id` followed by `columns`.
    pub fn new(columns: &[&str]) -> Self {
        Self {
            columns: columns.iter().map(|c| c.to_string()).collect(),
            bounds: [(0.0, 1.0), (0.0, 1.0)],
            blocks: Vec::new(),
        }
    }

    /// Set the two box-bound lines written in every block.
    pub fn box_bounds(mut self, x: (f64, f64), y: (f64, f64)) -> Self {
        self.bounds = [x, y];
        self
    }

    /// Append a block using the default columns.
    pub fn timestep(mut self, value: i64, rows: Vec<(u64, Vec<f64>)>) -> Self {
        self.blocks.push(Block {
            timestep: value,
            columns: None,
            rows,
        });
        self
    }

    /// Append a block with its own column layout.
    pub fn timestep_with_columns(
        mut self,
        value: i64,
        columns: &[&str],
        rows: Vec<(u64, Vec<f64>)>,
    ) -> Self {
        self.blocks.push(Block {
            timestep: value,
            columns: Some(columns.iter().map(|c| c.to_string()).collect()),
            rows,
        });
        self
    }

    /// Render the dump text.
    pub fn build(&self) -> String {
        let mut out = String::new();
        for block in &self.blocks {
            let columns = block.columns.as_ref().unwrap_or(&self.columns);
            writeln!(out, "ITEM: TIMESTEP").unwrap();
            writeln!(out, "{}", block.timestep).unwrap();
            writeln!(out, "ITEM: NUMBER OF ATOMS").unwrap();
            writeln!(out, "{}", block.rows.len()).unwrap();
            writeln!(out, "ITEM: BOX BOUNDS pp pp").unwrap();
            for (lo, hi) in self.bounds {
                writeln!(out, "{lo} {hi}").unwrap();
            }
            writeln!(out, "ITEM: ATOMS id {}", columns.join(" ")).unwrap();
            for (id, values) in &block.rows {
                write!(out, "{id}").unwrap();
                for v in values {
                    write!(out, " {v}").unwrap();
                }
                out.push('\n');
            }
        }
        out
    }
}

/// A seeded dump with `particles` regular particles plus one disc
/// (the highest id), over `timesteps` blocks spaced 1000 apart.
///
/// Columns are `xs ys radius vx`. Particles drift by small random steps
/// so finite differences are non-trivial.
pub fn random_bed_dump(seed: u64, particles: usize, timesteps: usize) -> String {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let total = particles + 1;
    let mut state: Vec<[f64; 3]> = (0..total)
        .map(|_| {
            [
                rng.random::<f64>(),
                rng.random::<f64>(),
                rng.random_range(0.005..0.02),
            ]
        })
        .collect();

    let mut builder =
        DumpBuilder::new(&["xs", "ys", "radius", "vx"]).box_bounds((0.0, 0.2), (0.0, 0.4));
    for t in 0..timesteps {
        let rows = state
            .iter_mut()
            .enumerate()
            .map(|(i, p)| {
                let dx = rng.random_range(-0.01..0.01);
                p[0] = (p[0] + dx).clamp(0.0, 1.0);
                p[1] = (p[1] + rng.random_range(-0.01..0.01)).clamp(0.0, 1.0);
                ((i + 1) as u64, vec![p[0], p[1], p[2], dx])
            })
            .collect();
        builder = builder.timestep((t as i64) * 1000, rows);
    }
    builder.build()
}

/// `n` seeded `(x, y, radius)` tuples inside the unit square.
pub fn random_profile(seed: u64, n: usize) -> Vec<(f64, f64, f64)> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..n)
        .map(|_| {
            (
                rng.random::<f64>(),
                rng.random::<f64>(),
                rng.random_range(0.01..0.05),
            )
        })
        .collect()
}
