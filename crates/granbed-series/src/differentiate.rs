//! Velocity and acceleration by finite differencing.
//!
//! ```text
//! interior:  g[i]   = (f[i+1] - f[i-1]) / (2 h)
//! edges:     g[0]   = (f[1]   - f[0])   / h
//!            g[n-1] = (f[n-1] - f[n-2]) / h
//! ```
//!
//! The spacing `h` is the number of timesteps in the dump, used as a
//! constant for every particle. It is not the physical time between
//! dumps.

use std::error::Error;
use std::fmt;

use granbed_core::{Axis, ParticleId, ParticleSeries, PositionKind};

/// Errors from [`differentiate`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DifferentiateError {
    /// A particle has neither position field on an axis.
    MissingField {
        /// The particle.
        particle: ParticleId,
        /// The axis with no `x`/`xs` (or `y`/`ys`) sequence.
        axis: Axis,
    },
    /// The spacing (timestep count) was zero.
    ZeroSpacing,
}

impl fmt::Display for DifferentiateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingField { particle, axis } => write!(
                f,
                "particle {particle} has no '{}' or '{}' field",
                axis.position_field(PositionKind::Absolute),
                axis.position_field(PositionKind::Scaled)
            ),
            Self::ZeroSpacing => write!(f, "differentiation spacing must be non-zero"),
        }
    }
}

impl Error for DifferentiateError {}

/// First-order numerical gradient with uniform spacing.
///
/// Central differences inside, one-sided differences at both ends.
/// Sequences with fewer than two samples have no defined slope and
/// yield zeros.
pub fn gradient(values: &[f64], spacing: f64) -> Vec<f64> {
    let n = values.len();
    if n < 2 {
        return vec![0.0; n];
    }
    let mut out = Vec::with_capacity(n);
    out.push((values[1] - values[0]) / spacing);
    for i in 1..n - 1 {
        out.push((values[i + 1] - values[i - 1]) / (2.0 * spacing));
    }
    out.push((values[n - 1] - values[n - 2]) / spacing);
    out
}

/// Add velocity and acceleration sequences to every particle of `series`.
///
/// For each axis the first position field found on the particle (`x`
/// or `xs`, `y` or `ys`) is differentiated with `num_timesteps` as the
/// spacing. Derived names follow the position field: `x` → `v_x`/`a_x`,
/// `xs` → `vs_x`/`as_x`.
///
/// Every particle is checked before any sequence is written, so on
/// [`DifferentiateError::MissingField`] the series is left unchanged.
pub fn differentiate(
    series: &mut ParticleSeries,
    num_timesteps: usize,
) -> Result<(), DifferentiateError> {
    if num_timesteps == 0 {
        return Err(DifferentiateError::ZeroSpacing);
    }
    let spacing = num_timesteps as f64;

    let mut derived: Vec<(ParticleId, &'static str, Vec<f64>)> = Vec::new();
    for (id, fields) in series.iter() {
        for axis in Axis::ALL {
            let (kind, positions) = fields
                .iter()
                .find_map(|(name, seq)| axis.position_kind(name).map(|kind| (kind, seq)))
                .ok_or(DifferentiateError::MissingField { particle: id, axis })?;
            let velocity = gradient(positions, spacing);
            let acceleration = gradient(&velocity, spacing);
            derived.push((id, axis.velocity_field(kind), velocity));
            derived.push((id, axis.acceleration_field(kind), acceleration));
        }
    }

    for (id, name, values) in derived {
        series.insert_field(id, name, values);
    }
    Ok(())
}
