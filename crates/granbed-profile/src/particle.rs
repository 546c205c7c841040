//! Position-plus-radius particle records.

use granbed_core::field::{FIELD_X, FIELD_Y};
use granbed_core::ParticleSnapshot;

use crate::error::ProfileError;

/// One particle of a static bed configuration.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProfileParticle {
    /// Horizontal position.
    pub x: f64,
    /// Vertical position.
    pub y: f64,
    /// Particle radius.
    pub radius: f64,
}

impl ProfileParticle {
    /// Create a particle at `(x, y)` with the given radius.
    pub fn new(x: f64, y: f64, radius: f64) -> Self {
        Self { x, y, radius }
    }

    /// Extract `(x, y, radius)` records from a decoded snapshot, in
    /// ascending particle id order.
    ///
    /// The snapshot must carry absolute `x`/`y` fields and a radius column
    /// named `radius_field`; the first particle lacking one of them fails
    /// the whole extraction.
    pub fn from_snapshot(
        snapshot: &ParticleSnapshot,
        radius_field: &str,
    ) -> Result<Vec<Self>, ProfileError> {
        snapshot
            .iter()
            .map(|(id, fields)| -> Result<Self, ProfileError> {
                let get = |name: &str| {
                    fields
                        .get(name)
                        .copied()
                        .ok_or_else(|| ProfileError::MissingField {
                            particle: id,
                            field: name.to_string(),
                        })
                };
                Ok(Self::new(get(FIELD_X)?, get(FIELD_Y)?, get(radius_field)?))
            })
            .collect()
    }

    /// Euclidean distance from this particle to `(x, y)`.
    pub fn distance_to(&self, x: f64, y: f64) -> f64 {
        (self.x - x).hypot(self.y - y)
    }

    /// Whether this particle sits exactly at `(x, y)`.
    pub(crate) fn is_at(&self, x: f64, y: f64) -> bool {
        self.x == x && self.y == y
    }
}

impl From<(f64, f64, f64)> for ProfileParticle {
    fn from((x, y, radius): (f64, f64, f64)) -> Self {
        Self::new(x, y, radius)
    }
}
