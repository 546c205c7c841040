//! Local density, proximity and surface queries.

use granbed_core::ParticleSnapshot;

use crate::error::ProfileError;
use crate::particle::ProfileParticle;

/// Result of [`BedProfile::nearest_distance`] when no other particle lies
/// closer. Positions are expected in normalized box units, where no two
/// particles can be further apart than this.
pub const NORMALIZED_MAX_DISTANCE: f64 = 1.0;

/// Raw neighbor counts below this collapse to a single isolated particle.
const MIN_CLUSTER: usize = 3;

/// An immutable bed configuration with spatial queries.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BedProfile {
    particles: Vec<ProfileParticle>,
}

impl BedProfile {
    /// Build a profile over the given particles, in the given order.
    pub fn new(particles: Vec<ProfileParticle>) -> Self {
        Self { particles }
    }

    /// Build a profile from a decoded snapshot with absolute coordinates.
    pub fn from_snapshot(
        snapshot: &ParticleSnapshot,
        radius_field: &str,
    ) -> Result<Self, ProfileError> {
        ProfileParticle::from_snapshot(snapshot, radius_field).map(Self::new)
    }

    /// The particles of this configuration.
    pub fn particles(&self) -> &[ProfileParticle] {
        &self.particles
    }

    /// Number of particles.
    pub fn len(&self) -> usize {
        self.particles.len()
    }

    /// Whether the configuration is empty.
    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Count particles strictly inside the axis-aligned square of side
    /// `side` centred on `(cx, cy)`.
    ///
    /// This is a region query, so the count starts at zero and a particle
    /// sitting at the centre is counted like any other.
    pub fn square_region_count(&self, cx: f64, cy: f64, side: f64) -> usize {
        let half = side / 2.0;
        let (lo_x, hi_x) = (cx - half, cx + half);
        let (lo_y, hi_y) = (cy - half, cy + half);
        self.particles
            .iter()
            .filter(|p| lo_y < p.y && p.y < hi_y)
            .filter(|p| lo_x < p.x && p.x < hi_x)
            .count()
    }

    /// Count the particle at `(cx, cy)` plus every other particle closer
    /// than `multiplier` times that neighbor's own radius.
    pub fn circle_neighbor_count(&self, cx: f64, cy: f64, multiplier: f64) -> usize {
        1 + self
            .others(cx, cy)
            .filter(|p| p.distance_to(cx, cy) < multiplier * p.radius)
            .count()
    }

    /// Distance from `(px, py)` to the closest particle at a different
    /// position, capped at [`NORMALIZED_MAX_DISTANCE`].
    pub fn nearest_distance(&self, px: f64, py: f64) -> f64 {
        self.others(px, py)
            .map(|p| p.distance_to(px, py))
            .fold(NORMALIZED_MAX_DISTANCE, |nearest, d| {
                if d < nearest {
                    d
                } else {
                    nearest
                }
            })
    }

    /// Count the particle at `(px, py)` plus its neighbors, where each
    /// neighbor is within `multiplier` times its own radius.
    ///
    /// A particle with fewer than two neighbors is reported as isolated,
    /// so the result is never 2.
    pub fn neighbor_count_around_particle(&self, px: f64, py: f64, multiplier: f64) -> usize {
        let count = 1 + self
            .others(px, py)
            .filter(|p| p.distance_to(px, py) < p.radius * multiplier)
            .count();
        if count < MIN_CLUSTER {
            1
        } else {
            count
        }
    }

    /// Whether fewer than two particles sit at or above `(px, py)` within
    /// their own radius of `px` horizontally.
    ///
    /// Particles are not excluded by position, so a configuration member
    /// queried at its own position counts itself.
    pub fn is_surface_particle(&self, px: f64, py: f64) -> bool {
        let mut above = 0usize;
        for p in self.particles.iter().filter(|p| p.y >= py) {
            if px - p.radius < p.x && p.x < px + p.radius {
                above += 1;
            }
            if above > 1 {
                return false;
            }
        }
        true
    }

    /// [`nearest_distance`](Self::nearest_distance) at every particle.
    pub fn nearest_distances(&self) -> Vec<f64> {
        self.particles
            .iter()
            .map(|p| self.nearest_distance(p.x, p.y))
            .collect()
    }

    /// [`neighbor_count_around_particle`](Self::neighbor_count_around_particle)
    /// at every particle.
    pub fn neighbor_counts(&self, multiplier: f64) -> Vec<usize> {
        self.particles
            .iter()
            .map(|p| self.neighbor_count_around_particle(p.x, p.y, multiplier))
            .collect()
    }

    /// [`is_surface_particle`](Self::is_surface_particle) at every particle.
    pub fn surface_mask(&self) -> Vec<bool> {
        self.particles
            .iter()
            .map(|p| self.is_surface_particle(p.x, p.y))
            .collect()
    }

    fn others(&self, x: f64, y: f64) -> impl Iterator<Item = &ProfileParticle> + '_ {
        self.particles.iter().filter(move |p| !p.is_at(x, y))
    }
}

impl FromIterator<ProfileParticle> for BedProfile {
    fn from_iter<I: IntoIterator<Item = ProfileParticle>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn bed(points: &[(f64, f64, f64)]) -> BedProfile {
        points.iter().copied().map(ProfileParticle::from).collect()
    }

    // ── square_region_count ─────────────────────────────────────

    #[test]
    fn square_counts_centre_particle() {
        let b = bed(&[(0.0, 0.0, 0.1), (0.2, 0.2, 0.1), (2.0, 0.0, 0.1)]);
        assert_eq!(b.square_region_count(0.0, 0.0, 1.0), 2);
    }

    #[test]
    fn square_is_boundary_exclusive() {
        let b = bed(&[(0.5, 0.0, 0.1), (0.0, -0.5, 0.1), (0.49, 0.49, 0.1)]);
        assert_eq!(b.square_region_count(0.0, 0.0, 1.0), 1);
    }

    #[test]
    fn square_empty_region() {
        assert_eq!(BedProfile::default().square_region_count(0.0, 0.0, 10.0), 0);
    }

    // ── circle_neighbor_count ───────────────────────────────────

    #[test]
    fn circle_uses_neighbor_radius() {
        // Distance 1.0 to both; only the wide neighbor reaches.
        let b = bed(&[(0.0, 0.0, 0.01), (1.0, 0.0, 0.6), (0.0, 1.0, 0.4)]);
        assert_eq!(b.circle_neighbor_count(0.0, 0.0, 2.0), 2);
    }

    #[test]
    fn circle_boundary_exclusive() {
        let b = bed(&[(0.0, 0.0, 1.0), (1.0, 0.0, 0.5)]);
        assert_eq!(b.circle_neighbor_count(0.0, 0.0, 2.0), 1);
    }

    #[test]
    fn circle_skips_coincident_particles() {
        let b = bed(&[(0.0, 0.0, 1.0), (0.0, 0.0, 1.0), (0.0, 0.0, 1.0)]);
        assert_eq!(b.circle_neighbor_count(0.0, 0.0, 5.0), 1);
    }

    // ── nearest_distance ────────────────────────────────────────

    #[test]
    fn nearest_picks_closest_other() {
        let b = bed(&[(0.0, 0.0, 1.0), (0.0, 3.0, 1.0), (0.0, 0.5, 1.0)]);
        assert_eq!(b.nearest_distance(0.0, 0.0), 0.5);
    }

    #[test]
    fn nearest_single_particle_is_sentinel() {
        let b = bed(&[(0.3, 0.3, 0.1)]);
        assert_eq!(b.nearest_distance(0.3, 0.3), NORMALIZED_MAX_DISTANCE);
    }

    #[test]
    fn nearest_caps_at_sentinel() {
        let b = bed(&[(0.0, 0.0, 0.1), (5.0, 5.0, 0.1)]);
        assert_eq!(b.nearest_distance(0.0, 0.0), 1.0);
    }

    // ── neighbor_count_around_particle ──────────────────────────

    #[test]
    fn neighbor_count_collapses_pairs() {
        let b = bed(&[(0.0, 0.0, 0.5), (0.5, 0.0, 0.5)]);
        assert_eq!(b.neighbor_count_around_particle(0.0, 0.0, 2.0), 1);
    }

    #[test]
    fn neighbor_count_cluster_of_three() {
        let b = bed(&[(0.0, 0.0, 0.5), (0.5, 0.0, 0.5), (0.0, 0.5, 0.5)]);
        assert_eq!(b.neighbor_count_around_particle(0.0, 0.0, 2.0), 3);
    }

    #[test]
    fn neighbor_count_uses_iterated_radius() {
        // Query radius is tiny; neighbors' radii decide.
        let b = bed(&[
            (0.0, 0.0, 0.001),
            (0.5, 0.0, 0.3),
            (0.0, 0.5, 0.3),
            (0.0, -0.5, 0.2),
        ]);
        assert_eq!(b.neighbor_count_around_particle(0.0, 0.0, 2.0), 3);
    }

    // ── is_surface_particle ─────────────────────────────────────

    #[test]
    fn surface_with_column_of_three_above() {
        let b = bed(&[
            (0.0, 0.0, 1.0),
            (0.0, 1.0, 1.0),
            (0.1, 2.0, 1.0),
            (-0.1, 3.0, 1.0),
        ]);
        assert!(!b.is_surface_particle(0.0, 0.0));
    }

    #[test]
    fn surface_with_one_above() {
        let b = bed(&[(0.0, 1.0, 1.0), (3.0, 2.0, 1.0)]);
        assert!(b.is_surface_particle(0.0, 0.0));
    }

    #[test]
    fn surface_member_counts_itself() {
        let b = bed(&[(0.0, 0.0, 1.0), (0.0, 1.0, 1.0)]);
        assert!(!b.is_surface_particle(0.0, 0.0));
        // The top particle only sees itself.
        assert!(b.is_surface_particle(0.0, 1.0));
    }

    #[test]
    fn surface_ignores_particles_below() {
        let b = bed(&[(0.0, -1.0, 1.0), (0.0, -2.0, 1.0), (0.0, -3.0, 1.0)]);
        assert!(b.is_surface_particle(0.0, 0.0));
    }

    #[test]
    fn surface_window_uses_candidate_radius() {
        // Both sit 0.5 to the side; the narrow one falls outside its window.
        let b = bed(&[(0.5, 1.0, 0.6), (0.5, 2.0, 0.5), (-0.5, 3.0, 0.7)]);
        assert!(!b.is_surface_particle(0.0, 0.0));
        let b = bed(&[(0.5, 1.0, 0.6), (0.5, 2.0, 0.5)]);
        assert!(b.is_surface_particle(0.0, 0.0));
    }

    // ── batch helpers ───────────────────────────────────────────

    #[test]
    fn batch_helpers_match_point_queries() {
        let b = bed(&[
            (0.1, 0.1, 0.05),
            (0.15, 0.1, 0.05),
            (0.1, 0.2, 0.05),
            (0.6, 0.6, 0.05),
        ]);
        let nearest = b.nearest_distances();
        let counts = b.neighbor_counts(3.0);
        let mask = b.surface_mask();
        assert_eq!(nearest.len(), 4);
        for (i, p) in b.particles().iter().enumerate() {
            assert_eq!(nearest[i], b.nearest_distance(p.x, p.y));
            assert_eq!(counts[i], b.neighbor_count_around_particle(p.x, p.y, 3.0));
            assert_eq!(mask[i], b.is_surface_particle(p.x, p.y));
        }
        assert!((nearest[0] - 0.05).abs() < 1e-12);
    }

    fn arb_bed() -> impl Strategy<Value = Vec<(f64, f64, f64)>> {
        prop::collection::vec((0.0f64..1.0, 0.0f64..1.0, 0.001f64..0.2), 0..40)
    }

    proptest! {
        #[test]
        fn neighbor_count_never_two(points in arb_bed(), qx in 0.0f64..1.0, qy in 0.0f64..1.0, m in 0.1f64..20.0) {
            let b = bed(&points);
            let n = b.neighbor_count_around_particle(qx, qy, m);
            prop_assert_ne!(n, 2);
            prop_assert!(n >= 1);
        }

        #[test]
        fn nearest_never_exceeds_sentinel(points in arb_bed(), qx in 0.0f64..1.0, qy in 0.0f64..1.0) {
            let d = bed(&points).nearest_distance(qx, qy);
            prop_assert!(d <= NORMALIZED_MAX_DISTANCE);
            prop_assert!(d >= 0.0);
        }

        #[test]
        fn square_excludes_exact_boundaries(cx in -1.0f64..1.0, cy in -1.0f64..1.0, side in 0.01f64..2.0) {
            let half = side / 2.0;
            let b = bed(&[
                (cx - half, cy, 0.1),
                (cx + half, cy, 0.1),
                (cx, cy - half, 0.1),
                (cx, cy + half, 0.1),
            ]);
            prop_assert_eq!(b.square_region_count(cx, cy, side), 0);
        }

        #[test]
        fn circle_excludes_exact_boundary(r in 0.01f64..1.0, m in 0.5f64..4.0) {
            // A neighbor straight to the right at exactly m * r.
            let b = bed(&[(0.0, 0.0, 0.1), (m * r, 0.0, r)]);
            prop_assert_eq!(b.circle_neighbor_count(0.0, 0.0, m), 1);
        }

        #[test]
        fn square_count_bounded_by_len(points in arb_bed(), side in 0.0f64..3.0) {
            let b = bed(&points);
            prop_assert!(b.square_region_count(0.5, 0.5, side) <= b.len());
        }
    }
}
