//! Benchmark workloads for the granbed toolkit.
//!
//! Provides seeded, reproducible inputs for benchmarking:
//!
//! - [`reference_dump`]: 500 particles over 40 timesteps
//! - [`stress_dump`]: 5 000 particles over 100 timesteps
//! - [`reference_bed`]: 2 000 `(x, y, radius)` tuples for profile queries

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use granbed_test_utils::{random_bed_dump, random_profile};

/// Regular particles in [`reference_dump`] (the disc is extra).
pub const REFERENCE_PARTICLES: usize = 500;
/// Timesteps in [`reference_dump`].
pub const REFERENCE_TIMESTEPS: usize = 40;

/// Regular particles in [`stress_dump`].
pub const STRESS_PARTICLES: usize = 5_000;
/// Timesteps in [`stress_dump`].
pub const STRESS_TIMESTEPS: usize = 100;

/// Particles in [`reference_bed`].
pub const BED_PARTICLES: usize = 2_000;

/// Build the reference dump text.
pub fn reference_dump(seed: u64) -> String {
    random_bed_dump(seed, REFERENCE_PARTICLES, REFERENCE_TIMESTEPS)
}

/// Build the stress dump text, 10x the particles and 2.5x the timesteps
/// of [`reference_dump`].
pub fn stress_dump(seed: u64) -> String {
    random_bed_dump(seed, STRESS_PARTICLES, STRESS_TIMESTEPS)
}

/// Build the reference bed configuration.
pub fn reference_bed(seed: u64) -> Vec<(f64, f64, f64)> {
    random_profile(seed, BED_PARTICLES)
}
