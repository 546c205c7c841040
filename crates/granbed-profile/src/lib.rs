//! Spatial statistics over a static granular bed configuration.
//!
//! A [`BedProfile`] holds an ordered list of [`ProfileParticle`]s
//! (position plus radius) and answers local density, proximity and
//! surface queries over it. Every query is a pure function of the
//! configuration and its arguments.
//!
//! # Queries
//!
//! | Query | Base | Self by position | Threshold |
//! |-------|------|------------------|-----------|
//! | [`BedProfile::square_region_count`] | 0 | counted | open square of side `side` |
//! | [`BedProfile::circle_neighbor_count`] | 1 | skipped | `multiplier * neighbor radius` |
//! | [`BedProfile::nearest_distance`] | [`NORMALIZED_MAX_DISTANCE`] | skipped | running minimum |
//! | [`BedProfile::neighbor_count_around_particle`] | 1 | skipped | `multiplier * neighbor radius`, counts below 3 collapse to 1 |
//! | [`BedProfile::is_surface_particle`] | 0 | counted | open window of the candidate's radius |
//!
//! All comparisons are strict: a particle exactly on a region or circle
//! boundary is not counted.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod particle;
pub mod profile;

pub use error::ProfileError;
pub use particle::ProfileParticle;
pub use profile::{BedProfile, NORMALIZED_MAX_DISTANCE};
