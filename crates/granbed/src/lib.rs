//! Granbed: post-processing for 2D granular bed simulation dumps.
//!
//! This is the top-level facade crate that re-exports the public API from
//! all granbed sub-crates. For most users, adding `granbed` as a single
//! dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use granbed::prelude::*;
//!
//! let text = "\
//! ITEM: TIMESTEP
//! 0
//! ITEM: NUMBER OF ATOMS
//! 2
//! ITEM: BOX BOUNDS pp pp
//! 0 10
//! 0 20
//! ITEM: ATOMS id xs ys radius
//! 1 0.25 0.40 0.9
//! 2 0.50 0.50 5.0
//! ITEM: TIMESTEP
//! 100
//! ITEM: NUMBER OF ATOMS
//! 2
//! ITEM: BOX BOUNDS pp pp
//! 0 10
//! 0 20
//! ITEM: ATOMS id xs ys radius
//! 1 0.35 0.40 0.9
//! 2 0.50 0.50 5.0
//! ";
//!
//! let mut sim = Simulation::from_text(text).unwrap();
//! assert_eq!(sim.disc_id(), Some(ParticleId(2)));
//! assert_eq!(sim.initial_state().value(ParticleId(1), "x"), Some(2.5));
//!
//! let rendered = sim.render(AggregateConfig::default()).unwrap();
//! let x = rendered.series.sequence(ParticleId(1), "x").unwrap();
//! assert_eq!(x.len(), 2);
//!
//! let profile = BedProfile::from_snapshot(sim.initial_state(), "radius").unwrap();
//! assert!(profile.is_surface_particle(2.5, 8.0));
//! ```
//!
//! # Modules
//!
//! Each module corresponds to a sub-crate. Use them for types not in the prelude:
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `granbed-core` | Particle ids, field names, snapshots, series, diagnostics |
//! | [`dump`] | `granbed-dump` | Trajectory index and snapshot decoding |
//! | [`series`] | `granbed-series` | Aggregation, differentiation, the `Simulation` handle |
//! | [`profile`] | `granbed-profile` | Density, proximity and surface queries |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core data types (`granbed-core`).
///
/// Contains [`types::ParticleId`], [`types::ParticleSnapshot`],
/// [`types::ParticleSeries`] and the [`types::Diagnostics`] collector.
pub use granbed_core as types;

/// Dump indexing and decoding (`granbed-dump`).
///
/// Build a [`dump::TrajectoryIndex`] once per file, then decode
/// individual timesteps with a [`dump::SnapshotDecoder`].
pub use granbed_dump as dump;

/// Time-series aggregation (`granbed-series`).
///
/// [`series::Aggregator`] collects per-particle sequences with a
/// sequential or concurrent strategy; [`series::Simulation`] bundles
/// indexing, aggregation and differentiation behind one handle.
pub use granbed_series as series;

/// Spatial profile queries (`granbed-profile`).
///
/// [`profile::BedProfile`] answers density, nearest-neighbor and
/// surface queries over a static configuration.
pub use granbed_profile as profile;

/// Common imports for typical granbed usage.
///
/// ```rust
/// use granbed::prelude::*;
/// ```
pub mod prelude {
    // Core types
    pub use granbed_core::{
        Axis, Diagnostic, Diagnostics, FieldMap, ParticleId, ParticleSeries, ParticleSnapshot,
    };

    // Dump
    pub use granbed_dump::{DecodeOptions, DumpError, SnapshotDecoder, TrajectoryIndex};

    // Series
    pub use granbed_series::{
        AggregateConfig, AggregateMetrics, Aggregation, Aggregator, SeriesError, Simulation,
        Strategy,
    };

    // Profile
    pub use granbed_profile::{BedProfile, ProfileError, ProfileParticle};
}
