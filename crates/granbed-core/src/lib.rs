//! Core types for granular bed trajectory analysis.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the data shared by every other granbed crate: particle identifiers,
//! well-known field names, the per-timestep [`ParticleSnapshot`], the
//! per-particle [`ParticleSeries`], and the [`Diagnostics`] collector
//! used to report recoverable conditions after bulk operations.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod diagnostic;
pub mod field;
pub mod id;
pub mod snapshot;

pub use diagnostic::{Diagnostic, Diagnostics};
pub use field::{Axis, FieldMap, PositionKind, SeriesFieldMap};
pub use id::ParticleId;
pub use snapshot::{ParticleSeries, ParticleSnapshot};
