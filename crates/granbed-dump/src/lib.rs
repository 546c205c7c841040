//! Trajectory index and snapshot decoder for granular dump files.
//!
//! A dump is line-oriented text made of repeating per-timestep blocks.
//! [`TrajectoryIndex`] scans the text once, recording where each
//! structural marker sits and the value of every timestep.
//! [`SnapshotDecoder`] turns one block back into a
//! [`ParticleSnapshot`](granbed_core::ParticleSnapshot), optionally
//! converting box-scaled coordinates to absolute ones and always
//! dropping the disc (the highest particle id in the block).
//!
//! # Format
//!
//! ```text
//! ITEM: TIMESTEP
//! <int value>
//! ITEM: NUMBER OF ATOMS
//! <int count>
//! ITEM: BOX BOUNDS ...
//! <low> <high>
//! <low> <high>
//! ITEM: ATOMS id <field1> <field2> ...
//! <id> <v1> <v2> ...
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod decode;
pub mod error;
pub mod index;

pub use decode::{DecodeOptions, DecodedSnapshot, SnapshotDecoder};
pub use error::DumpError;
pub use index::{BoxDimensions, Marker, Timestep, TrajectoryIndex};
