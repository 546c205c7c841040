//! Test utilities for granbed development.
//!
//! Provides [`DumpBuilder`] for assembling dump text in memory and a
//! few seeded generators ([`random_bed_dump`], [`random_profile`]) for
//! property tests and benchmarks.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

pub use fixtures::{random_bed_dump, random_profile, DumpBuilder};
