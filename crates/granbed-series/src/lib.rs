//! Timeseries aggregation and finite differencing for granular dumps.
//!
//! [`Aggregator`] decodes every block of an indexed dump and folds the
//! snapshots into a per-particle [`ParticleSeries`](granbed_core::ParticleSeries),
//! either on the calling thread or on a pool of decode workers. Both
//! strategies fold snapshots in ascending timestep order, so they
//! produce identical series. [`differentiate`] then adds velocity and
//! acceleration sequences derived from the position sequences.
//!
//! [`Simulation`] ties these together behind one handle per dump file.
//!
//! # Threading
//!
//! ```text
//!   caller thread                    decode workers (N)
//!   ─────────────                    ──────────────────
//!   send DecodeTask ──[bounded(N*4)]──► recv, decode block
//!   fold in order   ◄──[unbounded]───── send DecodeOutcome
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod aggregate;
pub mod config;
pub mod differentiate;
pub mod error;
pub mod metrics;
pub mod simulation;
pub(crate) mod worker;

pub use aggregate::{Aggregation, Aggregator};
pub use config::{AggregateConfig, ConfigError, Strategy};
pub use differentiate::{differentiate, gradient, DifferentiateError};
pub use error::SeriesError;
pub use metrics::AggregateMetrics;
pub use simulation::Simulation;
