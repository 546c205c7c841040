//! Folding decoded snapshots into a per-particle series.
//!
//! The series is seeded from timestep 0 and then extended with every
//! later timestep in ascending index order. Under
//! [`Strategy::Concurrent`] blocks are decoded out of order by the
//! worker pool and parked in a reorder buffer until every earlier
//! position has been folded, so the appended sequences come out the
//! same as with [`Strategy::Sequential`].

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use granbed_core::{Diagnostic, Diagnostics, ParticleId, ParticleSeries};
use granbed_dump::{DecodeOptions, DecodedSnapshot, SnapshotDecoder, Timestep, TrajectoryIndex};

use crate::config::{AggregateConfig, Strategy};
use crate::error::SeriesError;
use crate::metrics::AggregateMetrics;
use crate::worker::{spawn_workers, DecodeOutcome, DecodeTask, WorkerShared};

/// Output of one aggregation.
#[derive(Clone, Debug, PartialEq)]
pub struct Aggregation {
    /// Per-particle field sequences in timestep order.
    pub series: ParticleSeries,
    /// Disc id of the seed snapshot.
    pub disc_id: Option<ParticleId>,
    /// Distinct recoverable conditions, in first-seen order.
    pub diagnostics: Diagnostics,
    /// Timing and volume counters.
    pub metrics: AggregateMetrics,
}

/// Drives the snapshot decoder across every timestep of a dump.
#[derive(Clone, Debug)]
pub struct Aggregator {
    index: Arc<TrajectoryIndex>,
    config: AggregateConfig,
}

impl Aggregator {
    /// Create an aggregator after validating `config`.
    pub fn new(index: Arc<TrajectoryIndex>, config: AggregateConfig) -> Result<Self, SeriesError> {
        config.validate()?;
        Ok(Self { index, config })
    }

    /// The configuration in use.
    pub fn config(&self) -> &AggregateConfig {
        &self.config
    }

    /// Aggregate every timestep.
    ///
    /// Fails on the first decode error. Under the concurrent strategy
    /// the reported error is whichever failing block a worker finished
    /// first.
    pub fn run(&self) -> Result<Aggregation, SeriesError> {
        let start = Instant::now();
        let options = self.config.decode_options();
        let decoder = SnapshotDecoder::new(&self.index)?;

        let mut seed = decoder.decode_at(0, &options)?;
        let mut fold = Fold {
            series: ParticleSeries::seed(&seed.snapshot),
            diagnostics: Diagnostics::new(),
            metrics: AggregateMetrics::default(),
        };
        fold.diagnostics.append(&mut seed.diagnostics);
        fold.metrics.snapshots_decoded = 1;

        let rest = &self.index.timesteps()[1..];
        log::info!(
            "aggregating {} timesteps ({:?})",
            rest.len() + 1,
            self.config.strategy
        );

        let workers = match self.config.strategy {
            Strategy::Sequential => {
                for ts in rest {
                    fold.apply(decoder.decode(ts.index, ts.value, &options)?);
                }
                1
            }
            Strategy::Concurrent => self.run_concurrent(rest, options, &mut fold)?,
        };
        fold.metrics.worker_count = workers;

        let Fold {
            series,
            mut diagnostics,
            mut metrics,
        } = fold;
        diagnostics.dedup();
        metrics.unique_diagnostics = diagnostics.emit("aggregate");
        metrics.total_us = start.elapsed().as_micros() as u64;
        log::info!(
            "aggregated {} particles over {} snapshots in {} us ({} dropped updates)",
            series.len(),
            metrics.snapshots_decoded,
            metrics.total_us,
            metrics.updates_dropped
        );

        Ok(Aggregation {
            series,
            disc_id: seed.disc_id,
            diagnostics,
            metrics,
        })
    }

    /// Decode `rest` on the worker pool, folding in position order.
    ///
    /// Returns the number of workers used.
    fn run_concurrent(
        &self,
        rest: &[Timestep],
        options: DecodeOptions,
        fold: &mut Fold,
    ) -> Result<usize, SeriesError> {
        if rest.is_empty() {
            return Ok(0);
        }
        let worker_count = self.config.resolved_worker_count().min(rest.len());
        let shared = Arc::new(WorkerShared {
            index: Arc::clone(&self.index),
            options,
            abort: AtomicBool::new(false),
        });

        let (task_tx, task_rx) = crossbeam_channel::bounded::<DecodeTask>(worker_count * 4);
        let (result_tx, result_rx) = crossbeam_channel::unbounded::<DecodeOutcome>();
        let handles = spawn_workers(worker_count, &task_rx, &result_tx, &shared)?;
        drop(task_rx);
        drop(result_tx);
        log::debug!("spawned {worker_count} decode workers");

        for (position, ts) in rest.iter().enumerate() {
            if shared.abort.load(Ordering::Acquire) {
                break;
            }
            let task = DecodeTask {
                position,
                index: ts.index,
                value: ts.value,
            };
            if task_tx.send(task).is_err() {
                break;
            }
        }
        drop(task_tx);

        let mut first_error = None;
        let mut pending: BTreeMap<usize, DecodedSnapshot> = BTreeMap::new();
        let mut next = 0usize;
        for outcome in result_rx.iter() {
            match outcome.result {
                Ok(decoded) if first_error.is_none() => {
                    pending.insert(outcome.position, decoded);
                    while let Some(decoded) = pending.remove(&next) {
                        fold.apply(decoded);
                        next += 1;
                    }
                }
                Ok(_) => {}
                Err(e) => {
                    shared.abort.store(true, Ordering::Release);
                    first_error.get_or_insert(e);
                }
            }
        }

        let mut panicked = None;
        for (worker, handle) in handles.into_iter().enumerate() {
            if handle.join().is_err() {
                panicked.get_or_insert(worker);
            }
        }
        if let Some(e) = first_error {
            return Err(e.into());
        }
        if let Some(worker) = panicked {
            return Err(SeriesError::WorkerPanicked { worker });
        }
        Ok(worker_count)
    }
}

/// The single writer of an aggregation.
struct Fold {
    series: ParticleSeries,
    diagnostics: Diagnostics,
    metrics: AggregateMetrics,
}

impl Fold {
    fn apply(&mut self, mut decoded: DecodedSnapshot) {
        self.diagnostics.append(&mut decoded.diagnostics);
        let ts = decoded.timestep;
        for (id, fields) in decoded.snapshot.iter() {
            for (name, value) in fields {
                if self.series.append(id, name, *value) {
                    self.metrics.updates_applied += 1;
                } else {
                    self.metrics.updates_dropped += 1;
                    self.diagnostics.push(Diagnostic::SchemaDrift {
                        field: name.clone(),
                        particle: id,
                        timestep_index: ts.index,
                        timestep_value: ts.value,
                    });
                }
            }
        }
        self.metrics.snapshots_decoded += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use granbed_dump::DumpError;
    use granbed_test_utils::{random_bed_dump, DumpBuilder};

    fn aggregate(text: &str, config: AggregateConfig) -> Result<Aggregation, SeriesError> {
        let index = Arc::new(TrajectoryIndex::from_text(text).unwrap());
        Aggregator::new(index, config)?.run()
    }

    fn drifting_dump() -> String {
        DumpBuilder::new(&["xs", "ys"])
            .box_bounds((0.0, 2.0), (0.0, 2.0))
            .timestep(0, vec![(1, vec![0.1, 0.1]), (2, vec![0.2, 0.2]), (9, vec![0.0, 0.0])])
            .timestep_with_columns(
                10,
                &["xs", "ys", "omegaz"],
                vec![
                    (1, vec![0.15, 0.1, 3.0]),
                    (2, vec![0.25, 0.2, 4.0]),
                    (9, vec![0.0, 0.0, 0.0]),
                ],
            )
            .timestep(20, vec![(1, vec![0.2, 0.1]), (2, vec![0.3, 0.2]), (9, vec![0.0, 0.0])])
            .build()
    }

    #[test]
    fn sequences_have_one_entry_per_timestep() {
        let agg = aggregate(&drifting_dump(), AggregateConfig::sequential()).unwrap();
        let x1 = agg.series.sequence(ParticleId(1), "x").unwrap();
        assert_eq!(x1.len(), 3);
        assert!((x1[0] - 0.2).abs() < 1e-12);
        assert!((x1[2] - 0.4).abs() < 1e-12);
        assert_eq!(agg.disc_id, Some(ParticleId(9)));
        assert!(agg.series.get(ParticleId(9)).is_none());
        assert_eq!(agg.metrics.snapshots_decoded, 3);
    }

    #[test]
    fn header_change_does_not_shift_columns() {
        // Every block is decoded with the first header's columns, so the
        // extra column of block 1 is ignored rather than misread.
        let agg = aggregate(&drifting_dump(), AggregateConfig::sequential()).unwrap();
        assert!(agg.series.sequence(ParticleId(1), "omegaz").is_none());
        assert!(agg.diagnostics.is_empty());
    }

    #[test]
    fn unseeded_fields_are_dropped_with_deduplicated_diagnostics() {
        // Particle 3 is only present after seeding.
        let text = DumpBuilder::new(&["xs", "ys"])
            .box_bounds((0.0, 1.0), (0.0, 1.0))
            .timestep(0, vec![(1, vec![0.1, 0.1]), (9, vec![0.0, 0.0])])
            .timestep(5, vec![(1, vec![0.2, 0.1]), (3, vec![0.5, 0.5]), (9, vec![0.0, 0.0])])
            .build();
        let agg = aggregate(&text, AggregateConfig::sequential()).unwrap();
        assert!(agg.series.get(ParticleId(3)).is_none());
        assert_eq!(agg.metrics.updates_dropped, 2);
        assert_eq!(agg.diagnostics.len(), 2);
        assert_eq!(agg.metrics.unique_diagnostics, 2);
        assert!(agg.diagnostics.iter().all(|d| matches!(
            d,
            Diagnostic::SchemaDrift {
                particle: ParticleId(3),
                timestep_index: 1,
                timestep_value: 5,
                ..
            }
        )));
    }

    #[test]
    fn repeated_missing_coordinate_is_reported_once() {
        // No ys column in any block: every particle, disc included, hits
        // the same condition at all three timesteps.
        let rows = || vec![(1, vec![0.1, 0.2]), (2, vec![0.3, 0.2]), (9, vec![0.0, 0.0])];
        let text = DumpBuilder::new(&["xs", "radius"])
            .box_bounds((0.0, 2.0), (0.0, 2.0))
            .timestep(0, rows())
            .timestep(10, rows())
            .timestep(20, rows())
            .build();

        for config in [AggregateConfig::sequential(), AggregateConfig::concurrent(Some(2))] {
            let agg = aggregate(&text, config).unwrap();
            assert_eq!(agg.metrics.snapshots_decoded, 3);
            assert_eq!(agg.metrics.unique_diagnostics, 3);
            let particles: Vec<_> = agg
                .diagnostics
                .iter()
                .map(|d| match d {
                    Diagnostic::MissingScaledCoordinate { particle, field } => {
                        assert_eq!(*field, "ys");
                        *particle
                    }
                    other => panic!("unexpected diagnostic: {other}"),
                })
                .collect();
            assert_eq!(particles, vec![ParticleId(1), ParticleId(2), ParticleId(9)]);
            // x is still converted and appended at every timestep.
            assert_eq!(agg.series.sequence(ParticleId(1), "x").unwrap().len(), 3);
            assert!(agg.series.sequence(ParticleId(1), "y").is_none());
        }
    }

    #[test]
    fn concurrent_matches_sequential() {
        let text = random_bed_dump(11, 20, 12);
        let seq = aggregate(&text, AggregateConfig::sequential()).unwrap();
        for workers in [1, 2, 3, 8] {
            let conc = aggregate(&text, AggregateConfig::concurrent(Some(workers))).unwrap();
            assert_eq!(seq.series, conc.series);
            assert_eq!(seq.diagnostics, conc.diagnostics);
            assert_eq!(conc.metrics.snapshots_decoded, 12);
        }
    }

    #[test]
    fn single_timestep_dump_is_just_the_seed() {
        let text = random_bed_dump(2, 3, 1);
        let agg = aggregate(&text, AggregateConfig::concurrent(Some(4))).unwrap();
        assert_eq!(agg.metrics.worker_count, 0);
        for (_, fields) in agg.series.iter() {
            assert!(fields.values().all(|seq| seq.len() == 1));
        }
    }

    #[test]
    fn zero_workers_rejected_at_construction() {
        let index = Arc::new(TrajectoryIndex::from_text(&random_bed_dump(1, 2, 2)).unwrap());
        assert!(matches!(
            Aggregator::new(index, AggregateConfig::concurrent(Some(0))),
            Err(SeriesError::Config(_))
        ));
    }

    #[test]
    fn corrupt_block_fails_both_strategies() {
        let good = random_bed_dump(5, 4, 4);
        // Block 2 has a non-numeric radius.
        let mut lines: Vec<String> = good.lines().map(str::to_owned).collect();
        let index = TrajectoryIndex::from_text(&good).unwrap();
        let bad_line = index.data_offset(2).unwrap();
        lines[bad_line] = "1 0.5 0.5 oops 0.0".to_string();
        let text = lines.join("\n");

        for config in [AggregateConfig::sequential(), AggregateConfig::concurrent(Some(3))] {
            let err = aggregate(&text, config).unwrap_err();
            assert!(matches!(
                err,
                SeriesError::Dump(DumpError::MalformedValue { .. })
            ));
        }
    }
}
