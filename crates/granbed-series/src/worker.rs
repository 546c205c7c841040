//! Decode worker pool for concurrent aggregation.
//!
//! Each worker receives [`DecodeTask`] requests via a crossbeam channel,
//! decodes the block against the shared index into a private
//! [`DecodedSnapshot`], and sends it back tagged with its position. The
//! caller owns the only mutable series and folds results in order.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crossbeam_channel::{Receiver, Sender};

use granbed_dump::{DecodeOptions, DecodedSnapshot, DumpError, SnapshotDecoder, TrajectoryIndex};

use crate::error::SeriesError;

/// A block to decode.
pub(crate) struct DecodeTask {
    /// Position of the task in submission order.
    pub position: usize,
    /// Timestep index in the trajectory.
    pub index: usize,
    /// Expected timestep value.
    pub value: i64,
}

/// Result of one decode task.
pub(crate) struct DecodeOutcome {
    pub position: usize,
    pub result: Result<DecodedSnapshot, DumpError>,
}

/// State shared by every worker of one aggregation.
pub(crate) struct WorkerShared {
    pub index: Arc<TrajectoryIndex>,
    pub options: DecodeOptions,
    /// Set by the first worker that fails; remaining tasks are skipped.
    pub abort: AtomicBool,
}

/// Spawn `count` decode workers.
pub(crate) fn spawn_workers(
    count: usize,
    task_rx: &Receiver<DecodeTask>,
    result_tx: &Sender<DecodeOutcome>,
    shared: &Arc<WorkerShared>,
) -> Result<Vec<JoinHandle<()>>, SeriesError> {
    let mut handles = Vec::with_capacity(count);
    for i in 0..count {
        let task_rx = task_rx.clone();
        let result_tx = result_tx.clone();
        let shared = Arc::clone(shared);
        let handle = thread::Builder::new()
            .name(format!("granbed-decode-{i}"))
            .spawn(move || worker_loop(task_rx, result_tx, shared))
            .map_err(|e| SeriesError::ThreadSpawnFailed {
                reason: format!("worker {i}: {e}"),
            })?;
        handles.push(handle);
    }
    Ok(handles)
}

/// Main loop for a decode worker thread.
///
/// Runs until the task channel is closed (sender dropped).
fn worker_loop(
    task_rx: Receiver<DecodeTask>,
    result_tx: Sender<DecodeOutcome>,
    shared: Arc<WorkerShared>,
) {
    while let Ok(task) = task_rx.recv() {
        if shared.abort.load(Ordering::Acquire) {
            continue;
        }
        // The decoder borrows the index, so it is rebuilt per task.
        let result = SnapshotDecoder::new(&shared.index)
            .and_then(|d| d.decode(task.index, task.value, &shared.options));
        if result.is_err() {
            shared.abort.store(true, Ordering::Release);
        }
        let outcome = DecodeOutcome {
            position: task.position,
            result,
        };
        if result_tx.send(outcome).is_err() {
            break;
        }
    }
    // Task channel closed.
}

#[cfg(test)]
mod tests {
    use super::*;
    use granbed_test_utils::random_bed_dump;

    fn shared_for(text: &str) -> Arc<WorkerShared> {
        Arc::new(WorkerShared {
            index: Arc::new(TrajectoryIndex::from_text(text).unwrap()),
            options: DecodeOptions::default(),
            abort: AtomicBool::new(false),
        })
    }

    #[test]
    fn worker_decodes_and_exits_on_close() {
        let shared = shared_for(&random_bed_dump(3, 4, 3));
        let (task_tx, task_rx) = crossbeam_channel::bounded(4);
        let (result_tx, result_rx) = crossbeam_channel::unbounded();
        let handles = spawn_workers(2, &task_rx, &result_tx, &shared).unwrap();
        drop(result_tx);

        for (position, ts) in shared.index.timesteps().iter().enumerate() {
            task_tx
                .send(DecodeTask {
                    position,
                    index: ts.index,
                    value: ts.value,
                })
                .unwrap();
        }
        drop(task_tx);

        let mut positions: Vec<usize> = result_rx
            .iter()
            .map(|o| {
                assert!(o.result.is_ok());
                o.position
            })
            .collect();
        positions.sort();
        assert_eq!(positions, vec![0, 1, 2]);
        for h in handles {
            h.join().unwrap();
        }
    }

    #[test]
    fn failing_task_sets_abort() {
        let shared = shared_for(&random_bed_dump(3, 4, 2));
        let (task_tx, task_rx) = crossbeam_channel::bounded(4);
        let (result_tx, result_rx) = crossbeam_channel::unbounded();
        let handles = spawn_workers(1, &task_rx, &result_tx, &shared).unwrap();
        drop(result_tx);

        task_tx
            .send(DecodeTask {
                position: 0,
                index: 1,
                value: -1,
            })
            .unwrap();
        drop(task_tx);

        let outcomes: Vec<_> = result_rx.iter().collect();
        assert_eq!(outcomes.len(), 1);
        assert!(matches!(
            outcomes[0].result,
            Err(DumpError::InconsistentTimestep { .. })
        ));
        assert!(shared.abort.load(Ordering::Acquire));
        for h in handles {
            h.join().unwrap();
        }
    }
}
