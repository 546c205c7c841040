//! Per-aggregation counters.

/// Timing and volume metrics collected during a single aggregation.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AggregateMetrics {
    /// Wall-clock time for the whole aggregation, in microseconds.
    pub total_us: u64,
    /// Snapshots folded into the series, seed included.
    pub snapshots_decoded: u64,
    /// Values appended to existing sequences.
    pub updates_applied: u64,
    /// Values dropped because their particle/field pair was not seeded.
    pub updates_dropped: u64,
    /// Decode workers used (1 for sequential).
    pub worker_count: usize,
    /// Distinct diagnostics reported.
    pub unique_diagnostics: usize,
}
