//! Mutable bookkeeping of the continuation loop.

/// One population rebuild.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResizeEvent {
    /// Index of the check (1-based) that triggered the rebuild.
    pub check: usize,

    /// Archive size recorded at the previous check.
    pub previous_archive_size: usize,

    /// Archive size when the check ran.
    pub archive_size: usize,

    /// Clamped ratio of `archive_size` to `previous_archive_size`.
    pub growth_factor: f64,

    pub old_population_size: usize,

    pub new_population_size: usize,

    /// Fresh random solutions in the rebuilt population.
    pub injected: usize,

    /// Whether the rebuild was forced by `max_window_size` rather than by a
    /// stalled archive.
    pub forced: bool,
}

/// Counters owned by one [`AdaptiveContinuation`](super::AdaptiveContinuation).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContinuationState {
    /// Steps or evaluations since the last check.
    pub counter: usize,

    /// Evaluation count observed after the previous step.
    pub last_evaluations: usize,

    /// Archive size baseline for the next check.
    pub previous_archive_size: usize,

    /// Checks since the last rebuild.
    pub checks_since_resize: usize,

    /// Checks performed so far.
    pub checks: usize,

    /// Every rebuild, oldest first.
    pub resizes: Vec<ResizeEvent>,
}

impl ContinuationState {
    pub(crate) fn new(archive_size: usize, evaluations: usize) -> Self {
        Self {
            previous_archive_size: archive_size,
            last_evaluations: evaluations,
            ..Self::default()
        }
    }

    pub fn number_of_resizes(&self) -> usize {
        self.resizes.len()
    }

    pub fn last_resize(&self) -> Option<&ResizeEvent> {
        self.resizes.last()
    }
}
