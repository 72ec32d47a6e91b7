//! Run progress, emitted after each extracted record.

/// Completion state of the extraction stage. `total` is the number of
/// collected identifiers and is fixed before extraction begins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub completed: usize,
    pub total: usize,
}

impl Progress {
    /// Fraction complete in `[0, 1]`; exactly 1.0 on the last record.
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.completed as f64 / self.total as f64
    }
}
