//! Alignment diagnostics
//!
//! Counts gathered during one resolver run. They are observational only;
//! nothing in the crate reads them back.

use std::fmt;

use serde::Serialize;

/// Why an untrusted edit was dropped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// No strategy could find the original text
    Unlocatable,
    /// Every placement collides with an edit accepted earlier
    Overlap,
    /// Re-verification of the placed substring failed
    Mismatch,
    /// Every placed piece was removed by the final ordering pass
    Superseded,
}

/// Aggregate counts for one resolver invocation
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AlignmentMetrics {
    /// Number of input edits
    pub total: usize,

    /// Accepted edits whose start moved away from the reported start
    pub reindexed: usize,

    /// Sum of the skip counters below
    pub skipped: usize,

    pub skipped_unlocatable: usize,
    pub skipped_overlap: usize,
    pub skipped_mismatch: usize,
    pub skipped_superseded: usize,

    /// Accepted edits that were split into two or more pieces
    pub oversized_splits: usize,

    /// Pieces removed by the final ordering pass
    pub dropped_in_final_pass: usize,

    /// Mean relocation distance in UTF-16 units over the reindexed edits
    pub average_relocation: f64,

    #[serde(skip)]
    relocation_total: u64,
}

impl AlignmentMetrics {
    pub fn new(total: usize) -> Self {
        Self {
            total,
            ..Default::default()
        }
    }

    pub(crate) fn record_skip(&mut self, reason: SkipReason) {
        self.skipped += 1;
        match reason {
            SkipReason::Unlocatable => self.skipped_unlocatable += 1,
            SkipReason::Overlap => self.skipped_overlap += 1,
            SkipReason::Mismatch => self.skipped_mismatch += 1,
            SkipReason::Superseded => self.skipped_superseded += 1,
        }
    }

    pub(crate) fn record_relocation(&mut self, delta: i64) {
        if delta != 0 {
            self.reindexed += 1;
            self.relocation_total = self.relocation_total.saturating_add(delta.unsigned_abs());
        }
    }

    /// Undo the counts of an accepted edit whose pieces were all dropped later
    pub(crate) fn retract(&mut self, delta: i64, pieces: usize) {
        if delta != 0 {
            self.reindexed -= 1;
            self.relocation_total = self.relocation_total.saturating_sub(delta.unsigned_abs());
        }
        if pieces > 1 {
            self.oversized_splits -= 1;
        }
    }

    pub(crate) fn record_split(&mut self, pieces: usize) {
        if pieces > 1 {
            self.oversized_splits += 1;
        }
    }

    /// Calculate derived values
    pub(crate) fn finalize(&mut self, dropped_in_final_pass: usize) {
        self.dropped_in_final_pass = dropped_in_final_pass;
        self.average_relocation = if self.reindexed > 0 {
            self.relocation_total as f64 / self.reindexed as f64
        } else {
            0.0
        };
    }

    /// Number of edits that made it through
    pub fn accepted(&self) -> usize {
        self.total - self.skipped
    }
}

impl fmt::Display for AlignmentMetrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} edits: {} accepted, {} reindexed (avg {:.1}), {} skipped \
             ({} unlocatable, {} overlap, {} mismatch, {} superseded), {} split",
            self.total,
            self.accepted(),
            self.reindexed,
            self.average_relocation,
            self.skipped,
            self.skipped_unlocatable,
            self.skipped_overlap,
            self.skipped_mismatch,
            self.skipped_superseded,
            self.oversized_splits
        )
    }
}
