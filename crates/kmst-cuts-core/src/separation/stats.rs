use crate::separation::Family;

/// Counters accumulated over the lifetime of a separator.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SeparationStats {
    pub rounds: usize,
    /// Rounds the cut policy did not admit.
    pub skipped_rounds: usize,
    /// Rounds that ended in an error.
    pub aborted_rounds: usize,
    pub candidates_scanned: usize,
    pub oracle_calls: usize,
    pub cycle_elimination_cuts: usize,
    pub connection_cuts: usize,
}

impl SeparationStats {
    pub fn total_cuts(&self) -> usize {
        self.cycle_elimination_cuts + self.connection_cuts
    }

    pub(crate) fn record(&mut self, family: Family, count: usize) {
        match family {
            Family::CycleElimination => self.cycle_elimination_cuts += count,
            Family::Connection => self.connection_cuts += count,
        }
    }
}
