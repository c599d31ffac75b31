//! Batch helpers for distributing trials.
//!
//! The trial driver parallelizes per trial; these helpers serve callers
//! that want coarser chunks, e.g. to report progress between batches.

use crate::combat::{BattleConfig, BattleOutcome, Force};
use crate::parallel::pool::WorkerPool;

/// Splits `total` items into at most `num_batches` ranges `[start, end)`,
/// as evenly as possible with the remainder spread over the leading
/// batches.
pub fn batch_ranges(total: usize, num_batches: usize) -> Vec<(usize, usize)> {
    if total == 0 || num_batches == 0 {
        return Vec::new();
    }
    let batches = num_batches.min(total);
    let mut ranges = Vec::with_capacity(batches);
    let mut start = 0;
    for i in 0..batches {
        let end = start + total / batches + usize::from(i < total % batches);
        ranges.push((start, end));
        start = end;
    }
    ranges
}

/// Runs the parallel trial driver under an explicit worker budget.
pub fn run_simulation_batches(
    attacker: &Force,
    defender: &Force,
    config: &BattleConfig,
    trials: usize,
    base_seed: u64,
    pool: &WorkerPool,
) -> Vec<BattleOutcome> {
    pool.install(|| {
        crate::simulate::run_trials_parallel(attacker, defender, config, trials, base_seed)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ranges_cover_the_total_without_gaps() {
        let ranges = batch_ranges(10, 3);
        assert_eq!(ranges, vec![(0, 4), (4, 7), (7, 10)]);
        let covered: usize = ranges.iter().map(|(s, e)| e - s).sum();
        assert_eq!(covered, 10);
    }

    #[test]
    fn never_produces_more_batches_than_items() {
        let ranges = batch_ranges(2, 8);
        assert_eq!(ranges, vec![(0, 1), (1, 2)]);
    }

    #[test]
    fn degenerate_inputs_produce_no_batches() {
        assert!(batch_ranges(0, 4).is_empty());
        assert!(batch_ranges(4, 0).is_empty());
    }
}
