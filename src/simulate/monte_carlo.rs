//! Trial driver: scatters N independent battle trials and joins on all of
//! them before handing the outcome population back.
//!
//! Trials share no mutable state. Each one gets a private copy of the
//! initial forces and a configuration whose seed is derived as
//! `base_seed + trial_index`, so an entire run is reproducible from the
//! base seed alone.

use rayon::prelude::*;

use crate::combat::{resolve_battle, BattleConfig, BattleOutcome, Force};

/// Trial count of the reference behavior.
pub const DEFAULT_TRIAL_COUNT: usize = 30_000;

/// Runs `trials` battles sequentially. Outcome `i` used seed
/// `base_seed + i`.
pub fn run_trials(
    attacker: &Force,
    defender: &Force,
    config: &BattleConfig,
    trials: usize,
    base_seed: u64,
) -> Vec<BattleOutcome> {
    run_trials_with_parallelism(attacker, defender, config, trials, base_seed, false)
}

/// Like [run_trials] but distributes trials across all CPU cores via
/// Rayon. Outcome order matches trial order either way, and a panicking
/// trial fails the whole invocation rather than biasing the population.
pub fn run_trials_parallel(
    attacker: &Force,
    defender: &Force,
    config: &BattleConfig,
    trials: usize,
    base_seed: u64,
) -> Vec<BattleOutcome> {
    run_trials_with_parallelism(attacker, defender, config, trials, base_seed, true)
}

fn run_trials_with_parallelism(
    attacker: &Force,
    defender: &Force,
    config: &BattleConfig,
    trials: usize,
    base_seed: u64,
    parallel: bool,
) -> Vec<BattleOutcome> {
    let run_one = |trial: usize| {
        let trial_config = BattleConfig {
            seed: base_seed.wrapping_add(trial as u64),
            ..*config
        };
        resolve_battle(attacker, defender, &trial_config)
    };

    if parallel {
        (0..trials).into_par_iter().map(run_one).collect()
    } else {
        (0..trials).map(run_one).collect()
    }
}
