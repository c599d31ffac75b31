//! Reduces a trial-outcome population to summary statistics.

use serde::Serialize;

use crate::combat::{BattleOutcome, Force};

/// Win/draw/loss fractions and average losses over a full trial
/// population. The only data the presentation layer needs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AggregateResult {
    pub attacker_win_rate: f64,
    pub defender_win_rate: f64,
    pub draw_rate: f64,
    pub avg_attacker_units: f64,
    pub avg_attacker_cost_loss: f64,
    pub avg_defender_units: f64,
    pub avg_defender_cost_loss: f64,
}

fn summed_cost(force: &Force) -> u64 {
    force.iter().map(|unit| u64::from(unit.cost())).sum()
}

/// Classifies every outcome (attacker win, defender win, draw including
/// mutual annihilation) and averages survivor counts and cost losses.
/// `cost_scale` is the factor the compact units were built with; dividing
/// by it recovers the fractional cost values.
pub fn aggregate(outcomes: &[BattleOutcome], cost_scale: u32) -> AggregateResult {
    let mut attacker_wins = 0usize;
    let mut defender_wins = 0usize;
    let mut draws = 0usize;
    let mut attacker_units = 0usize;
    let mut defender_units = 0usize;
    let mut attacker_cost = 0u64;
    let mut defender_cost = 0u64;

    for outcome in outcomes {
        attacker_units += outcome.attacker.len();
        defender_units += outcome.defender.len();
        attacker_cost += summed_cost(&outcome.attacker_casualties);
        defender_cost += summed_cost(&outcome.defender_casualties);

        match (outcome.attacker.is_empty(), outcome.defender.is_empty()) {
            (true, false) => defender_wins += 1,
            (false, true) => attacker_wins += 1,
            _ => draws += 1,
        }
    }

    // the trial driver contract rules out an empty population; guard anyway
    // instead of handing back NaN
    if outcomes.is_empty() {
        return AggregateResult {
            attacker_win_rate: 0.0,
            defender_win_rate: 0.0,
            draw_rate: 0.0,
            avg_attacker_units: 0.0,
            avg_attacker_cost_loss: 0.0,
            avg_defender_units: 0.0,
            avg_defender_cost_loss: 0.0,
        };
    }

    let trials = outcomes.len() as f64;
    let scale = f64::from(cost_scale);
    AggregateResult {
        attacker_win_rate: attacker_wins as f64 / trials,
        defender_win_rate: defender_wins as f64 / trials,
        draw_rate: draws as f64 / trials,
        avg_attacker_units: attacker_units as f64 / trials,
        avg_attacker_cost_loss: attacker_cost as f64 / scale / trials,
        avg_defender_units: defender_units as f64 / trials,
        avg_defender_cost_loss: defender_cost as f64 / scale / trials,
    }
}
