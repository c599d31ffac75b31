//! Casualty selection.
//!
//! When a side takes hits, the force is ordered by a loss-priority policy
//! and units are removed from the front. Two-hit units complicate the
//! picture: an undamaged one absorbs a hit without dying (and then falls to
//! the back of the order), so the order is re-established after each mark
//! but not after a plain removal.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use super::unit::{CombatUnit, Force};

/// Total order used to pick which units die first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LossPriority {
    /// Cheapest units first, combat value as tie-break.
    Cost,
    /// Lowest relevant combat value first, cost as tie-break.
    CombatValue,
}

/// Which side's priority rules apply. The sides differ only in which combat
/// value breaks ties: attack for the attacker, defense for the defender.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Attacker,
    Defender,
}

impl Side {
    fn combat_value(self, unit: &CombatUnit) -> u8 {
        match self {
            Self::Attacker => unit.attack(),
            Self::Defender => unit.defense(),
        }
    }
}

/// Coarse ordering ahead of the policy compare: undamaged two-hit units
/// soak a free hit and go first, multi-roll units are cheap firepower to
/// shed next, and two-hit units that already took their free hit are kept
/// alive longest.
fn absorb_rank(unit: &CombatUnit) -> u8 {
    if unit.is_two_hit() {
        if unit.is_damaged() {
            3
        } else {
            0
        }
    } else if unit.rolls() > 1 {
        1
    } else {
        2
    }
}

pub(crate) fn casualty_order(
    a: &CombatUnit,
    b: &CombatUnit,
    side: Side,
    policy: LossPriority,
) -> Ordering {
    absorb_rank(a)
        .cmp(&absorb_rank(b))
        .then_with(|| match policy {
            LossPriority::Cost => a
                .cost()
                .cmp(&b.cost())
                .then_with(|| side.combat_value(a).cmp(&side.combat_value(b))),
            LossPriority::CombatValue => side
                .combat_value(a)
                .cmp(&side.combat_value(b))
                .then_with(|| a.cost().cmp(&b.cost())),
        })
}

fn exactly_one_land_unit(force: &Force) -> bool {
    let mut count = 0;
    for unit in force {
        if unit.is_land() {
            count += 1;
            if count > 1 {
                return false;
            }
        }
    }
    count == 1
}

/// Removes `min(count, force.len())` units from `force`, appending each to
/// `casualties` in removal order.
///
/// With `land_unit_must_survive` set, the last remaining land unit is
/// skipped as long as any other unit can die in its place. An undamaged
/// two-hit unit at the selection index is marked damaged instead of
/// removed; that consumes one casualty and re-sorts the force, so the
/// marked unit is only picked again once everything else is gone.
pub fn remove_casualties(
    force: &mut Force,
    casualties: &mut Force,
    count: usize,
    side: Side,
    policy: LossPriority,
    land_unit_must_survive: bool,
) {
    let mut remaining = count;
    let mut needs_sort = true;
    while remaining > 0 && !force.is_empty() {
        if needs_sort {
            force.sort_by(|a, b| casualty_order(a, b, side, policy));
            needs_sort = false;
        }

        let index = if land_unit_must_survive
            && force.len() > 1
            && force[0].is_land()
            && exactly_one_land_unit(force)
        {
            1
        } else {
            0
        };

        if force[index].is_two_hit() && !force[index].is_damaged() {
            force[index].mark_damaged();
            remaining -= 1;
            // the damaged unit now sorts to the back
            needs_sort = true;
            continue;
        }

        casualties.push(force.remove(index));
        remaining -= 1;
    }
}

/// Submarine-exchange variant: only sea units may be taken. Scans for the
/// first qualifying unit under the same order; hits against a force with no
/// sea units left are discarded.
pub fn remove_sub_casualties(
    force: &mut Force,
    casualties: &mut Force,
    count: usize,
    side: Side,
    policy: LossPriority,
) {
    let mut remaining = count;
    let mut needs_sort = true;
    'hits: while remaining > 0 && !force.is_empty() {
        if needs_sort {
            force.sort_by(|a, b| casualty_order(a, b, side, policy));
            needs_sort = false;
        }

        for index in 0..force.len() {
            if !force[index].is_sea() {
                continue;
            }
            if force[index].is_two_hit() && !force[index].is_damaged() {
                force[index].mark_damaged();
                remaining -= 1;
                needs_sort = true;
                continue 'hits;
            }
            casualties.push(force.remove(index));
            remaining -= 1;
            continue 'hits;
        }

        // no sea unit can absorb the remaining hits
        break;
    }
}
