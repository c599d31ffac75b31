//! Per-trial battle state machines.
//!
//! A battle runs to conclusion in strict phase order. Land battles open
//! with anti-air fire and bombardment, then loop combat rounds until one
//! force is eliminated or the rolls stop producing hits on an empty side.
//! Sea battles loop submarine and general fire, giving submarines a first
//! strike against destroyer-less opponents.

use serde::{Deserialize, Serialize};

use super::casualty::{remove_casualties, remove_sub_casualties, LossPriority, Side};
use super::rng::Rng;
use super::unit::{CombatUnit, Force};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Battlefield {
    Land,
    Sea,
}

/// Fixed for the life of one trial. The trial driver stamps a distinct
/// `seed` per trial; everything else is shared configuration, passed by
/// value so no trial ever reads mutable shared state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattleConfig {
    pub battlefield: Battlefield,
    /// Attacking marines roll one pip lower.
    pub amphibious_assault: bool,
    /// Keep the attacker's last land unit alive while anything else can
    /// die in its place.
    pub land_unit_must_survive: bool,
    pub loss_priority: LossPriority,
    pub seed: u64,
}

/// Final and casualty forces of one finished trial.
#[derive(Debug, Clone, PartialEq)]
pub struct BattleOutcome {
    pub attacker: Force,
    pub attacker_casualties: Force,
    pub defender: Force,
    pub defender_casualties: Force,
}

/// Runs one full battle on private copies of the initial forces.
pub fn resolve_battle(attacker: &Force, defender: &Force, config: &BattleConfig) -> BattleOutcome {
    let mut battle = Battle {
        attacker: attacker.clone(),
        attacker_casualties: Force::new(),
        defender: defender.clone(),
        defender_casualties: Force::new(),
        rng: Rng::new(config.seed),
        config: *config,
    };
    match config.battlefield {
        Battlefield::Land => battle.run_land(),
        Battlefield::Sea => battle.run_sea(),
    }
    BattleOutcome {
        attacker: battle.attacker,
        attacker_casualties: battle.attacker_casualties,
        defender: battle.defender,
        defender_casualties: battle.defender_casualties,
    }
}

fn artillery_support(force: &Force) -> u32 {
    force
        .iter()
        .filter(|unit| unit.is_artillery())
        .map(|unit| u32::from(unit.support_count()))
        .sum()
}

fn has_destroyer(force: &Force) -> bool {
    force.iter().any(CombatUnit::is_destroyer)
}

/// One attack roll. Artillery support and the amphibious marine adjustment
/// lower the roll before the compare; a roll pushed below 1 simply keeps
/// its value, it still has to come in at or under the attack value.
fn roll_attack(unit: &CombatUnit, rng: &mut Rng, support: &mut u32, amphibious: bool) -> bool {
    let mut roll = rng.d6();
    if unit.is_artillery_supportable() && *support > 0 {
        roll -= 1;
        *support -= 1;
    }
    if amphibious && unit.is_marine() {
        roll -= 1;
    }
    roll <= i32::from(unit.attack())
}

fn roll_defense(unit: &CombatUnit, rng: &mut Rng) -> bool {
    rng.d6() <= i32::from(unit.defense())
}

fn aa_salvo_hits(battery: &CombatUnit, rng: &mut Rng) -> bool {
    for _ in 0..battery.rolls() {
        if rng.d6() <= i32::from(battery.defense()) {
            return true;
        }
    }
    false
}

struct Battle {
    attacker: Force,
    attacker_casualties: Force,
    defender: Force,
    defender_casualties: Force,
    rng: Rng,
    config: BattleConfig,
}

impl Battle {
    fn run_land(&mut self) {
        self.anti_air_fire();
        self.bombardment();

        while !self.attacker.is_empty() && !self.defender.is_empty() {
            let mut support = artillery_support(&self.attacker);
            let amphibious = self.config.amphibious_assault;

            let mut attacker_hits = 0;
            for unit in &self.attacker {
                for _ in 0..unit.rolls() {
                    if roll_attack(unit, &mut self.rng, &mut support, amphibious) {
                        attacker_hits += 1;
                    }
                }
            }

            let mut defender_hits = 0;
            for unit in &self.defender {
                for _ in 0..unit.rolls() {
                    if roll_defense(unit, &mut self.rng) {
                        defender_hits += 1;
                    }
                }
            }

            remove_casualties(
                &mut self.attacker,
                &mut self.attacker_casualties,
                defender_hits,
                Side::Attacker,
                self.config.loss_priority,
                self.config.land_unit_must_survive,
            );
            remove_casualties(
                &mut self.defender,
                &mut self.defender_casualties,
                attacker_hits,
                Side::Defender,
                self.config.loss_priority,
                false,
            );
        }
    }

    /// Each defending anti-air battery gets one salvo per attacking air
    /// unit; a hit downs the unit immediately, bypassing casualty
    /// selection. Spent batteries leave the defending line without counting
    /// as casualties.
    fn anti_air_fire(&mut self) {
        let mut d = 0;
        while d < self.defender.len() {
            if !self.defender[d].is_anti_air() {
                d += 1;
                continue;
            }
            let battery = self.defender[d];
            let mut a = 0;
            while a < self.attacker.len() {
                if self.attacker[a].is_air() && aa_salvo_hits(&battery, &mut self.rng) {
                    let downed = self.attacker.remove(a);
                    self.attacker_casualties.push(downed);
                    continue;
                }
                a += 1;
            }
            self.defender.remove(d);
        }
    }

    /// Each bombarding ship fires one pre-battle salvo, inflicting one
    /// defender casualty per successful roll, then retires from the line
    /// regardless of the outcome.
    fn bombardment(&mut self) {
        let mut a = 0;
        while a < self.attacker.len() {
            if !self.attacker[a].can_bombard() {
                a += 1;
                continue;
            }
            let ship = self.attacker[a];
            for _ in 0..ship.rolls() {
                if self.rng.d6() <= i32::from(ship.bombardment_value()) {
                    remove_casualties(
                        &mut self.defender,
                        &mut self.defender_casualties,
                        1,
                        Side::Defender,
                        self.config.loss_priority,
                        false,
                    );
                }
            }
            self.attacker.remove(a);
        }
    }

    fn run_sea(&mut self) {
        let policy = self.config.loss_priority;
        while !self.attacker.is_empty() && !self.defender.is_empty() {
            // the support pool is shared between the sub and general phases
            let mut support = artillery_support(&self.attacker);

            let mut attacker_sub_hits = 0;
            for unit in &self.attacker {
                if !unit.is_submarine() {
                    continue;
                }
                for _ in 0..unit.rolls() {
                    if roll_attack(unit, &mut self.rng, &mut support, false) {
                        attacker_sub_hits += 1;
                    }
                }
            }

            let mut defender_sub_hits = 0;
            for unit in &self.defender {
                if !unit.is_submarine() {
                    continue;
                }
                for _ in 0..unit.rolls() {
                    if roll_defense(unit, &mut self.rng) {
                        defender_sub_hits += 1;
                    }
                }
            }

            // subs strike first against a side with no destroyer screen
            if !has_destroyer(&self.attacker) {
                remove_sub_casualties(
                    &mut self.attacker,
                    &mut self.attacker_casualties,
                    defender_sub_hits,
                    Side::Attacker,
                    policy,
                );
                defender_sub_hits = 0;
            }
            if !has_destroyer(&self.defender) {
                remove_sub_casualties(
                    &mut self.defender,
                    &mut self.defender_casualties,
                    attacker_sub_hits,
                    Side::Defender,
                    policy,
                );
                attacker_sub_hits = 0;
            }

            let mut attacker_hits = 0;
            for unit in &self.attacker {
                if unit.is_submarine() {
                    continue;
                }
                for _ in 0..unit.rolls() {
                    if roll_attack(unit, &mut self.rng, &mut support, false) {
                        attacker_hits += 1;
                    }
                }
            }

            let mut defender_hits = 0;
            for unit in &self.defender {
                if unit.is_submarine() {
                    continue;
                }
                for _ in 0..unit.rolls() {
                    if roll_defense(unit, &mut self.rng) {
                        defender_hits += 1;
                    }
                }
            }

            remove_sub_casualties(
                &mut self.attacker,
                &mut self.attacker_casualties,
                defender_sub_hits,
                Side::Attacker,
                policy,
            );
            remove_casualties(
                &mut self.attacker,
                &mut self.attacker_casualties,
                defender_hits,
                Side::Attacker,
                policy,
                false,
            );
            remove_sub_casualties(
                &mut self.defender,
                &mut self.defender_casualties,
                attacker_sub_hits,
                Side::Defender,
                policy,
            );
            remove_casualties(
                &mut self.defender,
                &mut self.defender_casualties,
                attacker_hits,
                Side::Defender,
                policy,
                false,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::unit::UnitDescriptor;

    fn unit(descriptor: UnitDescriptor) -> CombatUnit {
        CombatUnit::from_descriptor(&descriptor, 1).unwrap()
    }

    fn land_config(seed: u64) -> BattleConfig {
        BattleConfig {
            battlefield: Battlefield::Land,
            amphibious_assault: false,
            land_unit_must_survive: false,
            loss_priority: LossPriority::Cost,
            seed,
        }
    }

    #[test]
    fn empty_attacker_ends_the_battle_before_any_round() {
        let defender = vec![unit(UnitDescriptor {
            id: 1,
            name: "Infantry".to_string(),
            attack: 1,
            defense: 2,
            cost: 3.0,
            ..UnitDescriptor::default()
        })];
        let outcome = resolve_battle(&Force::new(), &defender, &land_config(1));
        assert!(outcome.attacker.is_empty());
        assert_eq!(outcome.defender.len(), 1);
        assert!(outcome.attacker_casualties.is_empty());
        assert!(outcome.defender_casualties.is_empty());
    }

    #[test]
    fn support_capacity_sums_artillery_support_counts() {
        let gun = unit(UnitDescriptor {
            id: 2,
            name: "Artillery".to_string(),
            attack: 2,
            defense: 2,
            cost: 4.0,
            artillery: true,
            ..UnitDescriptor::default()
        });
        let wide_gun = unit(UnitDescriptor {
            id: 3,
            name: "Heavy Artillery".to_string(),
            attack: 2,
            defense: 2,
            cost: 6.0,
            artillery: true,
            support_count: 2,
            ..UnitDescriptor::default()
        });
        let force = vec![gun, wide_gun, gun];
        assert_eq!(artillery_support(&force), 4);
    }

    #[test]
    fn supported_roll_hits_when_the_adjustment_brings_it_under() {
        // attack 0 never hits unadjusted; with support a natural 1 becomes 0
        let supported = unit(UnitDescriptor {
            id: 4,
            name: "Militia".to_string(),
            attack: 0,
            defense: 1,
            cost: 2.0,
            artillery_supportable: true,
            ..UnitDescriptor::default()
        });
        let mut rng = Rng::new(9);
        let mut hits = 0;
        let mut rolls = 0;
        for _ in 0..6000 {
            let mut support = 1;
            if roll_attack(&supported, &mut rng, &mut support, false) {
                hits += 1;
            }
            rolls += 1;
        }
        let rate = f64::from(hits) / f64::from(rolls);
        assert!((rate - 1.0 / 6.0).abs() < 0.02, "hit rate {rate}");

        // without support the zero-attack unit can never hit
        for _ in 0..100 {
            let mut no_support = 0;
            assert!(!roll_attack(&supported, &mut rng, &mut no_support, false));
        }
    }
}
