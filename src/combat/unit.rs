//! Unit definitions and the compact per-trial representation.
//!
//! A [UnitDescriptor] is the full-fidelity definition handed in by an
//! external loader. Each trial works on [CombatUnit] values instead: small,
//! `Copy`, derived once per requested instance and replicated into every
//! parallel trial.

use std::fmt;

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

/// Highest unit-type id the compact representation supports.
pub const MAX_UNIT_ID: u8 = 63;
/// Highest per-unit roll count the compact representation supports.
pub const MAX_ROLLS: u8 = 3;

fn default_rolls() -> u8 {
    1
}

fn default_support_count() -> u8 {
    1
}

/// Full definition of a unit type, as produced by the excluded loader.
///
/// Sparse documents deserialize cleanly: every capability flag defaults to
/// off, `rolls` to 1 and `support_count` to 1, matching the loader's
/// convention of only listing the attributes a unit actually has.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitDescriptor {
    pub id: u8,
    pub name: String,
    #[serde(default)]
    pub attack: u8,
    #[serde(default)]
    pub defense: u8,
    #[serde(default)]
    pub cost: f32,
    /// May attack even with an attack value of zero.
    #[serde(default)]
    pub can_attack: bool,
    #[serde(default)]
    pub anti_air: bool,
    #[serde(default)]
    pub artillery: bool,
    #[serde(default)]
    pub artillery_supportable: bool,
    #[serde(default)]
    pub air: bool,
    #[serde(default)]
    pub sea: bool,
    #[serde(default)]
    pub can_bombard: bool,
    /// Distinct bombardment value; falls back to `attack` when absent.
    #[serde(default)]
    pub bombardment: Option<u8>,
    #[serde(default)]
    pub two_hit: bool,
    #[serde(default)]
    pub destroyer: bool,
    #[serde(default)]
    pub submarine: bool,
    #[serde(default)]
    pub marine: bool,
    #[serde(default = "default_rolls")]
    pub rolls: u8,
    /// How many supportable units one artillery piece of this type improves.
    #[serde(default = "default_support_count")]
    pub support_count: u8,
}

impl Default for UnitDescriptor {
    fn default() -> Self {
        Self {
            id: 0,
            name: String::new(),
            attack: 0,
            defense: 0,
            cost: 0.0,
            can_attack: false,
            anti_air: false,
            artillery: false,
            artillery_supportable: false,
            air: false,
            sea: false,
            can_bombard: false,
            bombardment: None,
            two_hit: false,
            destroyer: false,
            submarine: false,
            marine: false,
            rolls: 1,
            support_count: 1,
        }
    }
}

impl UnitDescriptor {
    pub fn is_land(&self) -> bool {
        !self.air && !self.sea
    }

    pub fn bombardment_value(&self) -> u8 {
        self.bombardment.unwrap_or(self.attack)
    }
}

/// Fatal configuration errors raised when a descriptor does not fit the
/// compact representation. There is no degraded mode; the caller must
/// reject the descriptor before any trial runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnitError {
    IdOutOfRange { id: u8 },
    RollsOutOfRange { id: u8, rolls: u8 },
}

impl fmt::Display for UnitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IdOutOfRange { id } => {
                write!(f, "unit id {id} exceeds the supported maximum of {MAX_UNIT_ID}")
            }
            Self::RollsOutOfRange { id, rolls } => {
                write!(
                    f,
                    "unit {id} has {rolls} rolls; between 1 and {MAX_ROLLS} are supported"
                )
            }
        }
    }
}

bitflags! {
    /// Capability bitset of a [CombatUnit].
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct UnitFlags: u16 {
        const ARTILLERY             = 1 << 0;
        const ARTILLERY_SUPPORTABLE = 1 << 1;
        const TWO_HIT               = 1 << 2;
        const AIR                   = 1 << 3;
        const SEA                   = 1 << 4;
        const CAN_BOMBARD           = 1 << 5;
        const DESTROYER             = 1 << 6;
        const SUBMARINE             = 1 << 7;
        const ANTI_AIR              = 1 << 8;
        const MARINE                = 1 << 9;
    }
}

/// One unit instance inside a trial. Copied by value into every parallel
/// trial; the only mutable state is the `damaged` marker of two-hit units.
///
/// Equality is by unit-type id alone, so replicated instances of the same
/// type are interchangeable.
#[derive(Debug, Clone, Copy)]
pub struct CombatUnit {
    id: u8,
    rolls: u8,
    attack: u8,
    defense: u8,
    cost: u16,
    bombardment: u8,
    support_count: u8,
    flags: UnitFlags,
    damaged: bool,
}

impl PartialEq for CombatUnit {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for CombatUnit {}

impl CombatUnit {
    /// Derives the compact representation. `cost_scale` turns fractional
    /// costs into integers; see [cost_scale_for].
    pub fn from_descriptor(descriptor: &UnitDescriptor, cost_scale: u32) -> Result<Self, UnitError> {
        if descriptor.id > MAX_UNIT_ID {
            return Err(UnitError::IdOutOfRange { id: descriptor.id });
        }
        if descriptor.rolls == 0 || descriptor.rolls > MAX_ROLLS {
            return Err(UnitError::RollsOutOfRange {
                id: descriptor.id,
                rolls: descriptor.rolls,
            });
        }

        let mut flags = UnitFlags::empty();
        flags.set(UnitFlags::ARTILLERY, descriptor.artillery);
        flags.set(UnitFlags::ARTILLERY_SUPPORTABLE, descriptor.artillery_supportable);
        flags.set(UnitFlags::TWO_HIT, descriptor.two_hit);
        flags.set(UnitFlags::AIR, descriptor.air);
        flags.set(UnitFlags::SEA, descriptor.sea);
        flags.set(UnitFlags::CAN_BOMBARD, descriptor.can_bombard);
        flags.set(UnitFlags::DESTROYER, descriptor.destroyer);
        flags.set(UnitFlags::SUBMARINE, descriptor.submarine);
        flags.set(UnitFlags::ANTI_AIR, descriptor.anti_air);
        flags.set(UnitFlags::MARINE, descriptor.marine);

        Ok(Self {
            id: descriptor.id,
            rolls: descriptor.rolls,
            attack: descriptor.attack,
            defense: descriptor.defense,
            cost: (descriptor.cost * cost_scale as f32).round() as u16,
            bombardment: descriptor.bombardment_value(),
            support_count: descriptor.support_count,
            flags,
            damaged: false,
        })
    }

    pub fn id(&self) -> u8 {
        self.id
    }

    pub fn rolls(&self) -> u8 {
        self.rolls
    }

    pub fn attack(&self) -> u8 {
        self.attack
    }

    pub fn defense(&self) -> u8 {
        self.defense
    }

    /// Cost scaled by the factor passed to [CombatUnit::from_descriptor].
    pub fn cost(&self) -> u16 {
        self.cost
    }

    pub fn bombardment_value(&self) -> u8 {
        self.bombardment
    }

    pub fn support_count(&self) -> u8 {
        self.support_count
    }

    pub fn is_artillery(&self) -> bool {
        self.flags.contains(UnitFlags::ARTILLERY)
    }

    pub fn is_artillery_supportable(&self) -> bool {
        self.flags.contains(UnitFlags::ARTILLERY_SUPPORTABLE)
    }

    pub fn is_two_hit(&self) -> bool {
        self.flags.contains(UnitFlags::TWO_HIT)
    }

    pub fn is_air(&self) -> bool {
        self.flags.contains(UnitFlags::AIR)
    }

    pub fn is_sea(&self) -> bool {
        self.flags.contains(UnitFlags::SEA)
    }

    pub fn is_land(&self) -> bool {
        !self.flags.intersects(UnitFlags::AIR | UnitFlags::SEA)
    }

    pub fn can_bombard(&self) -> bool {
        self.flags.contains(UnitFlags::CAN_BOMBARD)
    }

    pub fn is_destroyer(&self) -> bool {
        self.flags.contains(UnitFlags::DESTROYER)
    }

    pub fn is_submarine(&self) -> bool {
        self.flags.contains(UnitFlags::SUBMARINE)
    }

    pub fn is_anti_air(&self) -> bool {
        self.flags.contains(UnitFlags::ANTI_AIR)
    }

    pub fn is_marine(&self) -> bool {
        self.flags.contains(UnitFlags::MARINE)
    }

    /// Whether a two-hit unit has already absorbed a hit this trial.
    pub fn is_damaged(&self) -> bool {
        self.damaged
    }

    pub fn mark_damaged(&mut self) {
        self.damaged = true;
    }
}

/// One side's remaining strength during a trial. Order is only meaningful
/// right after casualty selection sorted it.
pub type Force = Vec<CombatUnit>;

/// Scale factor that turns every descriptor cost into an integer.
/// Returns 2 when any cost carries a fractional part (half-cost
/// granularity), otherwise 1.
pub fn cost_scale_for(descriptors: &[UnitDescriptor]) -> u32 {
    if descriptors.iter().any(|d| d.cost.fract() != 0.0) {
        2
    } else {
        1
    }
}

/// Materializes an initial force from a per-type count map.
pub fn muster_force(
    requests: &[(&UnitDescriptor, usize)],
    cost_scale: u32,
) -> Result<Force, UnitError> {
    let total: usize = requests.iter().map(|(_, count)| count).sum();
    let mut force = Force::with_capacity(total);
    for (descriptor, count) in requests {
        let unit = CombatUnit::from_descriptor(descriptor, cost_scale)?;
        force.extend(std::iter::repeat(unit).take(*count));
    }
    Ok(force)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn infantry() -> UnitDescriptor {
        UnitDescriptor {
            id: 1,
            name: "Infantry".to_string(),
            attack: 1,
            defense: 2,
            cost: 3.0,
            ..UnitDescriptor::default()
        }
    }

    #[test]
    fn descriptor_flags_carry_into_compact_unit() {
        let descriptor = UnitDescriptor {
            id: 9,
            name: "Battleship".to_string(),
            attack: 4,
            defense: 4,
            cost: 20.0,
            sea: true,
            two_hit: true,
            can_bombard: true,
            bombardment: Some(4),
            ..UnitDescriptor::default()
        };
        let unit = CombatUnit::from_descriptor(&descriptor, 1).unwrap();
        assert!(unit.is_sea());
        assert!(unit.is_two_hit());
        assert!(unit.can_bombard());
        assert!(!unit.is_land());
        assert!(!unit.is_damaged());
        assert_eq!(unit.bombardment_value(), 4);
        assert_eq!(unit.cost(), 20);
    }

    #[test]
    fn id_above_limit_is_a_fatal_configuration_error() {
        let descriptor = UnitDescriptor {
            id: 64,
            ..infantry()
        };
        assert_eq!(
            CombatUnit::from_descriptor(&descriptor, 1),
            Err(UnitError::IdOutOfRange { id: 64 })
        );
    }

    #[test]
    fn roll_count_outside_one_to_three_is_rejected() {
        let zero = UnitDescriptor {
            rolls: 0,
            ..infantry()
        };
        let four = UnitDescriptor {
            rolls: 4,
            ..infantry()
        };
        assert_eq!(
            CombatUnit::from_descriptor(&zero, 1),
            Err(UnitError::RollsOutOfRange { id: 1, rolls: 0 })
        );
        assert_eq!(
            CombatUnit::from_descriptor(&four, 1),
            Err(UnitError::RollsOutOfRange { id: 1, rolls: 4 })
        );
    }

    #[test]
    fn equality_is_by_unit_type_id_alone() {
        let a = CombatUnit::from_descriptor(&infantry(), 1).unwrap();
        let mut b = CombatUnit::from_descriptor(&infantry(), 2).unwrap();
        b.mark_damaged();
        assert_eq!(a, b);

        let other = CombatUnit::from_descriptor(
            &UnitDescriptor {
                id: 2,
                ..infantry()
            },
            1,
        )
        .unwrap();
        assert_ne!(a, other);
    }

    #[test]
    fn fractional_costs_scale_to_integers() {
        let transport = UnitDescriptor {
            id: 3,
            name: "Transport".to_string(),
            cost: 3.5,
            sea: true,
            ..UnitDescriptor::default()
        };
        let roster = vec![infantry(), transport.clone()];
        let scale = cost_scale_for(&roster);
        assert_eq!(scale, 2);

        let unit = CombatUnit::from_descriptor(&transport, scale).unwrap();
        assert_eq!(unit.cost(), 7);

        let whole = vec![infantry()];
        assert_eq!(cost_scale_for(&whole), 1);
    }

    #[test]
    fn muster_replicates_requested_counts() {
        let inf = infantry();
        let tank = UnitDescriptor {
            id: 2,
            name: "Tank".to_string(),
            attack: 3,
            defense: 3,
            cost: 5.0,
            ..UnitDescriptor::default()
        };
        let force = muster_force(&[(&inf, 3), (&tank, 2)], 1).unwrap();
        assert_eq!(force.len(), 5);
        assert_eq!(force.iter().filter(|u| u.id() == 1).count(), 3);
        assert_eq!(force.iter().filter(|u| u.id() == 2).count(), 2);
    }

    #[test]
    fn muster_rejects_invalid_descriptors() {
        let bad = UnitDescriptor {
            id: 77,
            ..infantry()
        };
        assert!(muster_force(&[(&bad, 1)], 1).is_err());
    }
}
