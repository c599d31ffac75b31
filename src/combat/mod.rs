pub mod casualty;
pub mod resolver;
pub mod rng;
pub mod unit;

pub use casualty::{remove_casualties, remove_sub_casualties, LossPriority, Side};
pub use resolver::{resolve_battle, BattleConfig, BattleOutcome, Battlefield};
pub use rng::{clock_seed, Rng};
pub use unit::{
    cost_scale_for, muster_force, CombatUnit, Force, UnitDescriptor, UnitError, UnitFlags,
    MAX_ROLLS, MAX_UNIT_ID,
};
