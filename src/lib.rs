//! Monte Carlo resolver for turn-based wargame combat.
//!
//! The crate resolves a battle between an attacking and a defending force by
//! running a large number of independent randomized trials and reducing the
//! outcome population to win/draw/loss probabilities and average losses.
//!
//! Unit definitions arrive from an external loader as
//! [combat::UnitDescriptor] values; presentation, persistence and content
//! distribution are likewise the caller's concern. The crate owns everything
//! in between: the compact per-trial unit representation, casualty selection,
//! the land and sea battle state machines, the parallel trial driver and the
//! result aggregator.

pub mod combat;
pub mod parallel;
pub mod simulate;
