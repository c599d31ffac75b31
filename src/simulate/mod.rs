pub mod aggregate;
pub mod monte_carlo;

pub use aggregate::{aggregate, AggregateResult};
pub use monte_carlo::{run_trials, run_trials_parallel, DEFAULT_TRIAL_COUNT};
