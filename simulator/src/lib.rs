//! Wheelhouse simulator.
//!
//! Runs strategies against the execution engine at scale: the batch driver fans sessions out
//! over a rayon pool, [`stats`] aggregates their results, and [`strategies`] provides the
//! reference progressions exposed by the `wheelhouse` binary.

pub mod config;
pub mod driver;
pub mod stats;
pub mod strategies;

#[cfg(test)]
mod batch_tests;

pub use config::{load_table_config, parse_bet_value, parse_spins};
pub use driver::{
    play_session, resolve_parallelism, run_batch, run_session, DriverError, RunRequest, RunResult,
    SessionResult,
};
pub use stats::{BatchStats, NetTotals};
pub use strategies::{Progression, ProgressionStrategy};
