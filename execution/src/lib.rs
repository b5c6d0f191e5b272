//! Wheelhouse execution engine.
//!
//! This crate contains everything that happens inside a single roulette session: drawing spins,
//! resolving bets against the catalog, running a strategy and keeping the bankroll ledger.
//!
//! ## Determinism requirements
//! - Do not use wall-clock time inside a session; time budgets belong to the driver.
//! - Only draw randomness through a [`Wheel`]. Seeded wheels make a session fully reproducible.
//! - Avoid iteration order of hash-based collections influencing outputs (merged bets keep
//!   first-seen order).
//!
//! The primary entrypoint is [`Session::play_round`].
//!
//! ## Minimal session (example)
//! ```rust
//! use wheelhouse_execution::{RngWheel, Session};
//! use wheelhouse_execution::{Decision, FnStrategy, StrategyContext, StrategyState};
//! use wheelhouse_types::{BetInstruction, SessionLimits, TableConfig};
//!
//! let config = TableConfig::default();
//! let strategy = FnStrategy::new("flat red", |_: &StrategyContext<'_>, _: &mut StrategyState| {
//!     Ok(Decision::Bets(vec![BetInstruction::red(5.0)]))
//! });
//! let mut wheel = RngWheel::seeded(config.wheel_type, 7, 0);
//! let mut session = Session::new(config, 100.0, SessionLimits::default()).unwrap();
//! while !session.is_terminated() && session.ledger().rounds() < 50 {
//!     session.play_round(&strategy, &mut wheel);
//! }
//! assert!(session.bankroll() >= 0.0);
//! ```

pub mod catalog;
pub mod ledger;
pub mod logging;
pub mod runner;
pub mod session;
pub mod wheel;

#[cfg(any(test, feature = "mocks"))]
pub mod mocks;

mod state;
mod strategy;


pub use catalog::{catalog, house_edge, Bet, CatalogEntry, ContractViolation, PlacedBet};
pub use ledger::Ledger;
pub use runner::{prepare_bets, Proposal};
pub use session::{Rejection, RoundOutcome, RoundReport, Session};
pub use state::StrategyState;
pub use strategy::{Decision, FnStrategy, Strategy, StrategyContext};
pub use wheel::{ReplayWheel, RngWheel, Wheel, WheelError};
