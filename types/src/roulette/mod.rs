//! Roulette domain types.
//!
//! Defines the table configuration, wheel pockets, spin records, bet instructions and
//! termination reasons shared by the execution engine and the simulator.

mod bet;
mod constants;
mod pocket;
mod session;
mod table;

pub use bet::*;
pub use constants::*;
pub use pocket::*;
pub use session::*;
pub use table::{BetLimits, ConfigError, IncrementMode, TableConfig, WheelType};

pub use table::{ensure_nonzero, ensure_positive};
