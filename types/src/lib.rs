//! Shared types for the wheelhouse roulette simulator.
//!
//! Everything here is plain data: table configuration, wheel pockets, spin history records,
//! the raw bet instructions strategies emit, and the reasons a session can end. Behavior lives
//! in `wheelhouse-execution`.

pub mod roulette;

pub use roulette::{
    ensure_nonzero, ensure_positive, BetInstruction, BetKind, BetLimits, BetValue, Color,
    ConfigError, IncrementMode, Pocket, SessionLimits, SpinRecord, TableConfig, TerminationReason,
    UnknownBetKind, WheelType,
};
