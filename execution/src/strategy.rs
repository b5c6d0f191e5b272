//! Strategy plugin contract.
//!
//! A strategy is a decision procedure: each round it sees the spin history, the bankroll and the
//! table configuration, reads and writes its own [`StrategyState`], and answers with a
//! [`Decision`]. Strategies never touch the bankroll; they only propose bets.
//!
//! Return conventions:
//! - `Decision::Bets(vec![])` skips the round. The wheel still spins and history still advances.
//! - `Decision::Stop` ends the session. State written before returning it is kept.
//! - `Err(_)` (or a panic) is a strategy exception and ends the session.

use wheelhouse_types::{BetInstruction, SpinRecord, TableConfig};

use crate::StrategyState;

/// What a strategy wants to do this round.
#[derive(Clone, Debug, PartialEq)]
pub enum Decision {
    /// Place these bets. An empty list places nothing.
    Bets(Vec<BetInstruction>),
    /// End the session.
    Stop,
}

impl Decision {
    pub fn skip() -> Self {
        Self::Bets(Vec::new())
    }
}

impl From<Vec<BetInstruction>> for Decision {
    fn from(bets: Vec<BetInstruction>) -> Self {
        Self::Bets(bets)
    }
}

impl From<Option<Vec<BetInstruction>>> for Decision {
    fn from(bets: Option<Vec<BetInstruction>>) -> Self {
        bets.map_or(Self::Stop, Self::Bets)
    }
}

/// Read-only view of the session handed to a strategy each round.
#[derive(Clone, Copy, Debug)]
pub struct StrategyContext<'a> {
    pub(crate) history: &'a [SpinRecord],
    pub(crate) bankroll: f64,
    pub(crate) starting_bankroll: f64,
    pub(crate) peak_bankroll: f64,
    pub(crate) config: &'a TableConfig,
    pub(crate) round: u64,
}

impl<'a> StrategyContext<'a> {
    /// Context for a session that started at `bankroll` and has seen `history`.
    pub fn new(history: &'a [SpinRecord], bankroll: f64, config: &'a TableConfig) -> Self {
        Self {
            history,
            bankroll,
            starting_bankroll: bankroll,
            peak_bankroll: bankroll,
            config,
            round: history.len() as u64,
        }
    }

    /// Spins so far, oldest first.
    pub fn history(&self) -> &'a [SpinRecord] {
        self.history
    }

    pub fn last_spin(&self) -> Option<&'a SpinRecord> {
        self.history.last()
    }

    pub fn bankroll(&self) -> f64 {
        self.bankroll
    }

    pub fn starting_bankroll(&self) -> f64 {
        self.starting_bankroll
    }

    /// Highest bankroll seen so far this session.
    pub fn session_high(&self) -> f64 {
        self.peak_bankroll
    }

    pub fn config(&self) -> &'a TableConfig {
        self.config
    }

    /// Zero-based index of the round being decided.
    pub fn round(&self) -> u64 {
        self.round
    }

    /// Progression step for `base_unit` under the table's increment mode.
    pub fn increment_step(&self, base_unit: f64) -> f64 {
        self.config.increment_step(base_unit)
    }
}

/// A betting strategy. Implementations must be shareable across batch worker threads; all
/// per-session data belongs in the [`StrategyState`] passed to [`Strategy::decide`].
pub trait Strategy: Send + Sync {
    fn name(&self) -> &str;

    fn decide(
        &self,
        ctx: &StrategyContext<'_>,
        state: &mut StrategyState,
    ) -> anyhow::Result<Decision>;
}

/// Adapts a closure into a [`Strategy`].
pub struct FnStrategy<F> {
    name: String,
    decide: F,
}

impl<F> FnStrategy<F>
where
    F: Fn(&StrategyContext<'_>, &mut StrategyState) -> anyhow::Result<Decision> + Send + Sync,
{
    pub fn new(name: impl Into<String>, decide: F) -> Self {
        Self {
            name: name.into(),
            decide,
        }
    }
}

impl<F> Strategy for FnStrategy<F>
where
    F: Fn(&StrategyContext<'_>, &mut StrategyState) -> anyhow::Result<Decision> + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn decide(
        &self,
        ctx: &StrategyContext<'_>,
        state: &mut StrategyState,
    ) -> anyhow::Result<Decision> {
        (self.decide)(ctx, state)
    }
}

impl<S: Strategy + ?Sized> Strategy for &S {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn decide(
        &self,
        ctx: &StrategyContext<'_>,
        state: &mut StrategyState,
    ) -> anyhow::Result<Decision> {
        (**self).decide(ctx, state)
    }
}

impl<S: Strategy + ?Sized> Strategy for std::sync::Arc<S> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn decide(
        &self,
        ctx: &StrategyContext<'_>,
        state: &mut StrategyState,
    ) -> anyhow::Result<Decision> {
        (**self).decide(ctx, state)
    }
}
