//! Strategy runner: invokes a strategy and turns its answer into a stake-ready proposal.
//!
//! Per round:
//! 1. [`invoke`] calls the strategy, catching both returned errors and panics.
//! 2. [`prepare_bets`] validates every instruction, merges duplicate positions by summing their
//!    amounts, then clamps each merged amount to the table limits exactly once.
//!
//! The runner enforces table policy only. Whether a proposal is a sensible choice is the
//! strategy's business.

use std::panic::{catch_unwind, AssertUnwindSafe};

use wheelhouse_types::{BetInstruction, BetKind, BetLimits, TableConfig};

use crate::catalog::{total_stake, Bet, ContractViolation, PlacedBet};
use crate::{Decision, Strategy, StrategyContext, StrategyState};

/// Result of asking a strategy for its bets.
#[derive(Debug)]
pub enum Invocation {
    Bets(Vec<BetInstruction>),
    Stop,
    /// The strategy returned an error or panicked.
    Exception(String),
}

/// Call `strategy`, converting errors and panics into [`Invocation::Exception`].
pub fn invoke<S: Strategy + ?Sized>(
    strategy: &S,
    ctx: &StrategyContext<'_>,
    state: &mut StrategyState,
) -> Invocation {
    match catch_unwind(AssertUnwindSafe(|| strategy.decide(ctx, state))) {
        Ok(Ok(Decision::Bets(bets))) => Invocation::Bets(bets),
        Ok(Ok(Decision::Stop)) => Invocation::Stop,
        Ok(Err(err)) => Invocation::Exception(format!("{err:#}")),
        Err(panic) => Invocation::Exception(panic_message(panic.as_ref())),
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        format!("panicked: {message}")
    } else if let Some(message) = payload.downcast_ref::<String>() {
        format!("panicked: {message}")
    } else {
        "panicked".to_string()
    }
}

/// Validated, merged and clamped bets for one round.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Proposal {
    pub bets: Vec<PlacedBet>,
    pub total_stake: f64,
}

impl Proposal {
    pub fn is_empty(&self) -> bool {
        self.bets.is_empty()
    }
}

/// Clamp `amount` into `[floor for kind, max]`.
pub fn clamp_amount(amount: f64, kind: BetKind, limits: &BetLimits) -> f64 {
    amount.clamp(limits.floor_for(kind), limits.max)
}

fn check_amount(instruction: &BetInstruction) -> Result<(), ContractViolation> {
    let (kind, amount) = (instruction.kind, instruction.amount);
    if !amount.is_finite() {
        return Err(ContractViolation::NonFiniteAmount { kind, amount });
    }
    if amount <= 0.0 {
        return Err(ContractViolation::NonPositiveAmount { kind, amount });
    }
    Ok(())
}

/// Validate, merge and clamp a strategy's instructions.
///
/// Any invalid instruction rejects the whole proposal. Merged bets keep the order in which each
/// position first appeared.
pub fn prepare_bets(
    instructions: &[BetInstruction],
    config: &TableConfig,
) -> Result<Proposal, ContractViolation> {
    let mut bets: Vec<PlacedBet> = Vec::with_capacity(instructions.len());
    for instruction in instructions {
        check_amount(instruction)?;
        let bet = Bet::from_instruction(instruction, config.wheel_type)?;
        match bets.iter_mut().find(|placed| placed.bet == bet) {
            Some(placed) => placed.amount += instruction.amount,
            None => bets.push(PlacedBet {
                bet,
                amount: instruction.amount,
            }),
        }
    }

    for placed in &mut bets {
        placed.amount = clamp_amount(placed.amount, placed.bet.kind(), &config.bet_limits);
    }

    let total_stake = total_stake(&bets);
    Ok(Proposal { bets, total_stake })
}
