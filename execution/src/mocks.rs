//! Test fixtures: canned strategies, replay wheels and table configs.

use wheelhouse_types::{BetInstruction, BetLimits, TableConfig, WheelType};

use crate::wheel::ReplayWheel;
use crate::{Decision, FnStrategy, Strategy, StrategyContext, StrategyState};

/// Table with the given limits on a single-zero wheel.
pub fn table(min: f64, min_outside: f64, max: f64) -> TableConfig {
    TableConfig::new(
        WheelType::SingleZero,
        BetLimits {
            min,
            min_outside,
            max,
        },
    )
}

/// Replay wheel over `values` (37 = 00).
pub fn replay(wheel_type: WheelType, values: &[u8]) -> ReplayWheel {
    ReplayWheel::from_values(wheel_type, values).expect("illegal replay pocket")
}

/// Wrap a closure as a strategy named "scripted".
pub fn scripted<F>(decide: F) -> FnStrategy<F>
where
    F: Fn(&StrategyContext<'_>, &mut StrategyState) -> anyhow::Result<Decision> + Send + Sync,
{
    FnStrategy::new("scripted", decide)
}

/// Places the same bets every round.
pub fn always(bets: Vec<BetInstruction>) -> impl Strategy {
    FnStrategy::new("always", move |_: &StrategyContext<'_>, _: &mut StrategyState| {
        Ok(Decision::Bets(bets.clone()))
    })
}

/// Plays `decisions` in order, one per round, then stops.
pub fn sequence(decisions: Vec<Decision>) -> impl Strategy {
    FnStrategy::new(
        "sequence",
        move |ctx: &StrategyContext<'_>, _: &mut StrategyState| {
            Ok(decisions
                .get(ctx.round() as usize)
                .cloned()
                .unwrap_or(Decision::Stop))
        },
    )
}

/// Places `bets` until round `round`, where it panics.
pub fn panics_at(round: u64, bets: Vec<BetInstruction>) -> impl Strategy {
    FnStrategy::new(
        "panics",
        move |ctx: &StrategyContext<'_>, _: &mut StrategyState| {
            if ctx.round() == round {
                panic!("strategy blew up at round {round}");
            }
            Ok(Decision::Bets(bets.clone()))
        },
    )
}

/// Places `bets` until round `round`, where it returns an error.
pub fn fails_at(round: u64, bets: Vec<BetInstruction>) -> impl Strategy {
    FnStrategy::new(
        "fails",
        move |ctx: &StrategyContext<'_>, _: &mut StrategyState| {
            if ctx.round() == round {
                anyhow::bail!("strategy gave up at round {round}");
            }
            Ok(Decision::Bets(bets.clone()))
        },
    )
}
