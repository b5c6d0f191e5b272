//! Reference betting strategies.
//!
//! Each strategy stakes a single position and sizes the stake with a classic progression. The
//! progression lives entirely in [`StrategyState`]; the strategy value itself is immutable and
//! shared by every session of a batch. Wins and losses are read off bankroll movement between
//! rounds, so rejected or skipped rounds leave a progression where it was.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use wheelhouse_execution::{
    Bet, ContractViolation, Decision, Strategy, StrategyContext, StrategyState,
};
use wheelhouse_types::{BetInstruction, BetKind, BetValue, WheelType};

/// Longest Paroli winning run before the stake resets.
pub const PAROLI_RUN: u64 = 3;

const STAKE: &str = "stake";
const LAST_BANKROLL: &str = "last_bankroll";
const FIB_INDEX: &str = "fib_index";
const WIN_STREAK: &str = "win_streak";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Progression {
    /// Same stake every round.
    Flat,
    /// Double after a loss, reset after a win.
    Martingale,
    /// Add one step after a loss, remove one after a win.
    Dalembert,
    /// Walk up the Fibonacci sequence on losses, back two on wins.
    Fibonacci,
    /// Double after a win for up to three wins, reset after a loss.
    Paroli,
}

impl Progression {
    pub const ALL: [Self; 5] = [
        Self::Flat,
        Self::Martingale,
        Self::Dalembert,
        Self::Fibonacci,
        Self::Paroli,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Flat => "flat",
            Self::Martingale => "martingale",
            Self::Dalembert => "dalembert",
            Self::Fibonacci => "fibonacci",
            Self::Paroli => "paroli",
        }
    }
}

impl fmt::Display for Progression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Progression {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown strategy: {s}"))
    }
}

/// `n`-th Fibonacci number of the betting sequence 1, 1, 2, 3, 5, ...
pub fn fibonacci(n: u64) -> f64 {
    let (mut a, mut b) = (1.0f64, 1.0f64);
    for _ in 0..n {
        (a, b) = (b, a + b);
    }
    a
}

/// One position staked with one progression.
#[derive(Clone, Debug)]
pub struct ProgressionStrategy {
    name: String,
    progression: Progression,
    kind: BetKind,
    value: Option<BetValue>,
    unit: f64,
}

impl ProgressionStrategy {
    /// Checks the position against `wheel` up front so every round's proposal is well formed.
    pub fn new(
        progression: Progression,
        kind: BetKind,
        value: Option<BetValue>,
        unit: f64,
        wheel: WheelType,
    ) -> Result<Self, ContractViolation> {
        let probe = BetInstruction::new(kind, value, unit);
        if !unit.is_finite() {
            return Err(ContractViolation::NonFiniteAmount { kind, amount: unit });
        }
        if unit <= 0.0 {
            return Err(ContractViolation::NonPositiveAmount { kind, amount: unit });
        }
        let bet = Bet::from_instruction(&probe, wheel)?;
        Ok(Self {
            name: format!("{progression} {bet}"),
            progression,
            kind,
            value,
            unit,
        })
    }

    pub fn progression(&self) -> Progression {
        self.progression
    }

    pub fn unit(&self) -> f64 {
        self.unit
    }

    /// Stake for this round after seeing whether the previous one won.
    fn next_stake(&self, ctx: &StrategyContext<'_>, state: &mut StrategyState) -> f64 {
        let stake = state.get_f64_or(STAKE, self.unit);
        let last = state.get_f64_or(LAST_BANKROLL, ctx.bankroll());
        let won = ctx.bankroll() > last;
        let lost = ctx.bankroll() < last;
        if !won && !lost {
            return stake;
        }

        match self.progression {
            Progression::Flat => self.unit,
            Progression::Martingale if lost => stake * 2.0,
            Progression::Martingale => self.unit,
            Progression::Dalembert => {
                let step = ctx.increment_step(self.unit);
                if lost {
                    stake + step
                } else {
                    (stake - step).max(self.unit)
                }
            }
            Progression::Fibonacci => {
                let index = state.get_u64(FIB_INDEX).unwrap_or(0);
                let index = if lost {
                    index + 1
                } else {
                    index.saturating_sub(2)
                };
                state.set(FIB_INDEX, index);
                self.unit * fibonacci(index)
            }
            Progression::Paroli => {
                if lost {
                    state.set(WIN_STREAK, 0u64);
                    return self.unit;
                }
                let streak = state.increment(WIN_STREAK);
                if streak >= PAROLI_RUN {
                    state.set(WIN_STREAK, 0u64);
                    self.unit
                } else {
                    stake * 2.0
                }
            }
        }
    }
}

impl Strategy for ProgressionStrategy {
    fn name(&self) -> &str {
        &self.name
    }

    fn decide(
        &self,
        ctx: &StrategyContext<'_>,
        state: &mut StrategyState,
    ) -> anyhow::Result<Decision> {
        let stake = self.next_stake(ctx, state);
        state.set(STAKE, stake);
        state.set(LAST_BANKROLL, ctx.bankroll());

        let floor = ctx.config().bet_limits.floor_for(self.kind);
        if ctx.bankroll() < floor {
            return Ok(Decision::Stop);
        }
        let amount = stake.min(ctx.bankroll());
        Ok(Decision::Bets(vec![BetInstruction::new(
            self.kind, self.value, amount,
        )]))
    }
}
