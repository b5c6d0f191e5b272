//! Single-session round pipeline.
//!
//! A round is: ask the strategy, validate its proposal, draw a spin, settle, check for
//! termination. Every path that reaches the wheel appends the spin to history, whether the
//! proposal was settled, empty or rejected. A stop signal or a strategy exception ends the
//! session before the wheel is touched.

use thiserror::Error;
use tracing::{debug, info, warn};
use wheelhouse_types::{
    roulette::DEFAULT_FAULT_TOLERANCE, ConfigError, SessionLimits, SpinRecord, TableConfig,
    TerminationReason,
};

use crate::catalog::{total_payout, ContractViolation};
use crate::ledger::Ledger;
use crate::logging::{format_bets, format_instructions};
use crate::runner::{invoke, prepare_bets, Invocation, Proposal};
use crate::wheel::Wheel;
use crate::{Strategy, StrategyContext, StrategyState};

/// Why a proposal was turned away. The spin is still drawn and recorded.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum Rejection {
    #[error("stake {stake} exceeds bankroll {bankroll}")]
    InsufficientFunds { stake: f64, bankroll: f64 },
    #[error(transparent)]
    Contract(#[from] ContractViolation),
}

/// What happened in one call to [`Session::play_round`].
#[derive(Clone, Debug, PartialEq)]
pub enum RoundOutcome {
    Settled { stake: f64, payout: f64, net: f64 },
    /// The strategy placed nothing.
    Skipped,
    Rejected(Rejection),
    /// The strategy asked to end the session.
    Stopped,
    /// The strategy errored or panicked.
    Faulted(String),
    /// The wheel had no spin to give.
    WheelExhausted,
    /// The session had already ended; nothing happened.
    Inactive,
}

/// Summary of one round.
#[derive(Clone, Debug, PartialEq)]
pub struct RoundReport {
    /// Zero-based round index.
    pub round: u64,
    pub spin: Option<SpinRecord>,
    pub outcome: RoundOutcome,
    pub bankroll: f64,
    /// Set when this round (or an earlier one) ended the session.
    pub termination: Option<TerminationReason>,
}

/// One strategy playing one bankroll at one table.
#[derive(Clone, Debug)]
pub struct Session {
    config: TableConfig,
    ledger: Ledger,
    state: StrategyState,
    fault_tolerance: u32,
    consecutive_violations: u32,
    contract_violations: u64,
    fault: Option<String>,
}

impl Session {
    pub fn new(
        config: TableConfig,
        starting_bankroll: f64,
        limits: SessionLimits,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            ledger: Ledger::new(starting_bankroll, limits)?,
            state: StrategyState::new(),
            fault_tolerance: DEFAULT_FAULT_TOLERANCE,
            consecutive_violations: 0,
            contract_violations: 0,
            fault: None,
        })
    }

    /// Consecutive contract-violating rounds allowed before the session ends with
    /// [`TerminationReason::StrategyFault`].
    pub fn with_fault_tolerance(mut self, fault_tolerance: u32) -> Self {
        self.fault_tolerance = fault_tolerance;
        self
    }

    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn state(&self) -> &StrategyState {
        &self.state
    }

    pub fn history(&self) -> &[SpinRecord] {
        self.ledger.history()
    }

    pub fn bankroll(&self) -> f64 {
        self.ledger.bankroll()
    }

    pub fn termination(&self) -> Option<TerminationReason> {
        self.ledger.termination()
    }

    pub fn is_terminated(&self) -> bool {
        self.ledger.is_terminated()
    }

    /// Total rounds rejected for contract violations.
    pub fn contract_violations(&self) -> u64 {
        self.contract_violations
    }

    /// Detail of the fault that ended the session, if any.
    pub fn fault(&self) -> Option<&str> {
        self.fault.as_deref()
    }

    /// End the session from outside the round pipeline (round limit, time budget).
    pub fn terminate(&mut self, reason: TerminationReason) -> TerminationReason {
        self.ledger.terminate(reason)
    }

    pub fn into_parts(self) -> (Ledger, StrategyState, Option<String>) {
        (self.ledger, self.state, self.fault)
    }

    fn report(&self, round: u64, spin: Option<SpinRecord>, outcome: RoundOutcome) -> RoundReport {
        RoundReport {
            round,
            spin,
            outcome,
            bankroll: self.ledger.bankroll(),
            termination: self.ledger.termination(),
        }
    }

    /// Play one round. Once the session has ended this is a no-op returning
    /// [`RoundOutcome::Inactive`].
    pub fn play_round<S, W>(&mut self, strategy: &S, wheel: &mut W) -> RoundReport
    where
        S: Strategy + ?Sized,
        W: Wheel + ?Sized,
    {
        let round = self.ledger.rounds();
        if self.ledger.is_terminated() {
            return self.report(round, None, RoundOutcome::Inactive);
        }

        let ctx = StrategyContext {
            history: self.ledger.history(),
            bankroll: self.ledger.bankroll(),
            starting_bankroll: self.ledger.starting_bankroll(),
            peak_bankroll: self.ledger.peak_bankroll(),
            config: &self.config,
            round,
        };
        let invocation = invoke(strategy, &ctx, &mut self.state);

        let instructions = match invocation {
            Invocation::Bets(instructions) => instructions,
            Invocation::Stop => {
                self.ledger.terminate(TerminationReason::StrategyStop);
                debug!(strategy = strategy.name(), round, "strategy stopped");
                return self.report(round, None, RoundOutcome::Stopped);
            }
            Invocation::Exception(message) => {
                warn!(strategy = strategy.name(), round, %message, "strategy exception");
                self.fault = Some(message.clone());
                self.ledger.terminate(TerminationReason::StrategyException);
                return self.report(round, None, RoundOutcome::Faulted(message));
            }
        };

        let proposal = if instructions.is_empty() {
            Ok(Proposal::default())
        } else {
            prepare_bets(&instructions, &self.config)
        };

        let pocket = match wheel.spin() {
            Ok(pocket) => pocket,
            Err(err) => {
                debug!(round, error = %err, "wheel exhausted");
                self.ledger.terminate(TerminationReason::SpinsExhausted);
                return self.report(round, None, RoundOutcome::WheelExhausted);
            }
        };
        let spin = self.ledger.record_spin(pocket);

        let outcome = match proposal {
            Ok(proposal) if proposal.is_empty() => {
                self.consecutive_violations = 0;
                self.ledger.record_skip();
                RoundOutcome::Skipped
            }
            Ok(proposal) if !self.ledger.can_cover(proposal.total_stake) => {
                self.consecutive_violations = 0;
                self.ledger.record_rejection();
                debug!(
                    round,
                    stake = proposal.total_stake,
                    bankroll = self.ledger.bankroll(),
                    "insufficient funds"
                );
                RoundOutcome::Rejected(Rejection::InsufficientFunds {
                    stake: proposal.total_stake,
                    bankroll: self.ledger.bankroll(),
                })
            }
            Ok(proposal) => {
                self.consecutive_violations = 0;
                let payout = total_payout(&proposal.bets, pocket, self.config.wheel_type);
                let net = self.ledger.settle(proposal.total_stake, payout);
                debug!(
                    round,
                    bets = %format_bets(&proposal.bets),
                    pocket = %pocket,
                    stake = proposal.total_stake,
                    payout,
                    bankroll = self.ledger.bankroll(),
                    "settled"
                );
                RoundOutcome::Settled {
                    stake: proposal.total_stake,
                    payout,
                    net,
                }
            }
            Err(violation) => {
                self.consecutive_violations = self.consecutive_violations.saturating_add(1);
                self.contract_violations += 1;
                self.ledger.record_rejection();
                warn!(
                    strategy = strategy.name(),
                    round,
                    bets = %format_instructions(&instructions),
                    %violation,
                    consecutive = self.consecutive_violations,
                    "contract violation"
                );
                if self.consecutive_violations > self.fault_tolerance {
                    self.fault = Some(violation.to_string());
                    self.ledger.terminate(TerminationReason::StrategyFault);
                }
                RoundOutcome::Rejected(Rejection::Contract(violation))
            }
        };

        if let Some(reason) = self.ledger.check_termination() {
            self.ledger.terminate(reason);
        }
        if let Some(reason) = self.ledger.termination() {
            info!(
                strategy = strategy.name(),
                rounds = self.ledger.rounds(),
                bankroll = self.ledger.bankroll(),
                %reason,
                "session ended"
            );
        }

        self.report(round, Some(spin), outcome)
    }
}
