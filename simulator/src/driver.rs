//! Simulation loop and batch driver.
//!
//! [`run_session`] plays one session to completion. [`run_batch`] plays many independent
//! sessions of the same strategy on a dedicated rayon pool. Session `i` of a batch always draws
//! from ChaCha stream `i` of the batch seed, so a seeded batch produces the same results
//! whatever the pool size.

use std::time::{Duration, Instant};

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};
use wheelhouse_execution::{ReplayWheel, RngWheel, Session, Strategy, Wheel, WheelError};
use wheelhouse_types::{
    ensure_nonzero, ensure_positive,
    roulette::{DEFAULT_FAULT_TOLERANCE, DEFAULT_MAX_ROUNDS},
    ConfigError, Pocket, SessionLimits, SpinRecord, TableConfig, TerminationReason,
};

use crate::stats::BatchStats;

#[derive(Debug, Error)]
pub enum DriverError {
    #[error("invalid run request: {0}")]
    Config(#[from] ConfigError),
    #[error("invalid spin sequence: {0}")]
    Spins(#[from] WheelError),
    #[error("failed to create session pool: {0}")]
    Pool(#[from] rayon::ThreadPoolBuildError),
}

fn default_max_rounds() -> u64 {
    DEFAULT_MAX_ROUNDS
}

fn default_session_count() -> usize {
    1
}

fn default_fault_tolerance() -> u32 {
    DEFAULT_FAULT_TOLERANCE
}

/// Everything needed to run a batch, minus the strategy.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunRequest {
    #[serde(default)]
    pub config: TableConfig,
    pub starting_bankroll: f64,
    /// Safety bound on rounds per session.
    #[serde(default = "default_max_rounds")]
    pub max_rounds: u64,
    #[serde(default = "default_session_count")]
    pub session_count: usize,
    /// Base seed. Drawn from entropy (and reported) when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    #[serde(default)]
    pub limits: SessionLimits,
    /// Consecutive contract-violating rounds tolerated per session.
    #[serde(default = "default_fault_tolerance")]
    pub fault_tolerance: u32,
    /// Worker threads (0 uses logical cores).
    #[serde(default)]
    pub parallelism: usize,
    /// Wall-clock budget for the whole batch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_budget_ms: Option<u64>,
    /// Include each session's spin history in the result. Off by default since large batches
    /// would otherwise carry every spin of every session.
    #[serde(default)]
    pub record_history: bool,
    /// Replay this spin sequence in every session instead of drawing spins.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spins: Option<Vec<Pocket>>,
}

impl RunRequest {
    pub fn new(config: TableConfig, starting_bankroll: f64) -> Self {
        Self {
            config,
            starting_bankroll,
            max_rounds: DEFAULT_MAX_ROUNDS,
            session_count: 1,
            seed: None,
            limits: SessionLimits::default(),
            fault_tolerance: DEFAULT_FAULT_TOLERANCE,
            parallelism: 0,
            time_budget_ms: None,
            record_history: false,
            spins: None,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.config.validate()?;
        ensure_positive("startingBankroll", self.starting_bankroll)?;
        ensure_nonzero("maxRounds", self.max_rounds)?;
        ensure_nonzero("sessionCount", self.session_count as u64)?;
        if let Some(budget) = self.time_budget_ms {
            ensure_nonzero("timeBudgetMs", budget)?;
        }
        self.limits.validate()
    }
}

/// Outcome of one session.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResult {
    pub index: u64,
    pub starting_bankroll: f64,
    pub final_bankroll: f64,
    pub rounds: u64,
    pub settled_rounds: u64,
    pub skipped_rounds: u64,
    pub rejected_rounds: u64,
    pub winning_rounds: u64,
    pub contract_violations: u64,
    pub peak_bankroll: f64,
    pub max_drawdown: f64,
    pub total_staked: f64,
    pub total_returned: f64,
    pub termination_reason: TerminationReason,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fault: Option<String>,
    /// Spin history, present only when the request set `recordHistory`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub history: Option<Vec<SpinRecord>>,
}

impl SessionResult {
    pub fn net(&self) -> f64 {
        self.final_bankroll - self.starting_bankroll
    }

    pub fn busted(&self) -> bool {
        self.termination_reason == TerminationReason::Bust
    }
}

/// Outcome of a batch, sessions in index order. Per-session histories are opt-in through
/// [`RunRequest::record_history`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunResult {
    pub strategy: String,
    pub seed: u64,
    pub sessions: Vec<SessionResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stats: Option<BatchStats>,
}

/// Worker count for `requested` (0 uses logical cores).
pub fn resolve_parallelism(requested: usize) -> usize {
    let fallback = std::thread::available_parallelism()
        .map(|count| count.get())
        .unwrap_or(1);
    match requested {
        0 => fallback,
        value => value,
    }
    .max(1)
}

/// Play one session until it terminates, hits `max_rounds`, or passes `deadline`.
pub fn play_session<S, W>(
    strategy: &S,
    wheel: &mut W,
    request: &RunRequest,
    index: u64,
    deadline: Option<Instant>,
) -> Result<SessionResult, DriverError>
where
    S: Strategy + ?Sized,
    W: Wheel + ?Sized,
{
    let mut session = Session::new(
        request.config.clone(),
        request.starting_bankroll,
        request.limits,
    )?
    .with_fault_tolerance(request.fault_tolerance);

    while !session.is_terminated() {
        if session.ledger().rounds() >= request.max_rounds {
            session.terminate(TerminationReason::RoundLimit);
            break;
        }
        if deadline.is_some_and(|deadline| Instant::now() >= deadline) {
            session.terminate(TerminationReason::TimeBudget);
            break;
        }
        session.play_round(strategy, wheel);
    }

    let contract_violations = session.contract_violations();
    let (ledger, _, fault) = session.into_parts();
    let termination_reason = ledger
        .termination()
        .unwrap_or(TerminationReason::RoundLimit);
    debug!(
        index,
        rounds = ledger.rounds(),
        bankroll = ledger.bankroll(),
        reason = %termination_reason,
        "session finished"
    );

    Ok(SessionResult {
        index,
        starting_bankroll: ledger.starting_bankroll(),
        final_bankroll: ledger.bankroll(),
        rounds: ledger.rounds(),
        settled_rounds: ledger.settled_rounds(),
        skipped_rounds: ledger.skipped_rounds(),
        rejected_rounds: ledger.rejected_rounds(),
        winning_rounds: ledger.winning_rounds(),
        contract_violations,
        peak_bankroll: ledger.peak_bankroll(),
        max_drawdown: ledger.max_drawdown(),
        total_staked: ledger.total_staked(),
        total_returned: ledger.total_returned(),
        termination_reason,
        fault,
        history: request.record_history.then(|| ledger.into_history()),
    })
}

/// Play session `index` of a batch seeded with `seed`.
pub fn run_session<S: Strategy + ?Sized>(
    strategy: &S,
    request: &RunRequest,
    seed: u64,
    index: u64,
    deadline: Option<Instant>,
) -> Result<SessionResult, DriverError> {
    let wheel_type = request.config.wheel_type;
    match &request.spins {
        Some(spins) => {
            let mut wheel = ReplayWheel::new(wheel_type, spins.clone())?;
            play_session(strategy, &mut wheel, request, index, deadline)
        }
        None => {
            let mut wheel = RngWheel::seeded(wheel_type, seed, index);
            play_session(strategy, &mut wheel, request, index, deadline)
        }
    }
}

/// Run `request.session_count` independent sessions and aggregate them.
pub fn run_batch<S: Strategy + ?Sized>(
    strategy: &S,
    request: &RunRequest,
) -> Result<RunResult, DriverError> {
    request.validate()?;
    if let Some(spins) = &request.spins {
        ReplayWheel::new(request.config.wheel_type, spins.clone())?;
    }

    let seed = request.seed.unwrap_or_else(rand::random);
    let threads = resolve_parallelism(request.parallelism);
    let start = Instant::now();
    let deadline = request
        .time_budget_ms
        .map(|ms| start + Duration::from_millis(ms));
    info!(
        strategy = strategy.name(),
        sessions = request.session_count,
        threads,
        seed,
        "starting batch"
    );

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build()?;
    let sessions = pool.install(|| {
        (0..request.session_count)
            .into_par_iter()
            .map(|index| run_session(strategy, request, seed, index as u64, deadline))
            .collect::<Result<Vec<_>, _>>()
    })?;

    let stats = (sessions.len() > 1).then(|| BatchStats::from_sessions(&sessions));
    if let Some(stats) = &stats {
        info!(
            sessions = stats.sessions,
            mean_final_bankroll = stats.mean_final_bankroll,
            bust_rate = stats.bust_rate,
            realized_edge = stats.realized_edge,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "batch finished"
        );
    } else {
        info!(
            elapsed_ms = start.elapsed().as_millis() as u64,
            "batch finished"
        );
    }

    Ok(RunResult {
        strategy: strategy.name().to_string(),
        seed,
        sessions,
        stats,
    })
}
