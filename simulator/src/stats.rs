//! Batch aggregates.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use wheelhouse_types::TerminationReason;

use crate::driver::SessionResult;

/// Running sums over session nets.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct NetTotals {
    pub sessions: u64,
    pub total_net: f64,
    pub total_net_sq: f64,
    pub total_staked: f64,
    pub total_returned: f64,
}

impl NetTotals {
    pub fn add(&mut self, session: &SessionResult) {
        let net = session.net();
        self.sessions += 1;
        self.total_net += net;
        self.total_net_sq += net * net;
        self.total_staked += session.total_staked;
        self.total_returned += session.total_returned;
    }

    pub fn mean_net(&self) -> f64 {
        if self.sessions == 0 {
            0.0
        } else {
            self.total_net / self.sessions as f64
        }
    }

    /// Standard error of [`NetTotals::mean_net`].
    pub fn stderr(&self) -> f64 {
        if self.sessions <= 1 {
            return 0.0;
        }
        let mean = self.mean_net();
        let var = (self.total_net_sq / self.sessions as f64) - mean * mean;
        let var = if var < 0.0 { 0.0 } else { var };
        (var / self.sessions as f64).sqrt()
    }

    /// `1 - returned / staked`, or 0 when nothing was staked.
    pub fn realized_edge(&self) -> f64 {
        if self.total_staked == 0.0 {
            0.0
        } else {
            1.0 - self.total_returned / self.total_staked
        }
    }
}

/// Distribution of final bankrolls and termination outcomes across a batch.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchStats {
    pub sessions: u64,
    pub mean_final_bankroll: f64,
    pub median_final_bankroll: f64,
    pub min_final_bankroll: f64,
    pub max_final_bankroll: f64,
    pub p5_final_bankroll: f64,
    pub p25_final_bankroll: f64,
    pub p75_final_bankroll: f64,
    pub p95_final_bankroll: f64,
    pub mean_net: f64,
    pub net_stderr: f64,
    pub bust_rate: f64,
    /// Sessions that ended with money left.
    pub survival_rate: f64,
    /// Sessions that ended above their starting bankroll.
    pub profitable_rate: f64,
    pub take_profit_rate: f64,
    pub mean_max_drawdown: f64,
    pub worst_max_drawdown: f64,
    pub mean_rounds: f64,
    pub total_staked: f64,
    pub total_returned: f64,
    pub realized_edge: f64,
    pub reasons: BTreeMap<TerminationReason, u64>,
}

/// Nearest-rank percentile of an ascending slice.
pub fn percentile(sorted: &[f64], pct: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    let rank = ((pct / 100.0) * sorted.len() as f64).ceil() as usize;
    sorted[rank.clamp(1, sorted.len()) - 1]
}

impl BatchStats {
    pub fn from_sessions(sessions: &[SessionResult]) -> Self {
        if sessions.is_empty() {
            return Self::default();
        }
        let count = sessions.len() as f64;
        let rate = |hits: usize| hits as f64 / count;

        let mut totals = NetTotals::default();
        let mut reasons = BTreeMap::new();
        let mut finals = Vec::with_capacity(sessions.len());
        for session in sessions {
            totals.add(session);
            *reasons.entry(session.termination_reason).or_insert(0) += 1;
            finals.push(session.final_bankroll);
        }
        finals.sort_by(f64::total_cmp);

        let drawdowns = sessions.iter().map(|s| s.max_drawdown);
        Self {
            sessions: totals.sessions,
            mean_final_bankroll: finals.iter().sum::<f64>() / count,
            median_final_bankroll: percentile(&finals, 50.0),
            min_final_bankroll: finals[0],
            max_final_bankroll: finals[finals.len() - 1],
            p5_final_bankroll: percentile(&finals, 5.0),
            p25_final_bankroll: percentile(&finals, 25.0),
            p75_final_bankroll: percentile(&finals, 75.0),
            p95_final_bankroll: percentile(&finals, 95.0),
            mean_net: totals.mean_net(),
            net_stderr: totals.stderr(),
            bust_rate: rate(sessions.iter().filter(|s| s.busted()).count()),
            survival_rate: rate(sessions.iter().filter(|s| s.final_bankroll > 0.0).count()),
            profitable_rate: rate(sessions.iter().filter(|s| s.net() > 0.0).count()),
            take_profit_rate: rate(
                sessions
                    .iter()
                    .filter(|s| s.termination_reason == TerminationReason::TakeProfit)
                    .count(),
            ),
            mean_max_drawdown: drawdowns.clone().sum::<f64>() / count,
            worst_max_drawdown: drawdowns.fold(0.0, f64::max),
            mean_rounds: sessions.iter().map(|s| s.rounds as f64).sum::<f64>() / count,
            total_staked: totals.total_staked,
            total_returned: totals.total_returned,
            realized_edge: totals.realized_edge(),
            reasons,
        }
    }
}
