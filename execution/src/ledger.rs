//! Session bankroll ledger.
//!
//! The ledger is the only place a bankroll changes. It also owns the spin history and the running
//! statistics reported at the end of a session, and decides when a session is over.

use wheelhouse_types::{
    ensure_positive, ConfigError, Pocket, SessionLimits, SpinRecord, TerminationReason,
};

/// Relative slack when comparing a total stake with the bankroll.
const COVER_TOLERANCE: f64 = 1e-9;

/// Bankroll, history and termination status for one session.
#[derive(Clone, Debug)]
pub struct Ledger {
    starting_bankroll: f64,
    bankroll: f64,
    peak_bankroll: f64,
    max_drawdown: f64,
    total_staked: f64,
    total_returned: f64,
    settled_rounds: u64,
    skipped_rounds: u64,
    rejected_rounds: u64,
    winning_rounds: u64,
    history: Vec<SpinRecord>,
    limits: SessionLimits,
    termination: Option<TerminationReason>,
}

impl Ledger {
    pub fn new(starting_bankroll: f64, limits: SessionLimits) -> Result<Self, ConfigError> {
        ensure_positive("startingBankroll", starting_bankroll)?;
        limits.validate()?;
        Ok(Self {
            starting_bankroll,
            bankroll: starting_bankroll,
            peak_bankroll: starting_bankroll,
            max_drawdown: 0.0,
            total_staked: 0.0,
            total_returned: 0.0,
            settled_rounds: 0,
            skipped_rounds: 0,
            rejected_rounds: 0,
            winning_rounds: 0,
            history: Vec::new(),
            limits,
            termination: None,
        })
    }

    pub fn starting_bankroll(&self) -> f64 {
        self.starting_bankroll
    }

    pub fn bankroll(&self) -> f64 {
        self.bankroll
    }

    /// High-water mark, including the starting bankroll.
    pub fn peak_bankroll(&self) -> f64 {
        self.peak_bankroll
    }

    /// Largest drop from a previous high-water mark.
    pub fn max_drawdown(&self) -> f64 {
        self.max_drawdown
    }

    pub fn total_staked(&self) -> f64 {
        self.total_staked
    }

    /// Sum of payouts, stakes of winning bets included.
    pub fn total_returned(&self) -> f64 {
        self.total_returned
    }

    pub fn net(&self) -> f64 {
        self.bankroll - self.starting_bankroll
    }

    pub fn settled_rounds(&self) -> u64 {
        self.settled_rounds
    }

    pub fn skipped_rounds(&self) -> u64 {
        self.skipped_rounds
    }

    pub fn rejected_rounds(&self) -> u64 {
        self.rejected_rounds
    }

    /// Settled rounds that returned more than they staked.
    pub fn winning_rounds(&self) -> u64 {
        self.winning_rounds
    }

    /// Number of spins recorded so far.
    pub fn rounds(&self) -> u64 {
        self.history.len() as u64
    }

    pub fn history(&self) -> &[SpinRecord] {
        &self.history
    }

    pub fn into_history(self) -> Vec<SpinRecord> {
        self.history
    }

    pub fn limits(&self) -> &SessionLimits {
        &self.limits
    }

    pub fn termination(&self) -> Option<TerminationReason> {
        self.termination
    }

    pub fn is_terminated(&self) -> bool {
        self.termination.is_some()
    }

    /// Whether `stake` fits in the bankroll. Stakes that sum to the bankroll in decimal count as
    /// covered even when their binary sum lands a few ulps above it.
    pub fn can_cover(&self, stake: f64) -> bool {
        stake <= self.bankroll + self.bankroll.max(1.0) * COVER_TOLERANCE
    }

    /// Apply an accepted round: `bankroll := bankroll - stake + payout`, floored at zero.
    ///
    /// Returns the round's net result.
    pub fn settle(&mut self, stake: f64, payout: f64) -> f64 {
        let net = payout - stake;
        self.bankroll = (self.bankroll - stake + payout).max(0.0);
        self.total_staked += stake;
        self.total_returned += payout;
        self.settled_rounds += 1;
        if net > 0.0 {
            self.winning_rounds += 1;
        }

        if self.bankroll > self.peak_bankroll {
            self.peak_bankroll = self.bankroll;
        }
        let drawdown = self.peak_bankroll - self.bankroll;
        if drawdown > self.max_drawdown {
            self.max_drawdown = drawdown;
        }
        net
    }

    pub fn record_skip(&mut self) {
        self.skipped_rounds += 1;
    }

    pub fn record_rejection(&mut self) {
        self.rejected_rounds += 1;
    }

    /// Append a drawn spin to the history.
    pub fn record_spin(&mut self, pocket: Pocket) -> SpinRecord {
        let record = SpinRecord::new(pocket);
        self.history.push(record);
        record
    }

    /// Post-round termination check: bust, then stop-loss, then take-profit.
    pub fn check_termination(&self) -> Option<TerminationReason> {
        if self.bankroll <= 0.0 {
            return Some(TerminationReason::Bust);
        }
        self.limits.check(self.starting_bankroll, self.bankroll)
    }

    /// End the session. The first reason recorded wins.
    pub fn terminate(&mut self, reason: TerminationReason) -> TerminationReason {
        *self.termination.get_or_insert(reason)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ledger(start: f64) -> Ledger {
        Ledger::new(start, SessionLimits::default()).unwrap()
    }

    #[test]
    fn test_settle_updates_bankroll_and_totals() {
        let mut ledger = ledger(100.0);
        assert_eq!(ledger.settle(5.0, 0.0), -5.0);
        assert_eq!(ledger.settle(5.0, 10.0), 5.0);
        assert_eq!(ledger.bankroll(), 100.0);
        assert_eq!(ledger.total_staked(), 10.0);
        assert_eq!(ledger.total_returned(), 10.0);
        assert_eq!(ledger.settled_rounds(), 2);
        assert_eq!(ledger.winning_rounds(), 1);
        assert_eq!(ledger.net(), 0.0);
    }

    #[test]
    fn test_bankroll_never_negative() {
        let mut ledger = ledger(0.3);
        ledger.settle(0.1 + 0.2, 0.0);
        assert!(ledger.bankroll() >= 0.0);
        assert_eq!(ledger.check_termination(), Some(TerminationReason::Bust));
    }

    #[test]
    fn test_can_cover_decimal_sums() {
        let small = ledger(0.3);
        assert!(0.1 + 0.2 > 0.3);
        assert!(small.can_cover(0.1 + 0.2));
        assert!(small.can_cover(0.3));
        assert!(!small.can_cover(0.31));

        let large = ledger(100.0);
        assert!(large.can_cover(100.0));
        assert!(!large.can_cover(100.01));
    }

    #[test]
    fn test_peak_and_drawdown() {
        let mut ledger = ledger(100.0);
        ledger.settle(10.0, 0.0); // 90
        ledger.settle(10.0, 40.0); // 120
        ledger.settle(50.0, 0.0); // 70
        ledger.settle(10.0, 20.0); // 80
        assert_eq!(ledger.peak_bankroll(), 120.0);
        assert_eq!(ledger.max_drawdown(), 50.0);
    }

    #[test]
    fn test_termination_order() {
        let limits = SessionLimits {
            stop_loss: Some(100.0),
            take_profit: Some(50.0),
        };
        let mut ledger = Ledger::new(100.0, limits).unwrap();
        ledger.settle(100.0, 0.0);
        // Bust and stop-loss both hold; bust is reported.
        assert_eq!(ledger.check_termination(), Some(TerminationReason::Bust));

        let mut ledger = Ledger::new(100.0, limits).unwrap();
        ledger.settle(10.0, 60.0);
        assert_eq!(
            ledger.check_termination(),
            Some(TerminationReason::TakeProfit)
        );

        let limits = SessionLimits {
            stop_loss: Some(20.0),
            take_profit: None,
        };
        let mut ledger = Ledger::new(100.0, limits).unwrap();
        ledger.settle(19.0, 0.0);
        assert_eq!(ledger.check_termination(), None);
        ledger.settle(1.0, 0.0);
        assert_eq!(
            ledger.check_termination(),
            Some(TerminationReason::StopLoss)
        );
    }

    #[test]
    fn test_first_termination_wins() {
        let mut ledger = ledger(10.0);
        assert_eq!(
            ledger.terminate(TerminationReason::StrategyStop),
            TerminationReason::StrategyStop
        );
        assert_eq!(
            ledger.terminate(TerminationReason::Bust),
            TerminationReason::StrategyStop
        );
        assert!(ledger.is_terminated());
    }

    #[test]
    fn test_history_and_counters() {
        let mut ledger = ledger(10.0);
        ledger.record_spin(Pocket::ZERO);
        ledger.record_skip();
        ledger.record_spin(Pocket::DOUBLE_ZERO);
        ledger.record_rejection();
        assert_eq!(ledger.rounds(), 2);
        assert_eq!(ledger.skipped_rounds(), 1);
        assert_eq!(ledger.rejected_rounds(), 1);
        assert_eq!(ledger.history()[1].winning_number, Pocket::DOUBLE_ZERO);
    }

    #[test]
    fn test_can_cover_exact_bankroll() {
        let ledger = ledger(10.0);
        assert!(ledger.can_cover(10.0));
        assert!(!ledger.can_cover(10.01));
    }

    #[test]
    fn test_rejects_invalid_start() {
        assert!(Ledger::new(0.0, SessionLimits::default()).is_err());
        assert!(Ledger::new(f64::NAN, SessionLimits::default()).is_err());
        assert!(Ledger::new(
            10.0,
            SessionLimits {
                stop_loss: Some(-1.0),
                take_profit: None
            }
        )
        .is_err());
    }
}
