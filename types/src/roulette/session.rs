use serde::{Deserialize, Serialize};

use super::table::{ensure_positive, ConfigError};

/// Why a session stopped playing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TerminationReason {
    /// Bankroll reached zero.
    Bust,
    /// The strategy returned the stop signal.
    StrategyStop,
    StopLoss,
    TakeProfit,
    /// Too many consecutive contract-violating rounds.
    StrategyFault,
    /// The strategy returned an error or panicked.
    StrategyException,
    /// Hit the configured round cap.
    RoundLimit,
    /// A replayed spin sequence ran out.
    SpinsExhausted,
    /// The batch wall-clock budget elapsed.
    TimeBudget,
}

impl TerminationReason {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Bust => "bust",
            Self::StrategyStop => "strategy-stop",
            Self::StopLoss => "stop-loss",
            Self::TakeProfit => "take-profit",
            Self::StrategyFault => "strategy-fault",
            Self::StrategyException => "strategy-exception",
            Self::RoundLimit => "round-limit",
            Self::SpinsExhausted => "spins-exhausted",
            Self::TimeBudget => "time-budget",
        }
    }

    /// Terminations caused by a misbehaving strategy rather than play.
    pub const fn is_fault(self) -> bool {
        matches!(self, Self::StrategyFault | Self::StrategyException)
    }
}

impl std::fmt::Display for TerminationReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Optional bankroll thresholds, relative to the starting bankroll.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionLimits {
    /// End the session once this much has been lost.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stop_loss: Option<f64>,
    /// End the session once this much has been won.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub take_profit: Option<f64>,
}

impl SessionLimits {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(stop_loss) = self.stop_loss {
            ensure_positive("stopLoss", stop_loss)?;
        }
        if let Some(take_profit) = self.take_profit {
            ensure_positive("takeProfit", take_profit)?;
        }
        Ok(())
    }

    /// Threshold reached by `bankroll`, if any. Stop-loss wins over take-profit.
    pub fn check(&self, starting: f64, bankroll: f64) -> Option<TerminationReason> {
        if let Some(stop_loss) = self.stop_loss {
            if bankroll <= starting - stop_loss {
                return Some(TerminationReason::StopLoss);
            }
        }
        if let Some(take_profit) = self.take_profit {
            if bankroll >= starting + take_profit {
                return Some(TerminationReason::TakeProfit);
            }
        }
        None
    }
}
