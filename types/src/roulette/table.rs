use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{
    BetKind, Pocket, DEFAULT_MAX_BET, DEFAULT_MIN_BET, DEFAULT_MIN_INCREMENTAL_BET,
    DEFAULT_MIN_OUTSIDE_BET, DOUBLE_ZERO_POCKETS, SINGLE_ZERO_POCKETS,
};

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{field} must be a positive finite number (got {value})")]
    NonPositive { field: &'static str, value: f64 },
    #[error("bet limits must satisfy min <= minOutside <= max (min={min}, minOutside={min_outside}, max={max})")]
    LimitOrder { min: f64, min_outside: f64, max: f64 },
    #[error("{field} must be > 0 (got {value})")]
    InvalidNonZero { field: &'static str, value: u64 },
}

pub fn ensure_positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NonPositive { field, value })
    }
}

pub fn ensure_nonzero(field: &'static str, value: u64) -> Result<(), ConfigError> {
    if value == 0 {
        return Err(ConfigError::InvalidNonZero { field, value });
    }
    Ok(())
}

/// Wheel layout.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WheelType {
    /// European wheel: 0-36.
    #[default]
    SingleZero,
    /// American wheel: 0-36 plus 00.
    DoubleZero,
}

impl WheelType {
    pub const fn pocket_count(self) -> u8 {
        match self {
            Self::SingleZero => SINGLE_ZERO_POCKETS,
            Self::DoubleZero => DOUBLE_ZERO_POCKETS,
        }
    }

    /// Whether `pocket` exists on this wheel.
    pub const fn contains(self, pocket: Pocket) -> bool {
        pocket.value() < self.pocket_count()
    }

    /// Every legal pocket, in ascending internal order (00 last).
    pub fn pockets(self) -> impl Iterator<Item = Pocket> {
        (0..self.pocket_count()).map(Pocket::from_index)
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SingleZero => "single-zero",
            Self::DoubleZero => "double-zero",
        }
    }
}

impl std::fmt::Display for WheelType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for WheelType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "single-zero" | "european" => Ok(Self::SingleZero),
            "double-zero" | "american" => Ok(Self::DoubleZero),
            other => Err(format!("unknown wheel type: {other}")),
        }
    }
}

/// How progressions step their bet size. Passed through to strategies verbatim.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IncrementMode {
    /// Step by the strategy's own base unit.
    #[default]
    Base,
    /// Step by `minIncrementalBet`.
    Fixed,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BetLimits {
    /// Floor for inside bets.
    pub min: f64,
    /// Floor for outside bets.
    pub min_outside: f64,
    /// Per-bet ceiling.
    pub max: f64,
}

impl Default for BetLimits {
    fn default() -> Self {
        Self {
            min: DEFAULT_MIN_BET,
            min_outside: DEFAULT_MIN_OUTSIDE_BET,
            max: DEFAULT_MAX_BET,
        }
    }
}

impl BetLimits {
    /// Minimum stake that applies to `kind`.
    pub fn floor_for(&self, kind: BetKind) -> f64 {
        if kind.is_outside() {
            self.min_outside
        } else {
            self.min
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        ensure_positive("betLimits.min", self.min)?;
        ensure_positive("betLimits.minOutside", self.min_outside)?;
        ensure_positive("betLimits.max", self.max)?;
        if self.min > self.min_outside || self.min_outside > self.max {
            return Err(ConfigError::LimitOrder {
                min: self.min,
                min_outside: self.min_outside,
                max: self.max,
            });
        }
        Ok(())
    }
}

/// Immutable per-run table configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TableConfig {
    pub bet_limits: BetLimits,
    pub wheel_type: WheelType,
    pub increment_mode: IncrementMode,
    pub min_incremental_bet: f64,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            bet_limits: BetLimits::default(),
            wheel_type: WheelType::default(),
            increment_mode: IncrementMode::default(),
            min_incremental_bet: DEFAULT_MIN_INCREMENTAL_BET,
        }
    }
}

impl TableConfig {
    pub fn new(wheel_type: WheelType, bet_limits: BetLimits) -> Self {
        Self {
            bet_limits,
            wheel_type,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.bet_limits.validate()?;
        ensure_positive("minIncrementalBet", self.min_incremental_bet)
    }

    /// Amount a progression should add or remove per step.
    pub fn increment_step(&self, base_unit: f64) -> f64 {
        match self.increment_mode {
            IncrementMode::Base => base_unit,
            IncrementMode::Fixed => self.min_incremental_bet,
        }
    }
}
