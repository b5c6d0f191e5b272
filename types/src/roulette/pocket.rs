use serde::{Deserialize, Serialize};

use super::{WheelType, DOUBLE_ZERO, MAX_NUMBER, RED_NUMBERS};

/// Pocket color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    Red,
    Black,
    Green,
}

/// A winning pocket. Values 0-36 are the printed numbers; 37 is "00".
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Pocket(u8);

impl Pocket {
    pub const ZERO: Pocket = Pocket(0);
    pub const DOUBLE_ZERO: Pocket = Pocket(DOUBLE_ZERO);

    /// Pocket for `value` if it exists on `wheel`.
    pub fn new(value: u8, wheel: WheelType) -> Option<Self> {
        let pocket = Self(value);
        wheel.contains(pocket).then_some(pocket)
    }

    /// Pocket for an internal index in `0..=37`. Callers must stay in range.
    pub(crate) const fn from_index(value: u8) -> Self {
        Self(value)
    }

    pub const fn value(self) -> u8 {
        self.0
    }

    /// 0 and 00. These lose every outside bet.
    pub const fn is_zero(self) -> bool {
        self.0 == 0 || self.0 == DOUBLE_ZERO
    }

    /// The printed number for 1-36, `None` for either zero.
    pub const fn number(self) -> Option<u8> {
        if self.is_zero() {
            None
        } else {
            Some(self.0)
        }
    }

    pub fn color(self) -> Color {
        match self.number() {
            None => Color::Green,
            Some(n) if RED_NUMBERS.contains(&n) => Color::Red,
            Some(_) => Color::Black,
        }
    }

    /// Dozen 1-3, `None` for either zero.
    pub fn dozen(self) -> Option<u8> {
        self.number().map(|n| (n - 1) / 12 + 1)
    }

    /// Board column 1-3, `None` for either zero.
    pub fn column(self) -> Option<u8> {
        self.number().map(|n| (n - 1) % 3 + 1)
    }

    /// Zeros are neither even nor odd.
    pub fn is_even(self) -> bool {
        self.number().is_some_and(|n| n % 2 == 0)
    }

    pub fn is_odd(self) -> bool {
        self.number().is_some_and(|n| n % 2 == 1)
    }

    /// 1-18.
    pub fn is_low(self) -> bool {
        self.number().is_some_and(|n| n <= 18)
    }

    /// 19-36.
    pub fn is_high(self) -> bool {
        self.number().is_some_and(|n| n >= 19)
    }
}

impl TryFrom<u8> for Pocket {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        if value <= DOUBLE_ZERO {
            Ok(Self(value))
        } else {
            Err(format!("pocket out of range: {value}"))
        }
    }
}

impl From<Pocket> for u8 {
    fn from(pocket: Pocket) -> Self {
        pocket.0
    }
}

impl std::fmt::Display for Pocket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.0 == DOUBLE_ZERO {
            f.write_str("00")
        } else {
            write!(f, "{}", self.0)
        }
    }
}

impl std::str::FromStr for Pocket {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s == "00" {
            return Ok(Self::DOUBLE_ZERO);
        }
        let value: u8 = s.parse().map_err(|_| format!("invalid pocket: {s}"))?;
        if value > MAX_NUMBER {
            return Err(format!("invalid pocket: {s}"));
        }
        Ok(Self(value))
    }
}

/// One drawn spin. Immutable once appended to a session's history.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpinRecord {
    pub winning_number: Pocket,
    pub winning_color: Color,
}

impl SpinRecord {
    pub fn new(pocket: Pocket) -> Self {
        Self {
            winning_number: pocket,
            winning_color: pocket.color(),
        }
    }
}

impl From<Pocket> for SpinRecord {
    fn from(pocket: Pocket) -> Self {
        Self::new(pocket)
    }
}
