use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Roulette bet kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BetKind {
    /// Single number (35:1).
    #[serde(alias = "straight")]
    Number,
    /// Two adjacent numbers (17:1).
    Split,
    /// Row of three (11:1).
    Street,
    /// Block of four (8:1).
    Corner,
    /// Two adjacent streets (5:1).
    #[serde(alias = "double-street", alias = "sixline")]
    Line,
    /// Zero(s) plus 1-3. Ratio depends on the wheel.
    Basket,
    /// 1-12, 13-24, 25-36 (2:1).
    Dozen,
    /// Board column (2:1).
    Column,
    Red,
    Black,
    Even,
    Odd,
    /// 1-18.
    Low,
    /// 19-36.
    High,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown bet kind: {0}")]
pub struct UnknownBetKind(pub String);

impl BetKind {
    pub const ALL: [Self; 14] = [
        Self::Number,
        Self::Split,
        Self::Street,
        Self::Corner,
        Self::Line,
        Self::Basket,
        Self::Dozen,
        Self::Column,
        Self::Red,
        Self::Black,
        Self::Even,
        Self::Odd,
        Self::Low,
        Self::High,
    ];

    /// Outside bets use the `minOutside` floor and never win on 0/00.
    pub const fn is_outside(self) -> bool {
        matches!(
            self,
            Self::Dozen
                | Self::Column
                | Self::Red
                | Self::Black
                | Self::Even
                | Self::Odd
                | Self::Low
                | Self::High
        )
    }

    /// Whether the kind carries a `value` payload.
    pub const fn takes_value(self) -> bool {
        matches!(
            self,
            Self::Number
                | Self::Split
                | Self::Street
                | Self::Corner
                | Self::Line
                | Self::Dozen
                | Self::Column
        )
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Number => "number",
            Self::Split => "split",
            Self::Street => "street",
            Self::Corner => "corner",
            Self::Line => "line",
            Self::Basket => "basket",
            Self::Dozen => "dozen",
            Self::Column => "column",
            Self::Red => "red",
            Self::Black => "black",
            Self::Even => "even",
            Self::Odd => "odd",
            Self::Low => "low",
            Self::High => "high",
        }
    }
}

impl std::fmt::Display for BetKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for BetKind {
    type Err = UnknownBetKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "number" | "straight" => Ok(Self::Number),
            "split" => Ok(Self::Split),
            "street" => Ok(Self::Street),
            "corner" => Ok(Self::Corner),
            "line" | "double-street" | "sixline" => Ok(Self::Line),
            "basket" => Ok(Self::Basket),
            "dozen" => Ok(Self::Dozen),
            "column" => Ok(Self::Column),
            "red" => Ok(Self::Red),
            "black" => Ok(Self::Black),
            "even" => Ok(Self::Even),
            "odd" => Ok(Self::Odd),
            "low" => Ok(Self::Low),
            "high" => Ok(Self::High),
            _ => Err(UnknownBetKind(s.to_string())),
        }
    }
}

/// Raw `value` payload as supplied by a strategy. Shape is checked by the resolver.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BetValue {
    Single(i32),
    Pair([i32; 2]),
}

/// A bet proposed by a strategy for the next spin.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BetInstruction {
    #[serde(rename = "type")]
    pub kind: BetKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<BetValue>,
    pub amount: f64,
}

impl BetInstruction {
    pub fn new(kind: BetKind, value: Option<BetValue>, amount: f64) -> Self {
        Self {
            kind,
            value,
            amount,
        }
    }

    /// A bet with no value payload (color, parity, high/low, basket).
    pub fn simple(kind: BetKind, amount: f64) -> Self {
        Self::new(kind, None, amount)
    }

    /// Straight-up bet. Use 37 for 00.
    pub fn straight(number: i32, amount: f64) -> Self {
        Self::new(BetKind::Number, Some(BetValue::Single(number)), amount)
    }

    pub fn split(a: i32, b: i32, amount: f64) -> Self {
        Self::new(BetKind::Split, Some(BetValue::Pair([a, b])), amount)
    }

    pub fn street(start: i32, amount: f64) -> Self {
        Self::new(BetKind::Street, Some(BetValue::Single(start)), amount)
    }

    pub fn corner(start: i32, amount: f64) -> Self {
        Self::new(BetKind::Corner, Some(BetValue::Single(start)), amount)
    }

    pub fn line(start: i32, amount: f64) -> Self {
        Self::new(BetKind::Line, Some(BetValue::Single(start)), amount)
    }

    pub fn basket(amount: f64) -> Self {
        Self::simple(BetKind::Basket, amount)
    }

    /// Dozen 1-3.
    pub fn dozen(dozen: i32, amount: f64) -> Self {
        Self::new(BetKind::Dozen, Some(BetValue::Single(dozen)), amount)
    }

    /// Column 1-3.
    pub fn column(column: i32, amount: f64) -> Self {
        Self::new(BetKind::Column, Some(BetValue::Single(column)), amount)
    }

    pub fn red(amount: f64) -> Self {
        Self::simple(BetKind::Red, amount)
    }

    pub fn black(amount: f64) -> Self {
        Self::simple(BetKind::Black, amount)
    }

    pub fn even(amount: f64) -> Self {
        Self::simple(BetKind::Even, amount)
    }

    pub fn odd(amount: f64) -> Self {
        Self::simple(BetKind::Odd, amount)
    }

    pub fn low(amount: f64) -> Self {
        Self::simple(BetKind::Low, amount)
    }

    pub fn high(amount: f64) -> Self {
        Self::simple(BetKind::High, amount)
    }
}
