//! Bet catalog and payout resolver.
//!
//! A [`BetInstruction`] from a strategy is untrusted: its `value` may have the wrong shape for
//! its kind, name a pocket the wheel does not have, or describe a split that is not adjacent on
//! the layout. [`Bet::from_instruction`] is the single place that turns instructions into the
//! typed [`Bet`] union. Everything after that point (coverage, payout) works on valid bets only.
//!
//! Payout ratios are profit multiples: a winning bet of `a` returns `a + r * a`, a losing bet
//! returns nothing.
//!
//! | bet | covers | r |
//! |-----|--------|---|
//! | straight | 1 | 35 |
//! | split | 2 | 17 |
//! | street | 3 | 11 |
//! | corner | 4 | 8 |
//! | line | 6 | 5 |
//! | basket | 0,1,2,3 (single-zero) / 0,00,1,2,3 (double-zero) | 8 / 6 |
//! | dozen, column | 12 | 2 |
//! | red, black, even, odd, low, high | 18 | 1 |
//!
//! Zero and double zero lose every outside bet. That rule is applied once, in [`Bet::covers`],
//! before any per-kind membership test runs.

use serde::Serialize;
use thiserror::Error;
use wheelhouse_types::roulette::{
    COLUMN_PAYOUT, CORNER_PAYOUT, DOZEN_PAYOUT, EVEN_MONEY_PAYOUT, FIRST_FOUR_PAYOUT,
    FIVE_NUMBER_PAYOUT, LINE_PAYOUT, SPLIT_PAYOUT, STRAIGHT_PAYOUT, STREET_PAYOUT,
};
use wheelhouse_types::{BetInstruction, BetKind, BetValue, Color, Pocket, WheelType};

/// Ways a strategy-supplied bet can break the bet contract.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum ContractViolation {
    #[error("{kind} bet amount is not finite ({amount})")]
    NonFiniteAmount { kind: BetKind, amount: f64 },
    #[error("{kind} bet amount must be positive (got {amount})")]
    NonPositiveAmount { kind: BetKind, amount: f64 },
    #[error("{kind} bet requires a value")]
    MissingValue { kind: BetKind },
    #[error("{kind} bet does not take a value (got {value:?})")]
    UnexpectedValue { kind: BetKind, value: BetValue },
    #[error("{kind} bet has invalid value {value:?}")]
    InvalidValue { kind: BetKind, value: BetValue },
    #[error("pocket {value} does not exist on a {wheel} wheel")]
    IllegalPocket { value: i32, wheel: WheelType },
    #[error("split {a}-{b} is not adjacent on the layout")]
    NotAdjacent { a: Pocket, b: Pocket },
}

/// A validated bet position.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Bet {
    Straight(Pocket),
    /// Ordered low-high so equal splits compare equal.
    Split(Pocket, Pocket),
    /// First number of the street (1, 4, ..., 34).
    Street(u8),
    /// Top-left number of the corner.
    Corner(u8),
    /// First number of the six-line (1, 4, ..., 31).
    Line(u8),
    Basket,
    /// 1-3.
    Dozen(u8),
    /// 1-3.
    Column(u8),
    Red,
    Black,
    Even,
    Odd,
    Low,
    High,
}

impl Bet {
    /// Validate the position described by `instruction` for `wheel`. The amount is not checked.
    pub fn from_instruction(
        instruction: &BetInstruction,
        wheel: WheelType,
    ) -> Result<Self, ContractViolation> {
        let kind = instruction.kind;
        let value = instruction.value;

        if !kind.takes_value() {
            if let Some(value) = value {
                return Err(ContractViolation::UnexpectedValue { kind, value });
            }
            return Ok(match kind {
                BetKind::Basket => Self::Basket,
                BetKind::Red => Self::Red,
                BetKind::Black => Self::Black,
                BetKind::Even => Self::Even,
                BetKind::Odd => Self::Odd,
                BetKind::Low => Self::Low,
                BetKind::High => Self::High,
                _ => return Err(ContractViolation::MissingValue { kind }),
            });
        }

        let value = value.ok_or(ContractViolation::MissingValue { kind })?;
        let invalid = || ContractViolation::InvalidValue { kind, value };

        match (kind, value) {
            (BetKind::Number, BetValue::Single(v)) => Ok(Self::Straight(pocket(v, wheel)?)),
            (BetKind::Split, BetValue::Pair([a, b])) => {
                let (a, b) = (pocket(a, wheel)?, pocket(b, wheel)?);
                if a == b {
                    return Err(invalid());
                }
                if !is_adjacent(a, b, wheel) {
                    return Err(ContractViolation::NotAdjacent { a, b });
                }
                Ok(Self::Split(a.min(b), a.max(b)))
            }
            (BetKind::Street, BetValue::Single(v)) if (1..=34).contains(&v) && (v - 1) % 3 == 0 => {
                Ok(Self::Street(v as u8))
            }
            (BetKind::Corner, BetValue::Single(v)) if (1..=32).contains(&v) && v % 3 != 0 => {
                Ok(Self::Corner(v as u8))
            }
            (BetKind::Line, BetValue::Single(v)) if (1..=31).contains(&v) && (v - 1) % 3 == 0 => {
                Ok(Self::Line(v as u8))
            }
            (BetKind::Dozen, BetValue::Single(v)) if (1..=3).contains(&v) => Ok(Self::Dozen(v as u8)),
            (BetKind::Column, BetValue::Single(v)) if (1..=3).contains(&v) => {
                Ok(Self::Column(v as u8))
            }
            _ => Err(invalid()),
        }
    }

    pub const fn kind(&self) -> BetKind {
        match self {
            Self::Straight(_) => BetKind::Number,
            Self::Split(..) => BetKind::Split,
            Self::Street(_) => BetKind::Street,
            Self::Corner(_) => BetKind::Corner,
            Self::Line(_) => BetKind::Line,
            Self::Basket => BetKind::Basket,
            Self::Dozen(_) => BetKind::Dozen,
            Self::Column(_) => BetKind::Column,
            Self::Red => BetKind::Red,
            Self::Black => BetKind::Black,
            Self::Even => BetKind::Even,
            Self::Odd => BetKind::Odd,
            Self::Low => BetKind::Low,
            Self::High => BetKind::High,
        }
    }

    /// Whether this bet wins when `pocket` comes up.
    pub fn covers(&self, pocket: Pocket) -> bool {
        match *self {
            Self::Straight(p) => p == pocket,
            Self::Split(a, b) => pocket == a || pocket == b,
            Self::Basket => pocket.is_zero() || matches!(pocket.number(), Some(1..=3)),
            Self::Street(v) => pocket.number().is_some_and(|n| (v..=v + 2).contains(&n)),
            Self::Line(v) => pocket.number().is_some_and(|n| (v..=v + 5).contains(&n)),
            Self::Corner(v) => pocket
                .number()
                .is_some_and(|n| n == v || n == v + 1 || n == v + 3 || n == v + 4),
            // Outside bets: the pocket accessors already exclude 0 and 00.
            Self::Dozen(d) => pocket.dozen() == Some(d),
            Self::Column(c) => pocket.column() == Some(c),
            Self::Red => pocket.color() == Color::Red,
            Self::Black => pocket.color() == Color::Black,
            Self::Even => pocket.is_even(),
            Self::Odd => pocket.is_odd(),
            Self::Low => pocket.is_low(),
            Self::High => pocket.is_high(),
        }
    }

    /// Every pocket on `wheel` this bet covers.
    pub fn coverage(&self, wheel: WheelType) -> Vec<Pocket> {
        wheel.pockets().filter(|p| self.covers(*p)).collect()
    }

    pub fn payout_ratio(&self, wheel: WheelType) -> u32 {
        payout_ratio(self.kind(), wheel)
    }

    /// Amount returned for a stake of `amount` when `pocket` wins (stake included), or 0.
    pub fn payout(&self, amount: f64, pocket: Pocket, wheel: WheelType) -> f64 {
        if self.covers(pocket) {
            amount + amount * self.payout_ratio(wheel) as f64
        } else {
            0.0
        }
    }
}

impl std::fmt::Display for Bet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Straight(p) => write!(f, "number {p}"),
            Self::Split(a, b) => write!(f, "split {a}-{b}"),
            Self::Street(v) => write!(f, "street {v}"),
            Self::Corner(v) => write!(f, "corner {v}"),
            Self::Line(v) => write!(f, "line {v}"),
            Self::Dozen(v) => write!(f, "dozen {v}"),
            Self::Column(v) => write!(f, "column {v}"),
            other => f.write_str(other.kind().as_str()),
        }
    }
}

fn pocket(value: i32, wheel: WheelType) -> Result<Pocket, ContractViolation> {
    u8::try_from(value)
        .ok()
        .and_then(|v| Pocket::new(v, wheel))
        .ok_or(ContractViolation::IllegalPocket { value, wheel })
}

/// Whether two distinct pockets share an edge on the betting layout.
pub fn is_adjacent(a: Pocket, b: Pocket, wheel: WheelType) -> bool {
    if a == b || !wheel.contains(a) || !wheel.contains(b) {
        return false;
    }
    match (a.number(), b.number()) {
        (Some(x), Some(y)) => {
            let (lo, hi) = (x.min(y), x.max(y));
            hi - lo == 3 || (hi - lo == 1 && lo % 3 != 0)
        }
        // 0 next to 00; only reachable on a double-zero wheel.
        (None, None) => true,
        (None, Some(n)) | (Some(n), None) => {
            let zero = if a.is_zero() { a } else { b };
            match wheel {
                WheelType::SingleZero => n <= 3,
                WheelType::DoubleZero if zero == Pocket::ZERO => n == 1 || n == 2,
                WheelType::DoubleZero => n == 2 || n == 3,
            }
        }
    }
}

/// Profit multiple paid on a winning bet of `kind`.
pub const fn payout_ratio(kind: BetKind, wheel: WheelType) -> u32 {
    match kind {
        BetKind::Number => STRAIGHT_PAYOUT,
        BetKind::Split => SPLIT_PAYOUT,
        BetKind::Street => STREET_PAYOUT,
        BetKind::Corner => CORNER_PAYOUT,
        BetKind::Line => LINE_PAYOUT,
        BetKind::Basket => match wheel {
            WheelType::SingleZero => FIRST_FOUR_PAYOUT,
            WheelType::DoubleZero => FIVE_NUMBER_PAYOUT,
        },
        BetKind::Dozen => DOZEN_PAYOUT,
        BetKind::Column => COLUMN_PAYOUT,
        BetKind::Red
        | BetKind::Black
        | BetKind::Even
        | BetKind::Odd
        | BetKind::Low
        | BetKind::High => EVEN_MONEY_PAYOUT,
    }
}

/// Number of pockets a bet of `kind` covers on `wheel`.
pub const fn coverage_size(kind: BetKind, wheel: WheelType) -> u32 {
    match kind {
        BetKind::Number => 1,
        BetKind::Split => 2,
        BetKind::Street => 3,
        BetKind::Corner => 4,
        BetKind::Line => 6,
        BetKind::Basket => match wheel {
            WheelType::SingleZero => 4,
            WheelType::DoubleZero => 5,
        },
        BetKind::Dozen | BetKind::Column => 12,
        _ => 18,
    }
}

/// Expected loss per unit staked on `kind`.
pub fn house_edge(kind: BetKind, wheel: WheelType) -> f64 {
    let returned = coverage_size(kind, wheel) * (payout_ratio(kind, wheel) + 1);
    1.0 - returned as f64 / wheel.pocket_count() as f64
}

/// One row of the bet catalog.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogEntry {
    pub kind: BetKind,
    pub payout_ratio: u32,
    pub coverage: u32,
    pub house_edge: f64,
}

/// Every bet kind with its odds on `wheel`.
pub fn catalog(wheel: WheelType) -> Vec<CatalogEntry> {
    BetKind::ALL
        .iter()
        .map(|&kind| CatalogEntry {
            kind,
            payout_ratio: payout_ratio(kind, wheel),
            coverage: coverage_size(kind, wheel),
            house_edge: house_edge(kind, wheel),
        })
        .collect()
}

/// A validated bet with its clamped stake.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlacedBet {
    pub bet: Bet,
    pub amount: f64,
}

impl PlacedBet {
    pub fn payout(&self, pocket: Pocket, wheel: WheelType) -> f64 {
        self.bet.payout(self.amount, pocket, wheel)
    }
}

/// Sum of stakes.
pub fn total_stake(bets: &[PlacedBet]) -> f64 {
    bets.iter().map(|b| b.amount).sum()
}

/// Sum of returns (stake included) for every bet covering `pocket`.
pub fn total_payout(bets: &[PlacedBet], pocket: Pocket, wheel: WheelType) -> f64 {
    bets.iter().map(|b| b.payout(pocket, wheel)).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SZ: WheelType = WheelType::SingleZero;
    const DZ: WheelType = WheelType::DoubleZero;

    fn p(value: u8) -> Pocket {
        Pocket::new(value, DZ).unwrap()
    }

    fn bet(instruction: BetInstruction, wheel: WheelType) -> Bet {
        Bet::from_instruction(&instruction, wheel).unwrap()
    }

    #[test]
    fn test_payout_ratios() {
        assert_eq!(payout_ratio(BetKind::Number, SZ), 35);
        assert_eq!(payout_ratio(BetKind::Split, SZ), 17);
        assert_eq!(payout_ratio(BetKind::Street, SZ), 11);
        assert_eq!(payout_ratio(BetKind::Corner, SZ), 8);
        assert_eq!(payout_ratio(BetKind::Line, SZ), 5);
        assert_eq!(payout_ratio(BetKind::Basket, SZ), 8);
        assert_eq!(payout_ratio(BetKind::Basket, DZ), 6);
        assert_eq!(payout_ratio(BetKind::Dozen, SZ), 2);
        assert_eq!(payout_ratio(BetKind::Column, DZ), 2);
        assert_eq!(payout_ratio(BetKind::Red, SZ), 1);
        assert_eq!(payout_ratio(BetKind::High, DZ), 1);
    }

    #[test]
    fn test_coverage_sizes_match_enumeration() {
        for wheel in [SZ, DZ] {
            for kind in BetKind::ALL {
                let representative = match kind {
                    BetKind::Number => Bet::Straight(p(17)),
                    BetKind::Split => Bet::Split(p(1), p(2)),
                    BetKind::Street => Bet::Street(1),
                    BetKind::Corner => Bet::Corner(1),
                    BetKind::Line => Bet::Line(1),
                    BetKind::Basket => Bet::Basket,
                    BetKind::Dozen => Bet::Dozen(1),
                    BetKind::Column => Bet::Column(1),
                    BetKind::Red => Bet::Red,
                    BetKind::Black => Bet::Black,
                    BetKind::Even => Bet::Even,
                    BetKind::Odd => Bet::Odd,
                    BetKind::Low => Bet::Low,
                    BetKind::High => Bet::High,
                };
                assert_eq!(
                    representative.coverage(wheel).len() as u32,
                    coverage_size(kind, wheel),
                    "{kind} on {wheel}"
                );
            }
        }
    }

    #[test]
    fn test_house_edge_bounds() {
        for entry in catalog(SZ) {
            assert!(
                (entry.house_edge - 1.0 / 37.0).abs() < 1e-12,
                "{:?}",
                entry
            );
        }
        for entry in catalog(DZ) {
            let expected = if entry.kind == BetKind::Basket {
                3.0 / 38.0
            } else {
                2.0 / 38.0
            };
            assert!((entry.house_edge - expected).abs() < 1e-12, "{:?}", entry);
        }

        // Exhaustive check against the enumerated coverage of every legal position.
        for wheel in [SZ, DZ] {
            let n = wheel.pocket_count() as f64;
            for bet in all_positions(wheel) {
                let covered = bet.coverage(wheel).len() as f64;
                let edge = 1.0 - covered * (bet.payout_ratio(wheel) + 1) as f64 / n;
                assert!(edge > 0.0269 && edge < 0.079, "{bet} on {wheel}: {edge}");
            }
        }
    }

    fn all_positions(wheel: WheelType) -> Vec<Bet> {
        let mut out = Vec::new();
        for pocket in wheel.pockets() {
            out.push(Bet::Straight(pocket));
            for other in wheel.pockets() {
                if pocket < other && is_adjacent(pocket, other, wheel) {
                    out.push(Bet::Split(pocket, other));
                }
            }
        }
        for v in (1..=34).step_by(3) {
            out.push(Bet::Street(v));
        }
        for v in (1..=32).filter(|v| v % 3 != 0) {
            out.push(Bet::Corner(v));
        }
        for v in (1..=31).step_by(3) {
            out.push(Bet::Line(v));
        }
        for v in 1..=3 {
            out.push(Bet::Dozen(v));
            out.push(Bet::Column(v));
        }
        out.extend([
            Bet::Basket,
            Bet::Red,
            Bet::Black,
            Bet::Even,
            Bet::Odd,
            Bet::Low,
            Bet::High,
        ]);
        out
    }

    #[test]
    fn test_zeros_lose_every_outside_bet() {
        for bet in all_positions(DZ).into_iter().filter(|b| b.kind().is_outside()) {
            assert!(!bet.covers(Pocket::ZERO), "{bet}");
            assert!(!bet.covers(Pocket::DOUBLE_ZERO), "{bet}");
        }
    }

    #[test]
    fn test_outside_bets_partition_numbers() {
        for n in 1..=36u8 {
            let pocket = p(n);
            assert!(Bet::Red.covers(pocket) ^ Bet::Black.covers(pocket));
            assert!(Bet::Even.covers(pocket) ^ Bet::Odd.covers(pocket));
            assert!(Bet::Low.covers(pocket) ^ Bet::High.covers(pocket));
            let dozens = (1..=3).filter(|&d| Bet::Dozen(d).covers(pocket)).count();
            let columns = (1..=3).filter(|&c| Bet::Column(c).covers(pocket)).count();
            assert_eq!(dozens, 1);
            assert_eq!(columns, 1);
        }
    }

    #[test]
    fn test_dozen_and_column_membership() {
        assert!(Bet::Dozen(1).covers(p(1)));
        assert!(Bet::Dozen(1).covers(p(12)));
        assert!(Bet::Dozen(2).covers(p(13)));
        assert!(Bet::Dozen(3).covers(p(36)));
        assert!(!Bet::Dozen(3).covers(p(24)));

        // Column 1: n % 3 == 1, column 2: n % 3 == 2, column 3: n % 3 == 0.
        assert!(Bet::Column(1).covers(p(1)));
        assert!(Bet::Column(1).covers(p(34)));
        assert!(Bet::Column(2).covers(p(35)));
        assert!(Bet::Column(3).covers(p(3)));
        assert!(Bet::Column(3).covers(p(36)));
        assert!(!Bet::Column(3).covers(p(1)));
    }

    #[test]
    fn test_inside_coverage() {
        let street = bet(BetInstruction::street(34, 1.0), SZ);
        assert_eq!(street.coverage(SZ), vec![p(34), p(35), p(36)]);

        let corner = bet(BetInstruction::corner(8, 1.0), SZ);
        assert_eq!(corner.coverage(SZ), vec![p(8), p(9), p(11), p(12)]);

        let line = bet(BetInstruction::line(31, 1.0), SZ);
        assert_eq!(line.coverage(SZ).len(), 6);
        assert!(line.covers(p(36)));
        assert!(!line.covers(Pocket::ZERO));

        assert_eq!(Bet::Basket.coverage(SZ), vec![p(0), p(1), p(2), p(3)]);
        assert_eq!(
            Bet::Basket.coverage(DZ),
            vec![p(0), p(1), p(2), p(3), Pocket::DOUBLE_ZERO]
        );

        let dz = bet(BetInstruction::straight(37, 1.0), DZ);
        assert!(dz.covers(Pocket::DOUBLE_ZERO));
        assert!(!dz.covers(p(36)));
    }

    #[test]
    fn test_split_adjacency() {
        assert!(is_adjacent(p(1), p(2), SZ));
        assert!(is_adjacent(p(2), p(3), SZ));
        assert!(!is_adjacent(p(3), p(4), SZ));
        assert!(is_adjacent(p(1), p(4), SZ));
        assert!(is_adjacent(p(33), p(36), SZ));
        assert!(!is_adjacent(p(1), p(5), SZ));

        assert!(is_adjacent(p(0), p(3), SZ));
        assert!(!is_adjacent(p(0), p(4), SZ));
        assert!(!is_adjacent(p(0), p(3), DZ));
        assert!(is_adjacent(Pocket::DOUBLE_ZERO, p(3), DZ));
        assert!(is_adjacent(Pocket::DOUBLE_ZERO, p(2), DZ));
        assert!(!is_adjacent(Pocket::DOUBLE_ZERO, p(1), DZ));
        assert!(is_adjacent(Pocket::ZERO, Pocket::DOUBLE_ZERO, DZ));
        assert!(!is_adjacent(Pocket::ZERO, Pocket::DOUBLE_ZERO, SZ));

        // 3 + 4 + 57 number splits on single zero, 5 zero splits on double zero.
        let sz_splits = all_positions(SZ)
            .iter()
            .filter(|b| matches!(b, Bet::Split(..)))
            .count();
        let dz_splits = all_positions(DZ)
            .iter()
            .filter(|b| matches!(b, Bet::Split(..)))
            .count();
        assert_eq!(sz_splits, 60);
        assert_eq!(dz_splits, 62);
    }

    #[test]
    fn test_split_is_order_insensitive() {
        assert_eq!(
            bet(BetInstruction::split(5, 2, 1.0), SZ),
            bet(BetInstruction::split(2, 5, 1.0), SZ)
        );
    }

    #[test]
    fn test_invalid_instructions() {
        let cases = [
            BetInstruction::straight(37, 1.0),
            BetInstruction::straight(-1, 1.0),
            BetInstruction::split(1, 5, 1.0),
            BetInstruction::split(4, 4, 1.0),
            BetInstruction::street(2, 1.0),
            BetInstruction::street(37, 1.0),
            BetInstruction::corner(3, 1.0),
            BetInstruction::corner(33, 1.0),
            BetInstruction::line(34, 1.0),
            BetInstruction::dozen(0, 1.0),
            BetInstruction::column(4, 1.0),
            BetInstruction::new(BetKind::Number, None, 1.0),
            BetInstruction::new(BetKind::Red, Some(BetValue::Single(1)), 1.0),
            BetInstruction::new(BetKind::Street, Some(BetValue::Pair([1, 4])), 1.0),
        ];
        for instruction in cases {
            assert!(
                Bet::from_instruction(&instruction, SZ).is_err(),
                "{instruction:?}"
            );
        }
        assert!(matches!(
            Bet::from_instruction(&BetInstruction::split(1, 5, 1.0), SZ),
            Err(ContractViolation::NotAdjacent { .. })
        ));
        assert!(matches!(
            Bet::from_instruction(&BetInstruction::straight(37, 1.0), SZ),
            Err(ContractViolation::IllegalPocket { value: 37, .. })
        ));
    }

    #[test]
    fn test_payout_returns_stake_plus_profit() {
        let straight = Bet::Straight(p(7));
        assert_eq!(straight.payout(2.0, p(7), SZ), 72.0);
        assert_eq!(straight.payout(2.0, p(8), SZ), 0.0);
        assert_eq!(Bet::Red.payout(5.0, p(1), SZ), 10.0);
        assert_eq!(Bet::Red.payout(5.0, Pocket::ZERO, SZ), 0.0);
        assert_eq!(Bet::Basket.payout(1.0, Pocket::DOUBLE_ZERO, DZ), 7.0);

        let bets = [
            PlacedBet {
                bet: Bet::Red,
                amount: 5.0,
            },
            PlacedBet {
                bet: Bet::Dozen(1),
                amount: 10.0,
            },
            PlacedBet {
                bet: Bet::Straight(p(2)),
                amount: 1.0,
            },
        ];
        assert_eq!(total_stake(&bets), 16.0);
        // 1 is red and in the first dozen.
        assert_eq!(total_payout(&bets, p(1), SZ), 10.0 + 30.0);
        assert_eq!(total_payout(&bets, Pocket::ZERO, SZ), 0.0);
    }
}
