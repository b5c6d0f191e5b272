//! Compact renderings used in tracing fields.

use std::fmt::Write;

use wheelhouse_types::{BetInstruction, BetValue};

use crate::catalog::PlacedBet;

/// `bet@amount` pairs, comma separated.
pub fn format_bets(bets: &[PlacedBet]) -> String {
    let mut out = String::with_capacity(bets.len().saturating_mul(16));
    for (idx, placed) in bets.iter().enumerate() {
        if idx > 0 {
            out.push(',');
        }
        let _ = write!(out, "{}@{}", placed.bet, placed.amount);
    }
    out
}

/// Same as [`format_bets`] for raw instructions, which may not be valid bets.
pub fn format_instructions(instructions: &[BetInstruction]) -> String {
    let mut out = String::with_capacity(instructions.len().saturating_mul(16));
    for (idx, instruction) in instructions.iter().enumerate() {
        if idx > 0 {
            out.push(',');
        }
        let _ = write!(out, "{}", instruction.kind);
        match instruction.value {
            Some(BetValue::Single(v)) => {
                let _ = write!(out, "({v})");
            }
            Some(BetValue::Pair([a, b])) => {
                let _ = write!(out, "({a}-{b})");
            }
            None => {}
        }
        let _ = write!(out, "@{}", instruction.amount);
    }
    out
}
