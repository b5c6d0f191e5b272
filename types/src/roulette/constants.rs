/// Red numbers on a roulette layout. Every other number in 1-36 is black.
pub const RED_NUMBERS: [u8; 18] = [1, 3, 5, 7, 9, 12, 14, 16, 18, 19, 21, 23, 25, 27, 30, 32, 34, 36];

/// Highest numbered pocket on either wheel.
pub const MAX_NUMBER: u8 = 36;

/// Internal value used for the "00" pocket on double-zero wheels.
pub const DOUBLE_ZERO: u8 = 37;

/// Pocket counts per wheel layout.
pub const SINGLE_ZERO_POCKETS: u8 = 37;
pub const DOUBLE_ZERO_POCKETS: u8 = 38;

/// Profit multiples (stake is returned on top of these).
pub const STRAIGHT_PAYOUT: u32 = 35;
pub const SPLIT_PAYOUT: u32 = 17;
pub const STREET_PAYOUT: u32 = 11;
pub const CORNER_PAYOUT: u32 = 8;
pub const LINE_PAYOUT: u32 = 5;
/// First-four basket (0, 1, 2, 3) on a single-zero wheel.
pub const FIRST_FOUR_PAYOUT: u32 = 8;
/// Five-number basket (0, 00, 1, 2, 3) on a double-zero wheel.
pub const FIVE_NUMBER_PAYOUT: u32 = 6;
pub const DOZEN_PAYOUT: u32 = 2;
pub const COLUMN_PAYOUT: u32 = 2;
pub const EVEN_MONEY_PAYOUT: u32 = 1;

/// Default table limits.
pub const DEFAULT_MIN_BET: f64 = 1.0;
pub const DEFAULT_MIN_OUTSIDE_BET: f64 = 5.0;
pub const DEFAULT_MAX_BET: f64 = 1_000.0;
pub const DEFAULT_MIN_INCREMENTAL_BET: f64 = 1.0;

/// Consecutive contract-violating rounds tolerated before a session is faulted.
pub const DEFAULT_FAULT_TOLERANCE: u32 = 3;

/// Safety bound on rounds per session.
pub const DEFAULT_MAX_ROUNDS: u64 = 10_000;
