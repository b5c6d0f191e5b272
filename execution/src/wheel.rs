//! Winning-pocket sources.
//!
//! [`RngWheel`] draws pockets uniformly from the wheel layout using ChaCha20. A wheel built with
//! [`RngWheel::seeded`] is fully reproducible: the same `(seed, stream)` pair always yields the
//! same sequence, and distinct streams of one seed are independent sequences. Batch runs give
//! every session its own stream so no RNG instance is ever shared.
//!
//! [`ReplayWheel`] replays a recorded sequence, which is how fixed-outcome scenarios and
//! "what would have happened" replays are driven.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use thiserror::Error;
use wheelhouse_types::{Pocket, WheelType};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum WheelError {
    #[error("replay sequence exhausted after {spins} spins")]
    Exhausted { spins: usize },
    #[error("pocket {pocket} does not exist on a {wheel} wheel")]
    IllegalPocket { pocket: u8, wheel: WheelType },
}

/// Source of winning pockets for one session.
pub trait Wheel {
    /// Layout this wheel draws from.
    fn wheel_type(&self) -> WheelType;

    /// Draw the next winning pocket.
    fn spin(&mut self) -> Result<Pocket, WheelError>;
}

/// Uniform pseudo-random wheel.
pub struct RngWheel {
    wheel_type: WheelType,
    rng: ChaCha20Rng,
}

impl RngWheel {
    /// Deterministic wheel for `seed`, on ChaCha stream `stream`.
    pub fn seeded(wheel_type: WheelType, seed: u64, stream: u64) -> Self {
        let mut rng = ChaCha20Rng::seed_from_u64(seed);
        rng.set_stream(stream);
        Self { wheel_type, rng }
    }

    /// Wheel seeded from operating-system entropy.
    pub fn from_entropy(wheel_type: WheelType) -> Self {
        Self {
            wheel_type,
            rng: ChaCha20Rng::from_entropy(),
        }
    }

    /// Draw a pocket from a caller-supplied generator.
    pub fn draw<R: Rng + ?Sized>(
        wheel_type: WheelType,
        rng: &mut R,
    ) -> Result<Pocket, WheelError> {
        let index = rng.gen_range(0..wheel_type.pocket_count());
        Pocket::new(index, wheel_type).ok_or(WheelError::IllegalPocket {
            pocket: index,
            wheel: wheel_type,
        })
    }
}

impl Wheel for RngWheel {
    fn wheel_type(&self) -> WheelType {
        self.wheel_type
    }

    fn spin(&mut self) -> Result<Pocket, WheelError> {
        Self::draw(self.wheel_type, &mut self.rng)
    }
}

/// Replays a fixed pocket sequence, then reports exhaustion.
#[derive(Clone, Debug)]
pub struct ReplayWheel {
    wheel_type: WheelType,
    pockets: Vec<Pocket>,
    cursor: usize,
}

impl ReplayWheel {
    pub fn new(wheel_type: WheelType, pockets: Vec<Pocket>) -> Result<Self, WheelError> {
        if let Some(&pocket) = pockets.iter().find(|p| !wheel_type.contains(**p)) {
            return Err(WheelError::IllegalPocket {
                pocket: pocket.value(),
                wheel: wheel_type,
            });
        }
        Ok(Self {
            wheel_type,
            pockets,
            cursor: 0,
        })
    }

    /// Build from raw values (37 = 00).
    pub fn from_values(wheel_type: WheelType, values: &[u8]) -> Result<Self, WheelError> {
        let mut pockets = Vec::with_capacity(values.len());
        for &value in values {
            let pocket = Pocket::new(value, wheel_type).ok_or(WheelError::IllegalPocket {
                pocket: value,
                wheel: wheel_type,
            })?;
            pockets.push(pocket);
        }
        Self::new(wheel_type, pockets)
    }

    pub fn remaining(&self) -> usize {
        self.pockets.len() - self.cursor
    }

    /// Restart from the first recorded pocket.
    pub fn rewind(&mut self) {
        self.cursor = 0;
    }
}

impl Wheel for ReplayWheel {
    fn wheel_type(&self) -> WheelType {
        self.wheel_type
    }

    fn spin(&mut self) -> Result<Pocket, WheelError> {
        let pocket = self
            .pockets
            .get(self.cursor)
            .copied()
            .ok_or(WheelError::Exhausted {
                spins: self.pockets.len(),
            })?;
        self.cursor += 1;
        Ok(pocket)
    }
}

impl<W: Wheel + ?Sized> Wheel for &mut W {
    fn wheel_type(&self) -> WheelType {
        (**self).wheel_type()
    }

    fn spin(&mut self) -> Result<Pocket, WheelError> {
        (**self).spin()
    }
}
