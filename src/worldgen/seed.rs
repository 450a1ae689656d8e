//! # Seed Module
//!
//! The world seed shared by every chunk of a world.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Exclusive upper bound for randomly drawn seeds.
pub const RANDOM_SEED_LIMIT: i32 = i32::MAX;

/// A 32-bit signed world seed.
///
/// Identical seeds always produce identical worlds. Negative values are valid and are
/// distinct from their positive counterparts.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Seed(pub i32);

impl Seed {
    /// Creates a seed from a raw integer.
    pub fn new(value: i32) -> Self {
        Seed(value)
    }

    /// Draws a seed uniformly from `[0, RANDOM_SEED_LIMIT)`.
    ///
    /// Used when a world is created without an explicit seed.
    pub fn random() -> Self {
        Seed(fastrand::i32(0..RANDOM_SEED_LIMIT))
    }

    /// Returns the raw integer.
    pub fn value(self) -> i32 {
        self.0
    }

    /// Reinterprets the seed bits as the unsigned seed expected by the noise sources.
    pub fn noise_seed(self) -> u32 {
        self.0 as u32
    }
}

impl From<i32> for Seed {
    fn from(value: i32) -> Self {
        Seed(value)
    }
}

impl fmt::Display for Seed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
