//! Seeded Pseudo-Random Generator
//!
//! Every stochastic decision in a run (rule selection and turn direction
//! sampling) draws from one `PseudoRandom`, so the same seed always
//! reproduces the same structure.
//!
//! - Seed hash: djb2-xor over UTF-16 code units, last to first
//! - Stream: xorshift32 with shifts (21, 3, 4)

use crate::error::ConfigError;

/// Seed used when none is configured
pub const DEFAULT_SEED: &str = "default";

/// Source of uniform draws in `[0, 1)`.
///
/// The engine is generic over this so tests can count or script draws.
pub trait RandomSource {
    /// Next value in `[0, 1)`
    fn next(&mut self) -> f64;

    /// Integer in `[min, max)`
    fn next_int(&mut self, min: i64, max: i64) -> i64 {
        (self.next() * (max - min) as f64).floor() as i64 + min
    }

    /// Float in `[min, max)`
    fn next_float(&mut self, min: f64, max: f64) -> f64 {
        self.next() * (max - min) + min
    }
}

impl<R: RandomSource + ?Sized> RandomSource for &mut R {
    fn next(&mut self) -> f64 {
        (**self).next()
    }
}

/// Deterministic xorshift32 stream keyed by a string seed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PseudoRandom {
    state: u32,
}

impl PseudoRandom {
    /// Create a generator from a seed string.
    ///
    /// Seeds that are empty or hash to zero are rejected: xorshift never
    /// leaves the zero state, so such a seed would yield a constant stream.
    pub fn new(seed: &str) -> Result<Self, ConfigError> {
        if seed.is_empty() {
            return Err(ConfigError::MalformedSeed {
                seed: seed.to_string(),
                reason: "seed is empty",
            });
        }

        let state = Self::hash(seed);
        if state == 0 {
            return Err(ConfigError::MalformedSeed {
                seed: seed.to_string(),
                reason: "seed hashes to the degenerate zero state",
            });
        }

        Ok(Self { state })
    }

    /// Hash a seed string to the initial 32-bit state
    pub fn hash(seed: &str) -> u32 {
        let units: Vec<u16> = seed.encode_utf16().collect();
        units
            .iter()
            .rev()
            .fold(5381u32, |acc, &unit| acc.wrapping_mul(33) ^ u32::from(unit))
    }

    /// Current internal state
    pub fn state(&self) -> u32 {
        self.state
    }

    fn advance(&mut self) -> u32 {
        let mut x = self.state;
        x ^= x << 21;
        x ^= x >> 3;
        x ^= x << 4;
        self.state = x;
        x
    }
}

impl Default for PseudoRandom {
    fn default() -> Self {
        Self {
            state: Self::hash(DEFAULT_SEED),
        }
    }
}

impl RandomSource for PseudoRandom {
    fn next(&mut self) -> f64 {
        let value = self.advance() as f64 / u32::MAX as f64;
        // u32::MAX / u32::MAX is exactly 1.0; keep the upper bound open
        value.min(1.0 - f64::EPSILON)
    }
}
