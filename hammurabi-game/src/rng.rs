//! Randomness seam for the world events.
//!
//! The engine never owns a random source. Callers pass anything that
//! implements [`Dice`]: every `rand::Rng` does, and [`ScriptedDice`] replays a
//! fixed list of rolls so tests can pin exact outcomes.
use hmac::{Hmac, Mac};
use rand::rngs::SmallRng;
use rand::{Rng, RngCore, SeedableRng};
use sha2::Sha256;

use crate::numbers::{floor_f64_to_i64, i64_to_f64};

/// Source of the uniform draws behind plague, rats, immigration and market moves.
pub trait Dice {
    /// Uniform value in `[0, 1)`.
    fn roll_chance(&mut self) -> f64;

    /// Uniform integer in `[low, high]`. Returns `low` when the range is empty.
    fn roll_between(&mut self, low: i64, high: i64) -> i64;

    /// Uniform value in `[low, high)`. Returns `low` when the range is empty.
    fn roll_fraction(&mut self, low: f64, high: f64) -> f64;
}

impl<R: Rng + ?Sized> Dice for R {
    fn roll_chance(&mut self) -> f64 {
        self.r#gen::<f64>()
    }

    fn roll_between(&mut self, low: i64, high: i64) -> i64 {
        if low >= high {
            return low;
        }
        self.gen_range(low..=high)
    }

    fn roll_fraction(&mut self, low: f64, high: f64) -> f64 {
        if low.partial_cmp(&high) != Some(std::cmp::Ordering::Less) {
            return low;
        }
        self.gen_range(low..high)
    }
}

/// Deterministic dice replaying a fixed script of unit values.
///
/// Each scripted value `u` (clamped into `[0, 1)`) answers one roll:
/// `roll_chance` yields `u`, `roll_between` maps it onto the inclusive range
/// and `roll_fraction` onto the half-open one. Once the script runs out the
/// last value repeats; an empty script always rolls `0.0`.
#[derive(Debug, Clone, Default)]
pub struct ScriptedDice {
    script: Vec<f64>,
    cursor: usize,
}

impl ScriptedDice {
    #[must_use]
    pub fn new(script: impl Into<Vec<f64>>) -> Self {
        Self {
            script: script.into(),
            cursor: 0,
        }
    }

    /// Dice that always roll the same value.
    #[must_use]
    pub fn constant(value: f64) -> Self {
        Self::new(vec![value])
    }

    /// Number of rolls answered so far.
    #[must_use]
    pub const fn rolls(&self) -> usize {
        self.cursor
    }

    fn next_unit(&mut self) -> f64 {
        let value = match self.script.get(self.cursor) {
            Some(value) => *value,
            None => self.script.last().copied().unwrap_or(0.0),
        };
        self.cursor = self.cursor.saturating_add(1);
        if value.is_finite() {
            value.clamp(0.0, 1.0 - f64::EPSILON)
        } else {
            0.0
        }
    }
}

impl Dice for ScriptedDice {
    fn roll_chance(&mut self) -> f64 {
        self.next_unit()
    }

    fn roll_between(&mut self, low: i64, high: i64) -> i64 {
        let unit = self.next_unit();
        if low >= high {
            return low;
        }
        let span = i64_to_f64(high - low + 1);
        low.saturating_add(floor_f64_to_i64(unit * span)).min(high)
    }

    fn roll_fraction(&mut self, low: f64, high: f64) -> f64 {
        let unit = self.next_unit();
        if low.partial_cmp(&high) != Some(std::cmp::Ordering::Less) {
            return low;
        }
        unit.mul_add(high - low, low)
    }
}

/// Counting wrapper for RNG streams providing instrumentation.
#[derive(Debug, Clone)]
pub struct CountingRng<R> {
    rng: R,
    draws: u64,
}

impl<R: RngCore> CountingRng<R> {
    #[must_use]
    pub const fn new(rng: R) -> Self {
        Self { rng, draws: 0 }
    }

    /// Number of draw calls performed against this stream.
    #[must_use]
    pub const fn draws(&self) -> u64 {
        self.draws
    }
}

impl<R: RngCore> RngCore for CountingRng<R> {
    fn next_u32(&mut self) -> u32 {
        self.draws = self.draws.saturating_add(1);
        self.rng.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.draws = self.draws.saturating_add(1);
        self.rng.next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.draws = self.draws.saturating_add(1);
        self.rng.fill_bytes(dest);
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.draws = self.draws.saturating_add(1);
        self.rng.try_fill_bytes(dest)
    }
}

/// Derive an independent stream seed from a user seed and a domain tag.
#[must_use]
pub fn derive_stream_seed(user_seed: u64, domain_tag: &[u8]) -> u64 {
    let mut mac =
        Hmac::<Sha256>::new_from_slice(&user_seed.to_le_bytes()).expect("64-bit seed is valid key");
    mac.update(domain_tag);
    let digest = mac.finalize().into_bytes();
    let mut seed_bytes = [0_u8; 8];
    seed_bytes.copy_from_slice(&digest[..8]);
    u64::from_le_bytes(seed_bytes)
}

/// Seeded, counted world stream for one game.
#[must_use]
pub fn seeded_rng(user_seed: u64) -> CountingRng<SmallRng> {
    let stream_seed = derive_stream_seed(user_seed, b"harvest");
    CountingRng::new(SmallRng::seed_from_u64(stream_seed))
}
