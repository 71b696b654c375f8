//! RNG oracle for deterministic random number generation.
//!
//! Every probabilistic branch of a battle (evasion, crits, proc chances,
//! AI choices) draws from a [`Dice`] owned by the session. The dice derive
//! one seed per roll from the session seed and a roll counter, so a battle
//! replays identically for the same seed and the same action sequence.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// RNG oracle for deterministic random number generation.
///
/// Implementations must be deterministic and produce the same values
/// given the same seed.
pub trait RngOracle: Send + Sync {
    /// Generate a random u32 value from a seed.
    fn next_u32(&self, seed: u64) -> u32;

    /// Roll a d100 (1-100 inclusive).
    fn roll_d100(&self, seed: u64) -> u32 {
        (self.next_u32(seed) % 100) + 1
    }

    /// Generate a random value in range [min, max] inclusive.
    fn range(&self, seed: u64, min: u32, max: u32) -> u32 {
        if min >= max {
            return min;
        }
        let span = u64::from(max - min) + 1;
        min + (u64::from(self.next_u32(seed)) % span) as u32
    }
}

/// PCG random number generator (Permuted Congruential Generator).
///
/// PCG-XSH-RR variant: 32-bit output from 64-bit state, a single multiply,
/// xorshift and rotate per value.
#[derive(Clone, Copy, Debug, Default)]
pub struct PcgRng;

impl PcgRng {
    const MULTIPLIER: u64 = 6364136223846793005;
    const INCREMENT: u64 = 1442695040888963407;

    #[inline]
    fn pcg_step(state: u64) -> u64 {
        state
            .wrapping_mul(Self::MULTIPLIER)
            .wrapping_add(Self::INCREMENT)
    }

    /// XSH-RR output permutation.
    #[inline]
    fn pcg_output(state: u64) -> u32 {
        let xorshifted = (((state >> 18) ^ state) >> 27) as u32;
        let rot = (state >> 59) as u32;
        xorshifted.rotate_right(rot)
    }
}

impl RngOracle for PcgRng {
    fn next_u32(&self, seed: u64) -> u32 {
        let state = Self::pcg_step(seed);
        Self::pcg_output(state)
    }
}

/// Oracle that returns the same value for every seed.
///
/// `FixedRng(0)` makes every chance succeed; `FixedRng(u32::MAX)` makes
/// every chance below 1.0 fail. Used to pin outcomes in replays and tests.
#[derive(Clone, Copy, Debug)]
pub struct FixedRng(pub u32);

impl FixedRng {
    /// Every proc and crit fires, every evasion lands.
    pub const ALWAYS: Self = Self(0);
    /// No proc, crit or evasion ever fires.
    pub const NEVER: Self = Self(u32::MAX);
}

impl RngOracle for FixedRng {
    fn next_u32(&self, _seed: u64) -> u32 {
        self.0
    }
}

/// Oracle that replays a scripted sequence of unit rolls, then a fallback.
#[derive(Debug)]
pub struct SequenceRng {
    queue: Mutex<VecDeque<u32>>,
    fallback: u32,
}

impl SequenceRng {
    /// Creates an oracle from unit values in `[0, 1)`.
    pub fn from_units(units: &[f64], fallback: f64) -> Self {
        Self {
            queue: Mutex::new(units.iter().map(|&u| unit_to_u32(u)).collect()),
            fallback: unit_to_u32(fallback),
        }
    }
}

impl RngOracle for SequenceRng {
    fn next_u32(&self, _seed: u64) -> u32 {
        match self.queue.lock() {
            Ok(mut queue) => queue.pop_front().unwrap_or(self.fallback),
            Err(_) => self.fallback,
        }
    }
}

fn unit_to_u32(unit: f64) -> u32 {
    (unit.clamp(0.0, 1.0) * UNIT_SCALE).min(u32::MAX as f64) as u32
}

const UNIT_SCALE: f64 = 4_294_967_296.0;

/// Compute deterministic seed from session state components.
///
/// # Context Values
///
/// Use different context values when the same roll index needs several
/// independent streams (e.g. reward rolls vs. battle rolls).
pub fn compute_seed(session_seed: u64, nonce: u64, side: u32, context: u32) -> u64 {
    // SplitMix64 / FxHash multipliers
    let mut hash = session_seed;
    hash ^= nonce.wrapping_mul(0x9e3779b97f4a7c15);
    hash ^= (side as u64).wrapping_mul(0x517cc1b727220a95);
    hash ^= (context as u64).wrapping_mul(0x85ebca6b);

    // Final avalanche step
    hash ^= hash >> 33;
    hash = hash.wrapping_mul(0xff51afd7ed558ccd);
    hash ^= hash >> 33;

    hash
}

/// Session-owned roll source.
///
/// Wraps an oracle with the session seed and a monotonically increasing
/// roll counter.
#[derive(Clone)]
pub struct Dice {
    oracle: Arc<dyn RngOracle>,
    seed: u64,
    rolls: u64,
}

impl Dice {
    pub fn new(oracle: Arc<dyn RngOracle>, seed: u64) -> Self {
        Self {
            oracle,
            seed,
            rolls: 0,
        }
    }

    /// Number of rolls consumed so far.
    pub fn rolls(&self) -> u64 {
        self.rolls
    }

    fn next(&mut self, context: u32) -> u32 {
        let seed = compute_seed(self.seed, self.rolls, 0, context);
        self.rolls += 1;
        self.oracle.next_u32(seed)
    }

    /// Uniform value in `[0, 1)`.
    pub fn unit(&mut self) -> f64 {
        self.next(0) as f64 / UNIT_SCALE
    }

    /// Returns true with probability `p`.
    pub fn chance(&mut self, p: f64) -> bool {
        self.unit() < p
    }

    /// Uniform index in `0..len`. `len` must be non-zero.
    pub fn pick(&mut self, len: usize) -> usize {
        debug_assert!(len > 0);
        ((self.unit() * len as f64) as usize).min(len.saturating_sub(1))
    }

    /// Uniform integer in `[min, max]` inclusive.
    pub fn range(&mut self, min: u32, max: u32) -> u32 {
        let seed = compute_seed(self.seed, self.rolls, 0, 1);
        self.rolls += 1;
        self.oracle.range(seed, min, max)
    }
}

impl core::fmt::Debug for Dice {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Dice")
            .field("seed", &self.seed)
            .field("rolls", &self.rolls)
            .finish()
    }
}
