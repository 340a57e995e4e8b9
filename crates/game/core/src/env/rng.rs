//! Deterministic random number generation for round resolution.
//!
//! Every random draw in a round (crit roll, target pick, drop rolls, spawn
//! rolls) goes through [`RandomSource`]. The production source is
//! [`RollStream`], which derives each draw from `(seed, round, character,
//! context)` with a stateless [`RngOracle`]; tests substitute scripted sources.
//!
//! # Determinism
//!
//! Given the same seed, round number and character, a [`RollStream`] yields
//! the same sequence of values, so a round can be replayed exactly.

/// RNG oracle for deterministic random number generation.
///
/// Implementations must be deterministic and produce the same values
/// given the same seed.
pub trait RngOracle: Send + Sync {
    /// Generate a random u32 value from a seed.
    fn next_u32(&self, seed: u64) -> u32;
}

/// PCG random number generator (Permuted Congruential Generator).
///
/// PCG-XSH-RR variant: 32-bit output from 64-bit state. Stateless here; the
/// caller supplies the state as the seed.
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

/// Compute a deterministic seed from round components.
///
/// * `base_seed` - Seed drawn by the runtime for this round
/// * `round` - Round number being resolved
/// * `character` - Character whose round this is
/// * `context` - Draw counter within the round
pub fn compute_seed(base_seed: u64, round: u64, character: u64, context: u32) -> u64 {
    // SplitMix64 / FxHash style mixing
    let mut hash = base_seed;

    hash ^= round.wrapping_mul(0x9e3779b97f4a7c15);
    hash ^= character.wrapping_mul(0x517cc1b727220a95);
    hash ^= (context as u64).wrapping_mul(0x85ebca6b);

    // Final avalanche step
    hash ^= hash >> 33;
    hash = hash.wrapping_mul(0xff51afd7ed558ccd);
    hash ^= hash >> 33;

    hash
}

/// Stateful source of random draws used by the roster and round processor.
pub trait RandomSource {
    /// Next raw 32-bit value.
    fn next_u32(&mut self) -> u32;

    /// Uniform value in `[0, bound)`; returns 0 when `bound` is 0.
    fn below(&mut self, bound: u32) -> u32 {
        if bound == 0 {
            return 0;
        }
        self.next_u32() % bound
    }

    /// Uniform value in `[min, max]` inclusive; returns `min` when `min >= max`.
    fn range(&mut self, min: i64, max: i64) -> i64 {
        if min >= max {
            return min;
        }
        let span = (max - min + 1).min(u32::MAX as i64) as u32;
        min + self.below(span) as i64
    }

    /// Percentage roll in `[0, 100)`.
    fn percent(&mut self) -> u32 {
        self.below(100)
    }

    /// Returns true with `chance_percent` probability.
    fn chance(&mut self, chance_percent: u32) -> bool {
        self.percent() < chance_percent
    }

    /// Fisher–Yates shuffle.
    fn shuffle<T>(&mut self, items: &mut [T])
    where
        Self: Sized,
    {
        for i in (1..items.len()).rev() {
            let j = self.below(i as u32 + 1) as usize;
            items.swap(i, j);
        }
    }
}

impl<S: RandomSource + ?Sized> RandomSource for &mut S {
    fn next_u32(&mut self) -> u32 {
        (**self).next_u32()
    }
}

/// Seeded stream of draws for one character's round.
#[derive(Clone, Debug)]
pub struct RollStream<R: RngOracle = PcgRng> {
    oracle: R,
    seed: u64,
    round: u64,
    character: u64,
    context: u32,
}

impl RollStream<PcgRng> {
    pub fn new(seed: u64, round: u64, character: u64) -> Self {
        Self::with_oracle(PcgRng, seed, round, character)
    }
}

impl<R: RngOracle> RollStream<R> {
    pub fn with_oracle(oracle: R, seed: u64, round: u64, character: u64) -> Self {
        Self {
            oracle,
            seed,
            round,
            character,
            context: 0,
        }
    }

    /// Number of values drawn so far.
    pub fn draws(&self) -> u32 {
        self.context
    }
}

impl<R: RngOracle> RandomSource for RollStream<R> {
    fn next_u32(&mut self) -> u32 {
        let seed = compute_seed(self.seed, self.round, self.character, self.context);
        self.context = self.context.wrapping_add(1);
        self.oracle.next_u32(seed)
    }
}
