//! Uniform generator: Marsaglia's 128-bit xorshift ("Xorshift RNGs",
//! J. Stat. Software 8(14), 2003).
//!
//! The state is four `u32` words, the period is 2^128 - 1. The default seeds
//! are the ones used by the `absrand` package, so sequences match existing
//! detector-simulation codes bit for bit.
//!
//! Not suitable for cryptography.

use crate::dsp::U32_TO_UNIT;

/// Canonical seed words, substituted for zero components.
pub const DEFAULT_SEED: [u32; 4] = [123_456_789, 362_436_069, 521_288_629, 88_675_123];

/// Burn-in steps applied after seeding.
const BURN_IN: usize = 16;

/// Scramble one seed word (9 rounds of xorshift 13/17/5).
#[inline]
fn twiddle(mut v: u32) -> u32 {
    for _ in 0..9 {
        v ^= v << 13;
        v ^= v >> 17;
        v ^= v << 5;
    }
    v
}

/// 128-bit xorshift state.
///
/// Exclusively owned by whoever draws from it; clone it to fork an identical
/// stream.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct FlatRng {
    x: u32,
    y: u32,
    z: u32,
    w: u32,
}

impl Default for FlatRng {
    /// Generator seeded with the canonical defaults (all components zero).
    fn default() -> Self {
        Self::new(0, 0, 0, 0)
    }
}

impl FlatRng {
    /// Seed the generator. Zero components fall back to [`DEFAULT_SEED`];
    /// every word is twiddled and the state is burnt in for 16 steps.
    #[must_use]
    pub fn new(x: u32, y: u32, z: u32, w: u32) -> Self {
        let pick = |v: u32, i: usize| twiddle(if v != 0 { v } else { DEFAULT_SEED[i] });
        let mut s = Self {
            x: pick(x, 0),
            y: pick(y, 1),
            z: pick(z, 2),
            w: pick(w, 3),
        };
        for _ in 0..BURN_IN {
            s.advance();
        }
        s
    }

    /// Same as [`FlatRng::new`] with the seed as an array.
    #[inline]
    #[must_use]
    pub fn with_seed(seed: [u32; 4]) -> Self {
        Self::new(seed[0], seed[1], seed[2], seed[3])
    }

    /// Rebuild a generator from raw state words, e.g. saved with [`FlatRng::words`].
    ///
    /// No twiddling or burn-in is applied. Returns `None` for the all-zero
    /// state, which is a fixed point of the recurrence.
    #[must_use]
    pub fn from_words(words: [u32; 4]) -> Option<Self> {
        if words == [0; 4] {
            return None;
        }
        let [x, y, z, w] = words;
        Some(Self { x, y, z, w })
    }

    /// Raw state words `[x, y, z, w]`.
    #[inline]
    #[must_use]
    pub fn words(&self) -> [u32; 4] {
        [self.x, self.y, self.z, self.w]
    }

    #[inline]
    fn advance(&mut self) {
        let t = self.x ^ (self.x << 11);
        self.x = self.y;
        self.y = self.z;
        self.z = self.w;
        self.w = (self.w ^ (self.w >> 19)) ^ (t ^ (t >> 8));
    }

    /// Advance one step and return the new last word.
    #[inline]
    pub fn next_u32(&mut self) -> u32 {
        self.advance();
        self.w
    }

    /// Uniform double in `[0, 1)`. Can be exactly `0.0`, never `1.0`.
    #[inline]
    pub fn next_uniform(&mut self) -> f64 {
        f64::from(self.next_u32()) * U32_TO_UNIT
    }

    /// Overwrite `out` with successive uniform draws, in generation order.
    #[inline]
    pub fn fill_uniform(&mut self, out: &mut [f64]) {
        for y in out.iter_mut() {
            *y = self.next_uniform();
        }
    }
}

// ----------------------------------- rand interop --------------------------------

#[cfg(feature = "rand")]
mod rand_impls {
    use super::FlatRng;

    impl rand::RngCore for FlatRng {
        #[inline]
        fn next_u32(&mut self) -> u32 {
            FlatRng::next_u32(self)
        }

        #[inline]
        fn next_u64(&mut self) -> u64 {
            let lo = u64::from(FlatRng::next_u32(self));
            let hi = u64::from(FlatRng::next_u32(self));
            (hi << 32) | lo
        }

        fn fill_bytes(&mut self, dest: &mut [u8]) {
            let mut chunks = dest.chunks_exact_mut(4);
            for chunk in &mut chunks {
                chunk.copy_from_slice(&FlatRng::next_u32(self).to_le_bytes());
            }
            let rest = chunks.into_remainder();
            if !rest.is_empty() {
                let bytes = FlatRng::next_u32(self).to_le_bytes();
                rest.copy_from_slice(&bytes[..rest.len()]);
            }
        }

        #[inline]
        fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
            self.fill_bytes(dest);
            Ok(())
        }
    }

    impl rand::SeedableRng for FlatRng {
        /// Four little-endian `u32` seed words.
        type Seed = [u8; 16];

        fn from_seed(seed: Self::Seed) -> Self {
            let mut words = [0u32; 4];
            for (w, chunk) in words.iter_mut().zip(seed.chunks_exact(4)) {
                *w = u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
            }
            FlatRng::with_seed(words)
        }
    }
}

// ------------------------------------ Tests --------------------------------------
