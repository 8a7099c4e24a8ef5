//! Gaussian transform: polar Box-Muller over [`FlatRng`].
//!
//! Every accepted trial yields two independent N(0, 1) deviates. The second
//! one is parked in a [`GaussCache`] and returned by the next call without
//! touching the uniform stream, so the pair `(FlatRng, GaussCache)` must be
//! treated as one unit. [`NormalRng`] bundles them.

use crate::dsp::{m_ln, m_sqrt};
use crate::uniform::FlatRng;

/// Spare deviate left over from the last Box-Muller pair.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub enum GaussCache {
    /// Next call must run a new trial.
    #[default]
    Empty,
    /// Next call returns this value and empties the cache.
    Full(f64),
}

impl GaussCache {
    #[inline]
    #[must_use]
    pub fn is_full(&self) -> bool {
        matches!(self, GaussCache::Full(_))
    }

    /// Raw `(empty, spare)` view, with `empty = 1` for [`GaussCache::Empty`].
    #[inline]
    #[must_use]
    pub fn to_raw(self) -> (i8, f64) {
        match self {
            GaussCache::Empty => (1, 0.0),
            GaussCache::Full(v) => (0, v),
        }
    }

    /// Inverse of [`GaussCache::to_raw`]; any non-zero flag means empty.
    #[inline]
    #[must_use]
    pub fn from_raw(empty: i8, spare: f64) -> Self {
        if empty != 0 {
            GaussCache::Empty
        } else {
            GaussCache::Full(spare)
        }
    }
}

/// Draw one standard-normal deviate.
///
/// Rejection loop: `v1, v2 ∈ [-1, 1)`, accepted when `0 < v1² + v2² < 1`
/// (about 1.27 trials on average).
#[inline]
pub fn next_normal(rng: &mut FlatRng, cache: &mut GaussCache) -> f64 {
    if let GaussCache::Full(spare) = *cache {
        *cache = GaussCache::Empty;
        return spare;
    }

    let (v1, v2, rsq) = loop {
        let v1 = 2.0 * rng.next_uniform() - 1.0;
        let v2 = 2.0 * rng.next_uniform() - 1.0;
        let rsq = v1 * v1 + v2 * v2;
        if rsq < 1.0 && rsq != 0.0 {
            break (v1, v2, rsq);
        }
    };

    let fac = m_sqrt(-2.0 * m_ln(rsq) / rsq);
    *cache = GaussCache::Full(v1 * fac);
    v2 * fac
}

/// Overwrite `out` with successive [`next_normal`] draws; the cache carries
/// over between calls.
#[inline]
pub fn fill_normal(rng: &mut FlatRng, cache: &mut GaussCache, out: &mut [f64]) {
    for y in out.iter_mut() {
        *y = next_normal(rng, cache);
    }
}

/// Gaussian generator (mean 0, sigma 1) owning its uniform stream and cache.
///
/// Rescale with [`Scaled`](crate::source::Scaled) for another mean/sigma.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct NormalRng {
    flat: FlatRng,
    cache: GaussCache,
}

impl NormalRng {
    #[must_use]
    pub fn new(x: u32, y: u32, z: u32, w: u32) -> Self {
        Self::from_flat(FlatRng::new(x, y, z, w))
    }

    /// Wrap an existing uniform stream with an empty cache.
    #[inline]
    #[must_use]
    pub fn from_flat(flat: FlatRng) -> Self {
        Self { flat, cache: GaussCache::Empty }
    }

    /// Restart from a new seed. The cache is cleared together with the stream.
    pub fn reseed(&mut self, seed: [u32; 4]) {
        *self = Self::from_flat(FlatRng::with_seed(seed));
    }

    #[inline]
    pub fn next_normal(&mut self) -> f64 {
        next_normal(&mut self.flat, &mut self.cache)
    }

    #[inline]
    pub fn fill_normal(&mut self, out: &mut [f64]) {
        fill_normal(&mut self.flat, &mut self.cache, out);
    }

    #[inline]
    #[must_use]
    pub fn cache(&self) -> GaussCache {
        self.cache
    }

    /// True when the next draw will come from the cache (odd draw count).
    #[inline]
    #[must_use]
    pub fn is_cached(&self) -> bool {
        self.cache.is_full()
    }

    #[inline]
    #[must_use]
    pub fn flat(&self) -> &FlatRng {
        &self.flat
    }

    /// Split borrow of the uniform stream and the cache.
    #[inline]
    pub(crate) fn parts_mut(&mut self) -> (&mut FlatRng, &mut GaussCache) {
        (&mut self.flat, &mut self.cache)
    }
}

// ------------------------------------ Tests --------------------------------------
