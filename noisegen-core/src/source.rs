//! Sample-at-a-time noise source abstraction.
//!
//! This module defines the minimal `NoiseSource` trait implemented by every
//! generator in the crate, a `Scaled<S>` wrapper that maps unit noise onto a
//! physical mean and sigma, and a helper to render into buffers of other
//! sample types.
//!
//! Design goals
//! - No allocation per sample; buffer filling is plain repetition of `next_sample`
//! - Generic over the generator, so wrappers work without trait objects
//! - Object safe, so hosts can pick the noise kind at runtime (`Box<dyn NoiseSource>`)

use alloc::boxed::Box;
use alloc::vec;
use alloc::vec::Vec;

use num_traits::{NumCast, Zero};

use crate::colored::{Oof2Rng, OofRng};
use crate::error::ConfigError;
use crate::gaussian::NormalRng;
use crate::uniform::FlatRng;

/// Anything that can produce one noise sample at a time.
pub trait NoiseSource {
    /// Generate the next sample.
    fn next_sample(&mut self) -> f64;

    /// Overwrite `out` with successive samples, in draw order.
    fn fill(&mut self, out: &mut [f64]) {
        for y in out.iter_mut() {
            *y = self.next_sample();
        }
    }

    /// Draw `n` samples into a new vector.
    fn take_vec(&mut self, n: usize) -> Vec<f64> {
        let mut out = vec![0.0; n];
        self.fill(&mut out);
        out
    }
}

impl NoiseSource for FlatRng {
    #[inline]
    fn next_sample(&mut self) -> f64 {
        self.next_uniform()
    }

    fn fill(&mut self, out: &mut [f64]) {
        self.fill_uniform(out);
    }
}

impl NoiseSource for NormalRng {
    #[inline]
    fn next_sample(&mut self) -> f64 {
        self.next_normal()
    }

    fn fill(&mut self, out: &mut [f64]) {
        self.fill_normal(out);
    }
}

impl NoiseSource for Oof2Rng {
    #[inline]
    fn next_sample(&mut self) -> f64 {
        self.next_colored()
    }

    fn fill(&mut self, out: &mut [f64]) {
        self.fill_colored(out);
    }
}

impl NoiseSource for OofRng {
    #[inline]
    fn next_sample(&mut self) -> f64 {
        self.next_colored()
    }

    fn fill(&mut self, out: &mut [f64]) {
        self.fill_colored(out);
    }
}

impl<S: NoiseSource + ?Sized> NoiseSource for Box<S> {
    #[inline]
    fn next_sample(&mut self) -> f64 {
        (**self).next_sample()
    }

    fn fill(&mut self, out: &mut [f64]) {
        (**self).fill(out);
    }
}

impl<S: NoiseSource + ?Sized> NoiseSource for &mut S {
    #[inline]
    fn next_sample(&mut self) -> f64 {
        (**self).next_sample()
    }

    fn fill(&mut self, out: &mut [f64]) {
        (**self).fill(out);
    }
}

/// `mean + sigma * x` over an inner source; counts the samples produced.
#[derive(Clone, Debug, PartialEq)]
pub struct Scaled<S> {
    inner: S,
    mean: f64,
    sigma: f64,
    produced: u64,
}

impl<S: NoiseSource> Scaled<S> {
    /// # Errors
    /// [`ConfigError::InvalidScale`] when `mean` or `sigma` is not finite.
    pub fn new(inner: S, mean: f64, sigma: f64) -> Result<Self, ConfigError> {
        if !(mean.is_finite() && sigma.is_finite()) {
            return Err(ConfigError::InvalidScale { mean, sigma });
        }
        Ok(Self { inner, mean, sigma, produced: 0 })
    }

    /// # Errors
    /// Same as [`Scaled::new`].
    pub fn set_scale(&mut self, mean: f64, sigma: f64) -> Result<(), ConfigError> {
        if !(mean.is_finite() && sigma.is_finite()) {
            return Err(ConfigError::InvalidScale { mean, sigma });
        }
        self.mean = mean;
        self.sigma = sigma;
        Ok(())
    }

    #[inline] #[must_use] pub fn mean(&self) -> f64 { self.mean }
    #[inline] #[must_use] pub fn sigma(&self) -> f64 { self.sigma }

    /// Samples produced since construction.
    #[inline] #[must_use] pub fn produced(&self) -> u64 { self.produced }

    #[inline] pub fn inner_mut(&mut self) -> &mut S { &mut self.inner }
    #[inline] #[must_use] pub fn into_inner(self) -> S { self.inner }
}

impl<S: NoiseSource> NoiseSource for Scaled<S> {
    #[inline]
    fn next_sample(&mut self) -> f64 {
        self.produced += 1;
        self.mean + self.sigma * self.inner.next_sample()
    }

    fn fill(&mut self, out: &mut [f64]) {
        self.inner.fill(out);
        for y in out.iter_mut() {
            *y = self.mean + self.sigma * *y;
        }
        self.produced += out.len() as u64;
    }
}

/// Fill a buffer of any numeric sample type (e.g. `f32` for audio devices).
///
/// Values that do not fit the target type become zero.
pub fn render_into<S, T>(source: &mut S, out: &mut [T])
where
    S: NoiseSource + ?Sized,
    T: NumCast + Zero,
{
    for y in out.iter_mut() {
        *y = T::from(source.next_sample()).unwrap_or_else(T::zero);
    }
}

// ------------------------------------ Tests --------------------------------------
