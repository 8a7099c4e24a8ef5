//! Colored (1/f^alpha) noise: Gaussian innovations driven through a pole cascade.
//!
//! - [`next_colored`] / [`fill_colored`] work on borrowed parts, for callers
//!   that keep the generator, cache and stages in their own structures.
//! - [`OofRng`] owns everything for a cascade planned from a slope.
//! - [`Oof2Rng`] is the single-stage 1/f^2 special case built directly from
//!   `(fmin, fknee, fsample)`.

use crate::error::ConfigError;
use crate::filters::{process_stages, Cascade, SinglePole};
use crate::gaussian::{next_normal, GaussCache, NormalRng};
use crate::planner::{plan, validate_band};
use crate::uniform::FlatRng;

/// One normal deviate filtered by every stage, in slice order.
#[inline]
pub fn next_colored(rng: &mut FlatRng, cache: &mut GaussCache, stages: &mut [SinglePole]) -> f64 {
    let x = next_normal(rng, cache);
    process_stages(stages, x)
}

/// Overwrite `out` with successive [`next_colored`] samples. Generator,
/// cache and every delay line carry over to the next call.
#[inline]
pub fn fill_colored(
    rng: &mut FlatRng,
    cache: &mut GaussCache,
    stages: &mut [SinglePole],
    out: &mut [f64],
) {
    for y in out.iter_mut() {
        *y = next_colored(rng, cache, stages);
    }
}

/// 1/f^alpha generator: zero mean, white above `fknee`, tilted by `slope`
/// between `fmin` and `fknee`.
#[derive(Clone, Debug, PartialEq)]
pub struct OofRng {
    normal: NormalRng,
    cascade: Cascade,
}

impl OofRng {
    /// Plan the cascade for `slope` over `[fmin, fknee]` at `fsample` and seed
    /// the generator.
    ///
    /// # Errors
    /// Band or slope rejected by [`plan`].
    pub fn new(
        slope: f64,
        fmin: f64,
        fknee: f64,
        fsample: f64,
        seed: [u32; 4],
    ) -> Result<Self, ConfigError> {
        let cascade = plan(slope, fmin, fknee, fsample)?;
        Ok(Self::from_parts(NormalRng::from_flat(FlatRng::with_seed(seed)), cascade))
    }

    /// Combine an existing Gaussian stream with a prepared cascade.
    #[inline]
    #[must_use]
    pub fn from_parts(normal: NormalRng, cascade: Cascade) -> Self {
        Self { normal, cascade }
    }

    #[inline]
    pub fn next_colored(&mut self) -> f64 {
        let (rng, cache) = self.normal.parts_mut();
        next_colored(rng, cache, self.cascade.stages_mut())
    }

    #[inline]
    pub fn fill_colored(&mut self, out: &mut [f64]) {
        let (rng, cache) = self.normal.parts_mut();
        fill_colored(rng, cache, self.cascade.stages_mut(), out);
    }

    /// Restart the stream: new seed, empty cache, cleared delay lines.
    pub fn reseed(&mut self, seed: [u32; 4]) {
        self.normal.reseed(seed);
        self.cascade.reset();
    }

    #[inline]
    #[must_use]
    pub fn cascade(&self) -> &Cascade {
        &self.cascade
    }

    #[inline]
    #[must_use]
    pub fn normal(&self) -> &NormalRng {
        &self.normal
    }
}

/// 1/f^2 generator: one [`SinglePole`] with its pole at `fmin` and its zero at `fknee`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Oof2Rng {
    normal: NormalRng,
    stage: SinglePole,
}

impl Oof2Rng {
    /// # Errors
    /// Band rejected by [`validate_band`].
    pub fn new(fmin: f64, fknee: f64, fsample: f64, seed: [u32; 4]) -> Result<Self, ConfigError> {
        validate_band(fmin, fknee, fsample)?;
        Ok(Self {
            normal: NormalRng::from_flat(FlatRng::with_seed(seed)),
            stage: SinglePole::new(fmin, fknee, fsample),
        })
    }

    #[inline]
    pub fn next_colored(&mut self) -> f64 {
        let (rng, cache) = self.normal.parts_mut();
        next_colored(rng, cache, core::slice::from_mut(&mut self.stage))
    }

    #[inline]
    pub fn fill_colored(&mut self, out: &mut [f64]) {
        let (rng, cache) = self.normal.parts_mut();
        fill_colored(rng, cache, core::slice::from_mut(&mut self.stage), out);
    }

    /// Restart the stream: new seed, empty cache, cleared delay line.
    pub fn reseed(&mut self, seed: [u32; 4]) {
        self.normal.reseed(seed);
        self.stage.reset();
    }

    #[inline]
    #[must_use]
    pub fn stage(&self) -> &SinglePole {
        &self.stage
    }

    /// The same generator as a general one-stage [`OofRng`].
    #[must_use]
    pub fn into_oof(self) -> OofRng {
        OofRng::from_parts(self.normal, Cascade::from(self.stage))
    }
}

// ------------------------------------ Tests --------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dsp::mean_var;
    use alloc::vec;
    use alloc::vec::Vec;

    #[test]
    fn fill_equals_repeated_single_calls() {
        let mut a = OofRng::new(-1.5, 0.01, 1.0, 100.0, [1, 2, 3, 4]).unwrap();
        let mut b = a.clone();
        let mut buf = vec![0.0; 1000];
        a.fill_colored(&mut buf[..333]);
        a.fill_colored(&mut buf[333..]);
        for (i, &x) in buf.iter().enumerate() {
            assert_eq!(x.to_bits(), b.next_colored().to_bits(), "sample {i}");
        }
        assert_eq!(a, b);
    }

    #[test]
    fn borrowed_parts_match_owned_generator() {
        let mut owned = OofRng::new(-1.0, 0.01, 1.0, 100.0, [5, 6, 7, 8]).unwrap();
        let mut rng = FlatRng::new(5, 6, 7, 8);
        let mut cache = GaussCache::Empty;
        let mut cascade = plan(-1.0, 0.01, 1.0, 100.0).unwrap();
        for _ in 0..200 {
            let x = next_colored(&mut rng, &mut cache, cascade.stages_mut());
            assert_eq!(x, owned.next_colored());
        }
    }

    #[test]
    fn one_stage_variant_matches_general_case() {
        let mut single = Oof2Rng::new(1.15e-5, 0.05, 1.0, [0; 4]).unwrap();
        let mut general = single.into_oof();
        assert_eq!(general.cascade().len(), 1);
        for _ in 0..100 {
            assert_eq!(single.next_colored(), general.next_colored());
        }
    }

    #[test]
    fn reseed_restarts_the_sequence() {
        let mut g = OofRng::new(-2.0, 0.01, 1.0, 100.0, [9, 9, 9, 9]).unwrap();
        let first: Vec<f64> = (0..17).map(|_| g.next_colored()).collect();
        g.reseed([9, 9, 9, 9]);
        let again: Vec<f64> = (0..17).map(|_| g.next_colored()).collect();
        assert_eq!(first, again);

        let mut h = Oof2Rng::new(0.01, 1.0, 100.0, [1, 1, 1, 1]).unwrap();
        let a = h.next_colored();
        h.next_colored();
        h.reseed([1, 1, 1, 1]);
        assert_eq!(h.next_colored(), a);
    }

    #[test]
    fn red_noise_has_more_low_frequency_power_than_white() {
        // lag-1 autocorrelation is ~0 for white noise and close to 1 for 1/f^2
        let mut g = OofRng::new(-2.0, 0.01, 1.0, 100.0, [1, 2, 3, 4]).unwrap();
        let mut buf = vec![0.0; 50_000];
        g.fill_colored(&mut buf);
        let (mean, var) = mean_var(&buf);
        let lag1 = buf
            .windows(2)
            .map(|w| (w[0] - mean) * (w[1] - mean))
            .sum::<f64>()
            / (buf.len() - 1) as f64;
        assert!(lag1 / var > 0.5, "rho1={}", lag1 / var);
    }

    #[test]
    fn invalid_band_is_rejected() {
        assert!(Oof2Rng::new(1.0, 0.5, 100.0, [0; 4]).is_err());
        assert!(OofRng::new(-1.0, 0.01, 1.0, 1.5, [0; 4]).is_err());
    }
}
