//! Configuration records describing a generator, and their validation.
//!
//! With the `serde` feature these records (de)serialize as
//!
//! ```yaml
//! noise:
//!   kind: oof
//!   slope: -1.0
//!   fmin: 1.15e-5
//!   fknee: 0.05
//!   fsample: 50.0
//! seed: [1, 2, 3, 4]
//! mean: 0.0
//! sigma: 2.5e-3
//! ```
//!
//! `seed`, `mean` and `sigma` are optional (canonical seed, 0 and 1).

use alloc::boxed::Box;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::colored::{Oof2Rng, OofRng};
use crate::error::ConfigError;
use crate::gaussian::NormalRng;
use crate::planner::num_poles;
use crate::source::{NoiseSource, Scaled};
use crate::uniform::FlatRng;

/// Spectral shape of the generated noise.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "snake_case"))]
pub enum NoiseKind {
    /// Flat in `[0, 1)`.
    Uniform,
    /// White, N(0, 1).
    Gaussian,
    /// 1/f^2 below `fknee` down to `fmin`, single stage.
    Oof2 { fmin: f64, fknee: f64, fsample: f64 },
    /// f^slope between `fmin` and `fknee`, planned cascade.
    Oof { slope: f64, fmin: f64, fknee: f64, fsample: f64 },
}

impl NoiseKind {
    /// Number of filter stages this kind runs per sample.
    #[must_use]
    pub fn stage_count(&self) -> i32 {
        match *self {
            NoiseKind::Uniform | NoiseKind::Gaussian => 0,
            NoiseKind::Oof2 { .. } => 1,
            NoiseKind::Oof { fmin, fknee, fsample, .. } => num_poles(fmin, fknee, fsample),
        }
    }
}

/// Full generator description: shape, seed and output scale.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct NoiseConfig {
    pub noise: NoiseKind,
    /// Zero words select the canonical defaults.
    #[cfg_attr(feature = "serde", serde(default))]
    pub seed: [u32; 4],
    #[cfg_attr(feature = "serde", serde(default))]
    pub mean: f64,
    #[cfg_attr(feature = "serde", serde(default = "unit_sigma"))]
    pub sigma: f64,
}

#[cfg(feature = "serde")]
fn unit_sigma() -> f64 {
    1.0
}

impl NoiseConfig {
    /// Unit-scale configuration with the canonical seed.
    #[must_use]
    pub fn new(noise: NoiseKind) -> Self {
        Self { noise, seed: [0; 4], mean: 0.0, sigma: 1.0 }
    }

    #[must_use]
    pub fn with_seed(mut self, seed: [u32; 4]) -> Self {
        self.seed = seed;
        self
    }

    #[must_use]
    pub fn with_scale(mut self, mean: f64, sigma: f64) -> Self {
        self.mean = mean;
        self.sigma = sigma;
        self
    }

    /// Validate and build the generator.
    ///
    /// # Errors
    /// Invalid band, slope or scale.
    pub fn build(&self) -> Result<Scaled<Box<dyn NoiseSource + Send>>, ConfigError> {
        let inner: Box<dyn NoiseSource + Send> = match self.noise {
            NoiseKind::Uniform => Box::new(FlatRng::with_seed(self.seed)),
            NoiseKind::Gaussian => Box::new(NormalRng::from_flat(FlatRng::with_seed(self.seed))),
            NoiseKind::Oof2 { fmin, fknee, fsample } => {
                Box::new(Oof2Rng::new(fmin, fknee, fsample, self.seed)?)
            }
            NoiseKind::Oof { slope, fmin, fknee, fsample } => {
                Box::new(OofRng::new(slope, fmin, fknee, fsample, self.seed)?)
            }
        };
        log::debug!("built {:?} generator, seed {:?}", self.noise, self.seed);
        Scaled::new(inner, self.mean, self.sigma)
    }
}

// ------------------------------------ Tests --------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_matches_direct_construction() {
        let cfg = NoiseConfig::new(NoiseKind::Oof {
            slope: -1.0,
            fmin: 0.01,
            fknee: 1.0,
            fsample: 100.0,
        })
        .with_seed([1, 2, 3, 4]);
        let mut built = cfg.build().unwrap();
        let mut direct = OofRng::new(-1.0, 0.01, 1.0, 100.0, [1, 2, 3, 4]).unwrap();
        for _ in 0..50 {
            assert_eq!(built.next_sample(), direct.next_sample());
        }
    }

    #[test]
    fn build_rejects_invalid_band_and_scale() {
        let bad_band = NoiseConfig::new(NoiseKind::Oof2 { fmin: 1.0, fknee: 1.0, fsample: 10.0 });
        assert!(matches!(bad_band.build(), Err(ConfigError::KneeNotAboveMin { .. })));

        let bad_scale = NoiseConfig::new(NoiseKind::Gaussian).with_scale(0.0, f64::NAN);
        assert!(matches!(bad_scale.build(), Err(ConfigError::InvalidScale { .. })));
    }

    #[test]
    fn stage_count_per_kind() {
        assert_eq!(NoiseKind::Uniform.stage_count(), 0);
        assert_eq!(NoiseKind::Oof2 { fmin: 0.1, fknee: 1.0, fsample: 10.0 }.stage_count(), 1);
        let oof = NoiseKind::Oof { slope: -2.0, fmin: 0.01, fknee: 1.0, fsample: 100.0 };
        assert_eq!(oof.stage_count(), 6);
    }
}
