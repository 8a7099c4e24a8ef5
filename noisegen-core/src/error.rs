//! Configuration errors.
//!
//! Only the planning/configuration boundary can fail. Once a generator has
//! been built, drawing samples is infallible.

use thiserror::Error;

/// A frequency band, slope or scale that cannot produce a meaningful generator.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum ConfigError {
    /// `fmin` is zero, negative or not finite.
    #[error("minimum frequency must be positive and finite, got {0} Hz")]
    InvalidMinFrequency(f64),

    /// `fknee` does not lie above `fmin`.
    #[error("knee frequency {fknee} Hz must be finite and above the minimum frequency {fmin} Hz")]
    KneeNotAboveMin { fmin: f64, fknee: f64 },

    /// `fsample` does not exceed twice the knee frequency.
    #[error("sample rate {fsample} Hz must be finite and above twice the knee frequency {fknee} Hz")]
    BelowNyquist { fknee: f64, fsample: f64 },

    /// The spectral slope is NaN or infinite.
    #[error("spectral slope must be finite, got {0}")]
    NonFiniteSlope(f64),

    /// The pole-count policy yields no stage for this band.
    #[error("band {fmin}..{fknee} Hz sampled at {fsample} Hz yields {count} filter stages")]
    NoStages {
        fmin: f64,
        fknee: f64,
        fsample: f64,
        count: i32,
    },

    /// The output mean or sigma is NaN or infinite.
    #[error("output scale must be finite, got mean={mean} sigma={sigma}")]
    InvalidScale { mean: f64, sigma: f64 },
}
