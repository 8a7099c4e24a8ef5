//! Math backend selection and small numeric helpers shared by the generators.
//!
//! Design goals:
//! - `no_std` ready (guarded by the crate feature `no-std`)
//! - Same results as the platform libm on hosted targets, so reference
//!   vectors produced by C implementations are reproduced bit-for-bit
//! - Side-effect free helpers that are easy to test
//!
//! Conventions:
//! - All helpers operate on `f64`; the generators never drop to `f32`.
//! - Argument and return domains are documented per function.

use cfg_if::cfg_if;

// ----------------------------- Math backend selection -----------------------------

cfg_if! {
    // std backend (platform libm through the inherent float methods)
    if #[cfg(feature = "std")] {
        #[inline] pub(crate) fn m_ln(x: f64) -> f64 { x.ln() }
        #[inline] pub(crate) fn m_sqrt(x: f64) -> f64 { x.sqrt() }
        #[inline] pub(crate) fn m_log10(x: f64) -> f64 { x.log10() }
        #[inline] pub(crate) fn m_pow(x: f64, y: f64) -> f64 { x.powf(y) }
        #[inline] pub(crate) fn m_floor(x: f64) -> f64 { x.floor() }
    // libm (pure Rust port of musl) in no_std
    } else {
        #[inline] pub(crate) fn m_ln(x: f64) -> f64 { libm::log(x) }
        #[inline] pub(crate) fn m_sqrt(x: f64) -> f64 { libm::sqrt(x) }
        #[inline] pub(crate) fn m_log10(x: f64) -> f64 { libm::log10(x) }
        #[inline] pub(crate) fn m_pow(x: f64, y: f64) -> f64 { libm::pow(x, y) }
        #[inline] pub(crate) fn m_floor(x: f64) -> f64 { libm::floor(x) }
    }
}

// --------------------------------- Constants -------------------------------------

pub use core::f64::consts::PI;

/// 2π (commonly useful)
pub const TAU: f64 = 2.0 * PI;

/// Maps a `u32` draw onto `[0, 1)`: `1 / (1 + (2^32 - 1))`.
pub const U32_TO_UNIT: f64 = 1.0 / (1.0 + u32::MAX as f64);

// --------------------------------- Helpers ---------------------------------------

/// Angular frequency in decades: `log10(2π f)`.
///
/// `f` must be positive; zero gives `-inf` and negatives give NaN.
#[inline]
pub fn log_angular(f: f64) -> f64 {
    m_log10(TAU * f)
}

/// Inverse of [`log_angular`]: `10^w / 2π`.
#[inline]
pub fn freq_from_log_angular(w: f64) -> f64 {
    m_pow(10.0, w) / TAU
}

/// Bilinear pre-scaling of a corner frequency: `π f / fs`.
#[inline]
pub fn bilinear_w(f: f64, fs: f64) -> f64 {
    PI * f / fs
}

/// Mean and (population) variance of a slice, accumulated in `f64`.
///
/// Returns `(0.0, 0.0)` for an empty slice.
pub fn mean_var(samples: &[f64]) -> (f64, f64) {
    if samples.is_empty() {
        return (0.0, 0.0);
    }
    #[allow(clippy::cast_precision_loss)]
    let n = samples.len() as f64;
    let mean = samples.iter().sum::<f64>() / n;
    let var = samples.iter().map(|&x| (x - mean) * (x - mean)).sum::<f64>() / n;
    (mean, var)
}

// --------------------------------- Tests (std only) ------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn log_angular_roundtrip() {
        for f in [1.0e-5, 0.01, 1.0, 50.0, 1.0e4] {
            assert_relative_eq!(freq_from_log_angular(log_angular(f)), f, max_relative = 1e-12);
        }
    }

    #[test]
    fn unit_scale_keeps_max_below_one() {
        let top = f64::from(u32::MAX) * U32_TO_UNIT;
        assert!(top < 1.0, "top={top}");
        assert_eq!(0.0 * U32_TO_UNIT, 0.0);
    }

    #[test]
    fn mean_var_of_constant() {
        let (m, v) = mean_var(&[2.0; 16]);
        assert_relative_eq!(m, 2.0);
        assert_relative_eq!(v, 0.0);
        assert_eq!(mean_var(&[]), (0.0, 0.0));
    }
}
