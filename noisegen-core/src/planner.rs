//! Pole-cascade planner: how many [`SinglePole`] stages approximate a
//! 1/f^alpha slope over `[fmin, fknee]`, and where their corners go.
//!
//! Stages are spread evenly in `log10(2π f)` between `fmin` and `fknee`.
//! Within each step `dp`, the pole and the zero are offset from each other
//! by `0.5 * a * dp` (with `a = -slope`), which tilts the aggregate response
//! towards `f^slope` in power.
//!
//! The stage count comes from [`num_poles`], an empirical policy (roughly two
//! stages per decade plus `log10(fsample)`). It is kept as-is for numerical
//! compatibility with existing reference outputs.

use alloc::vec::Vec;

use crate::dsp::{freq_from_log_angular, log_angular, m_floor, m_log10};
use crate::error::ConfigError;
use crate::filters::{Cascade, SinglePole};

/// Number of stages the planner will create for this band.
///
/// Pure formula, no validation: `floor((wmax - wmin) * 2 + log10(fsample))`
/// with `w = log10(2π f)`. Out-of-domain inputs give zero, negative or
/// saturated counts; [`plan`] rejects them.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn num_poles(fmin: f64, fknee: f64, fsample: f64) -> i32 {
    let wmin = log_angular(fmin);
    let wmax = log_angular(fknee);
    // `as` saturates, and maps NaN to 0
    m_floor((wmax - wmin) * 2.0 + m_log10(fsample)) as i32
}

/// Check `0 < fmin < fknee < fsample / 2`, all finite.
///
/// # Errors
/// The first violated condition, as a [`ConfigError`].
pub fn validate_band(fmin: f64, fknee: f64, fsample: f64) -> Result<(), ConfigError> {
    if !(fmin.is_finite() && fmin > 0.0) {
        return Err(ConfigError::InvalidMinFrequency(fmin));
    }
    if !(fknee.is_finite() && fknee > fmin) {
        return Err(ConfigError::KneeNotAboveMin { fmin, fknee });
    }
    if !(fsample.is_finite() && fsample > 2.0 * fknee) {
        return Err(ConfigError::BelowNyquist { fknee, fsample });
    }
    Ok(())
}

/// `(f_low, f_high)` corners of every stage, in creation order.
///
/// # Errors
/// Invalid band or slope, or a band for which [`num_poles`] is below one.
pub fn stage_corners(
    slope: f64,
    fmin: f64,
    fknee: f64,
    fsample: f64,
) -> Result<Vec<(f64, f64)>, ConfigError> {
    if let Err(e) = check(slope, fmin, fknee, fsample) {
        log::warn!("rejected 1/f^a configuration: {e}");
        return Err(e);
    }
    if !(-2.0..=0.0).contains(&slope) {
        log::warn!("slope {slope} is outside [-2, 0]; the cascade only approximates that range");
    }

    let nproc = num_poles(fmin, fknee, fsample);
    let wmin = log_angular(fmin);
    let wmax = log_angular(fknee);
    let a = -slope;
    let dp = (wmax - wmin) / f64::from(nproc);

    let mut p = wmin + 0.5 * (1.0 - 0.5 * a) * dp;
    let mut z = p + 0.5 * a * dp;
    let mut corners = Vec::with_capacity(usize::try_from(nproc).unwrap_or_default());
    for _ in 0..nproc {
        corners.push((freq_from_log_angular(p), freq_from_log_angular(z)));
        p += dp;
        z = p + 0.5 * a * dp;
    }
    Ok(corners)
}

/// Build the cascade approximating `f^slope` over `[fmin, fknee]` at `fsample`.
///
/// # Errors
/// See [`stage_corners`].
pub fn plan(slope: f64, fmin: f64, fknee: f64, fsample: f64) -> Result<Cascade, ConfigError> {
    let stages: Vec<SinglePole> = stage_corners(slope, fmin, fknee, fsample)?
        .into_iter()
        .map(|(f_low, f_high)| SinglePole::new(f_low, f_high, fsample))
        .collect();
    log::debug!(
        "planned {} stages for slope {slope} over {fmin}..{fknee} Hz at {fsample} Hz",
        stages.len()
    );
    Ok(Cascade::new(stages))
}

fn check(slope: f64, fmin: f64, fknee: f64, fsample: f64) -> Result<(), ConfigError> {
    validate_band(fmin, fknee, fsample)?;
    if !slope.is_finite() {
        return Err(ConfigError::NonFiniteSlope(slope));
    }
    let count = num_poles(fmin, fknee, fsample);
    if count < 1 {
        return Err(ConfigError::NoStages { fmin, fknee, fsample, count });
    }
    Ok(())
}

// ------------------------------------ Tests --------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use quickcheck::TestResult;
    use quickcheck_macros::quickcheck;
    use rstest::rstest;

    #[rstest]
    #[case(0.01, 1.0, 100.0, 6)]
    #[case(1.15e-5, 0.05, 1.0, 7)]
    #[case(1.0e-3, 0.5, 50.0, 7)]
    fn pole_count_matches_reference(
        #[case] fmin: f64,
        #[case] fknee: f64,
        #[case] fs: f64,
        #[case] expected: i32,
    ) {
        assert_eq!(num_poles(fmin, fknee, fs), expected);
    }

    #[test]
    fn reference_cascade_coefficients() {
        let cascade = plan(-2.0, 0.01, 1.0, 100.0).unwrap();
        assert_eq!(cascade.len(), 6);
        let expected = [
            (1.000_362_562_451_771_8, -0.999_009_316_347_605_15, 0.999_371_878_799_376_94),
            (1.000_780_834_022_302_6, -0.997_866_410_331_934_02, 0.998_647_244_354_236_8),
            (1.001_680_943_367_035_7, -0.995_406_906_848_225_97, 0.997_087_850_215_261_47),
            (1.003_615_405_410_176_9, -0.990_121_086_673_100_28, 0.993_736_492_083_277_19),
            (1.007_761_095_328_175_9, -0.978_793_197_616_777_85, 0.986_554_292_944_953_78),
            (1.016_592_000_906_942_7, -0.954_663_192_565_311_18, 0.971_255_193_472_253_75),
        ];
        for (stage, &(c0, c1, d0)) in cascade.iter().zip(expected.iter()) {
            let (g0, g1, h0) = stage.coeffs();
            assert_relative_eq!(g0, c0, max_relative = 1e-13);
            assert_relative_eq!(g1, c1, max_relative = 1e-13);
            assert_relative_eq!(h0, d0, max_relative = 1e-13);
        }
    }

    #[test]
    fn corners_span_the_band_in_order() {
        let corners = stage_corners(-1.0, 0.01, 1.0, 100.0).unwrap();
        assert_eq!(corners.len(), 6);
        for w in corners.windows(2) {
            assert!(w[1].0 > w[0].0 && w[1].1 > w[0].1);
        }
        let (first_pole, _) = corners[0];
        let (last_pole, _) = corners[corners.len() - 1];
        assert!(first_pole > 0.01 && last_pole < 1.0);
    }

    #[test]
    fn white_slope_puts_zero_on_pole() {
        // a = 0: pole and zero coincide, every stage is an identity filter
        let mut cascade = plan(0.0, 0.01, 1.0, 100.0).unwrap();
        for x in [1.0, -2.0, 0.5] {
            assert_relative_eq!(cascade.process(x), x, max_relative = 1e-12);
        }
    }

    #[rstest]
    #[case(0.0, 1.0, 100.0)]
    #[case(-1.0, 1.0, 100.0)]
    #[case(f64::NAN, 1.0, 100.0)]
    fn rejects_bad_fmin(#[case] fmin: f64, #[case] fknee: f64, #[case] fs: f64) {
        assert!(matches!(
            plan(-1.0, fmin, fknee, fs),
            Err(ConfigError::InvalidMinFrequency(_))
        ));
    }

    #[test]
    fn rejects_inverted_band() {
        assert_eq!(
            plan(-1.0, 1.0, 0.5, 100.0),
            Err(ConfigError::KneeNotAboveMin { fmin: 1.0, fknee: 0.5 })
        );
    }

    #[test]
    fn rejects_knee_above_nyquist() {
        assert_eq!(
            plan(-1.0, 0.01, 60.0, 100.0),
            Err(ConfigError::BelowNyquist { fknee: 60.0, fsample: 100.0 })
        );
    }

    #[test]
    fn rejects_non_finite_slope() {
        assert!(matches!(
            plan(f64::INFINITY, 0.01, 1.0, 100.0),
            Err(ConfigError::NonFiniteSlope(_))
        ));
    }

    #[test]
    fn rejects_empty_cascade() {
        // (log10 2) * 2 + log10 0.5 ≈ 0.30 -> 0 stages
        assert_eq!(num_poles(0.01, 0.02, 0.5), 0);
        assert!(matches!(
            plan(-1.0, 0.01, 0.02, 0.5),
            Err(ConfigError::NoStages { count: 0, .. })
        ));
    }

    #[quickcheck]
    fn poles_monotone_in_sample_rate(fs_a: u32, fs_b: u32) -> TestResult {
        if fs_a == 0 || fs_b == 0 {
            return TestResult::discard();
        }
        let (lo, hi) = if fs_a <= fs_b { (fs_a, fs_b) } else { (fs_b, fs_a) };
        TestResult::from_bool(
            num_poles(0.01, 1.0, f64::from(lo)) <= num_poles(0.01, 1.0, f64::from(hi)),
        )
    }

    #[quickcheck]
    fn poles_monotone_in_band_width(decades_a: u8, decades_b: u8) -> TestResult {
        let (lo, hi) = if decades_a <= decades_b {
            (decades_a, decades_b)
        } else {
            (decades_b, decades_a)
        };
        // fknee fixed, fmin moves down: log(fknee/fmin) grows with the decade count
        let span = |d: u8| f64::from(d) / 16.0;
        let fmin = |d: u8| 10f64.powf(-span(d));
        TestResult::from_bool(num_poles(fmin(lo), 1.0, 100.0) <= num_poles(fmin(hi), 1.0, 100.0))
    }
}
