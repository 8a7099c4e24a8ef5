//! C ABI wrapper for the noisegen generators.
//!
//! Exposes functions to create/destroy a generator, draw samples one at a
//! time or into a caller-owned buffer, and set the output scale.
//!
//! ABI notes
//! - All functions are `extern "C"` and `#[no_mangle]`.
//! - Opaque handle type: `NoisegenSource` (heap-allocated; you own/delete it).
//! - Constructors return null when the configuration is rejected; the reason
//!   goes to the `log` facade, so hosts that install a logger can see it.
//!
//! Threading
//! - A handle is NOT thread-safe; use each one from a single thread at a time.
//!   Independent handles may live on independent threads.

use std::ptr;

use noisegen_core::prelude::*;

/// Opaque generator wrapper handed to C.
pub struct NoisegenSource {
    inner: Scaled<Box<dyn NoiseSource + Send>>,
}

fn into_handle(cfg: &NoiseConfig) -> *mut NoisegenSource {
    match cfg.build() {
        Ok(inner) => Box::into_raw(Box::new(NoisegenSource { inner })),
        Err(e) => {
            log::warn!("noisegen-ffi: rejected {:?}: {e}", cfg.noise);
            ptr::null_mut()
        }
    }
}

// --- Creation / destruction -------------------------------------------------------

/// Uniform samples in `[0, 1)`. Zero seed words select the defaults.
#[no_mangle]
pub extern "C" fn noisegen_uniform_create(x: u32, y: u32, z: u32, w: u32) -> *mut NoisegenSource {
    into_handle(&NoiseConfig::new(NoiseKind::Uniform).with_seed([x, y, z, w]))
}

/// White N(0, 1) samples.
#[no_mangle]
pub extern "C" fn noisegen_normal_create(x: u32, y: u32, z: u32, w: u32) -> *mut NoisegenSource {
    into_handle(&NoiseConfig::new(NoiseKind::Gaussian).with_seed([x, y, z, w]))
}

/// 1/f^2 noise from a single filter stage. Null on an invalid band.
#[no_mangle]
pub extern "C" fn noisegen_oof2_create(
    fmin: f64,
    fknee: f64,
    fsample: f64,
    x: u32,
    y: u32,
    z: u32,
    w: u32,
) -> *mut NoisegenSource {
    let noise = NoiseKind::Oof2 { fmin, fknee, fsample };
    into_handle(&NoiseConfig::new(noise).with_seed([x, y, z, w]))
}

/// f^slope noise from a planned cascade. Null on an invalid band or slope.
#[no_mangle]
#[allow(clippy::too_many_arguments)]
pub extern "C" fn noisegen_oof_create(
    slope: f64,
    fmin: f64,
    fknee: f64,
    fsample: f64,
    x: u32,
    y: u32,
    z: u32,
    w: u32,
) -> *mut NoisegenSource {
    let noise = NoiseKind::Oof { slope, fmin, fknee, fsample };
    into_handle(&NoiseConfig::new(noise).with_seed([x, y, z, w]))
}

/// Destroy a handle returned by one of the `noisegen_*_create` functions.
///
/// # Safety
/// `source` must be null or a live handle from this library, not used afterwards.
#[no_mangle]
pub unsafe extern "C" fn noisegen_destroy(source: *mut NoisegenSource) {
    if !source.is_null() {
        drop(Box::from_raw(source));
    }
}

// --- Sampling --------------------------------------------------------------------

/// Next sample, or NaN for a null handle.
///
/// # Safety
/// `source` must be null or a live handle.
#[no_mangle]
pub unsafe extern "C" fn noisegen_next(source: *mut NoisegenSource) -> f64 {
    match source.as_mut() {
        Some(s) => s.inner.next_sample(),
        None => f64::NAN,
    }
}

/// Write `len` samples to `out`. Returns the number written (0 on error).
///
/// # Safety
/// `source` must be null or a live handle; `out` must be null or valid for
/// `len` writes of `double`.
#[no_mangle]
pub unsafe extern "C" fn noisegen_fill(source: *mut NoisegenSource, out: *mut f64, len: usize) -> usize {
    let Some(s) = source.as_mut() else { return 0 };
    if out.is_null() || len == 0 {
        return 0;
    }
    let out = std::slice::from_raw_parts_mut(out, len);
    s.inner.fill(out);
    len
}

// --- Parameters ------------------------------------------------------------------

/// Map samples to `mean + sigma * x`. Returns 0 on success, -1 on a null
/// handle or non-finite values (scale left unchanged).
///
/// # Safety
/// `source` must be null or a live handle.
#[no_mangle]
pub unsafe extern "C" fn noisegen_set_scale(source: *mut NoisegenSource, mean: f64, sigma: f64) -> i32 {
    let Some(s) = source.as_mut() else { return -1 };
    match s.inner.set_scale(mean, sigma) {
        Ok(()) => 0,
        Err(e) => {
            log::warn!("noisegen-ffi: {e}");
            -1
        }
    }
}

/// Samples drawn from this handle so far (0 for null).
///
/// # Safety
/// `source` must be null or a live handle.
#[no_mangle]
pub unsafe extern "C" fn noisegen_produced(source: *const NoisegenSource) -> u64 {
    source.as_ref().map_or(0, |s| s.inner.produced())
}

/// Number of stages a cascade over `[fmin, fknee]` at `fsample` would run.
#[no_mangle]
pub extern "C" fn noisegen_num_poles(fmin: f64, fknee: f64, fsample: f64) -> i32 {
    num_poles(fmin, fknee, fsample)
}

// ------------------------------------ Tests --------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_handle_matches_rust_generator() {
        let h = noisegen_uniform_create(1, 2, 3, 4);
        assert!(!h.is_null());
        let mut rng = FlatRng::new(1, 2, 3, 4);
        unsafe {
            for _ in 0..16 {
                assert_eq!(noisegen_next(h), rng.next_uniform());
            }
            assert_eq!(noisegen_produced(h), 16);
            noisegen_destroy(h);
        }
    }

    #[test]
    fn fill_writes_len_samples_with_scale() {
        let h = noisegen_normal_create(0, 0, 0, 0);
        let mut plain = NormalRng::default();
        let mut buf = [0.0f64; 9];
        unsafe {
            assert_eq!(noisegen_set_scale(h, 5.0, 2.0), 0);
            assert_eq!(noisegen_fill(h, buf.as_mut_ptr(), buf.len()), 9);
            noisegen_destroy(h);
        }
        for &y in &buf {
            assert_eq!(y, 5.0 + 2.0 * plain.next_normal());
        }
    }

    #[test]
    fn invalid_band_yields_null() {
        assert!(noisegen_oof_create(-1.0, 1.0, 0.5, 100.0, 1, 2, 3, 4).is_null());
        assert!(noisegen_oof2_create(0.1, 60.0, 100.0, 1, 2, 3, 4).is_null());
        assert!(noisegen_oof_create(f64::NAN, 0.01, 1.0, 100.0, 0, 0, 0, 0).is_null());
    }

    #[test]
    fn null_handles_are_tolerated() {
        let mut buf = [0.0f64; 4];
        unsafe {
            assert!(noisegen_next(ptr::null_mut()).is_nan());
            assert_eq!(noisegen_fill(ptr::null_mut(), buf.as_mut_ptr(), 4), 0);
            assert_eq!(noisegen_set_scale(ptr::null_mut(), 0.0, 1.0), -1);
            assert_eq!(noisegen_produced(ptr::null()), 0);
            noisegen_destroy(ptr::null_mut());
        }
    }

    #[test]
    fn rejected_scale_keeps_previous() {
        let h = noisegen_oof2_create(1.15e-5, 0.05, 1.0, 0, 0, 0, 0);
        assert!(!h.is_null());
        let mut direct = Oof2Rng::new(1.15e-5, 0.05, 1.0, [0; 4]).unwrap();
        unsafe {
            assert_eq!(noisegen_set_scale(h, f64::INFINITY, 1.0), -1);
            assert_eq!(noisegen_next(h), direct.next_colored());
            noisegen_destroy(h);
        }
    }

    #[test]
    fn num_poles_passthrough() {
        assert_eq!(noisegen_num_poles(0.01, 1.0, 100.0), 6);
    }
}
