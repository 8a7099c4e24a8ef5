//! Filters: the first-order pole/zero section and the ordered cascade built from it.
//!
//! Goals
//! - Allocation free per sample
//! - Coefficients fixed at construction; only the delay line evolves
//! - Exact arithmetic order, so cascades reproduce reference outputs
//!
//! Contents
//! - `SinglePole` : bilinear first-order section approximating one pole/zero
//!                  pair of a 1/f spectrum segment
//! - `Cascade`    : stages applied input-to-output in creation order
//!
//! Notes
//! - With `w0 = π f_low / fs` and `w1 = π f_high / fs`:
//!   `c0 = (1+w1)/(1+w0)`, `c1 = -(1-w1)/(1+w0)`, `d0 = (1-w0)/(1+w0)`.
//!   For `0 < f_low < fs/π` the feedback `d0` lies in `(-1, 1)` and the
//!   section is stable.

use alloc::vec::Vec;
use core::ops::Deref;

use crate::dsp::bilinear_w;

/// First-order pole/zero section `y = c0 x + c1 x[n-1] + d0 y[n-1]`.
///
/// `#[repr(C)]` so a slice of stages has the flat `[c0, c1, d0, x1, y1]`
/// layout per stage expected by array-based hosts.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SinglePole {
    c0: f64,
    c1: f64,
    d0: f64,
    // states
    x1: f64,
    y1: f64,
}

impl SinglePole {
    /// Section with its pole at `f_low` and its zero at `f_high` (Hz), for
    /// sample rate `f_sample`. The delay line starts at zero.
    #[inline]
    #[must_use]
    pub fn new(f_low: f64, f_high: f64, f_sample: f64) -> Self {
        let w0 = bilinear_w(f_low, f_sample);
        let w1 = bilinear_w(f_high, f_sample);
        Self {
            c0: (1.0 + w1) / (1.0 + w0),
            c1: -(1.0 - w1) / (1.0 + w0),
            d0: (1.0 - w0) / (1.0 + w0),
            x1: 0.0,
            y1: 0.0,
        }
    }

    /// Process one sample.
    #[inline]
    pub fn process(&mut self, x: f64) -> f64 {
        let y = self.c0 * x + self.c1 * self.x1 + self.d0 * self.y1;
        self.x1 = x;
        self.y1 = y;
        y
    }

    /// Clear the delay line, keeping the coefficients.
    #[inline]
    pub fn reset(&mut self) {
        self.x1 = 0.0;
        self.y1 = 0.0;
    }

    /// `(c0, c1, d0)`
    #[inline]
    #[must_use]
    pub fn coeffs(&self) -> (f64, f64, f64) {
        (self.c0, self.c1, self.d0)
    }

    /// Last output.
    #[inline]
    #[must_use]
    pub fn value(&self) -> f64 {
        self.y1
    }

    /// Flat `[c0, c1, d0, x1, y1]` view.
    #[inline]
    #[must_use]
    pub fn to_raw(&self) -> [f64; 5] {
        [self.c0, self.c1, self.d0, self.x1, self.y1]
    }

    /// Inverse of [`SinglePole::to_raw`].
    #[inline]
    #[must_use]
    pub fn from_raw(raw: [f64; 5]) -> Self {
        let [c0, c1, d0, x1, y1] = raw;
        Self { c0, c1, d0, x1, y1 }
    }
}

/// Ordered chain of [`SinglePole`] stages. Each stage's output feeds the next
/// one; reordering the stages changes the spectrum.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Cascade {
    stages: Vec<SinglePole>,
}

impl Cascade {
    /// Chain stages in the given order.
    #[inline]
    #[must_use]
    pub fn new(stages: Vec<SinglePole>) -> Self {
        Self { stages }
    }

    /// Process one sample through every stage, first to last.
    #[inline]
    pub fn process(&mut self, x: f64) -> f64 {
        process_stages(&mut self.stages, x)
    }

    /// Clear every delay line.
    pub fn reset(&mut self) {
        self.stages.iter_mut().for_each(SinglePole::reset);
    }

    #[inline]
    pub fn stages_mut(&mut self) -> &mut [SinglePole] {
        &mut self.stages
    }

    #[inline]
    #[must_use]
    pub fn into_stages(self) -> Vec<SinglePole> {
        self.stages
    }
}

impl Deref for Cascade {
    type Target = [SinglePole];

    fn deref(&self) -> &[SinglePole] {
        &self.stages
    }
}

impl From<SinglePole> for Cascade {
    fn from(stage: SinglePole) -> Self {
        Self::new(alloc::vec![stage])
    }
}

/// Run `x` through `stages` in slice order.
#[inline]
pub fn process_stages(stages: &mut [SinglePole], x: f64) -> f64 {
    stages.iter_mut().fold(x, |acc, s| s.process(acc))
}

// ------------------------------------ Tests --------------------------------------
