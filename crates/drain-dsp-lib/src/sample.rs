// SPDX-License-Identifier: LGPL-3.0-or-later

//! Sample formats accepted by the biquad kernel.

use std::fmt::Debug;

/// A floating-point audio sample.
///
/// The kernel runs in `f64`; a `Sample` only has to convert itself to and
/// from that working precision.
pub trait Sample: Copy + Default + PartialEq + Debug + Send + Sync + 'static {
    /// Silence.
    const ZERO: Self;

    /// Widen to the kernel's working precision.
    fn to_f64(self) -> f64;

    /// Narrow from the kernel's working precision.
    fn from_f64(v: f64) -> Self;
}

impl Sample for f32 {
    const ZERO: Self = 0.0;

    #[inline(always)]
    fn to_f64(self) -> f64 {
        self as f64
    }

    #[inline(always)]
    fn from_f64(v: f64) -> Self {
        v as f32
    }
}

impl Sample for f64 {
    const ZERO: Self = 0.0;

    #[inline(always)]
    fn to_f64(self) -> f64 {
        self
    }

    #[inline(always)]
    fn from_f64(v: f64) -> Self {
        v
    }
}
