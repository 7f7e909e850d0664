// SPDX-License-Identifier: LGPL-3.0-or-later

//! Core data types for biquad processing.

use num_complex::Complex64;

// ─── Biquad filter types ───────────────────────────────────────────────────

/// Number of delay (memory) elements in a biquad filter.
pub const BIQUAD_D_ITEMS: usize = 2;

/// Normalized coefficients for a single biquad section.
///
/// `a0` is implicitly 1 and the feedback terms keep the standard sign:
/// ```text
///          b0 + b1*z^-1 + b2*z^-2
///   H(z) = ----------------------
///           1 + a1*z^-1 + a2*z^-2
/// ```
/// The processing kernel subtracts `a1` and `a2`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coefficients {
    pub b0: f64,
    pub b1: f64,
    pub b2: f64,
    pub a1: f64,
    pub a2: f64,
}

impl Default for Coefficients {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Coefficients {
    /// Pass-through section: `y[n] = x[n]`.
    pub const IDENTITY: Self = Self {
        b0: 1.0,
        b1: 0.0,
        b2: 0.0,
        a1: 0.0,
        a2: 0.0,
    };

    /// Build from already-normalized coefficients.
    pub const fn new(b0: f64, b1: f64, b2: f64, a1: f64, a2: f64) -> Self {
        Self { b0, b1, b2, a1, a2 }
    }

    /// Build from raw cookbook coefficients, dividing everything by `a0`.
    pub fn from_unnormalized(b0: f64, b1: f64, b2: f64, a0: f64, a1: f64, a2: f64) -> Self {
        // Divide rather than multiply by 1/a0: a numerator equal to the
        // denominator then normalizes to exactly b0 = 1, b1 = a1, b2 = a2.
        Self {
            b0: b0 / a0,
            b1: b1 / a0,
            b2: b2 / a0,
            a1: a1 / a0,
            a2: a2 / a0,
        }
    }

    /// Returns `true` if every coefficient is finite.
    pub fn is_finite(&self) -> bool {
        self.b0.is_finite()
            && self.b1.is_finite()
            && self.b2.is_finite()
            && self.a1.is_finite()
            && self.a2.is_finite()
    }

    /// Returns `true` if both poles lie strictly inside the unit circle.
    ///
    /// Jury criterion for `z^2 + a1*z + a2`: `|a2| < 1` and `|a1| < 1 + a2`.
    pub fn is_stable(&self) -> bool {
        self.is_finite() && self.a2.abs() < 1.0 && self.a1.abs() < 1.0 + self.a2
    }

    /// The two roots of `z^2 + a1*z + a2`.
    pub fn poles(&self) -> [Complex64; 2] {
        let half = Complex64::new(-0.5 * self.a1, 0.0);
        let disc = Complex64::new(self.a1 * self.a1 - 4.0 * self.a2, 0.0).sqrt() * 0.5;
        [half + disc, half - disc]
    }

    /// Complex response `H(e^{jw})` at normalized angular frequency `w`
    /// (radians per sample, `0..=PI`).
    ///
    /// Both polynomials are scaled by `e^{jw}` and split into real and
    /// imaginary parts, so equal or mirrored numerator and denominator
    /// coefficients give bit-identical or conjugate terms.
    pub fn response(&self, w: f64) -> Complex64 {
        let (sin_w, cos_w) = w.sin_cos();
        let num = Complex64::new(
            (self.b0 + self.b2) * cos_w + self.b1,
            (self.b0 - self.b2) * sin_w,
        );
        let den = Complex64::new(
            (1.0 + self.a2) * cos_w + self.a1,
            (1.0 - self.a2) * sin_w,
        );
        num / den
    }

    /// Magnitude and phase (radians) at normalized angular frequency `w`.
    pub fn magnitude_phase(&self, w: f64) -> (f64, f64) {
        let h = self.response(w);
        (h.norm(), h.arg())
    }
}

/// A biquad section: coefficients plus transposed direct form II state.
///
/// The recurrence is:
/// ```text
///   y  = b0*x + d0
///   d0 = b1*x - a1*y + d1
///   d1 = b2*x - a2*y
/// ```
#[derive(Debug, Clone, Default)]
pub struct Biquad {
    /// Delay memory elements.
    pub d: [f64; BIQUAD_D_ITEMS],
    /// Filter coefficients.
    pub coeffs: Coefficients,
}

impl Biquad {
    /// Create a section with the given coefficients and cleared state.
    pub fn new(coeffs: Coefficients) -> Self {
        Self {
            d: [0.0; BIQUAD_D_ITEMS],
            coeffs,
        }
    }

    /// Reset the delay memory to zero (clear filter state).
    pub fn reset(&mut self) {
        self.d = [0.0; BIQUAD_D_ITEMS];
    }
}
