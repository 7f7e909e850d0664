// SPDX-License-Identifier: LGPL-3.0-or-later

//! A single biquad filter.
//!
//! Wraps a [`Biquad`] from `drain-dsp-lib` with coefficient design,
//! generic sample processing and frequency response evaluation.

use std::f64::consts::PI;

use drain_dsp_lib::filters::{
    biquad_process, biquad_process_inplace, biquad_process_strided, biquad_tick,
};
use drain_dsp_lib::sample::Sample;
use drain_dsp_lib::types::{Biquad, Coefficients};

use super::coeffs::{FilterParameters, FilterType, calc_biquad_coeffs};
use crate::error::Result;

/// One biquad section with its running state.
///
/// A new filter is the identity. Configuration replaces the coefficients
/// and keeps the delay state, so a filter can be retuned while running.
/// [`reset`](BiquadFilter::reset) clears the state.
///
/// # Examples
///
/// ```
/// use drain_dsp_units::filters::coeffs::{FilterParameters, FilterType};
/// use drain_dsp_units::filters::filter::BiquadFilter;
///
/// let params = FilterParameters::new(48000.0, 1000.0);
/// let mut filt = BiquadFilter::with_params(FilterType::LowPass, &params).unwrap();
///
/// let input = [1.0f32, 0.0, 0.0, 0.0];
/// let mut output = [0.0f32; 4];
/// filt.process_block(&mut output, &input);
/// ```
#[derive(Debug, Clone, Default)]
pub struct BiquadFilter {
    biquad: Biquad,
}

impl BiquadFilter {
    /// Create an identity filter with cleared state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a filter from precomputed coefficients.
    pub fn from_coefficients(coeffs: Coefficients) -> Self {
        Self {
            biquad: Biquad::new(coeffs),
        }
    }

    /// Create a filter from a design.
    pub fn with_params(filter_type: FilterType, params: &FilterParameters) -> Result<Self> {
        let mut filt = Self::new();
        filt.configure(filter_type, params)?;
        Ok(filt)
    }

    /// Redesign the filter. On error the previous coefficients are kept.
    pub fn configure(&mut self, filter_type: FilterType, params: &FilterParameters) -> Result<()> {
        match calc_biquad_coeffs(filter_type, params) {
            Ok(coeffs) => {
                self.set_coefficients(coeffs);
                Ok(())
            }
            Err(err) => {
                log::warn!("rejected {filter_type} design: {err}");
                Err(err)
            }
        }
    }

    /// Replace the coefficients, keeping the delay state.
    pub fn set_coefficients(&mut self, coeffs: Coefficients) {
        self.biquad.coeffs = coeffs;
    }

    /// Current coefficients.
    pub fn coefficients(&self) -> Coefficients {
        self.biquad.coeffs
    }

    /// Current delay registers.
    pub fn state(&self) -> [f64; 2] {
        self.biquad.d
    }

    /// Clear the delay state. Coefficients are unchanged.
    pub fn reset(&mut self) {
        self.biquad.reset();
    }

    #[inline(always)]
    pub(crate) fn tick(&mut self, x: f64) -> f64 {
        biquad_tick(&mut self.biquad, x)
    }

    /// Filter one sample.
    #[inline]
    pub fn process<S: Sample>(&mut self, sample: S) -> S {
        S::from_f64(self.tick(sample.to_f64()))
    }

    /// Filter `src` into `dst`.
    ///
    /// Processes `min(dst.len(), src.len())` samples.
    pub fn process_block<S: Sample>(&mut self, dst: &mut [S], src: &[S]) {
        biquad_process(dst, src, &mut self.biquad);
    }

    /// Filter a buffer in place.
    pub fn process_inplace<S: Sample>(&mut self, buf: &mut [S]) {
        biquad_process_inplace(buf, &mut self.biquad);
    }

    /// Filter `frames` samples read every `src_stride` elements of `src`
    /// and written every `dst_stride` elements of `dst`.
    ///
    /// This is how one channel of an interleaved buffer is filtered.
    /// `frames` is clamped to what both buffers hold. A zero stride
    /// filters nothing.
    pub fn process_strided<S: Sample>(
        &mut self,
        dst: &mut [S],
        src: &[S],
        frames: usize,
        src_stride: usize,
        dst_stride: usize,
    ) {
        biquad_process_strided(dst, src, frames, src_stride, dst_stride, &mut self.biquad);
    }

    /// Magnitude (linear) and phase (radians) at `freq` Hz for a stream
    /// sampled at `sample_rate` Hz.
    pub fn freq_response(&self, freq: f64, sample_rate: f64) -> (f64, f64) {
        self.biquad
            .coeffs
            .magnitude_phase(2.0 * PI * freq / sample_rate)
    }
}
