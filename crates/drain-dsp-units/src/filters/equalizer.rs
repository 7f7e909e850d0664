// SPDX-License-Identifier: LGPL-3.0-or-later

//! Serial multi-band equalizer.
//!
//! An [`Equalizer`] is an ordered chain of [`Band`]s. Each input sample
//! passes through band 0, then band 1, and so on. The whole chain runs in
//! `f64` and the result is narrowed back to the stream's sample type once.

use drain_dsp_lib::sample::Sample;
use drain_dsp_lib::types::Coefficients;

use super::coeffs::{FilterParameters, FilterType, calc_biquad_coeffs};
use super::filter::BiquadFilter;
use crate::consts::RESPONSE_FLOOR_DB;
use crate::error::{FilterError, Result};

/// One stage of an equalizer.
///
/// A band remembers the design it was built from, if any, so the
/// equalizer can redesign it for a new sample rate. Bands built from raw
/// coefficients have no design.
#[derive(Debug, Clone)]
pub struct Band {
    design: Option<(FilterType, FilterParameters)>,
    filter: BiquadFilter,
}

impl Band {
    pub(crate) fn designed(
        filter_type: FilterType,
        params: FilterParameters,
        coeffs: Coefficients,
    ) -> Self {
        Self {
            design: Some((filter_type, params)),
            filter: BiquadFilter::from_coefficients(coeffs),
        }
    }

    pub(crate) fn raw(coeffs: Coefficients) -> Self {
        Self {
            design: None,
            filter: BiquadFilter::from_coefficients(coeffs),
        }
    }

    /// Swap in a new design, keeping the running state.
    fn retune(&mut self, design: Option<(FilterType, FilterParameters)>, coeffs: Coefficients) {
        self.design = design;
        self.filter.set_coefficients(coeffs);
    }

    /// Filter type the band was designed with.
    pub fn filter_type(&self) -> Option<FilterType> {
        self.design.map(|(ft, _)| ft)
    }

    /// Parameters the band was designed with.
    pub fn params(&self) -> Option<&FilterParameters> {
        self.design.as_ref().map(|(_, p)| p)
    }

    pub fn coefficients(&self) -> Coefficients {
        self.filter.coefficients()
    }

    /// Current delay registers.
    pub fn state(&self) -> [f64; 2] {
        self.filter.state()
    }

    /// Magnitude (linear) and phase (radians) of this band alone.
    pub fn freq_response(&self, freq: f64, sample_rate: f64) -> (f64, f64) {
        self.filter.freq_response(freq, sample_rate)
    }
}

/// Ordered chain of biquad bands applied in series.
///
/// An empty equalizer passes samples through unchanged. Configuration
/// calls either succeed completely or leave the equalizer untouched.
///
/// # Examples
///
/// ```
/// use drain_dsp_units::filters::coeffs::{FilterParameters, FilterType};
/// use drain_dsp_units::filters::equalizer::Equalizer;
///
/// let mut eq = Equalizer::new();
/// eq.add_band(FilterType::LowShelf, &FilterParameters::new(48000.0, 120.0).with_gain_db(3.0))
///     .unwrap();
/// eq.add_band(FilterType::Peaking, &FilterParameters::new(48000.0, 2500.0).with_q(1.4).with_gain_db(-2.0))
///     .unwrap();
///
/// let mut buf = vec![0.1f32; 256];
/// eq.process_inplace(&mut buf);
/// assert_eq!(eq.len(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Equalizer {
    bands: Vec<Band>,
}

impl Equalizer {
    /// Create an equalizer with no bands.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty equalizer with room for `capacity` bands.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            bands: Vec::with_capacity(capacity),
        }
    }

    /// Number of bands.
    pub fn len(&self) -> usize {
        self.bands.len()
    }

    /// Returns `true` if there are no bands.
    pub fn is_empty(&self) -> bool {
        self.bands.is_empty()
    }

    /// Band at `index`, if present.
    pub fn band(&self, index: usize) -> Option<&Band> {
        self.bands.get(index)
    }

    /// All bands in processing order.
    pub fn bands(&self) -> &[Band] {
        &self.bands
    }

    /// Design a band and append it to the chain.
    ///
    /// Returns the new band's index. On error no band is added.
    pub fn add_band(
        &mut self,
        filter_type: FilterType,
        params: &FilterParameters,
    ) -> Result<usize> {
        let coeffs = design(filter_type, params, self.bands.len())?;
        Ok(self.push_band(Band::designed(filter_type, *params, coeffs)))
    }

    /// Append a band with precomputed coefficients.
    ///
    /// Raw bands are kept as given and are not touched by
    /// [`set_sample_rate`](Equalizer::set_sample_rate).
    pub fn add_coefficients(&mut self, coeffs: Coefficients) -> usize {
        self.push_band(Band::raw(coeffs))
    }

    pub(crate) fn push_band(&mut self, band: Band) -> usize {
        let index = self.bands.len();
        match (band.filter_type(), band.params()) {
            (Some(ft), Some(p)) => log::debug!("band {index}: added {ft} {p:?}"),
            _ => log::debug!("band {index}: added {:?}", band.coefficients()),
        }
        self.bands.push(band);
        index
    }

    /// Redesign the band at `index`, keeping its delay state.
    ///
    /// The index is checked before the design.
    pub fn set_band(
        &mut self,
        index: usize,
        filter_type: FilterType,
        params: &FilterParameters,
    ) -> Result<()> {
        self.check_index(index)?;
        let coeffs = design(filter_type, params, index)?;
        self.retune_band(index, Some((filter_type, *params)), coeffs);
        Ok(())
    }

    /// Replace the band at `index` with precomputed coefficients, keeping
    /// its delay state.
    pub fn set_band_coefficients(&mut self, index: usize, coeffs: Coefficients) -> Result<()> {
        self.check_index(index)?;
        self.retune_band(index, None, coeffs);
        Ok(())
    }

    pub(crate) fn retune_band(
        &mut self,
        index: usize,
        design: Option<(FilterType, FilterParameters)>,
        coeffs: Coefficients,
    ) {
        log::debug!("band {index}: retuned to {coeffs:?}");
        self.bands[index].retune(design, coeffs);
    }

    /// Remove and return the band at `index`. Later bands shift down.
    pub fn remove_band(&mut self, index: usize) -> Result<Band> {
        self.check_index(index)?;
        log::debug!("band {index}: removed");
        Ok(self.bands.remove(index))
    }

    /// Remove every band.
    pub fn clear(&mut self) {
        self.bands.clear();
    }

    pub(crate) fn check_index(&self, index: usize) -> Result<()> {
        if index < self.bands.len() {
            Ok(())
        } else {
            Err(FilterError::IndexOutOfRange {
                index,
                len: self.bands.len(),
            })
        }
    }

    /// Redesign every designed band for `sample_rate`.
    ///
    /// Either all bands are redesigned or, if any design fails, none are.
    pub fn set_sample_rate(&mut self, sample_rate: f64) -> Result<()> {
        let plan = self.plan_sample_rate(sample_rate)?;
        self.apply_sample_rate(sample_rate, plan);
        Ok(())
    }

    /// Compute the coefficients every band would get at `sample_rate`
    /// without changing anything.
    pub(crate) fn plan_sample_rate(&self, sample_rate: f64) -> Result<Vec<Option<Coefficients>>> {
        if !(sample_rate.is_finite() && sample_rate > 0.0) {
            return Err(FilterError::invalid(
                "sample_rate",
                sample_rate,
                "must be positive and finite",
            ));
        }
        self.bands
            .iter()
            .enumerate()
            .map(|(index, band)| match band.design {
                Some((ft, p)) => design(ft, &p.with_sample_rate(sample_rate), index).map(Some),
                None => Ok(None),
            })
            .collect()
    }

    pub(crate) fn apply_sample_rate(&mut self, sample_rate: f64, plan: Vec<Option<Coefficients>>) {
        log::debug!("sample rate set to {sample_rate} Hz");
        for (band, coeffs) in self.bands.iter_mut().zip(plan) {
            if let (Some((ft, p)), Some(c)) = (band.design, coeffs) {
                band.retune(Some((ft, p.with_sample_rate(sample_rate))), c);
            }
        }
    }

    /// Clear the delay state of every band. Coefficients are unchanged.
    pub fn reset(&mut self) {
        for band in &mut self.bands {
            band.filter.reset();
        }
    }

    /// Run one sample through every band in order.
    #[inline]
    pub fn process<S: Sample>(&mut self, sample: S) -> S {
        if self.bands.is_empty() {
            return sample;
        }
        let mut x = sample.to_f64();
        for band in &mut self.bands {
            x = band.filter.tick(x);
        }
        S::from_f64(x)
    }

    /// Equalize `src` into `dst`, sample by sample.
    ///
    /// Processes `min(dst.len(), src.len())` samples. The result is the
    /// same as calling [`process`](Equalizer::process) on each sample.
    pub fn process_block<S: Sample>(&mut self, dst: &mut [S], src: &[S]) {
        for (out, &inp) in dst.iter_mut().zip(src) {
            *out = self.process(inp);
        }
    }

    /// Equalize a buffer in place.
    pub fn process_inplace<S: Sample>(&mut self, buf: &mut [S]) {
        for sample in buf.iter_mut() {
            *sample = self.process(*sample);
        }
    }

    /// Combined magnitude (linear) and phase (radians, wrapped to
    /// `-PI..=PI`) of the whole chain at `freq` Hz.
    pub fn freq_response(&self, freq: f64, sample_rate: f64) -> (f64, f64) {
        let (mag, phase) = self
            .bands
            .iter()
            .map(|b| b.freq_response(freq, sample_rate))
            .fold((1.0, 0.0), |(m, p), (bm, bp)| (m * bm, p + bp));
        (mag, phase.sin().atan2(phase.cos()))
    }

    /// Magnitude response of the chain in dB at `points` frequencies
    /// spaced evenly from 0 Hz to Nyquist.
    ///
    /// Returns `(frequency_hz, gain_db)` pairs. Each band's gain is floored
    /// at [`RESPONSE_FLOOR_DB`] before the bands are summed, so a chain
    /// with several deep notches can read below the floor.
    pub fn response_curve(&self, sample_rate: f64, points: usize) -> Vec<(f32, f32)> {
        let nyquist = sample_rate * 0.5;
        let last = points.saturating_sub(1).max(1) as f64;
        (0..points)
            .map(|i| {
                let freq = nyquist * i as f64 / last;
                let db: f64 = self
                    .bands
                    .iter()
                    .map(|b| {
                        let mag = b.freq_response(freq, sample_rate).0;
                        (20.0 * mag.log10()).max(RESPONSE_FLOOR_DB)
                    })
                    .sum();
                (freq as f32, db as f32)
            })
            .collect()
    }
}

/// Design a band's coefficients, logging rejections.
pub(crate) fn design(
    filter_type: FilterType,
    params: &FilterParameters,
    index: usize,
) -> Result<Coefficients> {
    calc_biquad_coeffs(filter_type, params).inspect_err(|err| {
        log::warn!("band {index}: rejected {filter_type} design: {err}");
    })
}
