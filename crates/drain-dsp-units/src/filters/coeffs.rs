// SPDX-License-Identifier: LGPL-3.0-or-later

//! Biquad coefficient design using the RBJ Audio EQ Cookbook.
//!
//! Coefficients come back normalized (`a0 = 1`) in the standard sign
//! convention of [`Coefficients`]: the denominator is
//! `1 + a1*z^-1 + a2*z^-2` and the kernel subtracts the feedback terms.
//!
//! Design runs in `f64` and validates its inputs first. An accepted
//! design is guaranteed finite and stable.

use std::f64::consts::{LN_2, PI};
use std::fmt;
use std::str::FromStr;

use drain_dsp_lib::types::Coefficients;

use crate::consts::{BUTTERWORTH_Q, DEFAULT_FREQUENCY, DEFAULT_GAIN_DB, DEFAULT_SAMPLE_RATE};
use crate::error::{FilterError, Result};

/// Supported biquad responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "kebab-case")
)]
pub enum FilterType {
    /// Bypass: the identity section.
    #[default]
    #[cfg_attr(feature = "serde", serde(alias = "none"))]
    Off,
    /// Second-order low-pass.
    LowPass,
    /// Second-order high-pass.
    HighPass,
    /// Band-pass with a constant 0 dB peak at the center frequency.
    BandPass,
    /// Band-reject.
    Notch,
    /// Peaking (bell) equalizer.
    #[cfg_attr(feature = "serde", serde(alias = "peak"))]
    Peaking,
    /// Low-shelf equalizer.
    LowShelf,
    /// High-shelf equalizer.
    HighShelf,
    /// All-pass (phase only).
    AllPass,
}

impl FilterType {
    /// Every filter type, in declaration order.
    pub const ALL: [FilterType; 9] = [
        FilterType::Off,
        FilterType::LowPass,
        FilterType::HighPass,
        FilterType::BandPass,
        FilterType::Notch,
        FilterType::Peaking,
        FilterType::LowShelf,
        FilterType::HighShelf,
        FilterType::AllPass,
    ];

    /// Canonical textual name.
    pub fn name(self) -> &'static str {
        match self {
            FilterType::Off => "off",
            FilterType::LowPass => "low-pass",
            FilterType::HighPass => "high-pass",
            FilterType::BandPass => "band-pass",
            FilterType::Notch => "notch",
            FilterType::Peaking => "peaking",
            FilterType::LowShelf => "low-shelf",
            FilterType::HighShelf => "high-shelf",
            FilterType::AllPass => "all-pass",
        }
    }

    /// Whether `gain_db` affects the design.
    pub fn uses_gain(self) -> bool {
        matches!(
            self,
            FilterType::Peaking | FilterType::LowShelf | FilterType::HighShelf
        )
    }

    /// Whether this is a shelving type (the only ones that accept a slope).
    pub fn is_shelf(self) -> bool {
        matches!(self, FilterType::LowShelf | FilterType::HighShelf)
    }
}

impl fmt::Display for FilterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FilterType {
    type Err = FilterError;

    /// Parses canonical names case-insensitively. `none` and `peak` are
    /// accepted as aliases for [`FilterType::Off`] and [`FilterType::Peaking`].
    fn from_str(s: &str) -> Result<Self> {
        let lower = s.trim().to_ascii_lowercase();
        match lower.as_str() {
            "none" => return Ok(FilterType::Off),
            "peak" => return Ok(FilterType::Peaking),
            _ => {}
        }
        FilterType::ALL
            .into_iter()
            .find(|ft| ft.name() == lower)
            .ok_or_else(|| FilterError::UnknownFilterType(s.to_string()))
    }
}

/// How the width of a response is expressed.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "kebab-case")
)]
pub enum Width {
    /// Quality factor.
    Q(f64),
    /// Bandwidth in octaves (band-edge to band-edge for peaking and
    /// band-pass types, midpoint-gain points for shelves).
    Bandwidth(f64),
    /// Shelf slope. Valid for shelving types only.
    Slope(f64),
}

impl Default for Width {
    fn default() -> Self {
        Width::Q(BUTTERWORTH_Q)
    }
}

impl Width {
    /// Error naming this width as the cause of an unusable design.
    fn degenerate(self) -> FilterError {
        match self {
            Width::Q(q) => FilterError::invalid(
                "q",
                q,
                "too small for a stable design at this frequency",
            ),
            Width::Bandwidth(bw) => FilterError::invalid(
                "bandwidth",
                bw,
                "too wide for a stable design at this frequency",
            ),
            Width::Slope(s) => FilterError::invalid(
                "slope",
                s,
                "too shallow for a stable design at this frequency",
            ),
        }
    }
}

/// Design inputs for a single biquad.
///
/// Built with chained `with_*` setters:
///
/// ```
/// use drain_dsp_units::filters::coeffs::FilterParameters;
///
/// let p = FilterParameters::new(44100.0, 250.0).with_q(2.0).with_gain_db(-4.5);
/// assert_eq!(p.frequency, 250.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct FilterParameters {
    /// Sample rate in Hz.
    pub sample_rate: f64,
    /// Center or cutoff frequency in Hz.
    pub frequency: f64,
    /// Width of the response.
    pub width: Width,
    /// Gain in dB (peaking and shelving types only).
    pub gain_db: f64,
}

impl Default for FilterParameters {
    fn default() -> Self {
        Self {
            sample_rate: DEFAULT_SAMPLE_RATE,
            frequency: DEFAULT_FREQUENCY,
            width: Width::default(),
            gain_db: DEFAULT_GAIN_DB,
        }
    }
}

impl FilterParameters {
    /// Parameters at the given rate and frequency, with a Butterworth Q and
    /// 0 dB gain.
    pub fn new(sample_rate: f64, frequency: f64) -> Self {
        Self {
            sample_rate,
            frequency,
            ..Self::default()
        }
    }

    pub fn with_sample_rate(mut self, sample_rate: f64) -> Self {
        self.sample_rate = sample_rate;
        self
    }

    pub fn with_frequency(mut self, frequency: f64) -> Self {
        self.frequency = frequency;
        self
    }

    pub fn with_q(mut self, q: f64) -> Self {
        self.width = Width::Q(q);
        self
    }

    /// Width in octaves.
    pub fn with_bandwidth(mut self, octaves: f64) -> Self {
        self.width = Width::Bandwidth(octaves);
        self
    }

    pub fn with_slope(mut self, slope: f64) -> Self {
        self.width = Width::Slope(slope);
        self
    }

    pub fn with_gain_db(mut self, gain_db: f64) -> Self {
        self.gain_db = gain_db;
        self
    }

    /// Half the sample rate.
    pub fn nyquist(&self) -> f64 {
        self.sample_rate * 0.5
    }

    /// Check the parameters against the domain of `filter_type`.
    ///
    /// Checks run in order: sample rate, frequency, width, gain. The first
    /// failure is reported. [`FilterType::Off`] accepts anything.
    pub fn validate(&self, filter_type: FilterType) -> Result<()> {
        if filter_type == FilterType::Off {
            return Ok(());
        }
        if !(self.sample_rate.is_finite() && self.sample_rate > 0.0) {
            return Err(FilterError::invalid(
                "sample_rate",
                self.sample_rate,
                "must be positive and finite",
            ));
        }
        if !(self.frequency.is_finite() && self.frequency > 0.0) {
            return Err(FilterError::invalid(
                "frequency",
                self.frequency,
                "must be positive and finite",
            ));
        }
        if self.frequency >= self.nyquist() {
            return Err(FilterError::invalid(
                "frequency",
                self.frequency,
                "must be below the Nyquist frequency",
            ));
        }
        match self.width {
            Width::Q(q) if !(q.is_finite() && q > 0.0) => {
                return Err(FilterError::invalid("q", q, "must be positive and finite"));
            }
            Width::Bandwidth(bw) if !(bw.is_finite() && bw > 0.0) => {
                return Err(FilterError::invalid(
                    "bandwidth",
                    bw,
                    "must be positive and finite",
                ));
            }
            Width::Slope(s) if !filter_type.is_shelf() => {
                return Err(FilterError::invalid(
                    "slope",
                    s,
                    "only applies to shelving filters",
                ));
            }
            Width::Slope(s) if !(s.is_finite() && s > 0.0) => {
                return Err(FilterError::invalid(
                    "slope",
                    s,
                    "must be positive and finite",
                ));
            }
            _ => {}
        }
        if filter_type.uses_gain() && !self.gain_db.is_finite() {
            return Err(FilterError::invalid(
                "gain_db",
                self.gain_db,
                "must be finite",
            ));
        }
        Ok(())
    }
}

/// Design normalized biquad coefficients.
///
/// [`FilterType::Off`] always yields [`Coefficients::IDENTITY`]. Every other
/// type validates `params` first (see [`FilterParameters::validate`]) and
/// rejects designs that would not be finite and stable.
pub fn calc_biquad_coeffs(
    filter_type: FilterType,
    params: &FilterParameters,
) -> Result<Coefficients> {
    if filter_type == FilterType::Off {
        return Ok(Coefficients::IDENTITY);
    }
    params.validate(filter_type)?;

    let w0 = 2.0 * PI * params.frequency / params.sample_rate;
    let (sin_w0, cos_w0) = w0.sin_cos();

    // A is used only by Peaking, LowShelf, HighShelf
    let a_lin = if filter_type.uses_gain() {
        10.0_f64.powf(params.gain_db / 40.0)
    } else {
        1.0
    };

    let alpha = match params.width {
        Width::Q(q) => sin_w0 / (2.0 * q),
        Width::Bandwidth(bw) => sin_w0 * (LN_2 / 2.0 * bw * w0 / sin_w0).sinh(),
        Width::Slope(s) => {
            let radicand = (a_lin + 1.0 / a_lin) * (1.0 / s - 1.0) + 2.0;
            if !(radicand > 0.0) {
                return Err(FilterError::invalid(
                    "slope",
                    s,
                    "too steep for the requested gain",
                ));
            }
            sin_w0 / 2.0 * radicand.sqrt()
        }
    };
    // 1 + alpha rounding to alpha puts a pole at -1 for every type
    if !alpha.is_finite() || 1.0 + alpha == alpha {
        return Err(params.width.degenerate());
    }

    let (b0, b1, b2, a0, a1, a2) = match filter_type {
        FilterType::Off => return Ok(Coefficients::IDENTITY),

        FilterType::LowPass => {
            let b1 = 1.0 - cos_w0;
            let b0 = b1 / 2.0;
            (b0, b1, b0, 1.0 + alpha, -2.0 * cos_w0, 1.0 - alpha)
        }

        FilterType::HighPass => {
            let b0 = (1.0 + cos_w0) / 2.0;
            let b1 = -(1.0 + cos_w0);
            (b0, b1, b0, 1.0 + alpha, -2.0 * cos_w0, 1.0 - alpha)
        }

        FilterType::BandPass => (alpha, 0.0, -alpha, 1.0 + alpha, -2.0 * cos_w0, 1.0 - alpha),

        FilterType::Notch => (
            1.0,
            -2.0 * cos_w0,
            1.0,
            1.0 + alpha,
            -2.0 * cos_w0,
            1.0 - alpha,
        ),

        FilterType::AllPass => (
            1.0 - alpha,
            -2.0 * cos_w0,
            1.0 + alpha,
            1.0 + alpha,
            -2.0 * cos_w0,
            1.0 - alpha,
        ),

        FilterType::Peaking => (
            1.0 + alpha * a_lin,
            -2.0 * cos_w0,
            1.0 - alpha * a_lin,
            1.0 + alpha / a_lin,
            -2.0 * cos_w0,
            1.0 - alpha / a_lin,
        ),

        FilterType::LowShelf => {
            let two_sqrt_a_alpha = 2.0 * a_lin.sqrt() * alpha;
            let a_plus_1 = a_lin + 1.0;
            let a_minus_1 = a_lin - 1.0;
            (
                a_lin * (a_plus_1 - a_minus_1 * cos_w0 + two_sqrt_a_alpha),
                2.0 * a_lin * (a_minus_1 - a_plus_1 * cos_w0),
                a_lin * (a_plus_1 - a_minus_1 * cos_w0 - two_sqrt_a_alpha),
                a_plus_1 + a_minus_1 * cos_w0 + two_sqrt_a_alpha,
                -2.0 * (a_minus_1 + a_plus_1 * cos_w0),
                a_plus_1 + a_minus_1 * cos_w0 - two_sqrt_a_alpha,
            )
        }

        FilterType::HighShelf => {
            let two_sqrt_a_alpha = 2.0 * a_lin.sqrt() * alpha;
            let a_plus_1 = a_lin + 1.0;
            let a_minus_1 = a_lin - 1.0;
            (
                a_lin * (a_plus_1 + a_minus_1 * cos_w0 + two_sqrt_a_alpha),
                -2.0 * a_lin * (a_minus_1 + a_plus_1 * cos_w0),
                a_lin * (a_plus_1 + a_minus_1 * cos_w0 - two_sqrt_a_alpha),
                a_plus_1 - a_minus_1 * cos_w0 + two_sqrt_a_alpha,
                2.0 * (a_minus_1 - a_plus_1 * cos_w0),
                a_plus_1 - a_minus_1 * cos_w0 - two_sqrt_a_alpha,
            )
        }
    };

    let coeffs = Coefficients::from_unnormalized(b0, b1, b2, a0, a1, a2);
    // A wide response drives a pole towards -1. Otherwise only frequencies
    // within a rounding error of DC or Nyquist collapse the poles onto the
    // unit circle.
    if !coeffs.is_stable() {
        if alpha >= 1.0 {
            return Err(params.width.degenerate());
        }
        return Err(FilterError::invalid(
            "frequency",
            params.frequency,
            "too close to DC or Nyquist for a stable design",
        ));
    }
    Ok(coeffs)
}
