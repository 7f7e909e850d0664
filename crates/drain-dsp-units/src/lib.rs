// SPDX-License-Identifier: LGPL-3.0-or-later

//! # drain-dsp-units
//!
//! Audio filters and equalizers built on top of [`drain_dsp_lib`]:
//!
//! - **Design**: RBJ cookbook coefficients for low/high/band-pass, notch,
//!   peaking, shelving and all-pass responses, with Q, bandwidth or slope
//! - **Filters**: a single [`BiquadFilter`](filters::filter::BiquadFilter)
//! - **Equalizers**: a serial multi-band
//!   [`Equalizer`](filters::equalizer::Equalizer) and an interleaved
//!   [`MultiChannelEqualizer`](filters::multichannel::MultiChannelEqualizer)
//!
//! Configuration returns [`Result`](error::Result) and never leaves a
//! processor half-updated. Processing is infallible, allocation-free and
//! works on `f32` or `f64` samples.
//!
//! Configuration changes are reported through the [`log`] facade at
//! `debug` level and rejected designs at `warn` level. Nothing is logged
//! while processing.
//!
//! With the `serde` feature, filter types and parameters can be
//! serialized for presets.

pub mod consts;
pub mod error;
pub mod filters;

pub use error::{FilterError, Result};
pub use filters::coeffs::{FilterParameters, FilterType, Width, calc_biquad_coeffs};
pub use filters::equalizer::{Band, Equalizer};
pub use filters::filter::BiquadFilter;
pub use filters::multichannel::MultiChannelEqualizer;
