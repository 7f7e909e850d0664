// SPDX-License-Identifier: LGPL-3.0-or-later

//! # drain-dsp-lib
//!
//! Low-level biquad primitives used by `drain-dsp-units` to build filters
//! and equalizers. It includes:
//!
//! - **Types**: normalized [`Coefficients`](types::Coefficients) and the
//!   two-register [`Biquad`](types::Biquad) state
//! - **Filters**: the transposed direct form II kernel, for single samples,
//!   contiguous buffers and strided (interleaved) buffers
//! - **Samples**: the [`Sample`](sample::Sample) trait that lets the same
//!   kernel run on `f32` and `f64` streams
//!
//! ## Design
//!
//! Coefficients and filter state are always `f64`. Samples are widened on
//! entry and narrowed on exit, so an `f32` stream gets double-precision
//! recursion without changing its buffer format. Nothing in this crate
//! allocates or blocks.

pub mod filters;
pub mod sample;
pub mod types;
