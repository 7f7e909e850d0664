// SPDX-License-Identifier: LGPL-3.0-or-later

//! Biquad design, single filters and equalizers.
//!
//! [`coeffs`] turns a [`FilterType`](coeffs::FilterType) and
//! [`FilterParameters`](coeffs::FilterParameters) into normalized
//! coefficients using the RBJ Audio EQ Cookbook. The other modules build
//! running processors on top of those coefficients.

pub mod coeffs;
pub mod equalizer;
pub mod filter;
pub mod multichannel;
