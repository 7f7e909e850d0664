// SPDX-License-Identifier: LGPL-3.0-or-later

//! Default parameter values and response-curve constants.

use std::f64::consts::FRAC_1_SQRT_2;

/// Default sample rate (Hz).
pub const DEFAULT_SAMPLE_RATE: f64 = 48000.0;

/// Default center/cutoff frequency (Hz).
pub const DEFAULT_FREQUENCY: f64 = 1000.0;

/// Quality factor of a second-order Butterworth section (1/sqrt(2)).
pub const BUTTERWORTH_Q: f64 = FRAC_1_SQRT_2;

/// Default gain (dB).
pub const DEFAULT_GAIN_DB: f64 = 0.0;

/// Default number of points in an equalizer response curve.
pub const RESPONSE_POINTS: usize = 512;

/// Lowest gain reported by a response curve (dB).
pub const RESPONSE_FLOOR_DB: f64 = -200.0;
