// SPDX-License-Identifier: LGPL-3.0-or-later

//! Biquad filter processing (transposed direct form II).
//!
//! One section, two delay registers, standard-sign feedback:
//! ```text
//!   y    = b0 * x + d[0]
//!   d[0] = b1 * x - a1 * y + d[1]
//!   d[1] = b2 * x - a2 * y
//! ```
//!
//! Every buffer routine is a loop over [`biquad_tick`], so block processing
//! is bit-identical to feeding the same samples one at a time. There is no
//! denormal guard: subnormal state is computed like any other value.

use crate::sample::Sample;
use crate::types::Biquad;

/// Process one sample through a biquad section.
#[inline(always)]
pub fn biquad_tick(f: &mut Biquad, x: f64) -> f64 {
    let c = &f.coeffs;
    let d = &mut f.d;

    let y = c.b0 * x + d[0];
    d[0] = c.b1 * x - c.a1 * y + d[1];
    d[1] = c.b2 * x - c.a2 * y;
    y
}

/// Process audio from `src` into `dst` through a single biquad section.
///
/// Processes `min(dst.len(), src.len())` samples.
pub fn biquad_process<S: Sample>(dst: &mut [S], src: &[S], f: &mut Biquad) {
    for (out, &inp) in dst.iter_mut().zip(src.iter()) {
        *out = S::from_f64(biquad_tick(f, inp.to_f64()));
    }
}

/// Process audio in-place through a single biquad section.
pub fn biquad_process_inplace<S: Sample>(buf: &mut [S], f: &mut Biquad) {
    for sample in buf.iter_mut() {
        *sample = S::from_f64(biquad_tick(f, sample.to_f64()));
    }
}

/// Number of strided elements that fit in a buffer of `len` samples.
/// A zero stride holds none.
#[inline]
fn strided_count(len: usize, stride: usize) -> usize {
    if len == 0 || stride == 0 {
        0
    } else {
        (len - 1) / stride + 1
    }
}

/// Process up to `frames` samples read every `src_stride` elements of `src`
/// and written every `dst_stride` elements of `dst`.
///
/// Used to run one channel of an interleaved buffer: pass the buffers
/// offset to the channel and the channel count as both strides. The frame
/// count is clamped to what both buffers can hold, so a zero stride
/// processes nothing.
pub fn biquad_process_strided<S: Sample>(
    dst: &mut [S],
    src: &[S],
    frames: usize,
    src_stride: usize,
    dst_stride: usize,
    f: &mut Biquad,
) {
    let n = frames
        .min(strided_count(src.len(), src_stride))
        .min(strided_count(dst.len(), dst_stride));

    for i in 0..n {
        let x = src[i * src_stride].to_f64();
        dst[i * dst_stride] = S::from_f64(biquad_tick(f, x));
    }
}
