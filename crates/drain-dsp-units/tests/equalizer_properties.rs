// SPDX-License-Identifier: LGPL-3.0-or-later
//
// Randomized property tests for filter design and equalizer processing.
//
// Every test draws its parameters and signals from a seeded ChaCha8 stream
// so failures reproduce exactly.

use drain_dsp_units::consts::RESPONSE_FLOOR_DB;
use drain_dsp_units::filters::coeffs::{FilterParameters, FilterType, Width, calc_biquad_coeffs};
use drain_dsp_units::filters::equalizer::Equalizer;
use drain_dsp_units::filters::multichannel::MultiChannelEqualizer;
use drain_dsp_units::{BiquadFilter, FilterError};
use float_cmp::assert_approx_eq;
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

const SAMPLE_RATES: [f64; 5] = [8000.0, 22050.0, 44100.0, 48000.0, 96000.0];

fn gen_test_signal(seed: u64, len: usize) -> Vec<f32> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..len).map(|_| rng.random::<f32>() * 2.0 - 1.0).collect()
}

/// Random parameters inside the valid domain of `ft`.
fn random_params(rng: &mut ChaCha8Rng, ft: FilterType) -> FilterParameters {
    let sr = SAMPLE_RATES[rng.random_range(0..SAMPLE_RATES.len())];
    // Log-uniform between 20 Hz and 0.45 * sr
    let lo = 20.0_f64.ln();
    let hi = (0.45 * sr).ln();
    let freq = rng.random_range(lo..hi).exp();
    let gain = rng.random_range(-24.0..24.0);
    let p = FilterParameters::new(sr, freq).with_gain_db(gain);

    match rng.random_range(0..3) {
        0 => p.with_q(rng.random_range(0.1..20.0)),
        1 => p.with_bandwidth(rng.random_range(0.05..4.0)),
        _ if ft.is_shelf() => p.with_slope(rng.random_range(0.1..1.0)),
        _ => p.with_q(rng.random_range(0.1..20.0)),
    }
}

fn random_type(rng: &mut ChaCha8Rng) -> FilterType {
    FilterType::ALL[rng.random_range(0..FilterType::ALL.len())]
}

fn random_eq(rng: &mut ChaCha8Rng, bands: usize) -> Equalizer {
    let mut eq = Equalizer::new();
    while eq.len() < bands {
        let ft = random_type(rng);
        let p = random_params(rng, ft).with_sample_rate(48000.0);
        // Bandwidth designs very close to Nyquist may be rejected; draw again.
        let _ = eq.add_band(ft, &p);
    }
    eq
}

/// Random parameters reaching up to just below Nyquist, Q or bandwidth.
fn random_wide_params(rng: &mut ChaCha8Rng) -> FilterParameters {
    let sr = [8000.0_f64, 44100.0, 96000.0, 192000.0][rng.random_range(0..4)];
    let freq = rng.random_range(20.0_f64.ln()..(0.499 * sr).ln()).exp();
    let p = FilterParameters::new(sr, freq);
    if rng.random_bool(0.5) {
        p.with_q(rng.random_range(0.1..20.0))
    } else {
        p.with_bandwidth(rng.random_range(0.05..4.0))
    }
}

/// Only a bandwidth whose upper band edge reaches Nyquist may be rejected,
/// and the error must name the bandwidth.
fn assert_expected_rejection(ft: FilterType, p: &FilterParameters, err: &FilterError) {
    let Width::Bandwidth(bw) = p.width else {
        panic!("{ft} {p:?}: unexpected error {err}");
    };
    assert!(
        p.frequency * 2.0_f64.powf(bw / 2.0) >= p.nyquist(),
        "{ft} {p:?}: rejected a band inside Nyquist: {err}"
    );
    assert!(
        matches!(err, FilterError::InvalidParameter { name: "bandwidth", .. }),
        "{ft} {p:?}: {err}"
    );
}

#[test]
fn random_valid_designs_are_stable() {
    let mut rng = ChaCha8Rng::seed_from_u64(0x5EED_0001);
    let draws = 2000;
    let mut rejected = 0;
    for _ in 0..draws {
        let ft = random_type(&mut rng);
        let p = random_params(&mut rng, ft);
        match calc_biquad_coeffs(ft, &p) {
            Ok(c) => {
                assert!(c.is_finite(), "{ft} {p:?}: {c:?}");
                assert!(c.is_stable(), "{ft} {p:?}: {c:?}");
                assert!(c.poles().iter().all(|z| z.norm() < 1.0), "{ft} {p:?}");
            }
            Err(err) => {
                assert_expected_rejection(ft, &p, &err);
                rejected += 1;
            }
        }
    }
    assert!(rejected * 50 < draws, "{rejected} of {draws} designs rejected");
}

#[test]
fn near_nyquist_rejections_are_bandwidth_edges() {
    let mut rng = ChaCha8Rng::seed_from_u64(0x5EED_0008);
    let draws = 5000;
    let mut rejected = 0;
    for _ in 0..draws {
        let ft = random_type(&mut rng);
        let p = random_wide_params(&mut rng).with_gain_db(rng.random_range(-24.0..24.0));
        match calc_biquad_coeffs(ft, &p) {
            Ok(c) => assert!(c.is_stable(), "{ft} {p:?}: {c:?}"),
            Err(err) => {
                assert_expected_rejection(ft, &p, &err);
                rejected += 1;
            }
        }
    }
    assert!(rejected * 20 < draws, "{rejected} of {draws} designs rejected");
}

#[test]
fn allpass_magnitude_is_unity_at_every_frequency() {
    let mut rng = ChaCha8Rng::seed_from_u64(0x5EED_0009);
    for _ in 0..2000 {
        let p = random_wide_params(&mut rng);
        let filter = match BiquadFilter::with_params(FilterType::AllPass, &p) {
            Ok(filter) => filter,
            Err(err) => {
                assert_expected_rejection(FilterType::AllPass, &p, &err);
                continue;
            }
        };
        let freqs = (0..=16)
            .map(|i| p.nyquist() * i as f64 / 16.0)
            .chain([p.frequency]);
        for freq in freqs {
            let (mag, _) = filter.freq_response(freq, p.sample_rate);
            assert_approx_eq!(f64, mag, 1.0, epsilon = 1e-9);
        }
    }
}

#[test]
fn peaking_at_0db_is_the_identity() {
    let mut rng = ChaCha8Rng::seed_from_u64(0x5EED_000A);
    let src = gen_test_signal(10, 256);
    for _ in 0..500 {
        let p = random_wide_params(&mut rng).with_gain_db(0.0);
        let mut filter = match BiquadFilter::with_params(FilterType::Peaking, &p) {
            Ok(filter) => filter,
            Err(err) => {
                assert_expected_rejection(FilterType::Peaking, &p, &err);
                continue;
            }
        };
        for i in 0..=16 {
            let freq = p.nyquist() * i as f64 / 16.0;
            assert_eq!(filter.freq_response(freq, p.sample_rate).0, 1.0, "{p:?}");
        }
        let mut out = vec![0.0f32; src.len()];
        filter.process_block(&mut out, &src);
        assert_eq!(out, src, "{p:?}");
    }
}

#[test]
fn rejected_configuration_leaves_equalizer_unchanged() {
    let mut rng = ChaCha8Rng::seed_from_u64(0x5EED_0002);
    let mut eq = random_eq(&mut rng, 6);
    let snapshot: Vec<_> = eq.bands().iter().map(|b| b.coefficients()).collect();

    let bad = [
        FilterParameters::new(48000.0, 24000.0),
        FilterParameters::new(48000.0, -1.0),
        FilterParameters::new(0.0, 1000.0),
        FilterParameters::new(48000.0, 1000.0).with_q(0.0),
        FilterParameters::new(48000.0, 1000.0).with_bandwidth(f64::NAN),
    ];
    for p in &bad {
        assert!(eq.add_band(FilterType::Peaking, p).is_err());
        assert!(eq.set_band(2, FilterType::Peaking, p).is_err());
    }
    assert!(eq.remove_band(6).is_err());

    let after: Vec<_> = eq.bands().iter().map(|b| b.coefficients()).collect();
    assert_eq!(snapshot, after);
}

#[test]
fn equalizer_output_is_block_size_independent() {
    let mut rng = ChaCha8Rng::seed_from_u64(0x5EED_0003);
    let src = gen_test_signal(3, 4096);

    let mut whole = random_eq(&mut rng, 8);
    let mut chunked = whole.clone();

    let mut expected = vec![0.0f32; src.len()];
    whole.process_block(&mut expected, &src);

    let mut got = vec![0.0f32; src.len()];
    let mut pos = 0;
    while pos < src.len() {
        let n = rng.random_range(1..300).min(src.len() - pos);
        chunked.process_block(&mut got[pos..pos + n], &src[pos..pos + n]);
        pos += n;
    }
    assert_eq!(expected, got);
}

#[test]
fn equalizer_equals_cascaded_filters_in_f64() {
    let mut rng = ChaCha8Rng::seed_from_u64(0x5EED_0004);
    let mut eq = random_eq(&mut rng, 5);
    let mut cascade: Vec<BiquadFilter> = eq
        .bands()
        .iter()
        .map(|b| BiquadFilter::from_coefficients(b.coefficients()))
        .collect();

    let src: Vec<f64> = gen_test_signal(4, 2048).into_iter().map(f64::from).collect();
    let mut out = vec![0.0f64; src.len()];
    eq.process_block(&mut out, &src);

    for (i, &x) in src.iter().enumerate() {
        let y = cascade.iter_mut().fold(x, |acc, f| f.process(acc));
        assert_eq!(out[i], y, "sample {i}");
    }
}

#[test]
fn reset_makes_processing_repeatable() {
    let mut rng = ChaCha8Rng::seed_from_u64(0x5EED_0005);
    let mut eq = random_eq(&mut rng, 4);
    let src = gen_test_signal(5, 1024);

    let mut first = vec![0.0f32; src.len()];
    eq.process_block(&mut first, &src);
    eq.reset();
    let mut second = vec![0.0f32; src.len()];
    eq.process_block(&mut second, &src);

    assert_eq!(first, second);
}

#[test]
fn response_curve_matches_freq_response() {
    let mut rng = ChaCha8Rng::seed_from_u64(0x5EED_0006);
    for _ in 0..20 {
        let eq = random_eq(&mut rng, 3);
        let curve = eq.response_curve(48000.0, 64);
        for (i, &(freq, db)) in curve.iter().enumerate() {
            let exact = 24000.0 * i as f64 / 63.0;
            assert_eq!(freq, exact as f32);
            let expected: f64 = eq
                .bands()
                .iter()
                .map(|b| {
                    let mag = b.freq_response(exact, 48000.0).0;
                    (20.0 * mag.log10()).max(RESPONSE_FLOOR_DB)
                })
                .sum();
            assert_approx_eq!(f32, db, expected as f32, epsilon = 1e-3);
        }
    }
}

#[test]
fn interleaved_channels_match_mono_equalizers() {
    let mut rng = ChaCha8Rng::seed_from_u64(0x5EED_0007);
    let channels = 4;
    let frames = 512;
    let src = gen_test_signal(7, frames * channels);

    let mut multi = MultiChannelEqualizer::new(channels).unwrap();
    for ch in 0..channels {
        for _ in 0..3 {
            let ft = random_type(&mut rng);
            let p = random_params(&mut rng, ft).with_sample_rate(48000.0);
            let _ = multi.add_band_to_channel(ch, ft, &p);
        }
    }
    let mut mono: Vec<Equalizer> = (0..channels)
        .map(|ch| multi.channel(ch).unwrap().clone())
        .collect();

    let mut dst = vec![0.0f32; src.len()];
    multi.process_interleaved(&mut dst, &src);

    for (ch, eq) in mono.iter_mut().enumerate() {
        for f in 0..frames {
            let i = f * channels + ch;
            assert_eq!(dst[i], eq.process(src[i]), "channel {ch} frame {f}");
        }
    }
}
