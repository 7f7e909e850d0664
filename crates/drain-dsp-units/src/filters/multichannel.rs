// SPDX-License-Identifier: LGPL-3.0-or-later

//! Per-channel equalizers for interleaved streams.
//!
//! Every channel owns an independent [`Equalizer`]. Frames are laid out
//! channel by channel (`L R L R ...` for stereo) and each sample only ever
//! sees the state of its own channel.

use drain_dsp_lib::sample::Sample;

use super::coeffs::{FilterParameters, FilterType, calc_biquad_coeffs};
use super::equalizer::{Band, Equalizer, design};
use crate::error::{FilterError, Result};

/// A bank of equalizers, one per interleaved channel.
///
/// Operations addressed to "all channels" are applied to every channel or
/// to none of them.
///
/// # Examples
///
/// ```
/// use drain_dsp_units::filters::coeffs::{FilterParameters, FilterType};
/// use drain_dsp_units::filters::multichannel::MultiChannelEqualizer;
///
/// let mut eq = MultiChannelEqualizer::new(2).unwrap();
/// eq.add_band(FilterType::HighPass, &FilterParameters::new(48000.0, 40.0)).unwrap();
///
/// let src = [0.5f32, -0.5, 0.25, -0.25];
/// let mut dst = [0.0f32; 4];
/// eq.process_interleaved(&mut dst, &src);
/// ```
#[derive(Debug, Clone)]
pub struct MultiChannelEqualizer {
    channels: Vec<Equalizer>,
}

impl MultiChannelEqualizer {
    /// Create `channels` empty equalizers. At least one channel is required.
    pub fn new(channels: usize) -> Result<Self> {
        if channels == 0 {
            return Err(FilterError::invalid(
                "channels",
                0.0,
                "must be at least 1",
            ));
        }
        log::debug!("created {channels}-channel equalizer");
        Ok(Self {
            channels: vec![Equalizer::new(); channels],
        })
    }

    /// Number of channels.
    pub fn channels(&self) -> usize {
        self.channels.len()
    }

    pub fn channel(&self, channel: usize) -> Option<&Equalizer> {
        self.channels.get(channel)
    }

    pub fn channel_mut(&mut self, channel: usize) -> Option<&mut Equalizer> {
        self.channels.get_mut(channel)
    }

    fn check_channel(&self, channel: usize) -> Result<()> {
        if channel < self.channels.len() {
            Ok(())
        } else {
            Err(FilterError::ChannelOutOfRange {
                channel,
                channels: self.channels.len(),
            })
        }
    }

    /// Append the same band to every channel.
    ///
    /// The design is computed once. On error no channel changes.
    pub fn add_band(
        &mut self,
        filter_type: FilterType,
        params: &FilterParameters,
    ) -> Result<()> {
        // Band counts can differ per channel
        let coeffs = calc_biquad_coeffs(filter_type, params).inspect_err(|err| {
            log::warn!(
                "{} channels: rejected {filter_type} design: {err}",
                self.channels.len()
            );
        })?;
        for eq in &mut self.channels {
            eq.push_band(Band::designed(filter_type, *params, coeffs));
        }
        Ok(())
    }

    /// Append a band to one channel and return its index there.
    pub fn add_band_to_channel(
        &mut self,
        channel: usize,
        filter_type: FilterType,
        params: &FilterParameters,
    ) -> Result<usize> {
        self.check_channel(channel)?;
        self.channels[channel].add_band(filter_type, params)
    }

    /// Redesign band `index` on every channel, keeping each channel's state.
    ///
    /// Fails with [`FilterError::IndexOutOfRange`] if any channel lacks
    /// that band.
    pub fn set_band(
        &mut self,
        index: usize,
        filter_type: FilterType,
        params: &FilterParameters,
    ) -> Result<()> {
        self.check_index(index)?;
        let coeffs = design(filter_type, params, index)?;
        for eq in &mut self.channels {
            eq.retune_band(index, Some((filter_type, *params)), coeffs);
        }
        Ok(())
    }

    /// Remove band `index` from every channel.
    pub fn remove_band(&mut self, index: usize) -> Result<()> {
        self.check_index(index)?;
        for eq in &mut self.channels {
            eq.remove_band(index)?;
        }
        Ok(())
    }

    fn check_index(&self, index: usize) -> Result<()> {
        for eq in &self.channels {
            eq.check_index(index)?;
        }
        Ok(())
    }

    /// Redesign every channel for `sample_rate`, all or nothing.
    pub fn set_sample_rate(&mut self, sample_rate: f64) -> Result<()> {
        let plans = self
            .channels
            .iter()
            .map(|eq| eq.plan_sample_rate(sample_rate))
            .collect::<Result<Vec<_>>>()?;
        for (eq, plan) in self.channels.iter_mut().zip(plans) {
            eq.apply_sample_rate(sample_rate, plan);
        }
        Ok(())
    }

    /// Clear every channel's filter state.
    pub fn reset(&mut self) {
        for eq in &mut self.channels {
            eq.reset();
        }
    }

    /// Equalize interleaved frames from `src` into `dst`.
    ///
    /// Only whole frames present in both buffers are processed. A trailing
    /// partial frame is left untouched in `dst`.
    pub fn process_interleaved<S: Sample>(&mut self, dst: &mut [S], src: &[S]) {
        let n = self.channels.len();
        for (out_frame, in_frame) in dst.chunks_exact_mut(n).zip(src.chunks_exact(n)) {
            for ((out, &inp), eq) in out_frame.iter_mut().zip(in_frame).zip(&mut self.channels) {
                *out = eq.process(inp);
            }
        }
    }

    /// Equalize interleaved frames in place.
    pub fn process_interleaved_inplace<S: Sample>(&mut self, buf: &mut [S]) {
        let n = self.channels.len();
        for frame in buf.chunks_exact_mut(n) {
            for (sample, eq) in frame.iter_mut().zip(&mut self.channels) {
                *sample = eq.process(*sample);
            }
        }
    }
}
