// SPDX-License-Identifier: LGPL-3.0-or-later

//! Configuration errors.
//!
//! Errors are only produced while designing or rearranging filters.
//! Processing never fails once a configuration has been accepted.

use thiserror::Error;

/// Errors returned by filter design and equalizer configuration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FilterError {
    /// A design parameter is outside its valid domain.
    #[error("invalid {name} = {value}: {reason}")]
    InvalidParameter {
        name: &'static str,
        value: f64,
        reason: &'static str,
    },

    /// A filter type name could not be parsed.
    #[error("unknown filter type {0:?}")]
    UnknownFilterType(String),

    /// A band index does not refer to an existing band.
    #[error("band index {index} out of range (band count {len})")]
    IndexOutOfRange { index: usize, len: usize },

    /// A channel index does not refer to an existing channel.
    #[error("channel {channel} out of range (channel count {channels})")]
    ChannelOutOfRange { channel: usize, channels: usize },
}

impl FilterError {
    pub(crate) fn invalid(name: &'static str, value: f64, reason: &'static str) -> Self {
        Self::InvalidParameter {
            name,
            value,
            reason,
        }
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, FilterError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_problem() {
        let e = FilterError::invalid("frequency", 30000.0, "must be below Nyquist");
        assert_eq!(e.to_string(), "invalid frequency = 30000: must be below Nyquist");

        let e = FilterError::IndexOutOfRange { index: 3, len: 2 };
        assert_eq!(e.to_string(), "band index 3 out of range (band count 2)");

        let e = FilterError::UnknownFilterType("wobble".into());
        assert_eq!(e.to_string(), "unknown filter type \"wobble\"");
    }
}
