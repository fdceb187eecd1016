//! Error types for the spectrogram pipeline.

use std::fmt;

use crate::fft::FftError;

/// Errors that can occur while building a spectrogram.
#[derive(Debug, Clone, PartialEq)]
pub enum SpectrogramError {
    /// Transform-level failure.
    Fft(FftError),

    /// Rejected configuration value.
    InvalidConfig(String),

    /// Sample rate of zero.
    InvalidSampleRate,
}

impl fmt::Display for SpectrogramError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpectrogramError::Fft(err) => write!(f, "spectral analysis failed: {err}"),
            SpectrogramError::InvalidConfig(msg) => write!(f, "invalid configuration: {msg}"),
            SpectrogramError::InvalidSampleRate => write!(f, "sample rate must be positive"),
        }
    }
}

impl std::error::Error for SpectrogramError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SpectrogramError::Fft(err) => Some(err),
            _ => None,
        }
    }
}

impl From<FftError> for SpectrogramError {
    fn from(err: FftError) -> Self {
        SpectrogramError::Fft(err)
    }
}
