//! Welch power spectral density estimation.
//!
//! The input is split into `nfft`-sample sub-windows overlapping by
//! `noverlap` samples. Each sub-window is zero-padded to `pad` samples,
//! multiplied by a symmetric Hann window and transformed; the squared
//! magnitudes are averaged over all sub-windows. The result is one-sided:
//! bins strictly between DC and Nyquist are doubled to account for the
//! folded negative frequencies of a real signal.

use crate::fft::{Complex64, FftError, FftImpl, ScalarFftImpl};
use crate::segment::{segments, SegmentPlan};
use crate::window;

/// Sub-window length used when [`WelchOptions::nfft`] is zero.
pub const DEFAULT_NFFT: usize = 256;

/// Factor applied to interior bins of the one-sided spectrum.
const ONE_SIDED_SCALE: f64 = 2.0;

/// Parameters of a Welch estimate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WelchOptions {
    /// Sub-window length; `0` selects [`DEFAULT_NFFT`].
    pub nfft: usize,
    /// Samples shared by consecutive sub-windows.
    pub noverlap: usize,
    /// Transform length after zero padding; `0` selects `nfft`.
    pub pad: usize,
    /// Skip division by `fs * Σw²` and return raw averaged periodograms.
    pub scale_off: bool,
}

impl Default for WelchOptions {
    fn default() -> Self {
        Self {
            nfft: DEFAULT_NFFT,
            noverlap: 0,
            pad: 0,
            scale_off: false,
        }
    }
}

impl WelchOptions {
    /// Single unscaled sub-window of `nfft` samples, the spectrogram setting.
    pub fn unscaled(nfft: usize) -> Self {
        Self {
            nfft,
            noverlap: 0,
            pad: nfft,
            scale_off: true,
        }
    }

    fn nfft(&self) -> usize {
        if self.nfft == 0 {
            DEFAULT_NFFT
        } else {
            self.nfft
        }
    }

    fn pad(&self) -> usize {
        if self.pad == 0 {
            self.nfft()
        } else {
            self.pad
        }
    }
}

/// One-sided bin centres `k * fs / pad` for `k = 0..=pad/2`.
pub fn frequency_axis(pad: usize, fs: f64) -> Vec<f64> {
    if pad == 0 {
        return Vec::new();
    }
    let coef = fs / pad as f64;
    (0..=pad / 2).map(|k| k as f64 * coef).collect()
}

/// Reusable Welch estimator for inputs of a fixed length.
///
/// Window, frequency axis, scratch buffer and FFT twiddles are computed once
/// and shared by every call to [`WelchEstimator::estimate`].
pub struct WelchEstimator {
    input_len: usize,
    pad: usize,
    plan: SegmentPlan,
    norm: Option<f64>,
    window: Vec<f64>,
    frequencies: Vec<f64>,
    frame: Vec<f64>,
    scratch: Vec<Complex64>,
    fft: ScalarFftImpl<f64>,
}

impl WelchEstimator {
    /// Estimator for `block_size`-sample segments with a single unscaled
    /// sub-window spanning the whole segment.
    pub fn new(block_size: usize, sample_rate: u32) -> Result<Self, FftError> {
        Self::with_options(block_size, WelchOptions::unscaled(block_size), sample_rate as f64)
    }

    pub fn with_options(input_len: usize, options: WelchOptions, fs: f64) -> Result<Self, FftError> {
        if !(fs.is_finite() && fs > 0.0) {
            return Err(FftError::InvalidValue);
        }
        let nfft = options.nfft();
        let pad = options.pad();
        if input_len < nfft || pad < nfft {
            return Err(FftError::MismatchedLengths);
        }
        if !pad.is_power_of_two() {
            return Err(FftError::NonPowerOfTwo);
        }
        let plan = SegmentPlan::from_overlap(nfft, options.noverlap)?;
        let window = window::hann(nfft);
        let norm = (!options.scale_off).then(|| window::energy(&window) * fs);
        Ok(Self {
            input_len,
            pad,
            plan,
            norm,
            window,
            frequencies: frequency_axis(pad, fs),
            frame: vec![0.0; nfft],
            scratch: vec![Complex64::zero(); pad],
            fft: ScalarFftImpl::default(),
        })
    }

    /// Number of bins in each estimate (`pad/2 + 1`).
    pub fn bins(&self) -> usize {
        self.pad / 2 + 1
    }

    pub fn frequencies(&self) -> &[f64] {
        &self.frequencies
    }

    /// Number of sub-windows averaged per estimate.
    pub fn sub_windows(&self) -> usize {
        self.plan.count(self.input_len)
    }

    /// Averaged periodogram of `input`.
    ///
    /// Inputs of any other length than the one given at construction are
    /// rejected with [`FftError::MismatchedLengths`].
    pub fn estimate(&mut self, input: &[f64]) -> Result<Vec<f64>, FftError> {
        if input.len() != self.input_len {
            return Err(FftError::MismatchedLengths);
        }
        let bins = self.bins();
        let count = self.sub_windows() as f64;
        let mut pxx = vec![0.0; bins];
        for sub in segments(input, self.plan) {
            self.frame.copy_from_slice(sub);
            window::apply(&mut self.frame, &self.window);
            for (i, slot) in self.scratch.iter_mut().enumerate() {
                let x = self.frame.get(i).copied().unwrap_or(0.0);
                *slot = Complex64::new(x, 0.0);
            }
            self.fft.fft(&mut self.scratch)?;
            for (j, (p, c)) in pxx.iter_mut().zip(self.scratch.iter()).enumerate() {
                let mut d = c.norm_sqr() / count;
                if j > 0 && j < bins - 1 {
                    d *= ONE_SIDED_SCALE;
                }
                *p += d;
            }
        }
        if let Some(norm) = self.norm {
            for p in pxx.iter_mut() {
                *p /= norm;
            }
        }
        Ok(pxx)
    }
}

/// Welch estimate of `x` sampled at `fs` Hz.
///
/// Returns `(pxx, frequencies)`. Inputs shorter than `nfft` are zero-padded
/// to one full sub-window.
pub fn pwelch(x: &[f64], fs: f64, options: &WelchOptions) -> Result<(Vec<f64>, Vec<f64>), FftError> {
    if x.is_empty() {
        return Err(FftError::EmptyInput);
    }
    let nfft = options.nfft();
    let padded;
    let input = if x.len() < nfft {
        padded = {
            let mut v = x.to_vec();
            v.resize(nfft, 0.0);
            v
        };
        &padded[..]
    } else {
        x
    };
    let mut estimator = WelchEstimator::with_options(input.len(), *options, fs)?;
    let pxx = estimator.estimate(input)?;
    Ok((pxx, estimator.frequencies))
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::f64::consts::PI;

    fn sine(freq: f64, fs: f64, len: usize) -> Vec<f64> {
        (0..len).map(|i| (2.0 * PI * freq * i as f64 / fs).sin()).collect()
    }

    fn argmax(values: &[f64]) -> usize {
        values
            .iter()
            .enumerate()
            .fold((0, f64::MIN), |best, (i, &v)| if v > best.1 { (i, v) } else { best })
            .0
    }

    #[test]
    fn frequency_axis_matches_bin_spacing() {
        let freqs = frequency_axis(1024, 44_100.0);
        assert_eq!(freqs.len(), 513);
        assert_eq!(freqs[0], 0.0);
        assert!((freqs[1] - 43.066_406_25).abs() < 1e-9);
        assert!((freqs[512] - 22_050.0).abs() < 1e-9);
        assert!(freqs.windows(2).all(|w| w[1] > w[0]));
    }

    #[test]
    fn silence_gives_zero_psd() {
        let mut est = WelchEstimator::new(1024, 44_100).unwrap();
        let psd = est.estimate(&[0.0; 1024]).unwrap();
        assert_eq!(psd.len(), 513);
        assert!(psd.iter().all(|&p| p == 0.0));
    }

    #[test]
    fn sine_peak_lands_within_one_bin() {
        let fs = 44_100.0;
        let f0 = 1_000.0;
        let mut est = WelchEstimator::new(1024, 44_100).unwrap();
        let psd = est.estimate(&sine(f0, fs, 1024)).unwrap();
        let k = argmax(&psd);
        let bin_width = fs / 1024.0;
        assert!((k as f64 * bin_width - f0).abs() < bin_width);
        assert!(psd.iter().all(|&p| p >= 0.0));
    }

    #[test]
    fn wrong_segment_length_is_rejected() {
        let mut est = WelchEstimator::new(64, 8_000).unwrap();
        assert_eq!(est.estimate(&[0.0; 63]).unwrap_err(), FftError::MismatchedLengths);
        assert_eq!(est.estimate(&[0.0; 65]).unwrap_err(), FftError::MismatchedLengths);
    }

    #[test]
    fn invalid_construction_fails_fast() {
        assert_eq!(WelchEstimator::new(64, 0).err(), Some(FftError::InvalidValue));
        assert_eq!(WelchEstimator::new(48, 8_000).err(), Some(FftError::NonPowerOfTwo));
    }

    #[test]
    fn estimator_matches_pwelch() {
        let x = sine(440.0, 8_000.0, 256);
        let (expected, freqs) = pwelch(&x, 8_000.0, &WelchOptions::unscaled(256)).unwrap();
        let mut est = WelchEstimator::new(256, 8_000).unwrap();
        assert_eq!(est.estimate(&x).unwrap(), expected);
        assert_eq!(est.frequencies(), &freqs[..]);
    }

    #[test]
    fn interior_bins_are_doubled() {
        // An impulse has a flat magnitude spectrum.
        let mut x = vec![0.0; 8];
        x[4] = 1.0;
        let (pxx, _) = pwelch(&x, 1.0, &WelchOptions::unscaled(8)).unwrap();
        let w4 = window::hann(8)[4];
        let base = w4 * w4;
        assert!((pxx[0] - base).abs() < 1e-12);
        assert!((pxx[1] - 2.0 * base).abs() < 1e-12);
        assert!((pxx[4] - base).abs() < 1e-12);
    }

    #[test]
    fn averaging_over_overlapping_sub_windows() {
        let x = sine(1_000.0, 8_000.0, 1024);
        let options = WelchOptions {
            nfft: 256,
            noverlap: 128,
            pad: 256,
            scale_off: true,
        };
        let est = WelchEstimator::with_options(1024, options, 8_000.0).unwrap();
        assert_eq!(est.sub_windows(), 7);
        let (pxx, freqs) = pwelch(&x, 8_000.0, &options).unwrap();
        assert_eq!(pxx.len(), 129);
        assert!((freqs[argmax(&pxx)] - 1_000.0).abs() < 8_000.0 / 256.0);
    }

    #[test]
    fn scaling_divides_by_window_energy() {
        let x = sine(1_000.0, 8_000.0, 256);
        let (raw, _) = pwelch(&x, 8_000.0, &WelchOptions::unscaled(256)).unwrap();
        let scaled_opts = WelchOptions {
            scale_off: false,
            ..WelchOptions::unscaled(256)
        };
        let (scaled, _) = pwelch(&x, 8_000.0, &scaled_opts).unwrap();
        let norm = window::energy(&window::hann(256)) * 8_000.0;
        for (r, s) in raw.iter().zip(scaled.iter()) {
            assert!((r / norm - s).abs() < 1e-12);
        }
    }

    #[test]
    fn short_input_is_zero_padded() {
        let (pxx, freqs) = pwelch(&[1.0, 1.0, 1.0], 100.0, &WelchOptions::default()).unwrap();
        assert_eq!(pxx.len(), DEFAULT_NFFT / 2 + 1);
        assert_eq!(freqs.len(), pxx.len());
        assert_eq!(pwelch(&[], 100.0, &WelchOptions::default()).unwrap_err(), FftError::EmptyInput);
    }
}
