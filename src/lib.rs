//! # welchgram - Welch-method spectrogram rendering
//!
//! Turns a decoded waveform into a fixed-size grayscale spectrogram: time runs
//! left to right, frequency bottom to top, and brightness encodes power.
//!
//! ## Pipeline
//!
//! ```text
//! Waveform → Segmenter → Welch estimator → Range tracker → Renderer → PixelGrid
//! ```
//!
//! - [`segment`]: overlapping `block_size` windows spread over `image_width` columns
//! - [`welch`]: averaged, Hann-windowed periodograms (one PSD column per segment)
//! - [`range`]: the `(min, max)` pair used for normalisation
//! - [`render`]: linear mapping of power onto 8-bit intensities
//!
//! ## Cargo Features
//!
//! - `parallel`: compute PSD columns on a rayon pool
//!
//! ## Example
//!
//! ```
//! use welchgram::{spectrogram, SpectrogramConfig, Waveform};
//!
//! let samples: Vec<f64> = (0..44_100)
//!     .map(|i| (2.0 * std::f64::consts::PI * 1_000.0 * i as f64 / 44_100.0).sin())
//!     .collect();
//! let waveform = Waveform::new(samples, 44_100);
//! let out = spectrogram(&waveform, &SpectrogramConfig::default())?;
//! assert_eq!((out.grid.width(), out.grid.height()), (1000, 512));
//! # Ok::<(), welchgram::SpectrogramError>(())
//! ```

use log::{debug, trace, warn};

pub mod config;
pub mod error;
/// Radix-2 complex FFT with cached twiddle tables.
pub mod fft;
pub mod num;
pub mod range;
pub mod render;
pub mod segment;
pub mod welch;
/// Hann window helpers.
pub mod window;

pub use config::SpectrogramConfig;
pub use error::SpectrogramError;
pub use fft::FftError;
pub use range::{NormalizationRange, RangeScope, RangeTracker};
pub use render::{render, Normalization, PixelGrid};
pub use segment::SegmentPlan;
pub use welch::{frequency_axis, pwelch, WelchEstimator, WelchOptions};

/// Decoded mono audio.
#[derive(Debug, Clone, PartialEq)]
pub struct Waveform {
    pub samples: Vec<f64>,
    /// Samples per second.
    pub sample_rate: u32,
}

impl Waveform {
    pub fn new(samples: Vec<f64>, sample_rate: u32) -> Self {
        Self {
            samples,
            sample_rate,
        }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Length in seconds; zero for a zero sample rate.
    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate == 0 {
            0.0
        } else {
            self.samples.len() as f64 / self.sample_rate as f64
        }
    }
}

/// PSD columns of a waveform, in segment order.
#[derive(Debug, Clone, PartialEq)]
pub struct Analysis {
    pub plan: SegmentPlan,
    pub columns: Vec<Vec<f64>>,
    /// Bin centres in Hz shared by every column.
    pub frequencies: Vec<f64>,
}

impl Analysis {
    /// Normalisation range of the columns under `scope`.
    pub fn range(&self, scope: RangeScope) -> Option<NormalizationRange> {
        RangeTracker::from_columns(scope, &self.columns).result()
    }

    /// Bins per column.
    pub fn bins(&self) -> usize {
        self.frequencies.len()
    }
}

/// Segment `waveform` and estimate one PSD column per segment.
///
/// A waveform shorter than one block yields no columns.
pub fn analyze(waveform: &Waveform, config: &SpectrogramConfig) -> Result<Analysis, SpectrogramError> {
    config.validate()?;
    if waveform.sample_rate == 0 {
        return Err(SpectrogramError::InvalidSampleRate);
    }
    let plan = SegmentPlan::for_waveform(waveform.len(), config.block_size, config.image_width)?;
    debug!(
        "segmenting {} samples: block {} hop {} overlap {} gap {}",
        waveform.len(),
        plan.block_size(),
        plan.hop(),
        plan.overlap(),
        plan.gap()
    );
    let frequencies = frequency_axis(config.block_size, waveform.sample_rate as f64);
    let columns = estimate_columns(&waveform.samples, plan, waveform.sample_rate)?;
    debug!("estimated {} columns of {} bins", columns.len(), frequencies.len());
    trace!("frequency axis: {:?}", frequencies);
    Ok(Analysis {
        plan,
        columns,
        frequencies,
    })
}

#[cfg(not(feature = "parallel"))]
fn estimate_columns(
    samples: &[f64],
    plan: SegmentPlan,
    sample_rate: u32,
) -> Result<Vec<Vec<f64>>, FftError> {
    let mut estimator = WelchEstimator::new(plan.block_size(), sample_rate)?;
    segment::segments(samples, plan)
        .map(|seg| estimator.estimate(seg))
        .collect()
}

#[cfg(feature = "parallel")]
fn estimate_columns(
    samples: &[f64],
    plan: SegmentPlan,
    sample_rate: u32,
) -> Result<Vec<Vec<f64>>, FftError> {
    use rayon::prelude::*;
    let block_size = plan.block_size();
    let hop = plan.hop();
    (0..plan.count(samples.len()))
        .into_par_iter()
        .map_init(
            || WelchEstimator::new(block_size, sample_rate),
            |estimator, i| match estimator {
                Ok(estimator) => estimator.estimate(&samples[i * hop..i * hop + block_size]),
                Err(err) => Err(*err),
            },
        )
        .collect()
}

/// Rendered spectrogram plus the diagnostics gathered on the way.
#[derive(Debug, Clone, PartialEq)]
pub struct Spectrogram {
    pub grid: PixelGrid,
    pub frequencies: Vec<f64>,
    pub range: Option<NormalizationRange>,
    pub plan: SegmentPlan,
    /// PSD columns computed, including any beyond the grid width.
    pub columns_produced: usize,
    /// Bins per PSD column.
    pub bins: usize,
}

/// Run every stage: segment, estimate, track the range, render.
pub fn spectrogram(
    waveform: &Waveform,
    config: &SpectrogramConfig,
) -> Result<Spectrogram, SpectrogramError> {
    let analysis = analyze(waveform, config)?;
    let range = analysis.range(config.range_scope);
    match range {
        None => warn!(
            "no complete {}-sample segment in {} samples; image left blank",
            config.block_size,
            waveform.len()
        ),
        Some(r) if r.is_flat() => warn!(
            "flat power range [{}, {}]; drawing flat fill {}",
            r.min, r.max, config.flat_fill
        ),
        Some(r) => debug!("{} range: min {} max {}", config.range_scope, r.min, r.max),
    }
    if analysis.columns.len() > config.image_width {
        debug!(
            "{} columns beyond image width {} not drawn",
            analysis.columns.len() - config.image_width,
            config.image_width
        );
    }
    let grid = render(&analysis.columns, range, config);
    Ok(Spectrogram {
        grid,
        range,
        plan: analysis.plan,
        columns_produced: analysis.columns.len(),
        bins: analysis.bins(),
        frequencies: analysis.frequencies,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_sample_rate_is_rejected() {
        let waveform = Waveform::new(vec![0.0; 4096], 0);
        assert_eq!(
            analyze(&waveform, &SpectrogramConfig::default()).unwrap_err(),
            SpectrogramError::InvalidSampleRate
        );
    }

    #[test]
    fn invalid_config_is_rejected_before_analysis() {
        let waveform = Waveform::new(vec![0.0; 4096], 8_000);
        let config = SpectrogramConfig {
            block_size: 100,
            ..SpectrogramConfig::default()
        };
        assert!(matches!(
            spectrogram(&waveform, &config),
            Err(SpectrogramError::InvalidConfig(_))
        ));
    }

    #[test]
    fn analysis_columns_follow_plan() {
        let waveform = Waveform::new(vec![0.5; 20_000], 8_000);
        let config = SpectrogramConfig {
            block_size: 256,
            image_width: 100,
            ..SpectrogramConfig::default()
        };
        let analysis = analyze(&waveform, &config).unwrap();
        assert_eq!(analysis.plan.hop(), 200);
        assert_eq!(analysis.columns.len(), (20_000 - 256) / 200 + 1);
        assert!(analysis.columns.iter().all(|c| c.len() == 129));
        assert_eq!(analysis.bins(), 129);
    }

    #[test]
    fn waveform_duration() {
        let waveform = Waveform::new(vec![0.0; 22_050], 44_100);
        assert!((waveform.duration_secs() - 0.5).abs() < 1e-12);
        assert_eq!(Waveform::new(vec![], 0).duration_secs(), 0.0);
        assert!(Waveform::new(vec![], 1).is_empty());
    }
}
