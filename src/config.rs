//! Configuration parameters for the spectrogram pipeline.

use crate::error::SpectrogramError;
use crate::range::RangeScope;
use crate::render::Normalization;

/// Samples per analysis segment and FFT length.
pub const DEFAULT_BLOCK_SIZE: usize = 1024;

/// Number of time columns in the output image.
pub const DEFAULT_IMAGE_WIDTH: usize = 1000;

/// White, used for pixels no column reaches.
pub const DEFAULT_BACKGROUND: u8 = 255;

/// Environment variable selecting the [`RangeScope`].
pub const ENV_RANGE_SCOPE: &str = "WELCHGRAM_RANGE_SCOPE";

/// Environment variable selecting the [`Normalization`].
pub const ENV_NORMALIZATION: &str = "WELCHGRAM_NORMALIZATION";

/// Pipeline configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct SpectrogramConfig {
    /// Segment length and FFT size; must be a power of two.
    pub block_size: usize,

    /// Column capacity of the output grid.
    pub image_width: usize,

    /// Columns contributing to the normalisation range.
    pub range_scope: RangeScope,

    /// Power-to-intensity formula.
    pub normalization: Normalization,

    /// Initial value of every pixel.
    pub background: u8,

    /// Intensity drawn when the range is flat.
    pub flat_fill: u8,
}

impl Default for SpectrogramConfig {
    fn default() -> Self {
        Self {
            block_size: DEFAULT_BLOCK_SIZE,
            image_width: DEFAULT_IMAGE_WIDTH,
            range_scope: RangeScope::Global,
            normalization: Normalization::MinMax,
            background: DEFAULT_BACKGROUND,
            flat_fill: DEFAULT_BACKGROUND,
        }
    }
}

impl SpectrogramConfig {
    /// Last-column range with the range-width formula.
    ///
    /// Rows still follow [`crate::render::row_for_bin`] and intensities are
    /// rounded, so the image is not pixel-identical to a renderer that puts
    /// bin `k` at row `height - k` and truncates.
    pub fn reference() -> Self {
        Self {
            range_scope: RangeScope::LastColumn,
            normalization: Normalization::RangeWidth,
            ..Self::default()
        }
    }

    /// Grid height, one row per frequency bin below Nyquist.
    pub fn image_height(&self) -> usize {
        self.block_size / 2
    }

    pub fn validate(&self) -> Result<(), SpectrogramError> {
        if self.block_size < 2 || !self.block_size.is_power_of_two() {
            return Err(SpectrogramError::InvalidConfig(format!(
                "block size must be a power of two of at least 2, got {}",
                self.block_size
            )));
        }
        if self.image_width == 0 {
            return Err(SpectrogramError::InvalidConfig(
                "image width must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// Defaults overridden by [`ENV_RANGE_SCOPE`] and [`ENV_NORMALIZATION`].
    pub fn from_env() -> Result<Self, SpectrogramError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overridden by values returned from `lookup`.
    ///
    /// Unset or empty keys keep their defaults; unparsable values are errors.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, SpectrogramError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(v) = lookup(ENV_RANGE_SCOPE).filter(|v| !v.trim().is_empty()) {
            config.range_scope = v.parse()?;
        }
        if let Some(v) = lookup(ENV_NORMALIZATION).filter(|v| !v.trim().is_empty()) {
            config.normalization = v.parse()?;
        }
        Ok(config)
    }
}
