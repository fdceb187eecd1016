//! Mapping PSD columns onto an 8-bit grayscale pixel grid.
//!
//! The grid has a fixed capacity of `image_width` columns and
//! `block_size / 2` rows. Column `x` holds the `x`-th PSD column with its
//! lowest frequency bin on the bottom row. Pixels that no column reaches keep
//! the background fill.

use core::fmt;
use core::str::FromStr;

use crate::config::SpectrogramConfig;
use crate::error::SpectrogramError;
use crate::range::NormalizationRange;

/// Maximum value for an 8-bit channel.
const U8_MAX: f64 = 255.0;

/// Formula turning a power value into an intensity.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Normalization {
    /// `(value - min) / (max - min)`.
    #[default]
    MinMax,
    /// `value / (max - min)`, without subtracting `min`.
    RangeWidth,
}

impl Normalization {
    /// Intensity for `value`, clamped to `0..=255`.
    ///
    /// A flat or non-finite range and NaN values map to `flat_fill`.
    pub fn intensity(self, value: f64, range: NormalizationRange, flat_fill: u8) -> u8 {
        if value.is_nan() || range.is_flat() {
            return flat_fill;
        }
        let width = range.width();
        let t = match self {
            Normalization::MinMax => (value - range.min) / width,
            Normalization::RangeWidth => value / width,
        };
        (t.clamp(0.0, 1.0) * U8_MAX).round() as u8
    }
}

impl FromStr for Normalization {
    type Err = SpectrogramError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "min-max" | "minmax" => Ok(Normalization::MinMax),
            "range-width" | "width" => Ok(Normalization::RangeWidth),
            other => Err(SpectrogramError::InvalidConfig(format!(
                "unknown normalization `{other}` (expected `min-max` or `range-width`)"
            ))),
        }
    }
}

impl fmt::Display for Normalization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Normalization::MinMax => write!(f, "min-max"),
            Normalization::RangeWidth => write!(f, "range-width"),
        }
    }
}

/// Row-major 8-bit grayscale image.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelGrid {
    width: usize,
    height: usize,
    pixels: Vec<u8>,
}

impl PixelGrid {
    pub fn new(width: usize, height: usize, fill: u8) -> Self {
        Self {
            width,
            height,
            pixels: vec![fill; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn get(&self, x: usize, y: usize) -> Option<u8> {
        (x < self.width && y < self.height).then(|| self.pixels[y * self.width + x])
    }

    /// Set a pixel; coordinates outside the grid are ignored.
    pub fn set(&mut self, x: usize, y: usize, value: u8) {
        if x < self.width && y < self.height {
            self.pixels[y * self.width + x] = value;
        }
    }

    /// Pixels of column `x` from top to bottom.
    pub fn column(&self, x: usize) -> Vec<u8> {
        if x >= self.width {
            return Vec::new();
        }
        (0..self.height)
            .map(|y| self.pixels[y * self.width + x])
            .collect()
    }

    pub fn as_raw(&self) -> &[u8] {
        &self.pixels
    }

    pub fn into_raw(self) -> Vec<u8> {
        self.pixels
    }
}

/// Grid row of frequency bin `bin`, or `None` if the bin has no row.
pub fn row_for_bin(bin: usize, height: usize) -> Option<usize> {
    (bin < height).then(|| height - 1 - bin)
}

/// Render PSD columns into a fixed-size grid.
///
/// Columns past `config.image_width` are not drawn. With `range == None`
/// every drawn pixel takes `config.flat_fill`.
pub fn render<C: AsRef<[f64]>>(
    columns: &[C],
    range: Option<NormalizationRange>,
    config: &SpectrogramConfig,
) -> PixelGrid {
    let height = config.image_height();
    let mut grid = PixelGrid::new(config.image_width, height, config.background);
    for (x, column) in columns.iter().take(config.image_width).enumerate() {
        for (bin, &value) in column.as_ref().iter().enumerate() {
            let Some(y) = row_for_bin(bin, height) else {
                continue;
            };
            let intensity = match range {
                Some(range) => config.normalization.intensity(value, range, config.flat_fill),
                None => config.flat_fill,
            };
            grid.set(x, y, intensity);
        }
    }
    grid
}
