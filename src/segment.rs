//! Slicing a waveform into fixed-length analysis segments.
//!
//! A [`SegmentPlan`] fixes the segment length and the hop between segment
//! starts. Segments are borrowed views into the waveform; a trailing
//! remainder shorter than one segment is dropped rather than zero-padded.

use crate::fft::FftError;

/// Segment length and hop size for one pass over a signal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SegmentPlan {
    block_size: usize,
    hop: usize,
}

impl SegmentPlan {
    /// Plan with an explicit hop. Hops larger than `block_size` leave gaps.
    pub fn new(block_size: usize, hop: usize) -> Result<Self, FftError> {
        if block_size == 0 {
            return Err(FftError::InvalidValue);
        }
        if hop == 0 {
            return Err(FftError::InvalidHopSize);
        }
        Ok(Self { block_size, hop })
    }

    /// Plan from an overlap count, as used by Welch sub-windowing.
    pub fn from_overlap(block_size: usize, noverlap: usize) -> Result<Self, FftError> {
        if noverlap >= block_size {
            return Err(FftError::InvalidValue);
        }
        Self::new(block_size, block_size - noverlap)
    }

    /// Plan that spreads `len` samples over roughly `columns` segments.
    ///
    /// The hop is `len / columns`, clamped to at least one sample.
    pub fn for_waveform(len: usize, block_size: usize, columns: usize) -> Result<Self, FftError> {
        if columns == 0 {
            return Err(FftError::InvalidValue);
        }
        Self::new(block_size, (len / columns).max(1))
    }

    pub fn block_size(&self) -> usize {
        self.block_size
    }

    pub fn hop(&self) -> usize {
        self.hop
    }

    /// Samples shared by consecutive segments; zero when the hop reaches the block size.
    pub fn overlap(&self) -> usize {
        self.block_size.saturating_sub(self.hop)
    }

    /// Samples skipped between consecutive segments.
    pub fn gap(&self) -> usize {
        self.hop.saturating_sub(self.block_size)
    }

    /// Number of complete segments that fit in `len` samples.
    pub fn count(&self, len: usize) -> usize {
        if len < self.block_size {
            0
        } else {
            (len - self.block_size) / self.hop + 1
        }
    }

    /// Start offsets of every segment in a signal of `len` samples.
    pub fn offsets(&self, len: usize) -> impl Iterator<Item = usize> {
        let hop = self.hop;
        (0..self.count(len)).map(move |i| i * hop)
    }
}

/// Lazy iterator over the segments of a signal.
#[derive(Clone, Debug)]
pub struct Segments<'a> {
    samples: &'a [f64],
    plan: SegmentPlan,
    index: usize,
    count: usize,
}

impl<'a> Iterator for Segments<'a> {
    type Item = &'a [f64];

    fn next(&mut self) -> Option<Self::Item> {
        if self.index >= self.count {
            return None;
        }
        let start = self.index * self.plan.hop;
        self.index += 1;
        Some(&self.samples[start..start + self.plan.block_size])
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.count - self.index;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Segments<'_> {}

/// Iterate over the segments of `samples` described by `plan`.
pub fn segments(samples: &[f64], plan: SegmentPlan) -> Segments<'_> {
    Segments {
        samples,
        plan,
        index: 0,
        count: plan.count(samples.len()),
    }
}
