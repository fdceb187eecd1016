//! Fast Fourier Transform (FFT) algorithms.
//!
//! This module implements an in-place complex FFT based on the iterative
//! radix-2 [Cooley–Tukey algorithm](https://en.wikipedia.org/wiki/Cooley%E2%80%93Tukey_FFT_algorithm).
//! A [`FftPlanner`] caches twiddle factors so repeated transforms of the same
//! length (one per spectrogram column) reuse a single table.

use std::cell::RefCell;
use std::fmt;
use std::sync::Arc;

use hashbrown::HashMap;

pub use crate::num::{Complex, Complex32, Complex64, Float};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FftError {
    EmptyInput,
    NonPowerOfTwo,
    MismatchedLengths,
    InvalidHopSize,
    InvalidValue,
}

impl fmt::Display for FftError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FftError::EmptyInput => write!(f, "input is empty"),
            FftError::NonPowerOfTwo => write!(f, "transform length is not a power of two"),
            FftError::MismatchedLengths => write!(f, "buffer lengths do not match"),
            FftError::InvalidHopSize => write!(f, "hop size must be non-zero"),
            FftError::InvalidValue => write!(f, "invalid parameter value"),
        }
    }
}

impl std::error::Error for FftError {}

pub struct FftPlanner<T: Float> {
    /// Twiddle tables keyed by transform length `n`. The table for `n` has
    /// `n/2` elements holding `exp(-2πi k / n)` for `k = 0..n/2`.
    cache: HashMap<usize, Arc<[Complex<T>]>>,
}

impl<T: Float> Default for FftPlanner<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Float> FftPlanner<T> {
    pub fn new() -> Self {
        Self {
            cache: HashMap::new(),
        }
    }

    /// Retrieve the twiddle table for a transform of length `n`.
    pub fn get_twiddles(&mut self, n: usize) -> Result<Arc<[Complex<T>]>, FftError> {
        if let Some(table) = self.cache.get(&n) {
            return Ok(Arc::clone(table));
        }
        let len = T::from_usize(n).ok_or(FftError::InvalidValue)?;
        let step = -T::from_f64(2.0) * T::pi() / len;
        let mut table: Vec<Complex<T>> = Vec::with_capacity(n / 2);
        for k in 0..n / 2 {
            let k = T::from_usize(k).ok_or(FftError::InvalidValue)?;
            table.push(Complex::expi(step * k));
        }
        let table: Arc<[Complex<T>]> = Arc::from(table);
        self.cache.insert(n, Arc::clone(&table));
        Ok(table)
    }

    /// Number of distinct transform lengths planned so far.
    pub fn cached_lengths(&self) -> usize {
        self.cache.len()
    }
}

pub trait FftImpl<T: Float> {
    /// Forward transform in place.
    fn fft(&self, input: &mut [Complex<T>]) -> Result<(), FftError>;

    fn fft_vec(&self, input: &[Complex<T>]) -> Result<Vec<Complex<T>>, FftError> {
        let mut out = Vec::from(input);
        self.fft(&mut out)?;
        Ok(out)
    }
}

pub struct ScalarFftImpl<T: Float> {
    planner: RefCell<FftPlanner<T>>,
}

impl<T: Float> Default for ScalarFftImpl<T> {
    fn default() -> Self {
        Self {
            planner: RefCell::new(FftPlanner::new()),
        }
    }
}

impl<T: Float> FftImpl<T> for ScalarFftImpl<T> {
    fn fft(&self, input: &mut [Complex<T>]) -> Result<(), FftError> {
        let n = input.len();
        if n == 0 {
            return Err(FftError::EmptyInput);
        }
        if !n.is_power_of_two() {
            return Err(FftError::NonPowerOfTwo);
        }
        if n == 1 {
            return Ok(());
        }
        let twiddles = self.planner.borrow_mut().get_twiddles(n)?;

        bit_reverse_permute(input);

        let mut len = 2;
        while len <= n {
            let half = len / 2;
            let stride = n / len;
            for start in (0..n).step_by(len) {
                for j in 0..half {
                    let w = twiddles[j * stride];
                    let u = input[start + j];
                    let v = input[start + j + half] * w;
                    input[start + j] = u + v;
                    input[start + j + half] = u - v;
                }
            }
            len <<= 1;
        }
        Ok(())
    }
}

fn bit_reverse_permute<T: Float>(input: &mut [Complex<T>]) {
    let n = input.len();
    let mut j = 0usize;
    for i in 1..n {
        let mut bit = n >> 1;
        while j & bit != 0 {
            j ^= bit;
            bit >>= 1;
        }
        j ^= bit;
        if i < j {
            input.swap(i, j);
        }
    }
}
