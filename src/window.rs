//! Analysis window applied to each Welch sub-window.

use core::f64::consts::PI;

/// Generate a symmetric Hann window of length `len`.
///
/// `w[i] = 0.5 * (1 - cos(2πi / (len - 1)))`, so both end points are zero.
/// A window of length one is `[1.0]`.
pub fn hann(len: usize) -> Vec<f64> {
    if len == 1 {
        return vec![1.0];
    }
    let step = 2.0 * PI / (len as f64 - 1.0);
    (0..len)
        .map(|i| 0.5 * (1.0 - (step * i as f64).cos()))
        .collect()
}

/// Multiply `samples` by `window` element-wise.
pub fn apply(samples: &mut [f64], window: &[f64]) {
    for (s, w) in samples.iter_mut().zip(window.iter()) {
        *s *= w;
    }
}

/// Sum of squared window coefficients, the Welch power normalisation term.
pub fn energy(window: &[f64]) -> f64 {
    window.iter().map(|w| w * w).sum()
}
