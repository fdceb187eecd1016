//! Normalisation range tracking over PSD columns.

use core::fmt;
use core::str::FromStr;

use crate::error::SpectrogramError;

/// Which columns contribute to the normalisation range.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RangeScope {
    /// Minimum and maximum over every observed column.
    #[default]
    Global,
    /// Extremes of the most recently observed column only.
    LastColumn,
}

impl FromStr for RangeScope {
    type Err = SpectrogramError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "global" => Ok(RangeScope::Global),
            "last" | "last-column" => Ok(RangeScope::LastColumn),
            other => Err(SpectrogramError::InvalidConfig(format!(
                "unknown range scope `{other}` (expected `global` or `last`)"
            ))),
        }
    }
}

impl fmt::Display for RangeScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RangeScope::Global => write!(f, "global"),
            RangeScope::LastColumn => write!(f, "last"),
        }
    }
}

/// Power values mapped to the ends of the intensity scale.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NormalizationRange {
    pub min: f64,
    pub max: f64,
}

impl NormalizationRange {
    pub fn width(&self) -> f64 {
        self.max - self.min
    }

    /// `true` when the range cannot be divided by.
    pub fn is_flat(&self) -> bool {
        let w = self.width();
        !(w.is_finite() && w > 0.0)
    }

    fn merge(self, other: Self) -> Self {
        Self {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }
}

/// Extremes of one column, ignoring NaN. `None` if nothing is left.
pub fn column_extremes(values: &[f64]) -> Option<NormalizationRange> {
    values
        .iter()
        .copied()
        .filter(|v| !v.is_nan())
        .fold(None, |acc: Option<NormalizationRange>, v| {
            let point = NormalizationRange { min: v, max: v };
            Some(match acc {
                Some(r) => r.merge(point),
                None => point,
            })
        })
}

/// Accumulates a [`NormalizationRange`] as columns are observed.
#[derive(Clone, Debug)]
pub struct RangeTracker {
    scope: RangeScope,
    current: Option<NormalizationRange>,
    observed: usize,
}

impl RangeTracker {
    pub fn new(scope: RangeScope) -> Self {
        Self {
            scope,
            current: None,
            observed: 0,
        }
    }

    /// Tracker that has already observed every column in order.
    pub fn from_columns<C: AsRef<[f64]>>(scope: RangeScope, columns: &[C]) -> Self {
        let mut tracker = Self::new(scope);
        for column in columns {
            tracker.observe(column.as_ref());
        }
        tracker
    }

    /// Update the range with one column. Columns without a finite value are skipped.
    pub fn observe(&mut self, column: &[f64]) {
        let Some(extremes) = column_extremes(column) else {
            return;
        };
        self.observed += 1;
        self.current = match (self.scope, self.current) {
            (RangeScope::Global, Some(range)) => Some(range.merge(extremes)),
            _ => Some(extremes),
        };
    }

    /// Number of columns that contributed.
    pub fn observed(&self) -> usize {
        self.observed
    }

    /// `None` until at least one non-empty column has been observed.
    pub fn result(&self) -> Option<NormalizationRange> {
        self.current
    }
}
