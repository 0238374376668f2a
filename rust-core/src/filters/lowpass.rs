//! Single-pole exponential low-pass filter
//!
//! y[i] = y[i-1] + α·(x[i] - y[i-1]), with α = Δt / (RC + Δt) and RC = 1 / (2π·fc).
//! Smaller α means stronger smoothing.

use std::f64::consts::PI;

use crate::error::{AnalysisError, Result};

/// First-order recursive smoother over a whole sequence
///
/// Filter state is the previous output only; it lives for one call to
/// [`LowPassSmoother::smooth`] and never carries over to the next sequence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LowPassSmoother {
    alpha: f64,
    legacy_tail: bool,
}

impl LowPassSmoother {
    /// Create a smoother from the spacing of the input and a cutoff
    ///
    /// # Arguments
    /// * `sample_interval` - Seconds between inputs: `1/fs` for raw audio,
    ///   `step/fs` for a frequency series
    /// * `cutoff_frequency` - Cutoff in Hz
    pub fn new(sample_interval: f64, cutoff_frequency: f64) -> Result<Self> {
        if !sample_interval.is_finite() || sample_interval <= 0.0 {
            return Err(AnalysisError::Configuration(format!(
                "sample interval must be positive, got {sample_interval}"
            )));
        }
        if !cutoff_frequency.is_finite() || cutoff_frequency <= 0.0 {
            return Err(AnalysisError::Configuration(format!(
                "cutoff frequency must be positive, got {cutoff_frequency}"
            )));
        }

        let rc = 1.0 / (2.0 * PI * cutoff_frequency);
        let alpha = sample_interval / (rc + sample_interval);

        Ok(Self {
            alpha,
            legacy_tail: false,
        })
    }

    /// Create a smoother with an explicit smoothing constant in [0, 1]
    pub fn from_alpha(alpha: f64) -> Result<Self> {
        if !(0.0..=1.0).contains(&alpha) {
            return Err(AnalysisError::Configuration(format!(
                "smoothing constant must lie in [0, 1], got {alpha}"
            )));
        }

        Ok(Self {
            alpha,
            legacy_tail: false,
        })
    }

    /// Leave the last output slot at 0.0 instead of filtering it
    ///
    /// Older recorded contours were produced this way; enable only to
    /// reproduce them.
    pub fn with_legacy_tail(mut self, legacy_tail: bool) -> Self {
        self.legacy_tail = legacy_tail;
        self
    }

    /// Smoothing constant α
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Filter a sequence, returning a new one of the same length
    ///
    /// The first element passes through unchanged.
    pub fn smooth(&self, input: &[f64]) -> Vec<f64> {
        let Some(&first) = input.first() else {
            return Vec::new();
        };

        let mut output = vec![0.0; input.len()];
        output[0] = first;

        let finish = if self.legacy_tail {
            input.len() - 1
        } else {
            input.len()
        };

        for i in 1..finish {
            output[i] = output[i - 1] + self.alpha * (input[i] - output[i - 1]);
        }

        output
    }
}
