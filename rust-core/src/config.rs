//! Analysis configuration
//!
//! Every tunable of the pipeline lives here and is passed explicitly into
//! the components that need it.

use crate::error::{AnalysisError, Result};

/// Default frame length in samples (0.1 s at 44.1 kHz)
pub const DEFAULT_FRAME_LENGTH: usize = 4410;

/// Default hop as a fraction of the frame length
pub const DEFAULT_STEP_FRACTION: f64 = 0.2;

/// Highest frequency (Hz) tolerated by the ceiling filter, also the default cutoff
pub const DEFAULT_MAX_FREQUENCY: f64 = 1000.0;

/// Post-processing applied around the frame scan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PostFilter {
    /// Raw dominant-frequency series
    #[default]
    None,

    /// Low-pass the raw samples before scanning (interval = 1 / sample rate)
    LowPassSamples,

    /// Low-pass the frequency series (interval = step / sample rate)
    LowPassContour,

    /// Replace values above `max_frequency` with their predecessor
    Ceiling,
}

/// Pitch tracking configuration
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisConfig {
    /// Frame length in samples, shared by the windower and the scanner
    pub frame_length: usize,

    /// Hop between frames as a fraction of `frame_length`
    pub step_fraction: f64,

    /// Explicit hop in samples, takes precedence over `step_fraction`
    pub step_override: Option<usize>,

    /// Ceiling for the outlier filter in Hz
    pub max_frequency: f64,

    /// Low-pass cutoff in Hz, `max_frequency` when unset
    pub cutoff_frequency: Option<f64>,

    /// Apply the Hamming taper to each frame before the transform
    pub apply_window: bool,

    /// Never report the DC bin as the dominant frequency
    pub exclude_dc: bool,

    /// Post-processing stage
    pub post_filter: PostFilter,

    /// Leave the final smoother output at zero, as older fixtures expect
    pub legacy_smoother_tail: bool,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            frame_length: DEFAULT_FRAME_LENGTH,
            step_fraction: DEFAULT_STEP_FRACTION,
            step_override: None,
            max_frequency: DEFAULT_MAX_FREQUENCY,
            cutoff_frequency: None,
            apply_window: true,
            exclude_dc: true,
            post_filter: PostFilter::None,
            legacy_smoother_tail: false,
        }
    }
}

impl AnalysisConfig {
    /// One estimate over a whole block: frame and hop both equal `len`
    pub fn single_block(len: usize) -> Self {
        Self {
            frame_length: len,
            step_override: Some(len),
            ..Self::default()
        }
    }

    /// Non-overlapping blocks of a fixed duration
    pub fn blocks_of(seconds: f64, sample_rate: f64) -> Self {
        let len = (seconds * sample_rate).round() as usize;
        Self::single_block(len)
    }

    /// Hop between consecutive frames in samples
    pub fn step_size(&self) -> usize {
        match self.step_override {
            Some(step) => step,
            None => ((self.frame_length as f64 * self.step_fraction) as usize).max(1),
        }
    }

    /// Effective low-pass cutoff in Hz
    pub fn cutoff(&self) -> f64 {
        self.cutoff_frequency.unwrap_or(self.max_frequency)
    }

    /// Seconds between consecutive frame starts
    pub fn hop_seconds(&self, sample_rate: f64) -> f64 {
        self.step_size() as f64 / sample_rate
    }

    /// Check the configuration independently of any input
    pub fn validate(&self) -> Result<()> {
        if self.frame_length == 0 {
            return Err(AnalysisError::Configuration(
                "frame length must be positive".into(),
            ));
        }

        match self.step_override {
            Some(0) => {
                return Err(AnalysisError::Configuration(
                    "step size must be positive".into(),
                ))
            }
            Some(_) => {}
            None => {
                if !self.step_fraction.is_finite() || self.step_fraction <= 0.0 {
                    return Err(AnalysisError::Configuration(format!(
                        "step fraction must be positive, got {}",
                        self.step_fraction
                    )));
                }
            }
        }

        if self.max_frequency.is_nan() || self.max_frequency <= 0.0 {
            return Err(AnalysisError::Configuration(format!(
                "max frequency must be positive, got {}",
                self.max_frequency
            )));
        }

        let cutoff = self.cutoff();
        if !cutoff.is_finite() || cutoff <= 0.0 {
            return Err(AnalysisError::Configuration(format!(
                "cutoff frequency must be positive, got {cutoff}"
            )));
        }

        Ok(())
    }
}
