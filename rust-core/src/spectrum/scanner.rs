//! Sliding-frame frequency analysis
//!
//! Slides a fixed-size frame across a sample sequence, optionally windows
//! each frame, and records the dominant frequency of every frame.

use tracing::{debug, trace};

use super::frames::{frame_count, Frames};
use super::peak::SpectralPeakPicker;
use super::windowing::Windower;
use crate::config::AnalysisConfig;
use crate::error::{AnalysisError, Result};

/// Dominant frequency per frame, in temporal order
#[derive(Debug, Clone, PartialEq)]
pub struct FrequencySeries {
    /// Estimates in Hz, one per frame
    pub estimates: Vec<f64>,

    /// Seconds between consecutive estimates (step / sample rate)
    pub hop_seconds: f64,
}

impl FrequencySeries {
    pub fn new(estimates: Vec<f64>, hop_seconds: f64) -> Self {
        Self {
            estimates,
            hop_seconds,
        }
    }

    pub fn len(&self) -> usize {
        self.estimates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.estimates.is_empty()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.estimates
    }

    /// Start time in seconds of the frame behind each estimate
    pub fn times(&self) -> Vec<f64> {
        (0..self.estimates.len())
            .map(|k| k as f64 * self.hop_seconds)
            .collect()
    }

    pub fn into_vec(self) -> Vec<f64> {
        self.estimates
    }
}

/// Sliding-block dominant-frequency scanner
pub struct FrameScanner {
    frame_length: usize,
    step_size: usize,
    apply_window: bool,
    exclude_dc: bool,
    windower: Windower,
    picker: SpectralPeakPicker,
}

impl FrameScanner {
    /// Create a scanner for an explicit frame length and hop
    pub fn new(frame_length: usize, step_size: usize, apply_window: bool) -> Result<Self> {
        if frame_length == 0 {
            return Err(AnalysisError::Configuration(
                "frame length must be positive".into(),
            ));
        }
        if step_size == 0 {
            return Err(AnalysisError::Configuration(
                "step size must be positive".into(),
            ));
        }

        Ok(Self {
            frame_length,
            step_size,
            apply_window,
            exclude_dc: true,
            windower: Windower::new(frame_length),
            picker: SpectralPeakPicker::with_frame_length(frame_length),
        })
    }

    /// Create a scanner from a validated configuration
    pub fn from_config(config: &AnalysisConfig) -> Result<Self> {
        config.validate()?;
        let mut scanner = Self::new(config.frame_length, config.step_size(), config.apply_window)?;
        scanner.exclude_dc = config.exclude_dc;
        Ok(scanner)
    }

    /// Analyze a sample sequence
    ///
    /// # Returns
    /// Exactly `floor((N - frame_length) / step_size) + 1` estimates; estimate
    /// `k` comes from the frame starting at sample `k * step_size`.
    pub fn analyze(&mut self, samples: &[f64], sample_rate: f64) -> Result<FrequencySeries> {
        if samples.len() < self.frame_length {
            return Err(AnalysisError::Configuration(format!(
                "{} samples cannot fill a frame of {}",
                samples.len(),
                self.frame_length
            )));
        }
        if !sample_rate.is_finite() || sample_rate <= 0.0 {
            return Err(AnalysisError::Configuration(format!(
                "sample rate must be positive, got {sample_rate}"
            )));
        }

        let count = frame_count(samples.len(), self.frame_length, self.step_size);
        debug!(
            samples = samples.len(),
            frame_length = self.frame_length,
            step_size = self.step_size,
            frames = count,
            "scanning"
        );

        let mut estimates = Vec::with_capacity(count);
        for (start, frame) in Frames::new(samples, self.frame_length, self.step_size) {
            let frequency = if self.apply_window {
                let windowed = self.windower.apply(frame)?;
                self.picker
                    .dominant_frequency(&windowed, sample_rate, self.exclude_dc)?
            } else {
                self.picker
                    .dominant_frequency(frame, sample_rate, self.exclude_dc)?
            };
            trace!(start, frequency, "frame");
            estimates.push(frequency);
        }

        Ok(FrequencySeries::new(
            estimates,
            self.step_size as f64 / sample_rate,
        ))
    }

    pub fn frame_length(&self) -> usize {
        self.frame_length
    }

    pub fn step_size(&self) -> usize {
        self.step_size
    }
}
