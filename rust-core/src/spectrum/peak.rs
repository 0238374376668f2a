//! Dominant-frequency estimation from a single frame

use tracing::trace;

use super::fft::SpectrumEngine;
use crate::error::{AnalysisError, Result};

/// Frequency in Hz of `bin` for a frame of `frame_length` samples
///
/// Equivalent to `bin * sample_rate / frame_length`, written in terms of the
/// interleaved spectrum length `2 * frame_length`.
#[inline]
pub fn bin_frequency(bin: usize, frame_length: usize, sample_rate: f64) -> f64 {
    let full_len = (2 * frame_length) as f64;
    (bin as f64 / full_len) * sample_rate * 2.0
}

/// Picks the strongest spectral bin of a frame
///
/// Owns a cached [`SpectrumEngine`], re-planned whenever the frame length changes.
#[derive(Default)]
pub struct SpectralPeakPicker {
    engine: Option<SpectrumEngine>,
}

impl SpectralPeakPicker {
    pub fn new() -> Self {
        Self { engine: None }
    }

    /// Picker with a transform already planned for `frame_length`
    pub fn with_frame_length(frame_length: usize) -> Self {
        Self {
            engine: Some(SpectrumEngine::new(frame_length)),
        }
    }

    fn engine_for(&mut self, frame_length: usize) -> &mut SpectrumEngine {
        if self.engine.as_ref().map(SpectrumEngine::fft_size) != Some(frame_length) {
            self.engine = Some(SpectrumEngine::new(frame_length));
        }

        self.engine.get_or_insert_with(|| SpectrumEngine::new(frame_length))
    }

    /// Index of the bin with the largest magnitude
    ///
    /// Bins are scanned in ascending order and only a strictly larger
    /// magnitude replaces the current winner, so ties go to the lower bin.
    /// With `exclude_dc` bin 0 never wins.
    pub fn dominant_bin(&mut self, frame: &[f64], exclude_dc: bool) -> Result<usize> {
        if frame.is_empty() {
            return Err(AnalysisError::InvalidFrame("frame is empty".into()));
        }

        let spectrum = self.engine_for(frame.len()).full_spectrum(frame)?;

        let first = if exclude_dc { 1 } else { 0 };
        let mut best: Option<(usize, f64)> = None;

        for (bin, pair) in spectrum.chunks_exact(2).enumerate().skip(first) {
            let magnitude = (pair[0] * pair[0] + pair[1] * pair[1]).sqrt();
            if magnitude.is_nan() {
                continue;
            }
            if best.map_or(true, |(_, max)| magnitude > max) {
                best = Some((bin, magnitude));
            }
        }

        let (bin, magnitude) = best.ok_or_else(|| {
            AnalysisError::InvalidFrame(format!(
                "no eligible bin in a frame of {} samples",
                frame.len()
            ))
        })?;

        trace!(bin, magnitude, "dominant bin");
        Ok(bin)
    }

    /// Dominant frequency of `frame` in Hz
    pub fn dominant_frequency(
        &mut self,
        frame: &[f64],
        sample_rate: f64,
        exclude_dc: bool,
    ) -> Result<f64> {
        if !sample_rate.is_finite() || sample_rate <= 0.0 {
            return Err(AnalysisError::Configuration(format!(
                "sample rate must be positive, got {sample_rate}"
            )));
        }

        let bin = self.dominant_bin(frame, exclude_dc)?;
        Ok(bin_frequency(bin, frame.len(), sample_rate))
    }
}
