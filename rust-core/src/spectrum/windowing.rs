//! Hamming windowing for analysis frames
//!
//! Tapers each frame before the FFT to reduce spectral leakage

use std::f64::consts::PI;

use crate::error::{AnalysisError, Result};

/// Hamming coefficient at sample `t` of a frame of `frame_length`
///
/// w[t] = 0.54 - 0.46*cos(2πt/L), the periodic form (denominator L, not L-1)
#[inline]
pub fn hamming(t: usize, frame_length: usize) -> f64 {
    0.54 - 0.46 * (2.0 * PI * t as f64 / frame_length as f64).cos()
}

/// Raised-cosine taper for frames of a fixed length
#[derive(Debug, Clone)]
pub struct Windower {
    coefficients: Vec<f64>,
}

impl Windower {
    /// Precompute coefficients for frames of `frame_length` samples
    pub fn new(frame_length: usize) -> Self {
        let coefficients = (0..frame_length).map(|t| hamming(t, frame_length)).collect();
        Self { coefficients }
    }

    /// Return a windowed copy of `frame`
    ///
    /// The frame must be exactly the configured length; it is never modified.
    pub fn apply(&self, frame: &[f64]) -> Result<Vec<f64>> {
        if frame.len() != self.coefficients.len() {
            return Err(AnalysisError::InvalidFrame(format!(
                "window expects {} samples, frame has {}",
                self.coefficients.len(),
                frame.len()
            )));
        }

        Ok(frame
            .iter()
            .zip(self.coefficients.iter())
            .map(|(&s, &w)| s * w)
            .collect())
    }

    pub fn frame_length(&self) -> usize {
        self.coefficients.len()
    }

    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }
}
