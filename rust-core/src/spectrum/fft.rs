//! FFT engine using realfft for real-valued frames
//!
//! Produces the full discrete spectrum (negative-frequency half included)
//! as interleaved `[re0, im0, re1, im1, ...]` pairs.

use num_complex::Complex;
use realfft::{RealFftPlanner, RealToComplex};
use std::sync::Arc;

use crate::error::{AnalysisError, Result};

/// Full-spectrum FFT engine for real-valued frames
pub struct SpectrumEngine {
    /// FFT size (number of samples)
    fft_size: usize,

    /// Real FFT processor
    r2c: Arc<dyn RealToComplex<f64>>,

    /// Reusable input buffer, overwritten by the transform
    input_buffer: Vec<f64>,

    /// Reusable half spectrum, `fft_size / 2 + 1` bins
    output_buffer: Vec<Complex<f64>>,
}

impl SpectrumEngine {
    /// Plan a transform for frames of `fft_size` samples
    pub fn new(fft_size: usize) -> Self {
        let mut planner = RealFftPlanner::<f64>::new();
        let r2c = planner.plan_fft_forward(fft_size);

        let input_buffer = r2c.make_input_vec();
        let output_buffer = r2c.make_output_vec();

        Self {
            fft_size,
            r2c,
            input_buffer,
            output_buffer,
        }
    }

    /// Transform a frame into its full interleaved spectrum
    ///
    /// # Returns
    /// `2 * fft_size` values; bins above `fft_size / 2` are the complex
    /// conjugates of their mirror bins, so their magnitudes match exactly.
    pub fn full_spectrum(&mut self, frame: &[f64]) -> Result<Vec<f64>> {
        if frame.is_empty() {
            return Err(AnalysisError::InvalidFrame("frame is empty".into()));
        }
        if frame.len() != self.fft_size {
            return Err(AnalysisError::InvalidFrame(format!(
                "frame has {} samples, transform expects {}",
                frame.len(),
                self.fft_size
            )));
        }

        self.input_buffer.copy_from_slice(frame);
        self.r2c
            .process(&mut self.input_buffer, &mut self.output_buffer)
            .map_err(|e| AnalysisError::Transform(e.to_string()))?;

        let n = self.fft_size;
        let mut interleaved = Vec::with_capacity(2 * n);
        for k in 0..n {
            let bin = if k < self.output_buffer.len() {
                self.output_buffer[k]
            } else {
                self.output_buffer[n - k].conj()
            };
            interleaved.push(bin.re);
            interleaved.push(bin.im);
        }

        Ok(interleaved)
    }

    /// Get FFT size
    pub fn fft_size(&self) -> usize {
        self.fft_size
    }
}
