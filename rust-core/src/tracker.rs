//! Configured pitch-tracking pipeline
//!
//! Optional sample pre-filter → frame scan → optional contour post-filter,
//! selected by [`AnalysisConfig::post_filter`].

use tracing::debug;

use crate::config::{AnalysisConfig, PostFilter};
use crate::error::Result;
use crate::filters::{LowPassSmoother, OutlierFilter};
use crate::spectrum::{FrameScanner, FrequencySeries};

/// End-to-end dominant-frequency tracker
pub struct PitchTracker {
    config: AnalysisConfig,
    scanner: FrameScanner,
}

impl PitchTracker {
    pub fn new(config: AnalysisConfig) -> Result<Self> {
        let scanner = FrameScanner::from_config(&config)?;
        Ok(Self { config, scanner })
    }

    /// Run the pipeline over a fully materialised sample sequence
    pub fn track(&mut self, samples: &[f64], sample_rate: f64) -> Result<FrequencySeries> {
        debug!(
            samples = samples.len(),
            sample_rate,
            post_filter = ?self.config.post_filter,
            "tracking"
        );

        match self.config.post_filter {
            PostFilter::None => self.scanner.analyze(samples, sample_rate),

            PostFilter::LowPassSamples => {
                let smoothed = self.smooth_samples(samples, sample_rate)?;
                self.scanner.analyze(&smoothed, sample_rate)
            }

            PostFilter::LowPassContour => {
                let series = self.scanner.analyze(samples, sample_rate)?;
                let smoother = LowPassSmoother::new(series.hop_seconds, self.config.cutoff())?
                    .with_legacy_tail(self.config.legacy_smoother_tail);
                let estimates = smoother.smooth(series.as_slice());
                Ok(FrequencySeries::new(estimates, series.hop_seconds))
            }

            PostFilter::Ceiling => {
                let series = self.scanner.analyze(samples, sample_rate)?;
                let estimates = OutlierFilter::new(self.config.max_frequency).filter(series.as_slice());
                Ok(FrequencySeries::new(estimates, series.hop_seconds))
            }
        }
    }

    /// Low-pass the raw samples at the configured cutoff
    pub fn smooth_samples(&self, samples: &[f64], sample_rate: f64) -> Result<Vec<f64>> {
        let smoother = LowPassSmoother::new(1.0 / sample_rate, self.config.cutoff())?
            .with_legacy_tail(self.config.legacy_smoother_tail);
        Ok(smoother.smooth(samples))
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AnalysisError;
    use std::f64::consts::PI;

    fn sine(freq: f64, sample_rate: f64, len: usize) -> Vec<f64> {
        (0..len)
            .map(|n| (2.0 * PI * freq * n as f64 / sample_rate).sin())
            .collect()
    }

    #[test]
    fn test_default_pipeline() {
        let sample_rate = 44100.0;
        let samples = sine(440.0, sample_rate, 44100);

        let mut tracker = PitchTracker::new(AnalysisConfig::default()).unwrap();
        let series = tracker.track(&samples, sample_rate).unwrap();

        assert_eq!(series.len(), 46);
        assert!(series.estimates.iter().all(|&f| (f - 440.0).abs() <= 10.0));
        assert!((series.hop_seconds - 0.02).abs() < 1e-12);
    }

    #[test]
    fn test_lowpass_samples_suppresses_high_tone() {
        // Quiet low tone under a loud high tone; the pre-filter flips the winner
        let sample_rate = 8000.0;
        let samples: Vec<f64> = sine(100.0, sample_rate, 4000)
            .iter()
            .zip(sine(3000.0, sample_rate, 4000))
            .map(|(low, high)| low + 0.8 * high)
            .collect();

        let base = AnalysisConfig {
            frame_length: 800,
            step_override: Some(800),
            cutoff_frequency: Some(50.0),
            ..AnalysisConfig::default()
        };

        let mut raw = PitchTracker::new(base.clone()).unwrap();
        let raw_series = raw.track(&samples, sample_rate).unwrap();
        assert!((raw_series.estimates[1] - 100.0).abs() < 1e-9);

        let loud_high: Vec<f64> = sine(100.0, sample_rate, 4000)
            .iter()
            .zip(sine(3000.0, sample_rate, 4000))
            .map(|(low, high)| 0.5 * low + high)
            .collect();

        let unfiltered = raw.track(&loud_high, sample_rate).unwrap();
        assert!((unfiltered.estimates[1] - 3000.0).abs() < 1e-9);

        let mut filtered = PitchTracker::new(AnalysisConfig {
            post_filter: PostFilter::LowPassSamples,
            ..base
        })
        .unwrap();
        let filtered_series = filtered.track(&loud_high, sample_rate).unwrap();
        assert!((filtered_series.estimates[1] - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_ceiling_post_filter() {
        // 440 Hz then 2 kHz; the ceiling holds the contour at 440
        let sample_rate = 8000.0;
        let mut samples = sine(440.0, sample_rate, 1600);
        samples.extend(sine(2000.0, sample_rate, 1600));

        let mut tracker = PitchTracker::new(AnalysisConfig {
            frame_length: 400,
            step_override: Some(400),
            post_filter: PostFilter::Ceiling,
            ..AnalysisConfig::default()
        })
        .unwrap();

        let series = tracker.track(&samples, sample_rate).unwrap();
        assert_eq!(series.len(), 8);
        assert!(series.estimates.iter().all(|&f| (f - 440.0).abs() <= 20.0));
        assert_eq!(series.estimates[7], series.estimates[3]);
    }

    #[test]
    fn test_contour_smoothing_keeps_length() {
        let sample_rate = 8000.0;
        let samples = sine(1000.0, sample_rate, 4000);

        let mut tracker = PitchTracker::new(AnalysisConfig {
            frame_length: 400,
            step_override: Some(200),
            cutoff_frequency: Some(5.0),
            post_filter: PostFilter::LowPassContour,
            ..AnalysisConfig::default()
        })
        .unwrap();

        let series = tracker.track(&samples, sample_rate).unwrap();
        assert_eq!(series.len(), 19);
        // Constant contour stays constant under smoothing
        assert!(series.estimates.iter().all(|&f| (f - 1000.0).abs() < 1e-6));
    }

    #[test]
    fn test_too_short_input() {
        let mut tracker = PitchTracker::new(AnalysisConfig::default()).unwrap();
        assert!(matches!(
            tracker.track(&[0.0; 100], 44100.0),
            Err(AnalysisError::Configuration(_))
        ));
    }
}
