//! Dictation - dominant-frequency tracking core
//!
//! Slices a sample stream into overlapping frames, windows and transforms
//! each one, and reports the strongest non-DC bin per frame as a frequency
//! contour, with optional low-pass and ceiling smoothing.

pub mod audio;
pub mod config;
pub mod error;
pub mod filters;
pub mod report;
pub mod spectrum;
pub mod telemetry;
pub mod tracker;

pub use config::{AnalysisConfig, PostFilter};
pub use error::AnalysisError;
pub use filters::{LowPassSmoother, OutlierFilter};
pub use spectrum::{FrameScanner, FrequencySeries, SpectralPeakPicker, Windower};
pub use tracker::PitchTracker;
