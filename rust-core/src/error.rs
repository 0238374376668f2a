//! Error types for the analysis core

use thiserror::Error;

/// Failures raised by windowing, transform, scanning and filtering
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalysisError {
    /// A frame that cannot be analysed reached the peak picker or windower
    #[error("Invalid frame: {0}")]
    InvalidFrame(String),

    /// Non-positive frame/step sizes, too few samples, bad filter parameters
    #[error("Invalid configuration: {0}")]
    Configuration(String),

    /// The FFT backend rejected its buffers
    #[error("Transform failed: {0}")]
    Transform(String),
}

pub type Result<T> = std::result::Result<T, AnalysisError>;
