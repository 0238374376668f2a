//! Spectral analysis: windowing, FFT, peak picking and frame scanning

pub mod fft;
pub mod frames;
pub mod peak;
pub mod scanner;
pub mod windowing;

pub use fft::SpectrumEngine;
pub use frames::Frames;
pub use peak::SpectralPeakPicker;
pub use scanner::{FrameScanner, FrequencySeries};
pub use windowing::Windower;
