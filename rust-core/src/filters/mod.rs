//! Post-processing filters for sample and frequency sequences

pub mod lowpass;
pub mod outlier;

pub use lowpass::LowPassSmoother;
pub use outlier::OutlierFilter;
