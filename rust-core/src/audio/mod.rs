//! Audio decoding, recording and live capture

pub mod buffer;
pub mod capture;
pub mod error;
pub mod input;
pub mod wav;

pub use buffer::SampleRingBuffer;
pub use capture::{CaptureConfig, LiveCapture};
pub use error::AudioError;
pub use input::AudioInput;
pub use wav::{write_wav, DecodedAudio, SampleSource, WavSource};
