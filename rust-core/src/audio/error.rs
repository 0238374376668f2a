//! Errors from decoding, recording and device capture

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AudioError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Unsupported audio format: {0}")]
    UnsupportedFormat(String),

    #[error("Failed to decode audio: {0}")]
    Decode(String),

    #[error("No audio input device found")]
    NoDevice,

    #[error("Failed to get device name: {0}")]
    DeviceName(String),

    #[error("Failed to get default config: {0}")]
    DefaultConfig(String),

    #[error("Failed to build stream: {0}")]
    BuildStream(String),

    #[error("Failed to play stream: {0}")]
    PlayStream(String),

    #[error("Capture channel closed")]
    ChannelClosed,

    #[error("Capture thread panicked")]
    WorkerPanicked,
}

impl From<hound::Error> for AudioError {
    fn from(err: hound::Error) -> Self {
        match err {
            hound::Error::IoError(io) => AudioError::Io(io),
            other @ (hound::Error::FormatError(_)
            | hound::Error::Unsupported
            | hound::Error::InvalidSampleFormat
            | hound::Error::TooWide) => AudioError::UnsupportedFormat(other.to_string()),
            other => AudioError::Decode(other.to_string()),
        }
    }
}
