//! WAV decoding and recording with hound
//!
//! Decoded samples are normalised by the largest amplitude of the source
//! bit depth and mixed down to a single channel.

use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
use std::path::Path;
use tracing::debug;

use super::error::AudioError;

/// A fully decoded, mono, normalised sample sequence
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedAudio {
    pub samples: Vec<f64>,
    pub sample_rate: u32,

    /// Channel count of the source before downmixing
    pub channels: u16,
    pub bits_per_sample: u16,
}

impl DecodedAudio {
    pub fn sample_rate_hz(&self) -> f64 {
        self.sample_rate as f64
    }

    pub fn duration_seconds(&self) -> f64 {
        self.samples.len() as f64 / self.sample_rate as f64
    }
}

/// Anything that can turn a file into a normalised sample sequence
pub trait SampleSource {
    fn decode(&self, path: &Path) -> Result<DecodedAudio, AudioError>;
}

/// PCM / IEEE-float WAV decoder
#[derive(Debug, Default, Clone, Copy)]
pub struct WavSource;

impl SampleSource for WavSource {
    fn decode(&self, path: &Path) -> Result<DecodedAudio, AudioError> {
        let mut reader = WavReader::open(path)?;
        let spec = reader.spec();

        if spec.channels == 0 {
            return Err(AudioError::UnsupportedFormat("zero channels".into()));
        }

        let interleaved: Vec<f64> = match spec.sample_format {
            SampleFormat::Int => {
                let scale = 1.0 / max_amplitude(spec.bits_per_sample)?;
                reader
                    .samples::<i32>()
                    .map(|s| s.map(|v| v as f64 * scale))
                    .collect::<Result<_, _>>()?
            }
            SampleFormat::Float => reader
                .samples::<f32>()
                .map(|s| s.map(f64::from))
                .collect::<Result<_, _>>()?,
        };

        let samples = downmix(&interleaved, spec.channels as usize);

        debug!(
            path = %path.display(),
            sample_rate = spec.sample_rate,
            channels = spec.channels,
            bits = spec.bits_per_sample,
            samples = samples.len(),
            "decoded wav"
        );

        Ok(DecodedAudio {
            samples,
            sample_rate: spec.sample_rate,
            channels: spec.channels,
            bits_per_sample: spec.bits_per_sample,
        })
    }
}

/// Largest positive integer amplitude at `bits` (32767 for 16-bit)
fn max_amplitude(bits: u16) -> Result<f64, AudioError> {
    if bits == 0 || bits > 32 {
        return Err(AudioError::UnsupportedFormat(format!(
            "{bits}-bit integer samples"
        )));
    }
    Ok(((1u64 << (bits - 1)) - 1) as f64)
}

/// Average interleaved frames into one channel; a partial last frame is dropped
fn downmix(interleaved: &[f64], channels: usize) -> Vec<f64> {
    if channels == 1 {
        return interleaved.to_vec();
    }

    interleaved
        .chunks_exact(channels)
        .map(|frame| frame.iter().sum::<f64>() / channels as f64)
        .collect()
}

/// Write mono samples as 16-bit PCM, clamping to [-1, 1]
pub fn write_wav(path: &Path, sample_rate: u32, samples: &[f64]) -> Result<(), AudioError> {
    let spec = WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };

    let mut writer = WavWriter::create(path, spec)?;
    let amplitude = i16::MAX as f64;
    for &sample in samples {
        writer.write_sample((sample.clamp(-1.0, 1.0) * amplitude) as i16)?;
    }
    writer.finalize()?;

    Ok(())
}
