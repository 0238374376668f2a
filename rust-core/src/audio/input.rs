//! Audio input capture using cpal
//!
//! Captures the default (or a given) input device, mixes every frame down
//! to mono and pushes it into a [`SampleProducer`].

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Device, FromSample, Sample, SampleFormat, SizedSample, Stream, StreamConfig};
use tracing::{error, info};

use super::buffer::SampleProducer;
use super::error::AudioError;

/// Audio input device information
#[derive(Debug, Clone)]
pub struct AudioDeviceInfo {
    pub name: String,
    pub sample_rate: u32,
    pub channels: u16,
}

/// Running (or paused) input stream
pub struct AudioInput {
    stream: Stream,
    device_info: AudioDeviceInfo,
}

impl AudioInput {
    /// Open a specific input device at its default configuration
    pub fn from_device(device: Device, producer: SampleProducer) -> Result<Self, AudioError> {
        let name = device
            .name()
            .map_err(|e| AudioError::DeviceName(e.to_string()))?;

        let config = device
            .default_input_config()
            .map_err(|e| AudioError::DefaultConfig(e.to_string()))?;

        let device_info = AudioDeviceInfo {
            name,
            sample_rate: config.sample_rate().0,
            channels: config.channels(),
        };

        let sample_format = config.sample_format();
        let stream_config: StreamConfig = config.into();

        let stream = match sample_format {
            SampleFormat::F32 => build_stream::<f32>(&device, &stream_config, producer),
            SampleFormat::I16 => build_stream::<i16>(&device, &stream_config, producer),
            SampleFormat::U16 => build_stream::<u16>(&device, &stream_config, producer),
            other => Err(AudioError::BuildStream(format!(
                "unsupported sample format {other:?}"
            ))),
        }?;

        info!(
            device = %device_info.name,
            sample_rate = device_info.sample_rate,
            channels = device_info.channels,
            "opened input device"
        );

        Ok(Self {
            stream,
            device_info,
        })
    }

    /// Start capturing audio
    pub fn start(&self) -> Result<(), AudioError> {
        self.stream
            .play()
            .map_err(|e| AudioError::PlayStream(e.to_string()))
    }

    /// Pause audio capture
    pub fn pause(&self) -> Result<(), AudioError> {
        self.stream
            .pause()
            .map_err(|e| AudioError::PlayStream(e.to_string()))
    }

    pub fn device_info(&self) -> &AudioDeviceInfo {
        &self.device_info
    }
}

fn build_stream<T>(
    device: &Device,
    config: &StreamConfig,
    mut producer: SampleProducer,
) -> Result<Stream, AudioError>
where
    T: SizedSample,
    f64: FromSample<T>,
{
    let channels = config.channels.max(1) as usize;
    let mut mono = Vec::new();

    device
        .build_input_stream(
            config,
            move |data: &[T], _: &cpal::InputCallbackInfo| {
                mono.clear();
                mono.extend(data.chunks_exact(channels).map(|frame| {
                    frame.iter().map(|&s| s.to_sample::<f64>()).sum::<f64>() / channels as f64
                }));
                producer.push(&mono);
            },
            move |err| {
                error!("audio input error: {err}");
            },
            None,
        )
        .map_err(|e| AudioError::BuildStream(e.to_string()))
}

/// Default input device and its default configuration
pub fn default_input_device() -> Result<(Device, AudioDeviceInfo), AudioError> {
    let host = cpal::default_host();
    let device = host.default_input_device().ok_or(AudioError::NoDevice)?;

    let name = device
        .name()
        .map_err(|e| AudioError::DeviceName(e.to_string()))?;
    let config = device
        .default_input_config()
        .map_err(|e| AudioError::DefaultConfig(e.to_string()))?;

    let info = AudioDeviceInfo {
        name,
        sample_rate: config.sample_rate().0,
        channels: config.channels(),
    };

    Ok((device, info))
}
