//! Live capture as a producer/consumer pipeline
//!
//! The cpal callback feeds a ring buffer; a capture thread assembles
//! fixed-size blocks from it and sends them over a bounded channel. The
//! analysis side pulls complete blocks and stays synchronous.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{sync_channel, Receiver, RecvTimeoutError, SyncSender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::{debug, warn};

use super::buffer::{SampleConsumer, SampleRingBuffer};
use super::error::AudioError;
use super::input::{default_input_device, AudioInput};

const POLL_BACKOFF: Duration = Duration::from_millis(2);

/// Live capture settings
#[derive(Debug, Clone)]
pub struct CaptureConfig {
    /// Length of each delivered block in seconds
    pub block_seconds: f64,

    /// Blocks the channel holds before the capture thread waits
    pub channel_capacity: usize,

    /// Ring buffer size in seconds of audio
    pub ring_seconds: f64,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            block_seconds: 0.5,
            channel_capacity: 16,
            ring_seconds: 2.0,
        }
    }
}

impl CaptureConfig {
    /// Samples per delivered block at `sample_rate`
    pub fn block_len(&self, sample_rate: f64) -> usize {
        seconds_to_samples(self.block_seconds, sample_rate)
    }

    /// Ring buffer capacity in samples at `sample_rate`
    pub fn ring_len(&self, sample_rate: f64) -> usize {
        seconds_to_samples(self.ring_seconds, sample_rate)
    }
}

fn seconds_to_samples(seconds: f64, sample_rate: f64) -> usize {
    ((seconds * sample_rate).round() as usize).max(1)
}

/// Collects samples from a consumer into fixed-size blocks
pub struct BlockAssembler {
    block_len: usize,
    pending: Vec<f64>,
}

impl BlockAssembler {
    pub fn new(block_len: usize) -> Self {
        Self {
            block_len: block_len.max(1),
            pending: Vec::with_capacity(block_len.max(1)),
        }
    }

    /// Drain what the consumer holds, up to one block
    ///
    /// # Returns
    /// A complete block once `block_len` samples have accumulated
    pub fn pull(&mut self, consumer: &mut SampleConsumer) -> Option<Vec<f64>> {
        let filled = self.pending.len();
        self.pending.resize(self.block_len, 0.0);
        let read = consumer.read(&mut self.pending[filled..]);
        self.pending.truncate(filled + read);

        if self.pending.len() == self.block_len {
            Some(std::mem::replace(
                &mut self.pending,
                Vec::with_capacity(self.block_len),
            ))
        } else {
            None
        }
    }

    /// Take the incomplete block, if any samples are pending
    pub fn take_partial(&mut self) -> Option<Vec<f64>> {
        if self.pending.is_empty() {
            None
        } else {
            Some(std::mem::take(&mut self.pending))
        }
    }

    pub fn block_len(&self) -> usize {
        self.block_len
    }
}

/// Capture from the default input device, delivering blocks over a channel
pub struct LiveCapture {
    input: AudioInput,
    blocks: Receiver<Vec<f64>>,
    running: Arc<AtomicBool>,
    worker: Option<JoinHandle<()>>,
    block_len: usize,
}

impl LiveCapture {
    /// Open the default input device and start capturing
    pub fn start(config: &CaptureConfig) -> Result<Self, AudioError> {
        let (device, info) = default_input_device()?;
        let sample_rate = info.sample_rate as f64;
        let ring_len = config.ring_len(sample_rate);
        let block_len = config.block_len(sample_rate);

        let (producer, consumer) = SampleRingBuffer::new(ring_len).split();
        let input = AudioInput::from_device(device, producer)?;
        input.start()?;

        let (sender, blocks) = sync_channel(config.channel_capacity.max(1));
        let running = Arc::new(AtomicBool::new(true));

        let worker_running = Arc::clone(&running);
        let worker = thread::Builder::new()
            .name("dictation-capture".into())
            .spawn(move || assemble_loop(consumer, block_len, sender, worker_running))?;

        Ok(Self {
            input,
            blocks,
            running,
            worker: Some(worker),
            block_len,
        })
    }

    /// Block until the next complete block arrives
    pub fn recv_block(&self) -> Result<Vec<f64>, AudioError> {
        self.blocks.recv().map_err(|_| AudioError::ChannelClosed)
    }

    /// Wait up to `timeout` for the next block
    pub fn recv_block_timeout(&self, timeout: Duration) -> Result<Option<Vec<f64>>, AudioError> {
        match self.blocks.recv_timeout(timeout) {
            Ok(block) => Ok(Some(block)),
            Err(RecvTimeoutError::Timeout) => Ok(None),
            Err(RecvTimeoutError::Disconnected) => Err(AudioError::ChannelClosed),
        }
    }

    pub fn sample_rate(&self) -> f64 {
        self.input.device_info().sample_rate as f64
    }

    pub fn block_len(&self) -> usize {
        self.block_len
    }

    /// Stop the device and the capture thread
    ///
    /// # Returns
    /// Every block still queued, including a trailing partial block
    pub fn stop(&mut self) -> Vec<Vec<f64>> {
        if let Err(err) = self.input.pause() {
            warn!("failed to pause input stream: {err}");
        }
        self.running.store(false, Ordering::SeqCst);

        let mut remaining = Vec::new();
        if let Some(handle) = self.worker.take() {
            if let Err(err) = drain_until_joined(handle, &self.blocks, &mut remaining) {
                warn!("{err}, trailing samples may be lost");
            }
        }
        remaining.extend(self.blocks.try_iter());
        remaining
    }
}

/// Collect blocks until the worker exits, then join it
///
/// Draining keeps a full channel from wedging the worker.
fn drain_until_joined(
    handle: JoinHandle<()>,
    blocks: &Receiver<Vec<f64>>,
    remaining: &mut Vec<Vec<f64>>,
) -> Result<(), AudioError> {
    while !handle.is_finished() {
        remaining.extend(blocks.try_iter());
        thread::sleep(POLL_BACKOFF);
    }
    handle
        .join()
        .map_err(|_| AudioError::WorkerPanicked)
}

impl Drop for LiveCapture {
    fn drop(&mut self) {
        if self.worker.is_some() {
            self.stop();
        }
    }
}

fn assemble_loop(
    mut consumer: SampleConsumer,
    block_len: usize,
    sender: SyncSender<Vec<f64>>,
    running: Arc<AtomicBool>,
) {
    let mut assembler = BlockAssembler::new(block_len);
    let mut reported_drops = 0;

    while running.load(Ordering::SeqCst) {
        let dropped = consumer.dropped();
        if dropped > reported_drops {
            warn!(
                "capture ring overflowed, {} samples dropped (total {dropped})",
                dropped - reported_drops
            );
            reported_drops = dropped;
        }

        match assembler.pull(&mut consumer) {
            Some(block) => {
                if sender.send(block).is_err() {
                    debug!("block receiver gone, stopping capture thread");
                    return;
                }
            }
            None => thread::sleep(POLL_BACKOFF),
        }
    }

    // Flush whatever the device delivered before it was paused
    while let Some(block) = assembler.pull(&mut consumer) {
        if sender.send(block).is_err() {
            return;
        }
    }
    if let Some(partial) = assembler.take_partial() {
        let _ = sender.send(partial);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_lengths_round_to_nearest_sample() {
        let config = CaptureConfig {
            block_seconds: 0.7,
            ring_seconds: 0.35,
            ..CaptureConfig::default()
        };
        assert_eq!(config.block_len(44100.0), 30870);
        assert_eq!(config.ring_len(44100.0), 15435);

        let tiny = CaptureConfig {
            block_seconds: 1e-9,
            ..CaptureConfig::default()
        };
        assert_eq!(tiny.block_len(8000.0), 1);
    }

    #[test]
    fn test_drain_collects_blocks_from_finished_worker() {
        let (sender, receiver) = sync_channel(1);
        let handle = thread::spawn(move || {
            for value in [1.0, 2.0, 3.0] {
                sender.send(vec![value]).unwrap();
            }
        });

        let mut remaining = Vec::new();
        drain_until_joined(handle, &receiver, &mut remaining).unwrap();
        remaining.extend(receiver.try_iter());
        assert_eq!(remaining, vec![vec![1.0], vec![2.0], vec![3.0]]);
    }

    #[test]
    fn test_drain_reports_worker_panic() {
        let (_sender, receiver) = sync_channel::<Vec<f64>>(1);
        let handle = thread::spawn(|| panic!("assembler failed"));

        let mut remaining = Vec::new();
        let result = drain_until_joined(handle, &receiver, &mut remaining);
        assert!(matches!(result, Err(AudioError::WorkerPanicked)));
        assert!(remaining.is_empty());
    }

    #[test]
    fn test_assembler_waits_for_full_block() {
        let (mut producer, mut consumer) = SampleRingBuffer::new(64).split();
        let mut assembler = BlockAssembler::new(4);

        producer.push(&[1.0, 2.0, 3.0]);
        assert!(assembler.pull(&mut consumer).is_none());

        producer.push(&[4.0, 5.0]);
        assert_eq!(assembler.pull(&mut consumer), Some(vec![1.0, 2.0, 3.0, 4.0]));

        // Leftover sample starts the next block
        assert!(assembler.pull(&mut consumer).is_none());
        assert_eq!(assembler.take_partial(), Some(vec![5.0]));
        assert_eq!(assembler.take_partial(), None);
    }

    #[test]
    fn test_assembler_never_overreads() {
        let (mut producer, mut consumer) = SampleRingBuffer::new(64).split();
        let mut assembler = BlockAssembler::new(3);

        producer.push(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0]);
        assert_eq!(assembler.pull(&mut consumer), Some(vec![1.0, 2.0, 3.0]));
        assert_eq!(assembler.pull(&mut consumer), Some(vec![4.0, 5.0, 6.0]));
        assert!(assembler.pull(&mut consumer).is_none());
        assert_eq!(consumer.len(), 0);
    }

    #[test]
    fn test_assemble_loop_delivers_in_order() {
        let (mut producer, consumer) = SampleRingBuffer::new(64).split();
        let (sender, receiver) = sync_channel(2);
        let running = Arc::new(AtomicBool::new(true));

        producer.push(&[1.0, 2.0, 3.0, 4.0, 5.0]);

        let worker_running = Arc::clone(&running);
        let handle = thread::spawn(move || assemble_loop(consumer, 2, sender, worker_running));

        assert_eq!(receiver.recv().unwrap(), vec![1.0, 2.0]);
        assert_eq!(receiver.recv().unwrap(), vec![3.0, 4.0]);

        running.store(false, Ordering::SeqCst);
        handle.join().unwrap();

        // Trailing partial block is flushed on shutdown
        assert_eq!(receiver.recv().unwrap(), vec![5.0]);
        assert!(receiver.recv().is_err());
    }
}
