//! Lock-free ring buffer between the device callback and the block assembler
//!
//! The producer never blocks: samples that do not fit are counted as dropped.

use ringbuf::{HeapConsumer, HeapProducer, HeapRb};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Single-producer single-consumer sample ring
pub struct SampleRingBuffer {
    producer: HeapProducer<f64>,
    consumer: HeapConsumer<f64>,
}

impl SampleRingBuffer {
    /// Create new ring buffer with capacity in samples
    pub fn new(capacity: usize) -> Self {
        let rb = HeapRb::<f64>::new(capacity);
        let (producer, consumer) = rb.split();

        Self { producer, consumer }
    }

    /// Split into producer and consumer ends sharing one drop counter
    pub fn split(self) -> (SampleProducer, SampleConsumer) {
        let dropped = Arc::new(AtomicUsize::new(0));
        (
            SampleProducer {
                producer: self.producer,
                dropped: Arc::clone(&dropped),
            },
            SampleConsumer {
                consumer: self.consumer,
                dropped,
            },
        )
    }
}

/// Writing end, owned by the capture callback
pub struct SampleProducer {
    producer: HeapProducer<f64>,
    dropped: Arc<AtomicUsize>,
}

impl SampleProducer {
    /// Push samples, returning how many were accepted
    pub fn push(&mut self, samples: &[f64]) -> usize {
        let written = self.producer.push_slice(samples);
        if written < samples.len() {
            self.dropped
                .fetch_add(samples.len() - written, Ordering::Relaxed);
        }
        written
    }

    pub fn free_len(&self) -> usize {
        self.producer.free_len()
    }
}

/// Reading end, owned by the block assembler
pub struct SampleConsumer {
    consumer: HeapConsumer<f64>,
    dropped: Arc<AtomicUsize>,
}

impl SampleConsumer {
    /// Read up to `buffer.len()` samples, returning how many were read
    pub fn read(&mut self, buffer: &mut [f64]) -> usize {
        self.consumer.pop_slice(buffer)
    }

    pub fn len(&self) -> usize {
        self.consumer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.consumer.is_empty()
    }

    /// Total samples the producer could not fit since creation
    pub fn dropped(&self) -> usize {
        self.dropped.load(Ordering::Relaxed)
    }
}
