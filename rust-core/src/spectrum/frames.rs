//! Frame bookkeeping for sliding analysis
//!
//! Frames are borrowed views into the sample sequence. Trailing samples
//! that do not fill a whole frame are dropped, never padded.

/// Number of whole frames of `frame_length` at hop `step_size` in `len` samples
pub fn frame_count(len: usize, frame_length: usize, step_size: usize) -> usize {
    if frame_length == 0 || step_size == 0 || len < frame_length {
        return 0;
    }
    (len - frame_length) / step_size + 1
}

/// Iterator over `(start, frame)` pairs
#[derive(Debug, Clone)]
pub struct Frames<'a> {
    samples: &'a [f64],
    frame_length: usize,
    step_size: usize,
    index: usize,
    count: usize,
}

impl<'a> Frames<'a> {
    pub fn new(samples: &'a [f64], frame_length: usize, step_size: usize) -> Self {
        Self {
            samples,
            frame_length,
            step_size,
            index: 0,
            count: frame_count(samples.len(), frame_length, step_size),
        }
    }
}

impl<'a> Iterator for Frames<'a> {
    type Item = (usize, &'a [f64]);

    fn next(&mut self) -> Option<Self::Item> {
        if self.index >= self.count {
            return None;
        }

        let start = self.index * self.step_size;
        self.index += 1;
        Some((start, &self.samples[start..start + self.frame_length]))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.count - self.index;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Frames<'_> {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_count() {
        assert_eq!(frame_count(10, 4, 2), 4);
        assert_eq!(frame_count(11, 4, 2), 4);
        assert_eq!(frame_count(4, 4, 1), 1);
        assert_eq!(frame_count(3, 4, 1), 0);
        assert_eq!(frame_count(44100, 4410, 882), 46);
    }

    #[test]
    fn test_frame_offsets() {
        let samples: Vec<f64> = (0..11).map(|i| i as f64).collect();
        let frames: Vec<_> = Frames::new(&samples, 4, 3).collect();

        assert_eq!(frames.len(), 3);
        for (k, (start, frame)) in frames.iter().enumerate() {
            assert_eq!(*start, k * 3);
            assert_eq!(frame.len(), 4);
            assert_eq!(frame[0], (k * 3) as f64);
        }

        // Samples 9 and 10 never make a full frame
        assert_eq!(frames[2].1, &[6.0, 7.0, 8.0, 9.0]);
    }

    #[test]
    fn test_exact_size() {
        let samples = vec![0.0; 100];
        let frames = Frames::new(&samples, 10, 10);
        assert_eq!(frames.len(), 10);
    }
}
