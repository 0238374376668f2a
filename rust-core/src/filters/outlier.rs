//! Ceiling filter for frequency contours
//!
//! Values above the ceiling are replaced by the value before them. Runs of
//! violations chain, so each takes the last accepted value.

/// Replaces over-ceiling frequencies with their predecessor
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OutlierFilter {
    ceiling: f64,
}

impl OutlierFilter {
    pub fn new(ceiling: f64) -> Self {
        Self { ceiling }
    }

    pub fn ceiling(&self) -> f64 {
        self.ceiling
    }

    /// Filter a frequency sequence
    ///
    /// The first element has no predecessor: it is zeroed when above the
    /// ceiling, and that zero is what a following violation inherits.
    pub fn filter(&self, frequencies: &[f64]) -> Vec<f64> {
        let mut output = frequencies.to_vec();

        if let Some(first) = output.first_mut() {
            if *first > self.ceiling {
                *first = 0.0;
            }
        }

        for i in 1..output.len() {
            if output[i] > self.ceiling {
                output[i] = output[i - 1];
            }
        }

        output
    }
}
