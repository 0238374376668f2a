//! Writing analysis results to disk
//!
//! Series are written as two-column CSV; single frames can be dumped as a
//! per-bin spectrum table.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use thiserror::Error;

use crate::error::AnalysisError;
use crate::spectrum::peak::bin_frequency;
use crate::spectrum::{SpectrumEngine, Windower};

#[derive(Error, Debug)]
pub enum ReportError {
    #[error(transparent)]
    Analysis(#[from] AnalysisError),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Output collaborator for a labelled series
pub trait SeriesRenderer {
    fn render(&self, series: &[f64], x_label: &str, y_label: &str, path: &Path) -> io::Result<()>;
}

/// Renders a series as `x,y` CSV rows under a header of the axis labels
#[derive(Debug, Default, Clone, Copy)]
pub struct CsvRenderer {
    /// Seconds per index; rows use sample index when unset
    pub x_step: Option<f64>,
}

impl CsvRenderer {
    pub fn new() -> Self {
        Self { x_step: None }
    }

    pub fn with_x_step(x_step: f64) -> Self {
        Self {
            x_step: Some(x_step),
        }
    }

    /// Write to any writer instead of a file
    pub fn write_to<W: Write>(
        &self,
        out: &mut W,
        series: &[f64],
        x_label: &str,
        y_label: &str,
    ) -> io::Result<()> {
        writeln!(out, "{x_label},{y_label}")?;
        for (i, value) in series.iter().enumerate() {
            match self.x_step {
                Some(step) => writeln!(out, "{},{value}", i as f64 * step)?,
                None => writeln!(out, "{i},{value}")?,
            }
        }
        Ok(())
    }
}

impl SeriesRenderer for CsvRenderer {
    fn render(&self, series: &[f64], x_label: &str, y_label: &str, path: &Path) -> io::Result<()> {
        let mut out = BufWriter::new(File::create(path)?);
        self.write_to(&mut out, series, x_label, y_label)?;
        out.flush()
    }
}

/// Dump the non-negative half of a frame's spectrum, one bin per line
///
/// Columns: bin, real, imaginary, magnitude, frequency in Hz.
pub fn write_spectrum_report<W: Write>(
    frame: &[f64],
    sample_rate: f64,
    out: &mut W,
) -> Result<(), ReportError> {
    if frame.is_empty() {
        return Err(AnalysisError::InvalidFrame("frame is empty".into()).into());
    }

    let mut engine = SpectrumEngine::new(frame.len());
    let spectrum = engine.full_spectrum(frame)?;

    writeln!(out, "bin\treal\timag\tmagnitude\thz")?;
    for (bin, pair) in spectrum.chunks_exact(2).take(frame.len() / 2 + 1).enumerate() {
        let magnitude = (pair[0] * pair[0] + pair[1] * pair[1]).sqrt();
        let hz = bin_frequency(bin, frame.len(), sample_rate);
        writeln!(out, "{bin}\t{}\t{}\t{magnitude}\t{hz}", pair[0], pair[1])?;
    }

    Ok(())
}

/// Spectrum report of the frame the estimator actually transforms
///
/// With `apply_window` the Hamming-windowed frame is reported, so the
/// table agrees with a windowed dominant-frequency estimate.
pub fn write_frame_report<W: Write>(
    frame: &[f64],
    sample_rate: f64,
    apply_window: bool,
    out: &mut W,
) -> Result<(), ReportError> {
    if apply_window && !frame.is_empty() {
        let windowed = Windower::new(frame.len()).apply(frame)?;
        write_spectrum_report(&windowed, sample_rate, out)
    } else {
        write_spectrum_report(frame, sample_rate, out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AnalysisConfig;
    use crate::tracker::PitchTracker;
    use std::f64::consts::PI;
    use tempfile::tempdir;

    fn report_rows(text: &str) -> Vec<(f64, f64)> {
        text.lines()
            .skip(1)
            .map(|line| {
                let cols: Vec<f64> = line.split('\t').map(|c| c.parse().unwrap()).collect();
                (cols[3], cols[4])
            })
            .collect()
    }

    #[test]
    fn test_csv_by_index() {
        let mut out = Vec::new();
        CsvRenderer::new()
            .write_to(&mut out, &[440.0, 441.5], "Index", "Frequency")
            .unwrap();

        assert_eq!(String::from_utf8(out).unwrap(), "Index,Frequency\n0,440\n1,441.5\n");
    }

    #[test]
    fn test_csv_by_time() {
        let mut out = Vec::new();
        CsvRenderer::with_x_step(0.5)
            .write_to(&mut out, &[1.0, 2.0], "Seconds", "Hz")
            .unwrap();

        assert_eq!(String::from_utf8(out).unwrap(), "Seconds,Hz\n0,1\n0.5,2\n");
    }

    #[test]
    fn test_render_to_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("series.csv");

        CsvRenderer::new()
            .render(&[1.0, 2.0, 3.0], "Index", "Frequency", &path)
            .unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text.lines().count(), 4);
    }

    #[test]
    fn test_spectrum_report() {
        let frame = vec![1.0; 8];
        let mut out = Vec::new();
        write_spectrum_report(&frame, 8000.0, &mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        // Header plus bins 0..=4
        assert_eq!(lines.len(), 6);
        assert!(lines[1].starts_with("0\t8\t0\t8\t0"));
        assert!(lines[5].ends_with("\t4000"));
    }

    #[test]
    fn test_spectrum_report_empty_frame() {
        let mut out = Vec::new();
        let result = write_spectrum_report(&[], 8000.0, &mut out);
        assert!(matches!(result, Err(ReportError::Analysis(_))));
    }

    #[test]
    fn test_windowed_report_matches_windowed_estimate() {
        let sample_rate = 8000.0;
        let frame: Vec<f64> = (0..800)
            .map(|n| 0.3 + (2.0 * PI * 1234.0 * n as f64 / sample_rate).sin())
            .collect();

        let mut windowed = Vec::new();
        write_frame_report(&frame, sample_rate, true, &mut windowed).unwrap();

        let mut expected = Vec::new();
        let tapered = Windower::new(frame.len()).apply(&frame).unwrap();
        write_spectrum_report(&tapered, sample_rate, &mut expected).unwrap();
        assert_eq!(windowed, expected);

        let mut raw = Vec::new();
        write_frame_report(&frame, sample_rate, false, &mut raw).unwrap();
        assert_ne!(windowed, raw);

        // Loudest non-DC row is the frequency the windowed estimator reports
        let rows = report_rows(&String::from_utf8(windowed).unwrap());
        let (_, peak_hz) = rows[1..]
            .iter()
            .copied()
            .fold((f64::MIN, 0.0), |best, row| if row.0 > best.0 { row } else { best });

        let mut tracker = PitchTracker::new(AnalysisConfig {
            apply_window: true,
            ..AnalysisConfig::single_block(frame.len())
        })
        .unwrap();
        let series = tracker.track(&frame, sample_rate).unwrap();
        assert_eq!(series.estimates, vec![peak_hz]);
    }

    #[test]
    fn test_frame_report_empty_frame() {
        let mut out = Vec::new();
        let result = write_frame_report(&[], 8000.0, true, &mut out);
        assert!(matches!(result, Err(ReportError::Analysis(_))));
    }
}
