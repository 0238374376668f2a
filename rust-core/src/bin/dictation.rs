//! Command-line front end: contour, single-block estimate, recording and live tracking

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::fs::File;
use std::io::{BufRead, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tracing::{error, info};

use dictation::audio::{write_wav, CaptureConfig, DecodedAudio, LiveCapture, SampleSource, WavSource};
use dictation::config::{AnalysisConfig, PostFilter};
use dictation::report::{write_frame_report, CsvRenderer, SeriesRenderer};
use dictation::{telemetry, PitchTracker};

#[derive(Parser)]
#[command(name = "dictation", version, about = "Dominant-frequency tracking for PCM audio")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Track the dominant frequency over time and write it as CSV
    Contour {
        /// Input WAV file
        input: PathBuf,

        /// Output CSV for the unfiltered contour
        output: PathBuf,

        /// Also write the contour after low-pass filtering the samples
        ///
        /// Only combines with `--post-filter none` or `lowpass-samples`.
        #[arg(long)]
        filtered: Option<PathBuf>,

        #[command(flatten)]
        analysis: AnalysisArgs,
    },

    /// One dominant frequency for the whole file
    Single {
        /// Input WAV file
        input: PathBuf,

        /// Write a per-bin spectrum table here
        #[arg(long)]
        report: Option<PathBuf>,

        /// Apply the Hamming window before the transform
        #[arg(long)]
        window: bool,
    },

    /// Record the default input device to a 16-bit WAV until Enter is pressed
    Record {
        /// Output WAV file
        output: PathBuf,
    },

    /// Print the dominant frequency of live input until Enter is pressed
    Live {
        /// Seconds of audio per analysed block
        #[arg(long, default_value_t = 0.5)]
        capture_seconds: f64,

        #[command(flatten)]
        analysis: AnalysisArgs,
    },
}

#[derive(Args, Clone)]
struct AnalysisArgs {
    /// Frame length in samples
    #[arg(long, default_value_t = dictation::config::DEFAULT_FRAME_LENGTH)]
    frame_length: usize,

    /// Hop in samples (default: a fifth of the frame)
    #[arg(long)]
    step: Option<usize>,

    /// Use non-overlapping blocks of this many seconds instead of frames
    #[arg(long, conflicts_with_all = ["frame_length", "step"])]
    block_seconds: Option<f64>,

    /// Ceiling for the ceiling filter, default low-pass cutoff (Hz)
    #[arg(long, default_value_t = dictation::config::DEFAULT_MAX_FREQUENCY)]
    max_frequency: f64,

    /// Low-pass cutoff in Hz (default: max frequency)
    #[arg(long)]
    cutoff: Option<f64>,

    /// Skip the Hamming window
    #[arg(long)]
    no_window: bool,

    /// Post-processing stage
    #[arg(long, value_enum, default_value_t = PostFilterArg::None)]
    post_filter: PostFilterArg,

    /// Leave the last low-pass output at zero, as older contours did
    #[arg(long)]
    legacy_tail: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum PostFilterArg {
    None,
    LowpassSamples,
    LowpassContour,
    Ceiling,
}

impl From<PostFilterArg> for PostFilter {
    fn from(arg: PostFilterArg) -> Self {
        match arg {
            PostFilterArg::None => PostFilter::None,
            PostFilterArg::LowpassSamples => PostFilter::LowPassSamples,
            PostFilterArg::LowpassContour => PostFilter::LowPassContour,
            PostFilterArg::Ceiling => PostFilter::Ceiling,
        }
    }
}

impl AnalysisArgs {
    fn to_config(&self, sample_rate: f64) -> AnalysisConfig {
        let base = match self.block_seconds {
            Some(seconds) => AnalysisConfig::blocks_of(seconds, sample_rate),
            None => AnalysisConfig {
                frame_length: self.frame_length,
                step_override: self.step,
                ..AnalysisConfig::default()
            },
        };

        AnalysisConfig {
            max_frequency: self.max_frequency,
            cutoff_frequency: self.cutoff,
            apply_window: !self.no_window,
            post_filter: self.post_filter.into(),
            legacy_smoother_tail: self.legacy_tail,
            ..base
        }
    }
}

fn main() {
    telemetry::init();
    let cli = Cli::parse();

    if let Err(err) = run(cli) {
        error!("{err:?}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Contour {
            input,
            output,
            filtered,
            analysis,
        } => contour(&input, &output, filtered.as_deref(), &analysis),
        Command::Single {
            input,
            report,
            window,
        } => single(&input, report.as_deref(), window),
        Command::Record { output } => record(&output),
        Command::Live {
            capture_seconds,
            analysis,
        } => live(capture_seconds, &analysis),
    }
}

fn decode(path: &Path) -> Result<DecodedAudio> {
    let audio = WavSource
        .decode(path)
        .with_context(|| format!("failed to decode {}", path.display()))?;
    info!(
        "decoded {} ({} samples at {} Hz, {:.2} s)",
        path.display(),
        audio.samples.len(),
        audio.sample_rate,
        audio.duration_seconds()
    );
    Ok(audio)
}

fn contour(input: &Path, output: &Path, filtered: Option<&Path>, args: &AnalysisArgs) -> Result<()> {
    let audio = decode(input)?;
    let sample_rate = audio.sample_rate_hz();
    let config = args.to_config(sample_rate);
    let filtered_config = filtered.map(|_| filtered_contour_config(&config)).transpose()?;

    let mut tracker = PitchTracker::new(config)?;
    let series = tracker.track(&audio.samples, sample_rate)?;
    CsvRenderer::new()
        .render(series.as_slice(), "Index", "Frequency", output)
        .with_context(|| format!("failed to write {}", output.display()))?;
    info!("wrote {} estimates to {}", series.len(), output.display());

    if let (Some(path), Some(config)) = (filtered, filtered_config) {
        let mut tracker = PitchTracker::new(config)?;
        let series = tracker.track(&audio.samples, sample_rate)?;
        CsvRenderer::new()
            .render(series.as_slice(), "Index", "Frequency", path)
            .with_context(|| format!("failed to write {}", path.display()))?;
        info!("wrote {} filtered estimates to {}", series.len(), path.display());
    }

    Ok(())
}

/// Configuration for the second, sample-filtered contour
///
/// Any other post-filter would be silently replaced, so it is rejected.
fn filtered_contour_config(config: &AnalysisConfig) -> Result<AnalysisConfig> {
    match config.post_filter {
        PostFilter::None | PostFilter::LowPassSamples => Ok(AnalysisConfig {
            post_filter: PostFilter::LowPassSamples,
            ..config.clone()
        }),
        other => bail!(
            "--filtered writes a low-pass-samples contour and cannot be combined with --post-filter {other:?}"
        ),
    }
}

fn single(input: &Path, report: Option<&Path>, window: bool) -> Result<()> {
    let audio = decode(input)?;
    if audio.samples.is_empty() {
        bail!("{} contains no samples", input.display());
    }

    let sample_rate = audio.sample_rate_hz();
    let mut tracker = PitchTracker::new(AnalysisConfig {
        apply_window: window,
        ..AnalysisConfig::single_block(audio.samples.len())
    })?;
    let series = tracker.track(&audio.samples, sample_rate)?;
    println!("Dominant frequency: {} Hz", series.estimates[0]);

    if let Some(path) = report {
        let mut out = BufWriter::new(
            File::create(path).with_context(|| format!("failed to create {}", path.display()))?,
        );
        write_frame_report(&audio.samples, sample_rate, window, &mut out)?;
        out.flush()?;
        info!("wrote spectrum report to {}", path.display());
    }

    Ok(())
}

/// Flag raised once the user presses Enter
fn enter_pressed() -> Arc<AtomicBool> {
    let flag = Arc::new(AtomicBool::new(false));
    let setter = Arc::clone(&flag);
    thread::spawn(move || {
        let mut line = String::new();
        let _ = std::io::stdin().lock().read_line(&mut line);
        setter.store(true, Ordering::SeqCst);
    });
    flag
}

fn record(output: &Path) -> Result<()> {
    let mut capture = LiveCapture::start(&CaptureConfig {
        block_seconds: 0.1,
        ..CaptureConfig::default()
    })?;
    println!("Recording... press Enter to stop.");

    let stop = enter_pressed();
    let mut samples = Vec::new();
    while !stop.load(Ordering::SeqCst) {
        if let Some(block) = capture.recv_block_timeout(Duration::from_millis(50))? {
            samples.extend(block);
        }
    }
    for block in capture.stop() {
        samples.extend(block);
    }

    let sample_rate = capture.sample_rate() as u32;
    write_wav(output, sample_rate, &samples)?;
    println!(
        "Recording stopped: {:.2} s written to {}",
        samples.len() as f64 / sample_rate as f64,
        output.display()
    );
    Ok(())
}

fn live(capture_seconds: f64, args: &AnalysisArgs) -> Result<()> {
    let mut capture = LiveCapture::start(&CaptureConfig {
        block_seconds: capture_seconds,
        ..CaptureConfig::default()
    })?;
    let sample_rate = capture.sample_rate();

    let config = args.to_config(sample_rate);
    if capture.block_len() < config.frame_length {
        bail!(
            "capture blocks of {} samples are shorter than the {}-sample frame",
            capture.block_len(),
            config.frame_length
        );
    }
    let mut tracker = PitchTracker::new(config)?;
    println!("Listening... press Enter to stop.");

    let stop = enter_pressed();
    let mut elapsed = 0.0;
    while !stop.load(Ordering::SeqCst) {
        let Some(block) = capture.recv_block_timeout(Duration::from_millis(50))? else {
            continue;
        };

        let series = tracker.track(&block, sample_rate)?;
        for (offset, frequency) in series.times().iter().zip(series.as_slice()) {
            println!("{:8.3} s  {:8.1} Hz", elapsed + offset, frequency);
        }
        elapsed += block.len() as f64 / sample_rate;
    }
    capture.stop();

    Ok(())
}
