use criterion::{black_box, criterion_group, criterion_main, Criterion};
use dictation::{AnalysisConfig, FrameScanner, LowPassSmoother};
use std::f64::consts::PI;

fn sine(len: usize) -> Vec<f64> {
    (0..len)
        .map(|n| (2.0 * PI * 440.0 * n as f64 / 44100.0).sin())
        .collect()
}

fn run_scanner_benchmark(id: &str, c: &mut Criterion, config: AnalysisConfig) {
    let samples = sine(44100);
    let mut scanner = FrameScanner::from_config(&config).unwrap();

    c.bench_function(id, |b| {
        b.iter(|| scanner.analyze(black_box(&samples), 44100.0).unwrap())
    });
}

fn scanner_benchmarks(c: &mut Criterion) {
    run_scanner_benchmark("1 s, default frames", c, AnalysisConfig::default());
    run_scanner_benchmark(
        "1 s, frame 4096 hop 1024",
        c,
        AnalysisConfig {
            frame_length: 4096,
            step_override: Some(1024),
            ..AnalysisConfig::default()
        },
    );
    run_scanner_benchmark("1 s, single block", c, AnalysisConfig::single_block(44100));
}

fn smoother_benchmarks(c: &mut Criterion) {
    let samples = sine(44100);
    let smoother = LowPassSmoother::new(1.0 / 44100.0, 1000.0).unwrap();

    c.bench_function("low-pass 1 s of samples", |b| {
        b.iter(|| smoother.smooth(black_box(&samples)))
    });
}

criterion_group!(benches, scanner_benchmarks, smoother_benchmarks);
criterion_main!(benches);
