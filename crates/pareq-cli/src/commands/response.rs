//! Magnitude response printout.

use std::path::PathBuf;

use clap::Args;
use pareq_core::{ChainCoefficients, cascade_magnitude_db, is_valid_sample_rate};
use serde::Serialize;

use super::common::{build_store, parse_key_val};

#[derive(Args)]
pub struct ResponseArgs {
    /// Sample rate to design the filters for
    #[arg(long, default_value = "48000")]
    sample_rate: f32,

    /// Equalizer parameters (e.g., "low_cut_freq=80")
    #[arg(long, value_parser = parse_key_val, number_of_values = 1)]
    param: Vec<(String, String)>,

    /// State file to start from
    #[arg(long)]
    state: Option<PathBuf>,

    /// Number of log-spaced frequencies between 20 Hz and 20 kHz
    #[arg(long, default_value = "31")]
    points: usize,

    /// Emit JSON instead of a table
    #[arg(long)]
    json: bool,
}

/// Response of each stage at one frequency.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ResponsePoint {
    /// Frequency in Hz.
    pub frequency: f32,
    /// Low-cut cascade, dB.
    pub low_cut_db: f64,
    /// Peak section, dB.
    pub peak_db: f64,
    /// High-cut cascade, dB.
    pub high_cut_db: f64,
    /// Whole chain, dB.
    pub total_db: f64,
}

pub fn run(args: ResponseArgs) -> anyhow::Result<()> {
    if !is_valid_sample_rate(args.sample_rate) {
        anyhow::bail!("invalid sample rate {}", args.sample_rate);
    }
    if args.points < 2 {
        anyhow::bail!("--points must be at least 2");
    }

    let store = build_store(&args.param, args.state.as_deref())?;
    let coefficients = ChainCoefficients::from_snapshot(&store.snapshot(), args.sample_rate);
    let points = response(&coefficients, args.sample_rate, args.points);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&points)?);
        return Ok(());
    }

    println!(
        "{:>10}  {:>9}  {:>9}  {:>9}  {:>9}",
        "Hz", "low-cut", "peak", "high-cut", "total"
    );
    for p in &points {
        println!(
            "{:>10.1}  {:>9.2}  {:>9.2}  {:>9.2}  {:>9.2}",
            p.frequency, p.low_cut_db, p.peak_db, p.high_cut_db, p.total_db
        );
    }
    Ok(())
}

/// Evaluates `coefficients` at `count` log-spaced frequencies from 20 Hz to
/// 20 kHz, capped just below Nyquist.
pub fn response(coefficients: &ChainCoefficients, sample_rate: f32, count: usize) -> Vec<ResponsePoint> {
    let low = 20.0f64;
    let high = 20000.0f64.min(f64::from(sample_rate) * 0.499);
    let ratio = (high / low).ln();

    (0..count)
        .map(|i| {
            let t = i as f64 / (count - 1).max(1) as f64;
            let frequency = (low * (ratio * t).exp()) as f32;
            let low_cut_db =
                cascade_magnitude_db(coefficients.low_cut.as_slice(), frequency, sample_rate);
            let peak_db = coefficients.peak.magnitude_db(frequency, sample_rate);
            let high_cut_db =
                cascade_magnitude_db(coefficients.high_cut.as_slice(), frequency, sample_rate);
            ResponsePoint {
                frequency,
                low_cut_db,
                peak_db,
                high_cut_db,
                total_db: low_cut_db + peak_db + high_cut_db,
            }
        })
        .collect()
}
