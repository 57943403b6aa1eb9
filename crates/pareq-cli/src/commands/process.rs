//! File-based rendering command.

use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use pareq_core::linear_to_db;
use pareq_host::EqProcessor;

use super::common::{build_store, parse_bit_depth, parse_key_val};
use crate::wav::{Audio, read_wav, write_wav};

#[derive(Args)]
pub struct ProcessArgs {
    /// Input WAV file
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Output WAV file
    #[arg(value_name = "OUTPUT")]
    output: PathBuf,

    /// Equalizer parameters (e.g., "peak_gain=6")
    #[arg(long, value_parser = parse_key_val, number_of_values = 1)]
    param: Vec<(String, String)>,

    /// State file written by `pareq state`, applied before --param
    #[arg(long)]
    state: Option<PathBuf>,

    /// Processing block size
    #[arg(long, default_value = "512")]
    block_size: usize,

    /// Output bit depth (16, 24, or 32)
    #[arg(long, default_value = "32", value_parser = parse_bit_depth)]
    bit_depth: u16,
}

pub fn run(args: ProcessArgs) -> anyhow::Result<()> {
    if args.block_size == 0 {
        anyhow::bail!("--block-size must be at least 1");
    }

    println!("Reading {}...", args.input.display());
    let mut audio = read_wav(&args.input)?;
    let frames = audio.frames();
    println!(
        "  {} frames, {} channel(s), {} Hz, {:.2}s",
        frames,
        audio.channels.len(),
        audio.sample_rate,
        frames as f32 / audio.sample_rate as f32
    );
    if audio.channels.len() > 2 {
        println!("  only the first two channels are equalized");
    }

    let store = build_store(&args.param, args.state.as_deref())?;
    let mut processor = EqProcessor::new(&store);
    processor
        .prepare(audio.sample_rate as f32, args.block_size)
        .context("cannot prepare the equalizer for this file")?;

    let input_levels = levels(&audio);

    let pb = ProgressBar::new(frames as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")?
            .progress_chars("##-"),
    );

    render(&mut processor, &mut audio, args.block_size, |done| {
        pb.set_position(done as u64);
    });
    pb.finish_with_message("done");

    let output_levels = levels(&audio);
    println!("\nStats:");
    println!(
        "  Input:  RMS {:.1} dB, Peak {:.1} dB",
        input_levels.0, input_levels.1
    );
    println!(
        "  Output: RMS {:.1} dB, Peak {:.1} dB",
        output_levels.0, output_levels.1
    );

    println!("\nWriting {}...", args.output.display());
    write_wav(&args.output, &audio, args.bit_depth)?;
    println!("Done!");

    Ok(())
}

/// Runs every frame of `audio` through `processor` in `block_size` blocks.
fn render(
    processor: &mut EqProcessor,
    audio: &mut Audio,
    block_size: usize,
    mut progress: impl FnMut(usize),
) {
    let frames = audio.frames();
    let mut start = 0;
    while start < frames {
        let end = (start + block_size).min(frames);
        let mut block: Vec<&mut [f32]> = audio
            .channels
            .iter_mut()
            .map(|channel| &mut channel[start..end])
            .collect();
        processor.process(&mut block);
        start = end;
        progress(start);
    }
}

/// RMS and peak level across all channels, in dB.
fn levels(audio: &Audio) -> (f32, f32) {
    let samples = || audio.channels.iter().flatten();
    let count = audio.channels.iter().map(Vec::len).sum::<usize>();
    if count == 0 {
        return (linear_to_db(0.0), linear_to_db(0.0));
    }
    let sum: f32 = samples().map(|s| s * s).sum();
    let peak = samples().map(|s| s.abs()).fold(0.0, f32::max);
    (linear_to_db((sum / count as f32).sqrt()), linear_to_db(peak))
}
