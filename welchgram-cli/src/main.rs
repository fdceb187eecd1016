use std::path::PathBuf;

use clap::Parser;
use log::info;
use welchgram::SpectrogramConfig;
use welchgram_cli::run;

/// Render an audio file as a grayscale Welch spectrogram.
///
/// Set WELCHGRAM_RANGE_SCOPE=global|last and
/// WELCHGRAM_NORMALIZATION=min-max|range-width to change how power is scaled.
#[derive(Parser)]
#[command(author, version, about)]
struct Args {
    /// Path to input audio file (WAV, FLAC or MP3)
    input: PathBuf,

    /// Path to output PNG file
    output: PathBuf,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();
    let config = SpectrogramConfig::from_env()?;

    let out = run(&args.input, &args.output, &config)?;

    if let (Some(first), Some(last)) = (out.frequencies.get(1), out.frequencies.last()) {
        info!("frequency axis: {} bins, {:.2} Hz apart, up to {:.1} Hz", out.bins, first, last);
    }
    match out.range {
        Some(range) => info!("{} range: min {:e} max {:e}", config.range_scope, range.min, range.max),
        None => info!("no complete segment; image is blank"),
    }
    info!(
        "segments: {} (hop {}), drawn {}x{} -> {}",
        out.columns_produced,
        out.plan.hop(),
        out.grid.width(),
        out.grid.height(),
        args.output.display()
    );
    Ok(())
}
