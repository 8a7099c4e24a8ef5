//! noisegen CLI: render seeded noise to files or pipes, inspect cascades,
//! and (with the `playback` feature) audition generators on a sound device.

mod render;
mod settings;

#[cfg(feature = "playback")]
mod play;

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use noisegen_core::prelude::*;

use render::{write_samples, OutputFormat};
use settings::NoiseArgs;

/// Seedable uniform, Gaussian and 1/f^alpha noise generators
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Write samples to stdout or a file
    Render(RenderArgs),
    /// Print the filter stages planned for a band
    Poles(PolesArgs),
    /// Play the noise on an audio output device
    #[cfg(feature = "playback")]
    Play(play::PlayArgs),
}

#[derive(Debug, clap::Args)]
struct RenderArgs {
    #[command(flatten)]
    noise: NoiseArgs,

    /// Number of samples to draw
    #[arg(short = 'n', long, default_value_t = 1024)]
    samples: u64,

    /// Sample encoding
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Output file (stdout when omitted)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Debug, clap::Args)]
struct PolesArgs {
    /// Spectral slope in power, usually in [-2, 0]
    #[arg(long, default_value_t = -1.0, allow_hyphen_values = true)]
    slope: f64,

    /// Lower end of the band, Hz
    #[arg(long)]
    fmin: f64,

    /// Knee frequency, Hz
    #[arg(long)]
    fknee: f64,

    /// Sampling frequency, Hz
    #[arg(long)]
    fsample: f64,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match Cli::parse().command {
        Command::Render(args) => run_render(&args),
        Command::Poles(args) => run_poles(&args),
        #[cfg(feature = "playback")]
        Command::Play(args) => play::run(&args),
    }
}

fn run_render(args: &RenderArgs) -> Result<()> {
    let cfg = args.noise.resolve()?;
    log::info!(
        "rendering {} samples of {:?} (seed {:?}, mean {}, sigma {})",
        args.samples,
        cfg.noise,
        cfg.seed,
        cfg.mean,
        cfg.sigma
    );
    let mut source = cfg.build().context("invalid noise configuration")?;

    let moments = match &args.output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("failed to create output file {}", path.display()))?;
            let mut out = BufWriter::new(file);
            let m = write_samples(&mut source, args.samples, args.format, &mut out)?;
            out.flush().with_context(|| format!("failed to write {}", path.display()))?;
            m
        }
        None => {
            let mut out = BufWriter::new(io::stdout().lock());
            let m = write_samples(&mut source, args.samples, args.format, &mut out)?;
            out.flush().context("failed to write to stdout")?;
            m
        }
    };

    log::info!(
        "wrote {} samples: mean {:.6e}, variance {:.6e}",
        source.produced(),
        moments.mean(),
        moments.variance()
    );
    Ok(())
}

fn run_poles(args: &PolesArgs) -> Result<()> {
    let corners = stage_corners(args.slope, args.fmin, args.fknee, args.fsample)
        .context("cannot plan a cascade for this band")?;

    println!(
        "{} stages for slope {} over {}..{} Hz at {} Hz",
        corners.len(),
        args.slope,
        args.fmin,
        args.fknee,
        args.fsample
    );
    for (i, (pole, zero)) in corners.iter().enumerate() {
        println!("  stage {i:>2}: pole {pole:>12.6e} Hz  zero {zero:>12.6e} Hz");
    }
    Ok(())
}
