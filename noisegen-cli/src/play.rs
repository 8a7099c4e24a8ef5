//! `noisegen play`: audition a generator on an output device.

use std::time::Duration;

use anyhow::{anyhow, bail, Context, Result};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use noisegen_core::prelude::*;

use crate::settings::NoiseArgs;

#[derive(Debug, clap::Args)]
pub struct PlayArgs {
    #[command(flatten)]
    noise: NoiseArgs,

    /// List output devices and exit
    #[arg(long)]
    list_devices: bool,

    /// Output device name (default device when omitted)
    #[arg(long)]
    device: Option<String>,

    /// Requested sample rate; also replaces `fsample` of colored kinds
    #[arg(long)]
    sample_rate: Option<u32>,

    /// Requested channel count; the mono signal is copied to every channel
    #[arg(long)]
    channels: Option<u16>,

    /// Stop after this many seconds
    #[arg(long)]
    duration: Option<u64>,

    /// Linear gain applied before clipping to [-1, 1]
    #[arg(long, default_value_t = 0.1)]
    gain: f32,
}

fn list_output_devices() -> Result<()> {
    let host = cpal::default_host();
    println!("Available output devices:");
    for dev in host.output_devices()? {
        println!("- {}", dev.name()?);
    }
    Ok(())
}

fn pick_device(name: Option<&str>) -> Result<cpal::Device> {
    let host = cpal::default_host();
    if let Some(name) = name {
        for d in host.output_devices()? {
            if d.name()? == name {
                return Ok(d);
            }
        }
        bail!("requested device not found: {name}");
    }
    host.default_output_device().ok_or_else(|| anyhow!("no default output device"))
}

fn choose_config(
    device: &cpal::Device,
    req_sr: Option<u32>,
    req_ch: Option<u16>,
) -> Result<cpal::SupportedStreamConfig> {
    if req_sr.is_none() && req_ch.is_none() {
        return Ok(device.default_output_config()?);
    }

    // Closest range: sample-rate distance dominates channel distance.
    let mut best: Option<(u64, cpal::SupportedStreamConfigRange)> = None;
    for range in device.supported_output_configs()? {
        let sr_min = range.min_sample_rate().0;
        let sr_max = range.max_sample_rate().0;
        let ch_pen = req_ch.map_or(0, |c| u64::from(range.channels().abs_diff(c)));
        let sr_pen = req_sr.map_or(0, |sr| {
            if (sr_min..=sr_max).contains(&sr) {
                0
            } else {
                u64::from(sr_min.abs_diff(sr).min(sr_max.abs_diff(sr)))
            }
        });
        let score = sr_pen.saturating_mul(1000) + ch_pen;
        if best.as_ref().map_or(true, |(s, _)| score < *s) {
            best = Some((score, range));
        }
    }
    let (_, range) = best.ok_or_else(|| anyhow!("no supported output configs"))?;

    let rate = match req_sr {
        Some(sr) => cpal::SampleRate(sr.clamp(range.min_sample_rate().0, range.max_sample_rate().0)),
        None => range.max_sample_rate(),
    };
    Ok(range.with_sample_rate(rate))
}

/// Colored kinds are redesigned for the device rate; white kinds have no rate.
fn at_device_rate(noise: NoiseKind, rate: f64) -> NoiseKind {
    match noise {
        NoiseKind::Oof2 { fmin, fknee, .. } => NoiseKind::Oof2 { fmin, fknee, fsample: rate },
        NoiseKind::Oof { slope, fmin, fknee, .. } => NoiseKind::Oof { slope, fmin, fknee, fsample: rate },
        white => white,
    }
}

fn build_stream<T>(
    device: &cpal::Device,
    cfg: &cpal::StreamConfig,
    mut source: Scaled<Box<dyn NoiseSource + Send>>,
    gain: f32,
) -> Result<cpal::Stream>
where
    T: cpal::SizedSample + cpal::FromSample<f32> + Send + 'static,
{
    let channels = usize::from(cfg.channels).max(1);
    let mut mono: Vec<f32> = Vec::new();

    let stream = device.build_output_stream(
        cfg,
        move |output: &mut [T], _| {
            let frames = output.len() / channels;
            if mono.len() < frames {
                mono.resize(frames, 0.0);
            }
            render_into(&mut source, &mut mono[..frames]);
            for (frame, &s) in output.chunks_mut(channels).zip(mono.iter()) {
                let v = T::from_sample((s * gain).clamp(-1.0, 1.0));
                for ch in frame.iter_mut() {
                    *ch = v;
                }
            }
        },
        |e| log::error!("stream error: {e}"),
        None,
    )?;
    Ok(stream)
}

pub fn run(args: &PlayArgs) -> Result<()> {
    if args.list_devices {
        return list_output_devices();
    }

    let device = pick_device(args.device.as_deref())?;
    let supported = choose_config(&device, args.sample_rate, args.channels)?;
    let sample_format = supported.sample_format();
    let mut cfg = supported.config();
    if let Some(sr) = args.sample_rate {
        cfg.sample_rate = cpal::SampleRate(sr);
    }
    if let Some(ch) = args.channels {
        cfg.channels = ch;
    }

    let mut noise = args.noise.resolve()?;
    noise.noise = at_device_rate(noise.noise, f64::from(cfg.sample_rate.0));
    let source = noise.build().context("invalid noise configuration for this device")?;

    log::info!("device {} with {cfg:?} ({sample_format:?})", device.name()?);
    log::info!("playing {:?} at gain {:.2}", noise.noise, args.gain);

    let stream = match sample_format {
        cpal::SampleFormat::F32 => build_stream::<f32>(&device, &cfg, source, args.gain)?,
        cpal::SampleFormat::I16 => build_stream::<i16>(&device, &cfg, source, args.gain)?,
        cpal::SampleFormat::U16 => build_stream::<u16>(&device, &cfg, source, args.gain)?,
        other => bail!("unsupported device sample format: {other:?}"),
    };
    stream.play()?;

    match args.duration {
        Some(secs) => std::thread::sleep(Duration::from_secs(secs)),
        None => loop {
            std::thread::sleep(Duration::from_millis(500));
        },
    }
    Ok(())
}
