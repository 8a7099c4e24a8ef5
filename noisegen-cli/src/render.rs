//! Sample encodings for `noisegen render`.

use std::io::{self, Write};

use clap::ValueEnum;
use noisegen_core::dsp::mean_var;
use noisegen_core::source::NoiseSource;

const BLOCK: usize = 4096;

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// One decimal value per line, shortest round-trip form
    Text,
    /// Raw little-endian f64
    F64le,
    /// Raw little-endian f32
    F32le,
}

/// Running mean/variance, merged block by block.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Moments {
    count: u64,
    mean: f64,
    m2: f64,
}

impl Moments {
    #[allow(clippy::cast_precision_loss)]
    pub fn push_block(&mut self, block: &[f64]) {
        if block.is_empty() {
            return;
        }
        let (b_mean, b_var) = mean_var(block);
        let n_a = self.count as f64;
        let n_b = block.len() as f64;
        let n = n_a + n_b;
        let delta = b_mean - self.mean;
        self.mean += delta * n_b / n;
        self.m2 += b_var * n_b + delta * delta * n_a * n_b / n;
        self.count += block.len() as u64;
    }

    pub fn mean(&self) -> f64 {
        self.mean
    }

    /// Population variance; zero before any sample.
    #[allow(clippy::cast_precision_loss)]
    pub fn variance(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.m2 / self.count as f64
        }
    }
}

/// Draw `n` samples from `source` and encode them to `out`.
///
/// # Errors
/// Any I/O error from `out`.
pub fn write_samples<S, W>(source: &mut S, n: u64, format: OutputFormat, out: &mut W) -> io::Result<Moments>
where
    S: NoiseSource + ?Sized,
    W: Write,
{
    let mut buf = vec![0.0f64; BLOCK];
    let mut moments = Moments::default();
    let mut left = n;

    while left > 0 {
        let len = usize::try_from(left).map_or(BLOCK, |l| l.min(BLOCK));
        let block = &mut buf[..len];
        source.fill(block);
        moments.push_block(block);

        match format {
            OutputFormat::Text => {
                for y in block.iter() {
                    writeln!(out, "{y}")?;
                }
            }
            OutputFormat::F64le => {
                for y in block.iter() {
                    out.write_all(&y.to_le_bytes())?;
                }
            }
            OutputFormat::F32le => {
                for &y in block.iter() {
                    #[allow(clippy::cast_possible_truncation)]
                    out.write_all(&(y as f32).to_le_bytes())?;
                }
            }
        }
        left -= len as u64;
    }
    Ok(moments)
}

// ------------------------------------ Tests --------------------------------------
