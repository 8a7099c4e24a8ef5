//! Generator settings from YAML files and command-line flags.
//!
//! Files given with `--config` are merged in order, key by key, so a later
//! file only needs the keys it changes. Explicit flags are applied last.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::ValueEnum;
use noisegen_core::config::NoiseConfig;
use rand::Rng;
use serde_yml::{Mapping, Value};

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum KindArg {
    Uniform,
    Gaussian,
    Oof2,
    Oof,
}

impl KindArg {
    fn tag(self) -> &'static str {
        match self {
            KindArg::Uniform => "uniform",
            KindArg::Gaussian => "gaussian",
            KindArg::Oof2 => "oof2",
            KindArg::Oof => "oof",
        }
    }
}

#[derive(Debug, Default, clap::Args)]
pub struct NoiseArgs {
    /// YAML settings file; repeat to layer files, later ones win
    #[arg(short, long = "config", value_name = "FILE")]
    pub configs: Vec<PathBuf>,

    /// Noise kind
    #[arg(long, value_enum)]
    pub kind: Option<KindArg>,

    /// Spectral slope for `oof`
    #[arg(long, allow_hyphen_values = true)]
    pub slope: Option<f64>,

    /// Lower end of the band, Hz
    #[arg(long)]
    pub fmin: Option<f64>,

    /// Knee frequency, Hz
    #[arg(long)]
    pub fknee: Option<f64>,

    /// Sampling frequency, Hz
    #[arg(long)]
    pub fsample: Option<f64>,

    /// Seed words; zeros select the built-in defaults
    #[arg(long, num_args = 4, value_names = ["X", "Y", "Z", "W"])]
    pub seed: Option<Vec<u32>>,

    /// Seed from the operating system instead
    #[arg(long, conflicts_with = "seed")]
    pub random_seed: bool,

    /// Output offset
    #[arg(long, allow_hyphen_values = true)]
    pub mean: Option<f64>,

    /// Output scale
    #[arg(long, allow_hyphen_values = true)]
    pub sigma: Option<f64>,
}

impl NoiseArgs {
    /// Merge files and flags into a [`NoiseConfig`].
    pub fn resolve(&self) -> Result<NoiseConfig> {
        let mut merged = Value::Mapping(Mapping::new());
        for path in &self.configs {
            merge(&mut merged, load_yaml(path)?);
        }
        merge(&mut merged, self.overlay()?);

        if merged.get("noise").is_none() {
            bail!("no noise kind given; pass --kind or a --config file with a `noise` section");
        }
        serde_yml::from_value(merged).context("invalid noise settings")
    }

    fn overlay(&self) -> Result<Value> {
        let mut noise = Mapping::new();
        if let Some(kind) = self.kind {
            noise.insert("kind".into(), kind.tag().into());
        }
        for (key, value) in [
            ("slope", self.slope),
            ("fmin", self.fmin),
            ("fknee", self.fknee),
            ("fsample", self.fsample),
        ] {
            if let Some(v) = value {
                noise.insert(key.into(), serde_yml::to_value(v)?);
            }
        }

        let mut top = Mapping::new();
        if !noise.is_empty() {
            top.insert("noise".into(), Value::Mapping(noise));
        }
        if let Some(words) = &self.seed {
            top.insert("seed".into(), serde_yml::to_value(words)?);
        }
        if self.random_seed {
            let seed: [u32; 4] = rand::thread_rng().gen();
            log::info!("random seed {seed:?}");
            top.insert("seed".into(), serde_yml::to_value(seed)?);
        }
        if let Some(mean) = self.mean {
            top.insert("mean".into(), serde_yml::to_value(mean)?);
        }
        if let Some(sigma) = self.sigma {
            top.insert("sigma".into(), serde_yml::to_value(sigma)?);
        }
        Ok(Value::Mapping(top))
    }
}

fn load_yaml(path: &Path) -> Result<Value> {
    log::debug!("loading settings from {}", path.display());
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read settings file {}", path.display()))?;
    serde_yml::from_str(&text).with_context(|| format!("failed to parse YAML in {}", path.display()))
}

/// Overlay `top` onto `base`: mappings merge recursively, anything else replaces.
pub fn merge(base: &mut Value, top: Value) {
    match (base, top) {
        (Value::Mapping(base), Value::Mapping(top)) => {
            for (key, value) in top {
                match base.get_mut(&key) {
                    Some(slot) => merge(slot, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (slot, value) => *slot = value,
    }
}

// ------------------------------------ Tests --------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use noisegen_core::config::NoiseKind;

    fn yaml(text: &str) -> Value {
        serde_yml::from_str(text).unwrap()
    }

    #[test]
    fn later_values_win_key_by_key() {
        let mut base = yaml("noise: {kind: oof, slope: -1.0, fmin: 0.01, fknee: 1.0, fsample: 100.0}\nsigma: 2.0");
        merge(&mut base, yaml("noise: {slope: -2.0}\nmean: 3.0"));
        let cfg: NoiseConfig = serde_yml::from_value(base).unwrap();

        assert_eq!(cfg.noise, NoiseKind::Oof { slope: -2.0, fmin: 0.01, fknee: 1.0, fsample: 100.0 });
        assert_eq!(cfg.mean, 3.0);
        assert_eq!(cfg.sigma, 2.0);
        assert_eq!(cfg.seed, [0; 4]);
    }

    #[test]
    fn flags_override_files() {
        let dir = std::env::temp_dir().join(format!("noisegen-settings-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("base.yaml");
        fs::write(&path, "noise:\n  kind: oof2\n  fmin: 1.15e-5\n  fknee: 0.05\n  fsample: 1.0\nseed: [1, 2, 3, 4]\n").unwrap();

        let args = NoiseArgs {
            configs: vec![path],
            fknee: Some(0.1),
            seed: Some(vec![5, 6, 7, 8]),
            ..NoiseArgs::default()
        };
        let cfg = args.resolve().unwrap();
        fs::remove_dir_all(&dir).unwrap();

        assert_eq!(cfg.noise, NoiseKind::Oof2 { fmin: 1.15e-5, fknee: 0.1, fsample: 1.0 });
        assert_eq!(cfg.seed, [5, 6, 7, 8]);
        assert_eq!(cfg.sigma, 1.0);
    }

    #[test]
    fn flags_alone_are_enough() {
        let args = NoiseArgs {
            kind: Some(KindArg::Gaussian),
            mean: Some(-1.0),
            ..NoiseArgs::default()
        };
        let cfg = args.resolve().unwrap();
        assert_eq!(cfg.noise, NoiseKind::Gaussian);
        assert_eq!(cfg.mean, -1.0);
    }

    #[test]
    fn missing_kind_is_an_error() {
        let args = NoiseArgs { fmin: Some(0.1), ..NoiseArgs::default() };
        assert!(args.resolve().is_err());
        assert!(NoiseArgs::default().resolve().is_err());
    }

    #[test]
    fn missing_file_is_reported() {
        let args = NoiseArgs {
            configs: vec![PathBuf::from("/nonexistent/noisegen.yaml")],
            ..NoiseArgs::default()
        };
        let err = args.resolve().unwrap_err();
        assert!(format!("{err:#}").contains("failed to read settings file"));
    }
}
