//! Layered run configuration.
//!
//! Precedence, lowest first: built-in defaults, `--config` YAML file,
//! `CONTOUR_*` environment variables (including `.env`), command-line flags.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use contour_engine::ContourConfig;

/// Values given explicitly on the command line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlagOverrides {
    pub templates: Option<PathBuf>,
    pub step_x: Option<usize>,
    pub step_y: Option<usize>,
    pub threshold: Option<u8>,
}

impl FlagOverrides {
    pub fn apply(&self, config: &mut ContourConfig) {
        if let Some(dir) = &self.templates {
            config.template_dir = dir.clone();
        }
        if let Some(x) = self.step_x {
            config.step.x = x;
        }
        if let Some(y) = self.step_y {
            config.step.y = y;
        }
        if let Some(threshold) = self.threshold {
            config.threshold = threshold;
        }
    }
}

/// Build the effective configuration for a run.
pub fn resolve(config_file: Option<&Path>, flags: &FlagOverrides) -> Result<ContourConfig> {
    let mut config = match config_file {
        Some(path) => ContourConfig::from_yaml_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => ContourConfig::default(),
    };
    config.apply_env();
    flags.apply(&mut config);
    config.validate().context("Invalid configuration")?;
    Ok(config)
}
