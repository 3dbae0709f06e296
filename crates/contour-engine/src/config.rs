//! Configuration for the contour engine.

use std::path::{Path, PathBuf};

use raster_common::Dimensions;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// Distance between sample points, in pixels (and the template size).
pub const DEFAULT_STEP: usize = 8;

/// Average brightness at or below which a sample counts as dark.
pub const DEFAULT_THRESHOLD: u8 = 200;

/// Images wider than this are downscaled before sampling.
pub const RESCALE_WIDTH: usize = 2048;

/// Images taller than this are downscaled before sampling.
pub const RESCALE_HEIGHT: usize = 2048;

/// One template per 4-bit configuration code.
pub const TEMPLATE_COUNT: usize = 16;

/// Directory holding `<code>.ppm` template tiles.
pub const DEFAULT_TEMPLATE_DIR: &str = "./contours";

/// Horizontal and vertical sampling step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    pub x: usize,
    pub y: usize,
}

impl Step {
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }

    /// Template footprint for this step.
    pub fn footprint(&self) -> Dimensions {
        Dimensions::new(self.x, self.y)
    }
}

impl Default for Step {
    fn default() -> Self {
        Self::new(DEFAULT_STEP, DEFAULT_STEP)
    }
}

/// Configuration for a contour run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContourConfig {
    /// Sampling step; every template must be exactly this size.
    pub step: Step,

    /// Brightness cutoff, shared by the whole run.
    pub threshold: u8,

    /// Fixed target resolution for oversized inputs.
    pub rescale: Dimensions,

    /// Where the template loader looks for `<code>.ppm`.
    pub template_dir: PathBuf,
}

impl Default for ContourConfig {
    fn default() -> Self {
        Self {
            step: Step::default(),
            threshold: DEFAULT_THRESHOLD,
            rescale: Dimensions::new(RESCALE_WIDTH, RESCALE_HEIGHT),
            template_dir: PathBuf::from(DEFAULT_TEMPLATE_DIR),
        }
    }
}

impl ContourConfig {
    /// Defaults overlaid with environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_env();
        config
    }

    /// Overlay `CONTOUR_*` environment variables onto this configuration.
    ///
    /// Values that fail to parse are ignored.
    pub fn apply_env(&mut self) {
        if let Some(x) = env_parse("CONTOUR_STEP_X") {
            self.step.x = x;
        }
        if let Some(y) = env_parse("CONTOUR_STEP_Y") {
            self.step.y = y;
        }
        if let Some(threshold) = env_parse("CONTOUR_THRESHOLD") {
            self.threshold = threshold;
        }
        if let Some(width) = env_parse("CONTOUR_RESCALE_WIDTH") {
            self.rescale.width = width;
        }
        if let Some(height) = env_parse("CONTOUR_RESCALE_HEIGHT") {
            self.rescale.height = height;
        }
        if let Ok(dir) = std::env::var("CONTOUR_TEMPLATE_DIR") {
            self.template_dir = PathBuf::from(dir);
        }
    }

    /// Load from a YAML file. Missing keys keep their defaults.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> EngineResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| EngineError::ConfigFile {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::from_yaml_str(&text).map_err(|e| match e {
            EngineError::InvalidConfig(message) => EngineError::ConfigFile {
                path: path.to_path_buf(),
                message,
            },
            other => other,
        })
    }

    /// Parse from YAML text.
    pub fn from_yaml_str(text: &str) -> EngineResult<Self> {
        serde_yaml::from_str(text).map_err(|e| EngineError::invalid_config(e.to_string()))
    }

    /// Validate the configuration.
    pub fn validate(&self) -> EngineResult<()> {
        if self.step.x == 0 || self.step.y == 0 {
            return Err(EngineError::invalid_config(format!(
                "step must be positive in both axes, got {}x{}",
                self.step.x, self.step.y
            )));
        }

        if self.rescale.width == 0 || self.rescale.height == 0 {
            return Err(EngineError::invalid_config(format!(
                "rescale target must be positive, got {}",
                self.rescale
            )));
        }

        Ok(())
    }

    /// Whether an image of `dims` must be downscaled before sampling.
    pub fn needs_rescale(&self, dims: Dimensions) -> bool {
        dims.width > self.rescale.width || dims.height > self.rescale.height
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.trim().parse().ok())
}
