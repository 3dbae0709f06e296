//! Error types for the contour engine.

use std::path::PathBuf;

use raster_common::{Dimensions, RasterError};
use thiserror::Error;

/// Errors that can occur while preparing or running a contour pass.
///
/// Every variant is fatal to the run: the pipeline is a single batch job
/// with no intermediate state to resume from.
#[derive(Error, Debug)]
pub enum EngineError {
    /// Buffer construction or addressing failed.
    #[error(transparent)]
    Raster(#[from] RasterError),

    /// A buffer, grid, or template allocation could not be satisfied.
    #[error("failed to allocate {bytes} bytes for {what}")]
    Allocation { what: &'static str, bytes: usize },

    /// Decoding or encoding an image file failed.
    #[error("image error for {}: {source}", path.display())]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// A template set did not contain one tile per configuration code.
    #[error("expected {expected} contour templates, got {actual}")]
    TemplateCount { expected: usize, actual: usize },

    /// A template's size differs from the sampling step.
    #[error("contour template {code} is {actual}, expected {expected}")]
    TemplateGeometry {
        code: usize,
        expected: Dimensions,
        actual: Dimensions,
    },

    /// The input raster has no pixels.
    #[error("image is empty ({0})")]
    EmptyImage(Dimensions),

    /// Configuration values are out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A configuration file could not be read or parsed.
    #[error("failed to load config {}: {message}", path.display())]
    ConfigFile { path: PathBuf, message: String },

    /// Worker count must be at least one.
    #[error("worker count must be positive, got {0}")]
    InvalidWorkerCount(usize),

    /// The OS refused to create a worker thread.
    #[error("error creating worker thread {worker}: {source}")]
    ThreadSpawn {
        worker: usize,
        #[source]
        source: std::io::Error,
    },

    /// A worker thread could not be joined.
    #[error("error joining worker thread {worker}")]
    ThreadJoin { worker: usize },

    /// A worker panicked while executing a phase.
    #[error("worker {worker} panicked during the {phase} phase")]
    WorkerPanicked { worker: usize, phase: &'static str },

    /// Filesystem error outside of image decoding.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl EngineError {
    /// Create an Image error.
    pub fn image(path: impl Into<PathBuf>, source: image::ImageError) -> Self {
        Self::Image {
            path: path.into(),
            source,
        }
    }

    /// Create an InvalidConfig error.
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }
}

/// Result type for contour engine operations.
pub type EngineResult<T> = std::result::Result<T, EngineError>;
