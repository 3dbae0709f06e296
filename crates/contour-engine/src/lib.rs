//! Parallel marching squares over RGB rasters.
//!
//! A run takes an image, optionally downscales it to a fixed resolution,
//! thresholds a sparse lattice of sample points into a binary grid, and
//! replaces every grid cell's footprint with one of sixteen contour tiles
//! chosen by the cell's four corners.
//!
//! # Architecture
//!
//! ```text
//! ContourPipeline::run(image)
//!      │
//!      ├─► needs rescale? allocate 2048x2048 target : march image in place
//!      │
//!      └─► WorkerPool::run ── N threads, static row partitions
//!               │
//!               ├─► resample_rows   (bicubic, destination rows)
//!               │        ── barrier A (only when rescaling)
//!               ├─► sample_rows     (grid rows, brightness <= threshold)
//!               │        ── barrier B
//!               └─► march_rows      (grid rows, stamp templates)
//! ```
//!
//! # Example
//!
//! ```ignore
//! use contour_engine::{ContourConfig, ContourPipeline, io};
//!
//! let pipeline = ContourPipeline::from_config(ContourConfig::default(), 4)?;
//! let output = pipeline.run(io::read_image("in.ppm")?)?;
//! io::write_image(&output.image, "out.ppm")?;
//! ```

pub mod config;
pub mod error;
mod frame;
pub mod grid;
pub mod io;
pub mod march;
pub mod partition;
pub mod pipeline;
pub mod pool;
pub mod resample;
pub mod templates;

pub use config::{
    ContourConfig, Step, DEFAULT_STEP, DEFAULT_TEMPLATE_DIR, DEFAULT_THRESHOLD, RESCALE_HEIGHT,
    RESCALE_WIDTH, TEMPLATE_COUNT,
};
pub use error::{EngineError, EngineResult};
pub use grid::{brightness, is_dark, sample_rows, SampleGrid};
pub use march::{configuration_code, march_rows};
pub use partition::{partition, partitions};
pub use pipeline::{ContourOutput, ContourPipeline, RunReport};
pub use pool::{ContourJob, PhaseTimings, WorkerPool};
pub use resample::{resample, resample_rows, sample_bicubic};
pub use templates::ContourTemplateSet;
