//! End-to-end contour pass: optional downscale, sample, march.

use std::time::{Duration, Instant};

use metrics::counter;
use raster_common::{Dimensions, PixelBuffer, Rgb};
use serde::Serialize;
use tracing::info;

use crate::config::ContourConfig;
use crate::error::{EngineError, EngineResult};
use crate::grid::SampleGrid;
use crate::pool::{ContourJob, PhaseTimings, WorkerPool};
use crate::templates::ContourTemplateSet;

/// Summary of one run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunReport {
    pub workers: usize,
    pub source: Dimensions,
    pub output: Dimensions,
    pub rescaled: bool,
    pub grid_rows: usize,
    pub grid_cols: usize,
    pub resample_ms: Option<f64>,
    pub sample_ms: f64,
    pub march_ms: f64,
    pub total_ms: f64,
}

/// The contoured image together with its run report.
#[derive(Debug)]
pub struct ContourOutput {
    pub image: PixelBuffer,
    pub report: RunReport,
}

/// Configured pipeline: templates loaded, worker count fixed.
#[derive(Debug)]
pub struct ContourPipeline {
    config: ContourConfig,
    templates: ContourTemplateSet,
    pool: WorkerPool,
}

impl ContourPipeline {
    pub fn new(
        config: ContourConfig,
        templates: ContourTemplateSet,
        workers: usize,
    ) -> EngineResult<Self> {
        config.validate()?;
        if templates.step() != config.step {
            return Err(EngineError::TemplateGeometry {
                code: 0,
                expected: config.step.footprint(),
                actual: templates.footprint(),
            });
        }
        let pool = WorkerPool::new(workers)?;
        Ok(Self {
            config,
            templates,
            pool,
        })
    }

    /// Build a pipeline whose templates come from `config.template_dir`.
    pub fn from_config(config: ContourConfig, workers: usize) -> EngineResult<Self> {
        config.validate()?;
        let templates = ContourTemplateSet::load_dir(&config.template_dir, config.step)?;
        Self::new(config, templates, workers)
    }

    pub fn config(&self) -> &ContourConfig {
        &self.config
    }

    pub fn templates(&self) -> &ContourTemplateSet {
        &self.templates
    }

    pub fn workers(&self) -> usize {
        self.pool.workers()
    }

    /// Contour `image`.
    ///
    /// Images within the rescale target are marched in place and returned;
    /// larger ones are resampled into a fresh target-sized buffer first.
    pub fn run(&self, image: PixelBuffer) -> EngineResult<ContourOutput> {
        let started = Instant::now();
        let source_dims = image.dimensions();
        if source_dims.area() == 0 {
            return Err(EngineError::EmptyImage(source_dims));
        }

        let rescaled = self.config.needs_rescale(source_dims);
        let (source, mut target) = if rescaled {
            let target = PixelBuffer::filled(
                self.config.rescale.width,
                self.config.rescale.height,
                Rgb::BLACK,
            )?;
            (Some(image), target)
        } else {
            (None, image)
        };

        let step = self.config.step;
        let grid = SampleGrid::for_image(target.width(), target.height(), step)?;

        info!(
            source = %source_dims,
            output = %target.dimensions(),
            rescaled,
            workers = self.pool.workers(),
            grid_rows = grid.rows(),
            grid_cols = grid.cols(),
            "Starting contour pass"
        );

        let timings = self.pool.run(ContourJob {
            source: source.as_ref(),
            target: &mut target,
            grid: &grid,
            templates: &self.templates,
            step,
            threshold: self.config.threshold,
        })?;
        drop(source);

        let report = RunReport {
            workers: self.pool.workers(),
            source: source_dims,
            output: target.dimensions(),
            rescaled,
            grid_rows: grid.rows(),
            grid_cols: grid.cols(),
            resample_ms: timings.resample.map(millis),
            sample_ms: millis(timings.sample),
            march_ms: millis(timings.march),
            total_ms: millis(started.elapsed()),
        };
        log_report(&report, &timings);
        counter!("contour_runs_total").increment(1);

        Ok(ContourOutput {
            image: target,
            report,
        })
    }
}

fn millis(d: Duration) -> f64 {
    d.as_secs_f64() * 1000.0
}

fn log_report(report: &RunReport, timings: &PhaseTimings) {
    info!(
        output = %report.output,
        rescaled = report.rescaled,
        resample_ms = timings.resample.map(millis),
        sample_ms = report.sample_ms,
        march_ms = report.march_ms,
        total_ms = report.total_ms,
        "Contour pass complete"
    );
}
