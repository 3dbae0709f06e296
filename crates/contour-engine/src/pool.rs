//! Fixed-size worker pool running resample, sample and march in lockstep.
//!
//! ```text
//! worker t:  [resample rows_t] --A--> [sample grid rows_t] --B--> [march grid rows_t]
//! ```
//!
//! Barrier A exists only when the input is being downscaled. Barrier B always
//! exists, because the marcher reads grid cells sampled by neighbouring
//! workers. Partitioning is static: worker `t` owns the `t`-th slice of every
//! phase.

use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc;
use std::sync::{Barrier, OnceLock};
use std::thread;
use std::time::{Duration, Instant};

use metrics::histogram;
use raster_common::PixelBuffer;
use serde::Serialize;
use tracing::{debug, debug_span, warn};

use crate::config::Step;
use crate::error::{EngineError, EngineResult};
use crate::frame::SharedFrame;
use crate::grid::{self, SampleGrid};
use crate::march;
use crate::partition::partition;
use crate::resample;
use crate::templates::ContourTemplateSet;

/// Everything one run operates on.
///
/// When `source` is set it is resampled into `target` first; otherwise
/// `target` is the input image and is marched in place.
pub struct ContourJob<'a> {
    pub source: Option<&'a PixelBuffer>,
    pub target: &'a mut PixelBuffer,
    pub grid: &'a SampleGrid,
    pub templates: &'a ContourTemplateSet,
    pub step: Step,
    pub threshold: u8,
}

/// Wall-clock duration of each phase, measured at the barriers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct PhaseTimings {
    pub resample: Option<Duration>,
    pub sample: Duration,
    pub march: Duration,
}

/// Spawns `workers` threads per run and joins them before returning.
#[derive(Debug, Clone, Copy)]
pub struct WorkerPool {
    workers: usize,
}

impl WorkerPool {
    pub fn new(workers: usize) -> EngineResult<Self> {
        if workers == 0 {
            return Err(EngineError::InvalidWorkerCount(workers));
        }
        Ok(Self { workers })
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Run all three phases over `job` and wait for every worker.
    pub fn run(&self, job: ContourJob<'_>) -> EngineResult<PhaseTimings> {
        let n = self.workers;
        let shared = Shared {
            frame: SharedFrame::new(job.target),
            source: job.source,
            grid: job.grid,
            templates: job.templates,
            step: job.step,
            threshold: job.threshold,
            rescale_barrier: job.source.map(|_| Barrier::new(n)),
            sample_barrier: Barrier::new(n),
            started: Instant::now(),
            resampled: OnceLock::new(),
            sampled: OnceLock::new(),
            failure: OnceLock::new(),
        };

        thread::scope(|scope| {
            let mut handles = Vec::with_capacity(n);
            let mut gates = Vec::with_capacity(n);

            for id in 0..n {
                let (gate, start) = mpsc::channel();
                let task = WorkerTask {
                    id,
                    workers: n,
                    shared: &shared,
                };
                let spawned = thread::Builder::new()
                    .name(format!("contour-worker-{id}"))
                    .spawn_scoped(scope, move || task.run(start));

                match spawned {
                    Ok(handle) => {
                        handles.push(handle);
                        gates.push(gate);
                    }
                    Err(source) => {
                        // Nobody has reached a barrier yet; release the
                        // workers we already have and bail out.
                        for gate in &gates {
                            gate.send(false).ok();
                        }
                        for handle in handles {
                            handle.join().ok();
                        }
                        return Err(EngineError::ThreadSpawn { worker: id, source });
                    }
                }
            }

            for gate in &gates {
                gate.send(true).ok();
            }

            let mut joined = Ok(());
            for (id, handle) in handles.into_iter().enumerate() {
                if handle.join().is_err() && joined.is_ok() {
                    joined = Err(EngineError::ThreadJoin { worker: id });
                }
            }
            joined
        })?;

        if let Some(&(worker, phase)) = shared.failure.get() {
            return Err(EngineError::WorkerPanicked { worker, phase });
        }

        let finished = Instant::now();
        let sampled = shared.sampled.get().copied().unwrap_or(finished);
        let resample = shared
            .resampled
            .get()
            .map(|t| t.duration_since(shared.started));
        let sample_start = shared.resampled.get().copied().unwrap_or(shared.started);

        let timings = PhaseTimings {
            resample,
            sample: sampled.duration_since(sample_start),
            march: finished.duration_since(sampled),
        };

        if let Some(d) = timings.resample {
            histogram!("contour_phase_seconds", "phase" => "resample").record(d.as_secs_f64());
        }
        histogram!("contour_phase_seconds", "phase" => "sample").record(timings.sample.as_secs_f64());
        histogram!("contour_phase_seconds", "phase" => "march").record(timings.march.as_secs_f64());

        Ok(timings)
    }
}

/// State shared by all workers of one run.
struct Shared<'a> {
    frame: SharedFrame<'a>,
    source: Option<&'a PixelBuffer>,
    grid: &'a SampleGrid,
    templates: &'a ContourTemplateSet,
    step: Step,
    threshold: u8,
    rescale_barrier: Option<Barrier>,
    sample_barrier: Barrier,
    started: Instant,
    resampled: OnceLock<Instant>,
    sampled: OnceLock<Instant>,
    failure: OnceLock<(usize, &'static str)>,
}

/// One worker's view of the run.
struct WorkerTask<'s, 'a> {
    id: usize,
    workers: usize,
    shared: &'s Shared<'a>,
}

impl WorkerTask<'_, '_> {
    fn run(self, start: mpsc::Receiver<bool>) {
        if !matches!(start.recv(), Ok(true)) {
            warn!(worker = self.id, "Worker start aborted");
            return;
        }

        let _span = debug_span!("worker", id = self.id).entered();
        let shared = self.shared;

        // A worker that hits a failure keeps arriving at every barrier so
        // its peers are never left waiting.
        if let Some(barrier) = &shared.rescale_barrier {
            self.guarded("resample", || self.resample());
            if barrier.wait().is_leader() {
                shared.resampled.set(Instant::now()).ok();
            }
        }

        if shared.failure.get().is_none() {
            self.guarded("sample", || self.sample());
        }
        if shared.sample_barrier.wait().is_leader() {
            shared.sampled.set(Instant::now()).ok();
        }

        if shared.failure.get().is_none() {
            self.guarded("march", || self.march());
        }
    }

    fn guarded(&self, phase: &'static str, work: impl FnOnce()) {
        if panic::catch_unwind(AssertUnwindSafe(work)).is_err() {
            self.shared.failure.set((self.id, phase)).ok();
        }
    }

    fn resample(&self) {
        let Some(source) = self.shared.source else {
            return;
        };
        let height = self.shared.frame.dimensions().height;
        let rows = partition(self.id, self.workers, height);
        debug!(rows = ?rows, "resample");

        // SAFETY: destination row partitions are disjoint and no view of the
        // frame exists before barrier A.
        let mut band = unsafe { self.shared.frame.rows_mut(rows) };
        resample::resample_rows(&source.as_view(), &mut band, height);
    }

    fn sample(&self) {
        let grid = self.shared.grid;
        let rows = partition(self.id, self.workers, grid.cell_rows());
        debug!(rows = ?rows, "sample");

        // SAFETY: between barriers A and B no worker holds a band.
        let view = unsafe { self.shared.frame.view() };
        grid::sample_rows(
            &view,
            grid,
            rows,
            self.id == self.workers - 1,
            self.shared.step,
            self.shared.threshold,
        );
    }

    fn march(&self) {
        let step = self.shared.step;
        let rows = partition(self.id, self.workers, self.shared.grid.cell_rows());
        debug!(rows = ?rows, "march");

        // SAFETY: grid row partitions map to disjoint pixel bands and every
        // view was dropped before barrier B.
        let mut band = unsafe {
            self.shared
                .frame
                .rows_mut(rows.start * step.y..rows.end * step.y)
        };
        march::march_rows(self.shared.grid, self.shared.templates, &mut band, rows, step);
    }
}
