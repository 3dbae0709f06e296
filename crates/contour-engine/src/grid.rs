//! Binary sample grid and the sampler that fills it.
//!
//! The grid is one contiguous allocation of atomic bytes. During the sample
//! phase each worker stores into its own rows only; after the barrier every
//! worker reads freely, including neighbour rows owned by other workers.

use std::ops::Range;
use std::sync::atomic::{AtomicU8, Ordering};

use raster_common::{RasterView, Rgb};

use crate::config::Step;
use crate::error::{EngineError, EngineResult};

/// `(rows x cols)` matrix of 0/1 samples, row-major.
#[derive(Debug)]
pub struct SampleGrid {
    rows: usize,
    cols: usize,
    cells: Vec<AtomicU8>,
}

impl SampleGrid {
    /// Allocate a zeroed grid.
    pub fn new(rows: usize, cols: usize) -> EngineResult<Self> {
        let len = rows * cols;
        let mut cells = Vec::new();
        cells
            .try_reserve_exact(len)
            .map_err(|_| EngineError::Allocation {
                what: "sample grid",
                bytes: len,
            })?;
        cells.extend((0..len).map(|_| AtomicU8::new(0)));
        Ok(Self { rows, cols, cells })
    }

    /// Grid for an image of `width x height` sampled every `step` pixels:
    /// `height / step.y + 1` rows by `width / step.x + 1` columns.
    pub fn for_image(width: usize, height: usize, step: Step) -> EngineResult<Self> {
        Self::new(height / step.y + 1, width / step.x + 1)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Number of grid rows that own marchable cells (`p`).
    pub fn cell_rows(&self) -> usize {
        self.rows.saturating_sub(1)
    }

    /// Number of grid columns that own marchable cells (`q`).
    pub fn cell_cols(&self) -> usize {
        self.cols.saturating_sub(1)
    }

    #[inline]
    pub fn get(&self, i: usize, j: usize) -> u8 {
        self.cells[i * self.cols + j].load(Ordering::Relaxed)
    }

    #[inline]
    pub fn set(&self, i: usize, j: usize, dark: bool) {
        self.cells[i * self.cols + j].store(dark as u8, Ordering::Relaxed);
    }

    /// Row-major copy of all cells.
    pub fn to_vec(&self) -> Vec<u8> {
        self.cells.iter().map(|c| c.load(Ordering::Relaxed)).collect()
    }
}

/// Average of the three channels, truncated.
#[inline]
pub fn brightness(px: Rgb) -> u8 {
    ((px.r as u16 + px.g as u16 + px.b as u16) / 3) as u8
}

/// Whether a pixel counts as dark for `threshold`.
#[inline]
pub fn is_dark(px: Rgb, threshold: u8) -> bool {
    brightness(px) <= threshold
}

/// Fill grid rows `rows` from `image`.
///
/// Interior cell `[i][j]` samples pixel `(j * step.x, i * step.y)`; the
/// boundary column `[i][q]` samples the image's last column instead. With
/// `boundary_row` set, this call also fills boundary row `[p][j]` (sampled
/// from the image's last row) and forces the corner `[p][q]` to 0; exactly
/// one caller per grid must pass it.
pub fn sample_rows(
    image: &RasterView<'_>,
    grid: &SampleGrid,
    rows: Range<usize>,
    boundary_row: bool,
    step: Step,
    threshold: u8,
) {
    let p = grid.cell_rows();
    let q = grid.cell_cols();
    let last_x = image.width().saturating_sub(1);
    let last_y = image.height().saturating_sub(1);

    for i in rows {
        let y = i * step.y;
        for j in 0..q {
            grid.set(i, j, is_dark(image.pixel(j * step.x, y), threshold));
        }
        // last sample points have no right neighbour on the lattice
        grid.set(i, q, is_dark(image.pixel(last_x, y), threshold));
    }

    if boundary_row {
        for j in 0..q {
            grid.set(p, j, is_dark(image.pixel(j * step.x, last_y), threshold));
        }
        grid.set(p, q, false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use raster_common::PixelBuffer;

    #[test]
    fn test_brightness_truncates() {
        // (200 + 200 + 201) / 3 = 200.33
        assert_eq!(brightness(Rgb::new(200, 200, 201)), 200);
        // (200 + 201 + 201) / 3 = 200.67 -> still 200
        assert_eq!(brightness(Rgb::new(200, 201, 201)), 200);
        assert_eq!(brightness(Rgb::WHITE), 255);
    }

    #[test]
    fn test_threshold_is_inclusive() {
        assert!(is_dark(Rgb::gray(200), 200));
        assert!(!is_dark(Rgb::gray(201), 200));
        assert!(is_dark(Rgb::new(200, 201, 201), 200));
    }

    #[test]
    fn test_for_image_dimensions() {
        let grid = SampleGrid::for_image(24, 16, Step::new(8, 8)).unwrap();
        assert_eq!(grid.rows(), 3);
        assert_eq!(grid.cols(), 4);
        assert_eq!(grid.cell_rows(), 2);
        assert_eq!(grid.cell_cols(), 3);
    }

    #[test]
    fn test_sample_uniform_black() {
        let img = PixelBuffer::filled(16, 16, Rgb::BLACK).unwrap();
        let grid = SampleGrid::for_image(16, 16, Step::new(8, 8)).unwrap();
        sample_rows(&img.as_view(), &grid, 0..2, true, Step::new(8, 8), 200);
        assert_eq!(grid.to_vec(), vec![1, 1, 1, 1, 1, 1, 1, 1, 0]);
    }

    #[test]
    fn test_sample_split_rows_matches_single_call() {
        let mut img = PixelBuffer::filled(16, 24, Rgb::WHITE).unwrap();
        img.set_pixel(8, 8, Rgb::BLACK);
        img.set_pixel(15, 16, Rgb::BLACK);
        let step = Step::new(8, 8);

        let whole = SampleGrid::for_image(16, 24, step).unwrap();
        sample_rows(&img.as_view(), &whole, 0..3, true, step, 200);

        let split = SampleGrid::for_image(16, 24, step).unwrap();
        sample_rows(&img.as_view(), &split, 0..1, false, step, 200);
        sample_rows(&img.as_view(), &split, 1..3, true, step, 200);

        assert_eq!(whole.to_vec(), split.to_vec());
        assert_eq!(whole.get(1, 1), 1);
        // (15, 16) is on the last column, so it lands in boundary cell [2][2]
        assert_eq!(whole.get(2, 2), 1);
        assert_eq!(whole.get(3, 2), 0);
    }

    #[test]
    fn test_boundary_row_written_only_on_request() {
        let img = PixelBuffer::filled(16, 16, Rgb::BLACK).unwrap();
        let step = Step::new(8, 8);
        let grid = SampleGrid::for_image(16, 16, step).unwrap();
        sample_rows(&img.as_view(), &grid, 0..1, false, step, 200);
        assert_eq!(grid.get(2, 0), 0);
        assert_eq!(grid.get(2, 1), 0);
        assert_eq!(grid.get(0, 2), 1);
    }
}
