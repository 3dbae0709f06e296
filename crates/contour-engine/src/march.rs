//! Marching squares over a sample grid: classify each cell by its four
//! corners and overwrite the cell's footprint with the matching tile.

use std::ops::Range;

use raster_common::{RasterRowsMut, Rgb};

use crate::config::Step;
use crate::grid::SampleGrid;
use crate::templates::ContourTemplateSet;

/// 4-bit configuration of cell `[i][j]`.
///
/// `8*TL + 4*TR + 2*BR + 1*BL`, where TL is `[i][j]`, TR `[i][j+1]`,
/// BR `[i+1][j+1]` and BL `[i+1][j]`.
#[inline]
pub fn configuration_code(grid: &SampleGrid, i: usize, j: usize) -> u8 {
    8 * grid.get(i, j) + 4 * grid.get(i, j + 1) + 2 * grid.get(i + 1, j + 1) + grid.get(i + 1, j)
}

/// Copy `template` (`step.x` wide) into `band` with its top-left corner at
/// column `x`, absolute row `y`.
#[inline]
pub fn stamp(band: &mut RasterRowsMut<'_>, template: &[Rgb], step: Step, x: usize, y: usize) {
    for (dy, src) in template.chunks_exact(step.x).enumerate() {
        band.row_mut(y + dy)[x..x + step.x].copy_from_slice(src);
    }
}

/// March grid rows `rows`, writing into `band`.
///
/// `band` must cover pixel rows `rows.start * step.y .. rows.end * step.y`.
/// Every tile is a plain overwrite, so marching the same grid twice gives
/// the same pixels.
pub fn march_rows(
    grid: &SampleGrid,
    templates: &ContourTemplateSet,
    band: &mut RasterRowsMut<'_>,
    rows: Range<usize>,
    step: Step,
) {
    assert_eq!(templates.step(), step, "template size must equal the sampling step");
    debug_assert!(band.first_row() <= rows.start * step.y);
    debug_assert!(band.end_row() >= rows.end * step.y);

    let q = grid.cell_cols();
    for i in rows {
        for j in 0..q {
            let code = configuration_code(grid, i, j);
            stamp(band, templates.template(code), step, j * step.x, i * step.y);
        }
    }
}
