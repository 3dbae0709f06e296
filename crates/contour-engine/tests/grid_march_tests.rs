//! Component tests for partitioning, grid sampling and marching, driven
//! directly through the public per-range functions.

use contour_engine::{
    configuration_code, march_rows, partition, partitions, sample_rows, ContourTemplateSet,
    SampleGrid, Step,
};
use raster_common::{PixelBuffer, Rgb};
use test_utils::{assert_buffers_eq, coded_templates, decode_color, disc_image, noise_image};

const STEP: Step = Step::new(8, 8);

/// Sample a whole grid the way `workers` workers would, one range at a time.
fn sample_partitioned(img: &PixelBuffer, workers: usize) -> SampleGrid {
    let grid = SampleGrid::for_image(img.width(), img.height(), STEP).unwrap();
    let p = grid.cell_rows();
    for t in 0..workers {
        sample_rows(
            &img.as_view(),
            &grid,
            partition(t, workers, p),
            t == workers - 1,
            STEP,
            200,
        );
    }
    grid
}

fn coded_set() -> ContourTemplateSet {
    ContourTemplateSet::from_buffers(coded_templates(8, 8), STEP).unwrap()
}

// =============================================================================
// Partitioning
// =============================================================================

#[test]
fn test_partitions_cover_every_row_once() {
    for total in [0usize, 1, 7, 256, 2048] {
        for workers in [1usize, 2, 3, 7, 64, 3000] {
            let mut seen = vec![0u32; total];
            let mut expected_start = 0;
            for range in partitions(workers, total) {
                assert_eq!(range.start, expected_start);
                assert!(range.end <= total);
                for r in range.clone() {
                    seen[r] += 1;
                }
                expected_start = range.end;
            }
            assert_eq!(expected_start, total);
            assert!(seen.iter().all(|&n| n == 1), "total={total} workers={workers}");
        }
    }
}

#[test]
fn test_partition_formula() {
    // floor(t*R/N) .. floor((t+1)*R/N)
    assert_eq!(partition(0, 3, 10), 0..3);
    assert_eq!(partition(1, 3, 10), 3..6);
    assert_eq!(partition(2, 3, 10), 6..10);
    assert_eq!(partition(5, 8, 3), 1..2);
}

// =============================================================================
// Sampling
// =============================================================================

#[test]
fn test_partitioned_sampling_matches_single_pass() {
    let img = noise_image(83, 61, 5);
    let reference = sample_partitioned(&img, 1).to_vec();
    for workers in [2, 4, 9, 20] {
        assert_eq!(sample_partitioned(&img, workers).to_vec(), reference);
    }
}

#[test]
fn test_boundary_samples_use_last_row_and_column() {
    // 20x12: interior lattice x = 0, 8, 16 and y = 0, 8; boundary column
    // at x = 19, boundary row at y = 11.
    let mut img = PixelBuffer::filled(20, 12, Rgb::WHITE).unwrap();
    img.set_pixel(19, 8, Rgb::BLACK);
    img.set_pixel(8, 11, Rgb::BLACK);
    img.set_pixel(16, 8, Rgb::BLACK);

    let grid = sample_partitioned(&img, 2);
    assert_eq!(grid.rows(), 2);
    assert_eq!(grid.cols(), 3);
    // Row 1 is the boundary row: sampled from y = 11, not y = 8.
    assert_eq!(grid.to_vec(), vec![0, 0, 0, 0, 1, 0]);
}

#[test]
fn test_grid_corner_is_always_light() {
    let img = PixelBuffer::filled(32, 32, Rgb::BLACK).unwrap();
    let grid = sample_partitioned(&img, 3);
    let (p, q) = (grid.cell_rows(), grid.cell_cols());
    assert_eq!(grid.get(p, q), 0);
    assert_eq!(grid.get(p, q - 1), 1);
    assert_eq!(grid.get(p - 1, q), 1);
}

// =============================================================================
// Marching
// =============================================================================

#[test]
fn test_march_stamps_configuration_codes() {
    let img = disc_image(48, 40, 0.3);
    let grid = sample_partitioned(&img, 1);
    let templates = coded_set();

    let mut out = img.clone();
    let rows = 0..grid.cell_rows();
    let mut band = out.rows_mut(0..img.height()).unwrap();
    march_rows(&grid, &templates, &mut band, rows, STEP);

    for i in 0..grid.cell_rows() {
        for j in 0..grid.cell_cols() {
            let px = out.pixel(j * 8 + 3, i * 8 + 5);
            assert_eq!(decode_color(px), Some(configuration_code(&grid, i, j)));
        }
    }
}

#[test]
fn test_march_is_idempotent() {
    let img = noise_image(40, 40, 9);
    let grid = sample_partitioned(&img, 2);
    let templates = coded_set();

    let mut once = img.clone();
    march_rows(
        &grid,
        &templates,
        &mut once.rows_mut(0..40).unwrap(),
        0..grid.cell_rows(),
        STEP,
    );

    let mut twice = once.clone();
    march_rows(
        &grid,
        &templates,
        &mut twice.rows_mut(0..40).unwrap(),
        0..grid.cell_rows(),
        STEP,
    );

    assert_buffers_eq!(once, twice);
}

#[test]
fn test_march_by_bands_matches_whole() {
    let img = disc_image(64, 64, 0.4);
    let grid = sample_partitioned(&img, 1);
    let templates = coded_set();
    let p = grid.cell_rows();

    let mut whole = img.clone();
    march_rows(&grid, &templates, &mut whole.rows_mut(0..64).unwrap(), 0..p, STEP);

    let mut banded = img.clone();
    for range in partitions(3, p) {
        let pixels = range.start * 8..range.end * 8;
        let mut band = banded.rows_mut(pixels).unwrap();
        march_rows(&grid, &templates, &mut band, range, STEP);
    }

    assert_buffers_eq!(whole, banded);
}
