//! Bicubic resampling of RGB rasters to a fixed resolution.

use raster_common::{PixelBuffer, RasterRowsMut, RasterView, Rgb};

use crate::error::EngineResult;

/// Sample `src` at normalized coordinates `u, v` in `[0, 1]`.
///
/// Uses the 4x4 neighbourhood around the mapped source position and a
/// Catmull-Rom kernel per channel. Neighbour indices outside the image are
/// clamped to the border; results are clamped to `0..=255`.
pub fn sample_bicubic(src: &RasterView<'_>, u: f32, v: f32) -> Rgb {
    let sx = u * src.width() as f32 - 0.5;
    let sy = v * src.height() as f32 - 0.5;

    // Base index is floored, not truncated: at u = 0 (sx = -0.5) the taps
    // run from -2 to 1 and clamp onto the first column.
    let x0 = sx.floor();
    let y0 = sy.floor();
    let tx = sx - x0;
    let ty = sy - y0;
    let xi = x0 as i64;
    let yi = y0 as i64;

    // Sample 4x4 grid of points
    let mut values = [[Rgb::BLACK; 4]; 4];
    for (j, row) in values.iter_mut().enumerate() {
        for (i, value) in row.iter_mut().enumerate() {
            *value = src.pixel_clamped(xi + i as i64 - 1, yi + j as i64 - 1);
        }
    }

    let mut out = [0u8; 3];
    for (channel, slot) in out.iter_mut().enumerate() {
        // Cubic interpolation along x for each row
        let mut rows = [0.0f32; 4];
        for (j, row) in values.iter().enumerate() {
            rows[j] = cubic_1d(
                row[0].channels()[channel] as f32,
                row[1].channels()[channel] as f32,
                row[2].channels()[channel] as f32,
                row[3].channels()[channel] as f32,
                tx,
            );
        }

        // Then along y
        let value = cubic_1d(rows[0], rows[1], rows[2], rows[3], ty);
        *slot = value.clamp(0.0, 255.0) as u8;
    }

    Rgb::from(out)
}

/// 1D cubic interpolation using Catmull-Rom spline.
#[inline]
fn cubic_1d(p0: f32, p1: f32, p2: f32, p3: f32, t: f32) -> f32 {
    let t2 = t * t;
    let t3 = t2 * t;

    // Catmull-Rom coefficients
    let a = -0.5 * p0 + 1.5 * p1 - 1.5 * p2 + 0.5 * p3;
    let b = p0 - 2.5 * p1 + 2.0 * p2 - 0.5 * p3;
    let c = -0.5 * p0 + 0.5 * p2;
    let d = p1;

    a * t3 + b * t2 + c * t + d
}

/// Normalized coordinate of index `i` on an axis of `len` samples.
#[inline]
pub fn normalized(i: usize, len: usize) -> f32 {
    if len <= 1 {
        0.0
    } else {
        i as f32 / (len - 1) as f32
    }
}

/// Fill a band of destination rows of a `band.width() x dst_height` target.
///
/// Row `r`, column `c` receives `sample_bicubic(src, c / (W - 1), r / (H - 1))`.
pub fn resample_rows(src: &RasterView<'_>, band: &mut RasterRowsMut<'_>, dst_height: usize) {
    let dst_width = band.width();
    for r in band.first_row()..band.end_row() {
        let v = normalized(r, dst_height);
        let row = band.row_mut(r);
        for (c, px) in row.iter_mut().enumerate() {
            *px = sample_bicubic(src, normalized(c, dst_width), v);
        }
    }
}

/// Resample a whole raster on the calling thread.
pub fn resample(src: &PixelBuffer, width: usize, height: usize) -> EngineResult<PixelBuffer> {
    let mut dst = PixelBuffer::filled(width, height, Rgb::BLACK)?;
    let view = src.as_view();
    let mut band = dst.rows_mut(0..height)?;
    resample_rows(&view, &mut band, height);
    Ok(dst)
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_utils::assert_approx_eq;

    #[test]
    fn test_cubic_1d_passes_through_knots() {
        assert_eq!(cubic_1d(1.0, 2.0, 3.0, 4.0, 0.0), 2.0);
        assert_approx_eq!(cubic_1d(1.0, 2.0, 3.0, 4.0, 1.0), 3.0);
    }

    #[test]
    fn test_cubic_1d_linear_ramp_midpoint() {
        assert_approx_eq!(cubic_1d(0.0, 10.0, 20.0, 30.0, 0.5), 15.0, 1e-4);
    }

    #[test]
    fn test_normalized_endpoints() {
        assert_eq!(normalized(0, 2048), 0.0);
        assert_eq!(normalized(2047, 2048), 1.0);
        assert_eq!(normalized(0, 1), 0.0);
        assert_approx_eq!(normalized(1, 3), 0.5);
    }

    #[test]
    fn test_first_column_uses_floored_taps() {
        // Columns 0..4 hold 0, 40, 80, 120. At u = 0 the floored base (-1)
        // weights column 0 against itself and column 1 with t = 0.5.
        let mut src = PixelBuffer::filled(4, 1, Rgb::BLACK).unwrap();
        for x in 0..4 {
            src.set_pixel(x, 0, Rgb::gray(x as u8 * 40));
        }
        let view = src.as_view();
        // cubic_1d(0, 0, 0, 40, 0.5) = -2.5 -> clamped to 0
        assert_eq!(sample_bicubic(&view, 0.0, 0.0), Rgb::BLACK);
        assert_approx_eq!(cubic_1d(0.0, 0.0, 0.0, 40.0, 0.5), -2.5);
    }

    #[test]
    fn test_uniform_source_stays_uniform() {
        let src = PixelBuffer::filled(30, 20, Rgb::new(10, 120, 250)).unwrap();
        let dst = resample(&src, 7, 5).unwrap();
        assert!(dst.pixels().iter().all(|&p| p == Rgb::new(10, 120, 250)));
    }

    #[test]
    fn test_overshoot_is_clamped() {
        // A hard black/white edge makes Catmull-Rom ring past the input range.
        let mut src = PixelBuffer::filled(8, 1, Rgb::BLACK).unwrap();
        for x in 4..8 {
            src.set_pixel(x, 0, Rgb::WHITE);
        }
        let view = src.as_view();
        for i in 0..64 {
            let u = i as f32 / 63.0;
            // Must not wrap around: every sample stays a legal channel value.
            let px = sample_bicubic(&view, u, 0.0);
            assert_eq!(px.r, px.g);
            assert_eq!(px.g, px.b);
        }
        assert_eq!(sample_bicubic(&view, 0.0, 0.0), Rgb::BLACK);
        assert_eq!(sample_bicubic(&view, 1.0, 0.0), Rgb::WHITE);
    }
}
