//! Borrowed views over pixel data.

use crate::{Dimensions, Rgb};

/// Read-only view of a whole raster.
#[derive(Debug, Clone, Copy)]
pub struct RasterView<'a> {
    width: usize,
    height: usize,
    pixels: &'a [Rgb],
}

impl<'a> RasterView<'a> {
    /// # Panics
    /// If `pixels.len() != width * height`.
    pub fn new(width: usize, height: usize, pixels: &'a [Rgb]) -> Self {
        assert_eq!(pixels.len(), width * height, "view length mismatch");
        Self {
            width,
            height,
            pixels,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn dimensions(&self) -> Dimensions {
        Dimensions::new(self.width, self.height)
    }

    #[inline]
    pub fn pixel(&self, x: usize, y: usize) -> Rgb {
        self.pixels[y * self.width + x]
    }

    /// Pixel lookup with both coordinates clamped into the raster.
    #[inline]
    pub fn pixel_clamped(&self, x: i64, y: i64) -> Rgb {
        let x = x.clamp(0, self.width as i64 - 1) as usize;
        let y = y.clamp(0, self.height as i64 - 1) as usize;
        self.pixel(x, y)
    }

    pub fn pixels(&self) -> &'a [Rgb] {
        self.pixels
    }
}

/// Mutable band of consecutive full-width rows.
///
/// Rows are addressed with absolute row numbers of the parent raster, so a
/// band starting at row 16 accepts `row_mut(16)` as its first row.
#[derive(Debug)]
pub struct RasterRowsMut<'a> {
    width: usize,
    first_row: usize,
    pixels: &'a mut [Rgb],
}

impl<'a> RasterRowsMut<'a> {
    /// # Panics
    /// If `pixels.len()` is not a multiple of `width`.
    pub fn new(width: usize, first_row: usize, pixels: &'a mut [Rgb]) -> Self {
        assert!(
            (width == 0 && pixels.is_empty()) || (width > 0 && pixels.len() % width == 0),
            "band length is not a whole number of rows"
        );
        Self {
            width,
            first_row,
            pixels,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn first_row(&self) -> usize {
        self.first_row
    }

    pub fn rows(&self) -> usize {
        if self.width == 0 {
            0
        } else {
            self.pixels.len() / self.width
        }
    }

    /// One past the last absolute row number in the band.
    pub fn end_row(&self) -> usize {
        self.first_row + self.rows()
    }

    pub fn row_mut(&mut self, y: usize) -> &mut [Rgb] {
        let start = (y - self.first_row) * self.width;
        &mut self.pixels[start..start + self.width]
    }

    pub fn pixels(&self) -> &[Rgb] {
        &*self.pixels
    }
}
