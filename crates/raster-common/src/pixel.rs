//! Owned RGB pixel buffers.

use std::fmt;
use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::{RasterError, RasterResult, RasterRowsMut, RasterView};

/// A single 8-bit RGB pixel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Gray pixel with all three channels set to `v`.
    pub const fn gray(v: u8) -> Self {
        Self::new(v, v, v)
    }

    pub fn channels(&self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }
}

impl From<[u8; 3]> for Rgb {
    fn from(c: [u8; 3]) -> Self {
        Self::new(c[0], c[1], c[2])
    }
}

/// Width and height of a raster, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: usize,
    pub height: usize,
}

impl Dimensions {
    pub const fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }

    pub fn area(&self) -> usize {
        self.width * self.height
    }
}

impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// A `width x height` array of RGB pixels in row-major order.
///
/// Pixel `(x, y)` lives at index `y * width + x`. The length invariant
/// `pixels.len() == width * height` is checked by every constructor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: usize,
    height: usize,
    pixels: Vec<Rgb>,
}

impl PixelBuffer {
    /// Wrap existing pixel data.
    pub fn new(width: usize, height: usize, pixels: Vec<Rgb>) -> RasterResult<Self> {
        let expected = width * height;
        if pixels.len() != expected {
            return Err(RasterError::LengthMismatch {
                dims: Dimensions::new(width, height),
                expected,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Allocate a buffer filled with `fill`.
    ///
    /// Allocation failure is reported as an error instead of aborting so the
    /// caller can surface a diagnostic.
    pub fn filled(width: usize, height: usize, fill: Rgb) -> RasterResult<Self> {
        let len = width * height;
        let mut pixels = Vec::new();
        pixels
            .try_reserve_exact(len)
            .map_err(|_| RasterError::Allocation {
                what: "pixel buffer",
                bytes: len.saturating_mul(std::mem::size_of::<Rgb>()),
            })?;
        pixels.resize(len, fill);
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Build a buffer from packed `RGBRGB...` bytes.
    pub fn from_raw_rgb(width: usize, height: usize, bytes: &[u8]) -> RasterResult<Self> {
        let expected = width * height * 3;
        if bytes.len() != expected {
            return Err(RasterError::LengthMismatch {
                dims: Dimensions::new(width, height),
                expected,
                actual: bytes.len(),
            });
        }
        let pixels = bytes
            .chunks_exact(3)
            .map(|c| Rgb::new(c[0], c[1], c[2]))
            .collect();
        Self::new(width, height, pixels)
    }

    /// Packed `RGBRGB...` bytes, row-major.
    pub fn to_raw_rgb(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.pixels.len() * 3);
        for px in &self.pixels {
            out.extend_from_slice(&px.channels());
        }
        out
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

    pub fn pixels(&self) -> &[Rgb] {
        &self.pixels
    }

    pub fn pixels_mut(&mut self) -> &mut [Rgb] {
        &mut self.pixels
    }

    #[inline]
    pub fn pixel(&self, x: usize, y: usize) -> Rgb {
        self.pixels[y * self.width + x]
    }

    #[inline]
    pub fn set_pixel(&mut self, x: usize, y: usize, value: Rgb) {
        self.pixels[y * self.width + x] = value;
    }

    pub fn row(&self, y: usize) -> &[Rgb] {
        let start = y * self.width;
        &self.pixels[start..start + self.width]
    }

    pub fn as_view(&self) -> RasterView<'_> {
        RasterView::new(self.width, self.height, &self.pixels)
    }

    /// Mutable band covering pixel rows `rows`.
    pub fn rows_mut(&mut self, rows: Range<usize>) -> RasterResult<RasterRowsMut<'_>> {
        if rows.start > rows.end || rows.end > self.height {
            return Err(RasterError::RowsOutOfBounds {
                start: rows.start,
                end: rows.end,
                height: self.height,
            });
        }
        let width = self.width;
        let band = &mut self.pixels[rows.start * width..rows.end * width];
        Ok(RasterRowsMut::new(width, rows.start, band))
    }
}
