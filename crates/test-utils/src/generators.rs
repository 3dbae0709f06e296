//! Synthetic image generators.
//!
//! Every generator is deterministic so tests can compute the expected
//! brightness of any pixel by hand.

use raster_common::{PixelBuffer, Rgb};

fn build(width: usize, height: usize, f: impl Fn(usize, usize) -> Rgb) -> PixelBuffer {
    let mut pixels = Vec::with_capacity(width * height);
    for y in 0..height {
        for x in 0..width {
            pixels.push(f(x, y));
        }
    }
    PixelBuffer::new(width, height, pixels).expect("generator produced wrong pixel count")
}

/// Creates an image where every pixel is `gray`.
///
/// # Example
///
/// ```
/// use test_utils::uniform_image;
///
/// let img = uniform_image(4, 3, 255);
/// assert_eq!(img.pixels().len(), 12);
/// assert_eq!(img.pixel(3, 2).r, 255);
/// ```
pub fn uniform_image(width: usize, height: usize, gray: u8) -> PixelBuffer {
    build(width, height, |_, _| Rgb::gray(gray))
}

/// Creates an image with a predictable per-pixel pattern.
///
/// Channels are `r = x`, `g = y`, `b = x + y`, each wrapping at 256. This
/// makes it easy to tell which source pixel ended up where.
///
/// # Example
///
/// ```
/// use test_utils::gradient_image;
///
/// let img = gradient_image(10, 5);
/// let px = img.pixel(7, 3);
/// assert_eq!((px.r, px.g, px.b), (7, 3, 10));
/// ```
pub fn gradient_image(width: usize, height: usize) -> PixelBuffer {
    build(width, height, |x, y| {
        Rgb::new((x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8)
    })
}

/// Creates a black-and-white checkerboard with square cells of `cell` pixels.
///
/// The top-left cell is black.
pub fn checkerboard_image(width: usize, height: usize, cell: usize) -> PixelBuffer {
    let cell = cell.max(1);
    build(width, height, |x, y| {
        if (x / cell + y / cell) % 2 == 0 {
            Rgb::BLACK
        } else {
            Rgb::WHITE
        }
    })
}

/// Creates a white image with a filled black disc centred in the frame.
///
/// `radius` is given as a fraction of the shorter side.
pub fn disc_image(width: usize, height: usize, radius: f32) -> PixelBuffer {
    let cx = width as f32 / 2.0;
    let cy = height as f32 / 2.0;
    let r = radius * width.min(height) as f32;
    build(width, height, |x, y| {
        let dx = x as f32 + 0.5 - cx;
        let dy = y as f32 + 0.5 - cy;
        if dx * dx + dy * dy <= r * r {
            Rgb::BLACK
        } else {
            Rgb::WHITE
        }
    })
}

/// Creates an image with pseudo-random pixels from a fixed seed.
///
/// Uses a small xorshift generator so the crate needs no RNG dependency.
pub fn noise_image(width: usize, height: usize, seed: u64) -> PixelBuffer {
    let mut state = seed | 1;
    let mut pixels = Vec::with_capacity(width * height);
    for _ in 0..width * height {
        state ^= state << 13;
        state ^= state >> 7;
        state ^= state << 17;
        let [r, g, b, ..] = state.to_le_bytes();
        pixels.push(Rgb::new(r, g, b));
    }
    PixelBuffer::new(width, height, pixels).expect("generator produced wrong pixel count")
}
