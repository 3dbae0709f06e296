//! Shared test utilities for the contour workspace.
//!
//! This crate provides common testing infrastructure:
//! - Synthetic image generators
//! - Template fixtures whose tiles are easy to tell apart
//! - Assertions for interpolated values and whole buffers
//!
//! # Usage
//!
//! Add to your crate's `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! test-utils = { path = "../test-utils" }
//! ```
//!
//! Then import in your tests:
//!
//! ```ignore
//! use test_utils::{gradient_image, coded_templates};
//! ```

pub mod fixtures;
pub mod generators;

// Re-export commonly used items at the crate root
pub use fixtures::*;
pub use generators::*;

/// Asserts two interpolated values agree within `epsilon` (default `1e-5`).
///
/// Both sides are widened to `f64`, so `f32` kernel outputs can be compared
/// against literal expectations directly.
///
/// ```ignore
/// use test_utils::assert_approx_eq;
///
/// assert_approx_eq!(cubic_1d(0.0, 10.0, 20.0, 30.0, 0.5), 15.0, 1e-4);
/// assert_approx_eq!(normalized(1, 3), 0.5);
/// ```
#[macro_export]
macro_rules! assert_approx_eq {
    ($left:expr, $right:expr) => {
        $crate::assert_approx_eq!($left, $right, 1e-5)
    };
    ($left:expr, $right:expr, $epsilon:expr) => {{
        let left = $left as f64;
        let right = $right as f64;
        let epsilon = $epsilon as f64;
        if (left - right).abs() > epsilon {
            panic!(
                "values differ by more than {epsilon}: left {left}, right {right}"
            );
        }
    }};
}

/// Asserts two pixel buffers are identical, reporting the first differing pixel.
///
/// # Usage
///
/// ```ignore
/// use test_utils::assert_buffers_eq;
///
/// assert_buffers_eq!(single_worker.image, eight_workers.image);
/// ```
#[macro_export]
macro_rules! assert_buffers_eq {
    ($left:expr, $right:expr) => {{
        let left = &$left;
        let right = &$right;
        assert_eq!(left.dimensions(), right.dimensions(), "buffer dimensions differ");
        if let Some(idx) = left
            .pixels()
            .iter()
            .zip(right.pixels())
            .position(|(a, b)| a != b)
        {
            let width = left.width();
            panic!(
                "buffers differ at ({}, {}): left {:?}, right {:?}",
                idx % width,
                idx / width,
                left.pixels()[idx],
                right.pixels()[idx]
            );
        }
    }};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assert_approx_eq_default_epsilon() {
        assert_approx_eq!(0.1_f32 + 0.2_f32, 0.3);
        assert_approx_eq!(-5.5, -5.500001, 1e-4);
    }

    #[test]
    #[should_panic(expected = "values differ by more than")]
    fn test_assert_approx_eq_fails() {
        assert_approx_eq!(1.1, 1.0, 0.001);
    }

    #[test]
    fn test_assert_buffers_eq_passes() {
        assert_buffers_eq!(gradient_image(9, 5), gradient_image(9, 5));
    }

    #[test]
    #[should_panic(expected = "buffers differ at (3, 2)")]
    fn test_assert_buffers_eq_reports_position() {
        let left = uniform_image(6, 4, 255);
        let mut right = left.clone();
        right.set_pixel(3, 2, raster_common::Rgb::BLACK);
        assert_buffers_eq!(left, right);
    }
}
