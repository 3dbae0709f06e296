//! Common raster types shared across the contour workspace.

pub mod error;
pub mod pixel;
pub mod view;

pub use error::{RasterError, RasterResult};
pub use pixel::{Dimensions, PixelBuffer, Rgb};
pub use view::{RasterRowsMut, RasterView};
