//! Error types for raster buffers.

use thiserror::Error;

use crate::Dimensions;

/// Result type alias using RasterError.
pub type RasterResult<T> = Result<T, RasterError>;

/// Errors raised while building or addressing pixel buffers.
#[derive(Debug, Error)]
pub enum RasterError {
    #[error("pixel data length {actual} does not match {expected} for a {dims} buffer")]
    LengthMismatch {
        dims: Dimensions,
        expected: usize,
        actual: usize,
    },

    #[error("failed to allocate {bytes} bytes for {what}")]
    Allocation { what: &'static str, bytes: usize },

    #[error("row range {start}..{end} is outside a buffer of {height} rows")]
    RowsOutOfBounds {
        start: usize,
        end: usize,
        height: usize,
    },
}
