//! Target raster shared by all workers of one run.
//!
//! Workers write disjoint row bands during the resample and march phases and
//! read the whole raster during the sample phase. The two barriers in the
//! worker pool order those phases, so at any moment the raster is either
//! split into non-overlapping `&mut` bands or viewed through `&` only.

use std::marker::PhantomData;
use std::ops::Range;
use std::ptr::NonNull;

use raster_common::{Dimensions, PixelBuffer, RasterRowsMut, RasterView, Rgb};

pub(crate) struct SharedFrame<'a> {
    ptr: NonNull<Rgb>,
    width: usize,
    height: usize,
    _buffer: PhantomData<&'a mut PixelBuffer>,
}

// SAFETY: access goes through `rows_mut` and `view`, whose contracts rule out
// overlapping mutable access; `Rgb` itself is plain data.
unsafe impl Send for SharedFrame<'_> {}
unsafe impl Sync for SharedFrame<'_> {}

impl<'a> SharedFrame<'a> {
    pub(crate) fn new(buffer: &'a mut PixelBuffer) -> Self {
        let width = buffer.width();
        let height = buffer.height();
        let ptr = NonNull::new(buffer.pixels_mut().as_mut_ptr()).unwrap_or(NonNull::dangling());
        Self {
            ptr,
            width,
            height,
            _buffer: PhantomData,
        }
    }

    pub(crate) fn dimensions(&self) -> Dimensions {
        Dimensions::new(self.width, self.height)
    }

    /// Mutable band over pixel rows `rows`.
    ///
    /// # Safety
    ///
    /// While the band is alive no other band may overlap `rows` and no
    /// `view` may exist.
    pub(crate) unsafe fn rows_mut(&self, rows: Range<usize>) -> RasterRowsMut<'_> {
        assert!(
            rows.start <= rows.end && rows.end <= self.height,
            "rows {rows:?} outside frame of height {}",
            self.height
        );
        let len = (rows.end - rows.start) * self.width;
        // SAFETY: in bounds per the assert; exclusivity is the caller's contract.
        let pixels = unsafe {
            std::slice::from_raw_parts_mut(self.ptr.as_ptr().add(rows.start * self.width), len)
        };
        RasterRowsMut::new(self.width, rows.start, pixels)
    }

    /// Read-only view of the whole frame.
    ///
    /// # Safety
    ///
    /// No band from `rows_mut` may be alive while the view is.
    pub(crate) unsafe fn view(&self) -> RasterView<'_> {
        // SAFETY: the pointer covers width * height initialized pixels.
        let pixels =
            unsafe { std::slice::from_raw_parts(self.ptr.as_ptr(), self.width * self.height) };
        RasterView::new(self.width, self.height, pixels)
    }
}
