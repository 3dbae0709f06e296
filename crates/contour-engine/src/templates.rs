//! The sixteen contour tiles, one per 4-bit configuration code.
//!
//! Tiles are stored back to back in a single allocation and are immutable
//! once built, so workers share them by reference without locking.

use std::path::Path;

use raster_common::{Dimensions, PixelBuffer, Rgb};
use tracing::debug;

use crate::config::{Step, TEMPLATE_COUNT};
use crate::error::{EngineError, EngineResult};
use crate::io;

/// Contour tiles indexed by configuration code `0..16`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContourTemplateSet {
    step: Step,
    pixels: Vec<Rgb>,
}

impl ContourTemplateSet {
    /// Build a set from sixteen buffers, each exactly `step.x x step.y`.
    pub fn from_buffers(buffers: Vec<PixelBuffer>, step: Step) -> EngineResult<Self> {
        if buffers.len() != TEMPLATE_COUNT {
            return Err(EngineError::TemplateCount {
                expected: TEMPLATE_COUNT,
                actual: buffers.len(),
            });
        }

        let expected = step.footprint();
        let tile_len = expected.area();
        let mut pixels = Vec::new();
        pixels
            .try_reserve_exact(tile_len * TEMPLATE_COUNT)
            .map_err(|_| EngineError::Allocation {
                what: "contour templates",
                bytes: tile_len * TEMPLATE_COUNT * std::mem::size_of::<Rgb>(),
            })?;

        for (code, buffer) in buffers.iter().enumerate() {
            if buffer.dimensions() != expected {
                return Err(EngineError::TemplateGeometry {
                    code,
                    expected,
                    actual: buffer.dimensions(),
                });
            }
            pixels.extend_from_slice(buffer.pixels());
        }

        Ok(Self { step, pixels })
    }

    /// Load `<dir>/<code>.ppm` for every code.
    pub fn load_dir(dir: impl AsRef<Path>, step: Step) -> EngineResult<Self> {
        let dir = dir.as_ref();
        let buffers = (0..TEMPLATE_COUNT)
            .map(|code| io::read_image(dir.join(format!("{code}.ppm"))))
            .collect::<EngineResult<Vec<_>>>()?;

        debug!(dir = %dir.display(), step_x = step.x, step_y = step.y, "Loaded contour templates");
        Self::from_buffers(buffers, step)
    }

    /// Write every tile as `<dir>/<code>.ppm`.
    pub fn write_dir(&self, dir: impl AsRef<Path>) -> EngineResult<()> {
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir)?;
        for code in 0..TEMPLATE_COUNT as u8 {
            io::write_image(&self.to_buffer(code)?, dir.join(format!("{code}.ppm")))?;
        }
        Ok(())
    }

    /// Render a default tile set for `step`.
    ///
    /// Each tile is white with a black line joining the midpoints of the cell
    /// edges the iso-line crosses; codes 0 and 15 stay blank.
    pub fn render_default(step: Step) -> EngineResult<Self> {
        let buffers = (0..TEMPLATE_COUNT as u8)
            .map(|code| render_tile(code, step))
            .collect::<EngineResult<Vec<_>>>()?;
        Self::from_buffers(buffers, step)
    }

    pub fn step(&self) -> Step {
        self.step
    }

    pub fn footprint(&self) -> Dimensions {
        self.step.footprint()
    }

    /// Pixels of the tile for `code`, row-major, `step.x` per row.
    #[inline]
    pub fn template(&self, code: u8) -> &[Rgb] {
        let len = self.step.x * self.step.y;
        let start = code as usize * len;
        &self.pixels[start..start + len]
    }

    /// Copy one tile out as a standalone buffer.
    pub fn to_buffer(&self, code: u8) -> EngineResult<PixelBuffer> {
        Ok(PixelBuffer::new(
            self.step.x,
            self.step.y,
            self.template(code).to_vec(),
        )?)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Edge {
    Top,
    Right,
    Bottom,
    Left,
}

/// Edges joined by the iso-line for a configuration code.
///
/// Code bits are `8*TL + 4*TR + 2*BR + 1*BL`; a set bit is a dark corner.
fn cell_segments(code: u8) -> &'static [(Edge, Edge)] {
    use Edge::*;
    match code {
        0 | 15 => &[], // uniform cell - no contour
        1 | 14 => &[(Left, Bottom)],
        2 | 13 => &[(Bottom, Right)],
        3 | 12 => &[(Left, Right)],
        4 | 11 => &[(Top, Right)],
        5 => &[(Top, Right), (Left, Bottom)], // saddle
        6 | 9 => &[(Top, Bottom)],
        7 | 8 => &[(Left, Top)],
        10 => &[(Left, Top), (Bottom, Right)], // saddle
        _ => &[],
    }
}

fn edge_midpoint(edge: Edge, w: f32, h: f32) -> (f32, f32) {
    match edge {
        Edge::Top => (w / 2.0, 0.0),
        Edge::Right => (w, h / 2.0),
        Edge::Bottom => (w / 2.0, h),
        Edge::Left => (0.0, h / 2.0),
    }
}

fn render_tile(code: u8, step: Step) -> EngineResult<PixelBuffer> {
    use tiny_skia::*;

    let mut pixmap = Pixmap::new(step.x as u32, step.y as u32)
        .ok_or_else(|| EngineError::invalid_config(format!("cannot render {}x{} tile", step.x, step.y)))?;
    pixmap.fill(Color::WHITE);

    let mut paint = Paint::default();
    paint.set_color_rgba8(0, 0, 0, 255);
    paint.anti_alias = false;

    let stroke = Stroke {
        width: 1.5,
        line_cap: LineCap::Square,
        ..Stroke::default()
    };

    let (w, h) = (step.x as f32, step.y as f32);
    for &(from, to) in cell_segments(code) {
        let (x1, y1) = edge_midpoint(from, w, h);
        let (x2, y2) = edge_midpoint(to, w, h);

        let mut pb = PathBuilder::new();
        pb.move_to(x1, y1);
        pb.line_to(x2, y2);
        if let Some(path) = pb.finish() {
            pixmap.stroke_path(&path, &paint, &stroke, Transform::identity(), None);
        }
    }

    // Opaque pixmap, so premultiplied RGBA equals straight RGB.
    let pixels = pixmap
        .data()
        .chunks_exact(4)
        .map(|c| Rgb::new(c[0], c[1], c[2]))
        .collect();
    Ok(PixelBuffer::new(step.x, step.y, pixels)?)
}
