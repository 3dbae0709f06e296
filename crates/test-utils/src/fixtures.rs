//! Template fixtures.
//!
//! Coded templates fill tile `c` with a colour derived from `c`, so the
//! configuration code stamped into any cell can be read back from the output.

use std::path::Path;

use raster_common::{PixelBuffer, Rgb};
use tempfile::TempDir;

/// Colour of the coded tile for `code`. Code 0 is white.
pub fn code_color(code: u8) -> Rgb {
    if code == 0 {
        Rgb::WHITE
    } else {
        Rgb::new(code * 10, 100 + code, 200 - code)
    }
}

/// Inverse of [`code_color`], if `px` is one of the sixteen tile colours.
pub fn decode_color(px: Rgb) -> Option<u8> {
    (0..16u8).find(|&code| code_color(code) == px)
}

/// Sixteen solid tiles of `width x height`, tile `c` filled with `code_color(c)`.
pub fn coded_templates(width: usize, height: usize) -> Vec<PixelBuffer> {
    (0..16u8)
        .map(|code| {
            PixelBuffer::filled(width, height, code_color(code))
                .expect("template allocation failed")
        })
        .collect()
}

/// Writes `img` as a binary P6 file, without going through any image codec.
pub fn write_ppm(path: &Path, img: &PixelBuffer) {
    let mut bytes = format!("P6\n{} {}\n255\n", img.width(), img.height()).into_bytes();
    bytes.extend_from_slice(&img.to_raw_rgb());
    std::fs::write(path, bytes).expect("failed to write ppm");
}

/// Writes `templates` as `<dir>/<code>.ppm`.
pub fn write_template_dir(dir: &Path, templates: &[PixelBuffer]) {
    std::fs::create_dir_all(dir).expect("failed to create template dir");
    for (code, tile) in templates.iter().enumerate() {
        write_ppm(&dir.join(format!("{code}.ppm")), tile);
    }
}

/// Creates a temporary directory holding coded templates.
///
/// The directory is removed when the returned guard is dropped.
pub fn coded_template_dir(width: usize, height: usize) -> TempDir {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    write_template_dir(dir.path(), &coded_templates(width, height));
    dir
}
