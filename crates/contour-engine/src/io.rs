//! Raster file collaborators: decode to and encode from `PixelBuffer`.
//!
//! Any format the `image` crate can decode is accepted as input; the format
//! is sniffed from the file contents, so extensionless paths work. Output
//! format follows the file extension and defaults to binary PPM.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use image::codecs::pnm::{PnmEncoder, PnmSubtype, SampleEncoding};
use image::io::Reader as ImageReader;
use image::{ColorType, ImageEncoder, ImageFormat, RgbImage};
use raster_common::{PixelBuffer, RasterError};

use crate::error::{EngineError, EngineResult};

/// Read an image file into an RGB buffer.
pub fn read_image(path: impl AsRef<Path>) -> EngineResult<PixelBuffer> {
    let path = path.as_ref();
    let img = ImageReader::open(path)
        .and_then(|reader| reader.with_guessed_format())
        .map_err(|e| EngineError::image(path, e.into()))?
        .decode()
        .map_err(|e| EngineError::image(path, e))?
        .into_rgb8();
    let width = img.width() as usize;
    let height = img.height() as usize;
    Ok(PixelBuffer::from_raw_rgb(width, height, img.as_raw())?)
}

/// Write an RGB buffer to `path`.
pub fn write_image(buffer: &PixelBuffer, path: impl AsRef<Path>) -> EngineResult<()> {
    let path = path.as_ref();

    let raw = buffer.to_raw_rgb();
    let len = raw.len();
    let img = RgbImage::from_raw(buffer.width() as u32, buffer.height() as u32, raw).ok_or(
        RasterError::LengthMismatch {
            dims: buffer.dimensions(),
            expected: buffer.width() * buffer.height() * 3,
            actual: len,
        },
    )?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    match ImageFormat::from_path(path) {
        Ok(format) => img
            .save_with_format(path, format)
            .map_err(|e| EngineError::image(path, e)),
        Err(_) => write_ppm(&img, path),
    }
}

/// Binary P6 regardless of the file name.
fn write_ppm(img: &RgbImage, path: &Path) -> EngineResult<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    PnmEncoder::new(&mut writer)
        .with_subtype(PnmSubtype::Pixmap(SampleEncoding::Binary))
        .write_image(img.as_raw(), img.width(), img.height(), ColorType::Rgb8)
        .map_err(|e| EngineError::image(path, e))?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use raster_common::Rgb;

    #[test]
    fn test_ppm_roundtrip_preserves_pixels() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.ppm");

        let mut buf = PixelBuffer::filled(5, 3, Rgb::new(1, 2, 3)).unwrap();
        buf.set_pixel(4, 2, Rgb::new(250, 128, 0));
        write_image(&buf, &path).unwrap();

        let back = read_image(&path).unwrap();
        assert_eq!(back, buf);
    }

    #[test]
    fn test_extensionless_output_is_binary_ppm() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("contoured");

        let mut buf = PixelBuffer::filled(4, 4, Rgb::WHITE).unwrap();
        buf.set_pixel(1, 3, Rgb::new(9, 8, 7));
        write_image(&buf, &path).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        assert!(bytes.starts_with(b"P6"));
        assert_eq!(read_image(&path).unwrap(), buf);
    }

    #[test]
    fn test_unknown_extension_falls_back_to_ppm() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.contour");

        let buf = PixelBuffer::filled(3, 2, Rgb::new(40, 50, 60)).unwrap();
        write_image(&buf, &path).unwrap();

        assert!(std::fs::read(&path).unwrap().starts_with(b"P6"));
        assert_eq!(read_image(&path).unwrap(), buf);
    }

    #[test]
    fn test_read_missing_file_reports_path() {
        let err = read_image("/definitely/not/here.ppm").unwrap_err();
        assert!(err.to_string().contains("/definitely/not/here.ppm"));
    }
}
