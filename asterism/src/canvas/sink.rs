use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use image::codecs::png::PngEncoder;
use image::codecs::pnm::{PnmEncoder, PnmSubtype, SampleEncoding};
use image::{ExtendedColorType, ImageEncoder, RgbaImage};

use crate::error::Result;

/// Final destination of a flattened RGBA8 raster.
pub trait RasterSink {
    fn write(&mut self, pixels: &[u8], width: u32, height: u32) -> Result<()>;

    fn write_image(&mut self, image: &RgbaImage) -> Result<()> {
        self.write(image.as_raw(), image.width(), image.height())
    }
}

/// PNG file with alpha.
#[derive(Debug, Clone)]
pub struct PngSink {
    path: PathBuf,
}

impl PngSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl RasterSink for PngSink {
    fn write(&mut self, pixels: &[u8], width: u32, height: u32) -> Result<()> {
        let writer = BufWriter::new(File::create(&self.path)?);
        PngEncoder::new(writer).write_image(pixels, width, height, ExtendedColorType::Rgba8)?;
        tracing::info!(path = %self.path.display(), width, height, "Wrote PNG");
        Ok(())
    }
}

/// Binary PPM (P6) file; alpha is dropped.
#[derive(Debug, Clone)]
pub struct PpmSink {
    path: PathBuf,
}

impl PpmSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl RasterSink for PpmSink {
    fn write(&mut self, pixels: &[u8], width: u32, height: u32) -> Result<()> {
        let rgb: Vec<u8> = pixels
            .chunks_exact(4)
            .flat_map(|px| [px[0], px[1], px[2]])
            .collect();
        let writer = BufWriter::new(File::create(&self.path)?);
        PnmEncoder::new(writer)
            .with_subtype(PnmSubtype::Pixmap(SampleEncoding::Binary))
            .write_image(&rgb, width, height, ExtendedColorType::Rgb8)?;
        tracing::info!(path = %self.path.display(), width, height, "Wrote PPM");
        Ok(())
    }
}

/// Decodes the image to annotate, converting to RGBA8.
pub fn load_base_image(path: &Path) -> Result<RgbaImage> {
    let image = image::open(path)?.to_rgba8();
    tracing::debug!(
        path = %path.display(),
        width = image.width(),
        height = image.height(),
        "Loaded base image"
    );
    Ok(image)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn test_png_sink_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.png");
        let img = RgbaImage::from_pixel(3, 2, Rgba([10, 200, 30, 255]));
        PngSink::new(&path).write_image(&img).unwrap();

        let back = load_base_image(&path).unwrap();
        assert_eq!(back, img);
    }

    #[test]
    fn test_ppm_sink_writes_p6() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.ppm");
        let img = RgbaImage::from_pixel(2, 2, Rgba([1, 2, 3, 128]));
        PpmSink::new(&path).write_image(&img).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        assert!(bytes.starts_with(b"P6"));
        assert_eq!(&bytes[bytes.len() - 3..], &[1, 2, 3]);
    }

    #[test]
    fn test_load_missing_image_fails() {
        assert!(load_base_image(Path::new("/nonexistent/nope.png")).is_err());
    }
}
