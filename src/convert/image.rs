//! Raster image converters.

use super::Converter;
use crate::config::PageLayout;
use crate::error::Result;
use crate::format::Format;
use crate::pdf::PdfWriter;
use crate::raster;
use std::path::Path;

/// Places an image on a single PDF page of the same size.
#[derive(Debug, Clone, Default)]
pub struct ImageToPdf;

impl Converter for ImageToPdf {
    fn name(&self) -> &str {
        "image-to-pdf"
    }

    fn convert(&self, src: &Path, dst: &Path) -> Result<()> {
        let image = raster::load_rgb(src)?;
        tracing::debug!(width = image.width(), height = image.height(), "embedding image");

        let mut writer = PdfWriter::new(PageLayout::default());
        writer.add_image_page(image);
        writer.save(dst)
    }
}

/// Re-encodes an image in another raster format.
#[derive(Debug, Clone)]
pub struct ImageToImage {
    name: String,
    target: Format,
}

impl ImageToImage {
    /// Converter producing `target`.
    pub fn new(target: Format) -> Self {
        Self {
            name: format!("image-to-{}", target.extension()),
            target,
        }
    }
}

impl Converter for ImageToImage {
    fn name(&self) -> &str {
        &self.name
    }

    fn convert(&self, src: &Path, dst: &Path) -> Result<()> {
        let image = raster::load(src)?;
        raster::save_as(&image, dst, self.target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detect::detect_format_from_path;
    use image::{Rgba, RgbaImage};

    #[test]
    fn test_png_to_jpeg_drops_alpha() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("in.png");
        let dst = dir.path().join("out.jpg");
        RgbaImage::from_pixel(8, 8, Rgba([0, 0, 255, 100])).save(&src).unwrap();

        let converter = ImageToImage::new(Format::Jpeg);
        assert_eq!(converter.name(), "image-to-jpg");
        converter.convert(&src, &dst).unwrap();
        assert_eq!(detect_format_from_path(&dst).unwrap(), Format::Jpeg);
    }

    #[test]
    fn test_image_to_pdf() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("in.bmp");
        let dst = dir.path().join("out.pdf");
        image::RgbImage::new(5, 7).save(&src).unwrap();

        ImageToPdf.convert(&src, &dst).unwrap();
        let doc = lopdf::Document::load(&dst).unwrap();
        assert_eq!(doc.get_pages().len(), 1);
    }

    #[test]
    fn test_corrupt_image_fails() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("in.png");
        std::fs::write(&src, b"not an image").unwrap();
        assert!(ImageToPdf.convert(&src, &dir.path().join("out.pdf")).is_err());
    }
}
