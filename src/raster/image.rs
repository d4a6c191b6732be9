//! Raster format conversion.

use crate::error::{Error, Result};
use crate::format::Format;
use image::{DynamicImage, ImageFormat, RgbImage};
use std::path::Path;

/// Encoder for a raster format.
pub fn image_format(format: Format) -> Option<ImageFormat> {
    match format {
        Format::Png => Some(ImageFormat::Png),
        Format::Jpeg => Some(ImageFormat::Jpeg),
        Format::Bmp => Some(ImageFormat::Bmp),
        Format::Gif => Some(ImageFormat::Gif),
        Format::Tiff => Some(ImageFormat::Tiff),
        _ => None,
    }
}

/// Decode an image file, trusting its content over its extension.
pub fn load(path: &Path) -> Result<DynamicImage> {
    let reader = image::ImageReader::open(path)?.with_guessed_format()?;
    Ok(reader.decode()?)
}

/// Decode an image and flatten it to 8-bit RGB.
pub fn load_rgb(path: &Path) -> Result<RgbImage> {
    Ok(load(path)?.to_rgb8())
}

/// Re-encode `image` as `format`.
///
/// JPEG has no alpha channel, so the image is flattened to RGB first; GIF
/// always gets RGBA. Other targets keep alpha only when the source has it.
pub fn save_as(image: &DynamicImage, path: &Path, format: Format) -> Result<()> {
    let target = image_format(format)
        .ok_or_else(|| Error::InvalidData(format!("{} is not a raster format", format)))?;

    let prepared = match format {
        Format::Jpeg => DynamicImage::ImageRgb8(image.to_rgb8()),
        Format::Gif => DynamicImage::ImageRgba8(image.to_rgba8()),
        _ if image.color().has_alpha() => DynamicImage::ImageRgba8(image.to_rgba8()),
        _ => DynamicImage::ImageRgb8(image.to_rgb8()),
    };
    prepared.save_with_format(path, target)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    #[test]
    fn test_image_format() {
        assert_eq!(image_format(Format::Jpeg), Some(ImageFormat::Jpeg));
        assert_eq!(image_format(Format::Pdf), None);
    }

    #[test]
    fn test_save_as_each_format() {
        let dir = tempfile::tempdir().unwrap();
        let source = DynamicImage::ImageRgba8(RgbaImage::from_pixel(6, 4, Rgba([10, 20, 30, 128])));

        for format in Format::RASTER {
            let path = dir.path().join(format!("out.{}", format.extension()));
            save_as(&source, &path, format).unwrap();

            let decoded = load(&path).unwrap();
            assert_eq!((decoded.width(), decoded.height()), (6, 4), "{format}");
        }
    }

    #[test]
    fn test_load_ignores_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("actually_png.jpg");
        let source = DynamicImage::ImageRgb8(RgbImage::new(2, 2));
        source.save_with_format(&path, ImageFormat::Png).unwrap();

        assert_eq!(load_rgb(&path).unwrap().dimensions(), (2, 2));
    }

    #[test]
    fn test_save_as_rejects_non_raster() {
        let dir = tempfile::tempdir().unwrap();
        let source = DynamicImage::ImageRgb8(RgbImage::new(1, 1));
        assert!(save_as(&source, &dir.path().join("x.pdf"), Format::Pdf).is_err());
    }
}
