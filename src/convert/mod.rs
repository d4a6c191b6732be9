//! Converter capabilities.
//!
//! A [`Converter`] turns the file at one path into a file at another. The
//! dispatcher picks one per (source, target) format pair and validates what
//! it produced; converters themselves only read `src` and write `dst`.
//!
//! In-process converters cover text, documents, spreadsheets, PDF output
//! and raster images. Presentations, PDF rasterization and OCR go through
//! the host tools in [`crate::tools`].

mod image;
mod ocr;
mod office;
mod pdf;
mod text;

pub use self::image::{ImageToImage, ImageToPdf};
pub use self::ocr::ImageToText;
pub use self::office::{PresentationToArchive, PresentationToPdf};
pub use self::pdf::{PdfToDocx, PdfToPptx};
pub use self::text::{TextConverter, TextSink, TextSource};

use crate::error::Result;
use std::path::Path;
use tempfile::TempDir;

/// A capability that converts one file format into another.
pub trait Converter: Send + Sync {
    /// Returns the name of this converter.
    fn name(&self) -> &str;

    /// Read `src` and write the converted file to `dst`.
    ///
    /// Both paths are used as given. On error the converter may leave a
    /// partial `dst` behind; the dispatcher removes it.
    fn convert(&self, src: &Path, dst: &Path) -> Result<()>;
}

/// Create a private scratch directory under `base`, removed on drop.
pub(crate) fn scratch_dir(base: &Path, prefix: &str) -> Result<TempDir> {
    std::fs::create_dir_all(base)?;
    Ok(tempfile::Builder::new().prefix(prefix).tempdir_in(base)?)
}
