//! # fileshift
//!
//! Table-driven file format conversion.
//!
//! A [`Registry`] maps an ordered (source, target) format pair to a
//! [`Converter`]. The [`Dispatcher`] resolves the pair from the file
//! extensions, runs the converter and validates its output: the file must
//! exist and be non-empty, and archives must hold at least one entry.
//! Partial output is removed on failure.
//!
//! Text, Word documents, Excel workbooks, PDF output and raster images are
//! handled in-process. Presentations, PDF rasterization and OCR use host
//! tools (`soffice`, `pdftoppm`, `tesseract`) located through
//! [`ConverterConfig`].
//!
//! ## Quick Start
//!
//! ```no_run
//! // One-off conversion, formats taken from the extensions
//! let outcome = fileshift::convert_file("notes.txt", "notes.pdf")?;
//! println!("{} wrote {} bytes", outcome.converter, outcome.bytes_written);
//! # Ok::<(), fileshift::Error>(())
//! ```
//!
//! ## Registry and Dispatcher
//!
//! ```no_run
//! use fileshift::{ConversionRequest, ConverterConfig, Dispatcher, Format, Registry};
//!
//! let config = ConverterConfig::new().with_office_path("/opt/libreoffice/program/soffice");
//! let registry = Registry::with_defaults(&config);
//! println!("xlsx converts to {:?}", registry.targets_for(Format::Xlsx));
//!
//! let dispatcher = Dispatcher::new(registry);
//! dispatcher.convert(&ConversionRequest::new("slides.pptx", "slides.zip"))?;
//! # Ok::<(), fileshift::Error>(())
//! ```

pub mod config;
pub mod container;
pub mod convert;
pub mod detect;
pub mod dispatch;
pub mod docx;
pub mod error;
pub mod format;
pub mod model;
pub mod package;
pub mod pdf;
pub mod pptx;
pub mod raster;
pub mod registry;
pub mod session;
pub mod tools;
pub mod xlsx;

// Re-exports
pub use config::{ConverterConfig, PageLayout, TextImageOptions};
pub use container::{OoxmlContainer, Relationship, Relationships};
pub use convert::Converter;
pub use detect::{detect_format_from_bytes, detect_format_from_path};
pub use dispatch::{ConversionOutcome, ConversionRequest, Dispatcher};
pub use error::{Error, Result};
pub use format::{Format, FormatKind};
pub use model::{Row, Sheet, TextDocument, Workbook};
pub use registry::{Registry, RegistryBuilder};
pub use session::{Download, Session, Workspace};

use std::path::Path;

/// Convert `src` to `dst` with the default configuration.
///
/// # Example
///
/// ```no_run
/// let outcome = fileshift::convert_file("report.xlsx", "report.txt")?;
/// assert_eq!(outcome.destination_format, fileshift::Format::Txt);
/// # Ok::<(), fileshift::Error>(())
/// ```
pub fn convert_file(src: impl AsRef<Path>, dst: impl AsRef<Path>) -> Result<ConversionOutcome> {
    convert_file_with_config(src, dst, &ConverterConfig::default())
}

/// Convert `src` to `dst` with a custom configuration.
pub fn convert_file_with_config(
    src: impl AsRef<Path>,
    dst: impl AsRef<Path>,
    config: &ConverterConfig,
) -> Result<ConversionOutcome> {
    let dispatcher = Dispatcher::new(Registry::with_defaults(config));
    dispatcher.convert(&ConversionRequest::new(src.as_ref(), dst.as_ref()))
}

/// Extract plain text from a text, document or spreadsheet file.
///
/// Paragraphs and spreadsheet rows are joined with newlines.
pub fn extract_text(path: impl AsRef<Path>) -> Result<String> {
    let path = path.as_ref();
    let source = Format::from_path(path)
        .and_then(convert::TextSource::for_format)
        .ok_or_else(|| Error::UnsupportedSource(path.display().to_string()))?;
    Ok(source.read_lines(path)?.join("\n"))
}
