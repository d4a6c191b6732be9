//! Known file formats, their extensions and MIME types.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// MIME type served for extensions not in the table.
pub const DEFAULT_MIME_TYPE: &str = "application/octet-stream";

/// Broad family a format belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FormatKind {
    /// Plain UTF-8 text
    Text,
    /// Word-processing document
    Document,
    /// Spreadsheet workbook
    Spreadsheet,
    /// Slide presentation
    Presentation,
    /// Fixed-layout page description (PDF)
    PageDescription,
    /// Raster image
    RasterImage,
    /// Archive bundling several files
    Archive,
}

/// A file format the converter registry knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    /// Plain text (.txt)
    Txt,
    /// Microsoft Word document (.docx)
    Docx,
    /// Microsoft Excel workbook (.xlsx)
    Xlsx,
    /// Microsoft PowerPoint presentation (.pptx)
    Pptx,
    /// Portable Document Format (.pdf)
    Pdf,
    /// PNG image (.png)
    Png,
    /// JPEG image (.jpg, .jpeg)
    Jpeg,
    /// Windows bitmap (.bmp)
    Bmp,
    /// GIF image (.gif)
    Gif,
    /// TIFF image (.tif, .tiff)
    Tiff,
    /// ZIP archive (.zip)
    Zip,
}

impl Format {
    /// Every known format.
    pub const ALL: [Format; 11] = [
        Format::Txt,
        Format::Docx,
        Format::Xlsx,
        Format::Pptx,
        Format::Pdf,
        Format::Png,
        Format::Jpeg,
        Format::Bmp,
        Format::Gif,
        Format::Tiff,
        Format::Zip,
    ];

    /// Raster image formats that can be swapped between each other.
    pub const RASTER: [Format; 5] = [
        Format::Png,
        Format::Jpeg,
        Format::Bmp,
        Format::Gif,
        Format::Tiff,
    ];

    /// Look up a format by file extension.
    ///
    /// Matching is case-insensitive and tolerates a leading dot.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match normalize_extension(ext).as_str() {
            "txt" => Some(Format::Txt),
            "docx" => Some(Format::Docx),
            "xlsx" => Some(Format::Xlsx),
            "pptx" => Some(Format::Pptx),
            "pdf" => Some(Format::Pdf),
            "png" => Some(Format::Png),
            "jpg" | "jpeg" => Some(Format::Jpeg),
            "bmp" => Some(Format::Bmp),
            "gif" => Some(Format::Gif),
            "tif" | "tiff" => Some(Format::Tiff),
            "zip" => Some(Format::Zip),
            _ => None,
        }
    }

    /// Look up a format from a path's extension.
    pub fn from_path(path: impl AsRef<Path>) -> Option<Self> {
        Self::from_extension(&extension_of(path))
    }

    /// Returns the canonical file extension for this format.
    pub fn extension(&self) -> &'static str {
        match self {
            Format::Txt => "txt",
            Format::Docx => "docx",
            Format::Xlsx => "xlsx",
            Format::Pptx => "pptx",
            Format::Pdf => "pdf",
            Format::Png => "png",
            Format::Jpeg => "jpg",
            Format::Bmp => "bmp",
            Format::Gif => "gif",
            Format::Tiff => "tiff",
            Format::Zip => "zip",
        }
    }

    /// Returns the family this format belongs to.
    pub fn kind(&self) -> FormatKind {
        match self {
            Format::Txt => FormatKind::Text,
            Format::Docx => FormatKind::Document,
            Format::Xlsx => FormatKind::Spreadsheet,
            Format::Pptx => FormatKind::Presentation,
            Format::Pdf => FormatKind::PageDescription,
            Format::Png | Format::Jpeg | Format::Bmp | Format::Gif | Format::Tiff => {
                FormatKind::RasterImage
            }
            Format::Zip => FormatKind::Archive,
        }
    }

    /// Returns the MIME type served for this format.
    pub fn mime_type(&self) -> &'static str {
        match self {
            Format::Txt => "text/plain",
            Format::Docx => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
            Format::Xlsx => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
            Format::Pptx => {
                "application/vnd.openxmlformats-officedocument.presentationml.presentation"
            }
            Format::Pdf => "application/pdf",
            Format::Png => "image/png",
            Format::Jpeg => "image/jpeg",
            Format::Bmp => "image/bmp",
            Format::Gif => "image/gif",
            Format::Tiff => "image/tiff",
            Format::Zip => "application/zip",
        }
    }

    /// Whether outputs of this format are archives whose entries get validated.
    pub fn is_archive(&self) -> bool {
        self.kind() == FormatKind::Archive
    }

    /// Returns a human-readable name for this format.
    pub fn name(&self) -> &'static str {
        match self {
            Format::Txt => "Plain Text",
            Format::Docx => "Word Document",
            Format::Xlsx => "Excel Workbook",
            Format::Pptx => "PowerPoint Presentation",
            Format::Pdf => "PDF Document",
            Format::Png => "PNG Image",
            Format::Jpeg => "JPEG Image",
            Format::Bmp => "Bitmap Image",
            Format::Gif => "GIF Image",
            Format::Tiff => "TIFF Image",
            Format::Zip => "ZIP Archive",
        }
    }
}

impl std::fmt::Display for Format {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Lowercase an extension and strip a leading dot.
pub fn normalize_extension(ext: &str) -> String {
    ext.trim_start_matches('.').to_ascii_lowercase()
}

/// Normalized extension of a path, or an empty string when it has none.
pub fn extension_of(path: impl AsRef<Path>) -> String {
    path.as_ref()
        .extension()
        .map(|e| normalize_extension(&e.to_string_lossy()))
        .unwrap_or_default()
}

/// MIME type for an arbitrary extension, falling back to octet-stream.
pub fn mime_for_extension(ext: &str) -> &'static str {
    Format::from_extension(ext)
        .map(|f| f.mime_type())
        .unwrap_or(DEFAULT_MIME_TYPE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_extension() {
        assert_eq!(Format::from_extension("PDF"), Some(Format::Pdf));
        assert_eq!(Format::from_extension(".docx"), Some(Format::Docx));
        assert_eq!(Format::from_extension("jpeg"), Some(Format::Jpeg));
        assert_eq!(Format::from_extension("JPG"), Some(Format::Jpeg));
        assert_eq!(Format::from_extension("tif"), Some(Format::Tiff));
        assert_eq!(Format::from_extension("doc"), None);
        assert_eq!(Format::from_extension(""), None);
    }

    #[test]
    fn test_extension_of() {
        assert_eq!(extension_of("dir/Report.XLSX"), "xlsx");
        assert_eq!(extension_of("archive.tar.GZ"), "gz");
        assert_eq!(extension_of("README"), "");
    }

    #[test]
    fn test_mime_table() {
        assert_eq!(mime_for_extension("pdf"), "application/pdf");
        assert_eq!(mime_for_extension(".zip"), "application/zip");
        assert_eq!(mime_for_extension("txt"), "text/plain");
        assert_eq!(mime_for_extension("xyz"), DEFAULT_MIME_TYPE);
    }

    #[test]
    fn test_kinds() {
        assert_eq!(Format::Pptx.kind(), FormatKind::Presentation);
        assert!(Format::Zip.is_archive());
        assert!(!Format::Docx.is_archive());
        assert!(Format::RASTER.iter().all(|f| f.kind() == FormatKind::RasterImage));
    }

    #[test]
    fn test_format_display() {
        assert_eq!(Format::Docx.to_string(), "Word Document");
        assert_eq!(Format::Xlsx.to_string(), "Excel Workbook");
    }
}
