//! Converters between text-bearing formats.
//!
//! Every source is reduced to a list of lines (paragraphs for plain text and
//! documents, tab-joined rows for spreadsheets) which is then laid out by the
//! sink. Layout is reflowed, not preserved.

use super::Converter;
use crate::config::{PageLayout, TextImageOptions};
use crate::docx::{read_document, DocxWriter};
use crate::error::Result;
use crate::format::Format;
use crate::model::{Row, TextDocument};
use crate::pdf::PdfWriter;
use crate::raster;
use crate::xlsx::{XlsxReader, XlsxWriter};
use image::DynamicImage;
use std::path::Path;

/// Where lines of text come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextSource {
    /// UTF-8 text, one paragraph per line. Invalid bytes are replaced.
    Plain,
    /// Paragraphs of a DOCX document.
    Document,
    /// Rows of the active sheet of an XLSX workbook.
    Spreadsheet,
}

impl TextSource {
    /// Source reader for a format, if it carries text.
    pub fn for_format(format: Format) -> Option<Self> {
        match format {
            Format::Txt => Some(Self::Plain),
            Format::Docx => Some(Self::Document),
            Format::Xlsx => Some(Self::Spreadsheet),
            _ => None,
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Self::Plain => "text",
            Self::Document => "document",
            Self::Spreadsheet => "spreadsheet",
        }
    }

    /// Read the source as lines.
    pub fn read_lines(&self, path: &Path) -> Result<Vec<String>> {
        match self {
            Self::Plain => {
                let bytes = std::fs::read(path)?;
                Ok(TextDocument::from_text(&String::from_utf8_lossy(&bytes)).paragraphs)
            }
            Self::Document => Ok(read_document(path)?.paragraphs),
            Self::Spreadsheet => {
                let workbook = XlsxReader::open(path)?.read()?;
                Ok(workbook
                    .active_sheet()
                    .map(|sheet| sheet.to_lines())
                    .unwrap_or_default())
            }
        }
    }
}

/// How lines of text are written out.
#[derive(Debug, Clone, PartialEq)]
pub enum TextSink {
    /// Newline-terminated UTF-8 lines.
    Plain,
    /// One DOCX paragraph per line.
    Document,
    /// One cell per line in column A.
    Spreadsheet,
    /// Reflowed onto PDF pages.
    Pdf(PageLayout),
    /// Drawn onto a raster image.
    Image {
        /// Raster format to encode
        format: Format,
        /// Glyph size, wrapping and line cap
        options: TextImageOptions,
    },
}

impl TextSink {
    fn label(&self) -> &'static str {
        match self {
            Self::Plain => "text",
            Self::Document => "document",
            Self::Spreadsheet => "spreadsheet",
            Self::Pdf(_) => "pdf",
            Self::Image { .. } => "image",
        }
    }

    /// Write lines to `path`.
    pub fn write_lines(&self, lines: &[String], path: &Path) -> Result<()> {
        match self {
            Self::Plain => {
                let mut text = lines.join("\n");
                if !text.is_empty() {
                    text.push('\n');
                }
                std::fs::write(path, text)?;
            }
            Self::Document => {
                let mut writer = DocxWriter::new();
                for line in lines {
                    writer.add_paragraph(line);
                }
                writer.save(path)?;
            }
            Self::Spreadsheet => {
                let mut writer = XlsxWriter::new("Sheet1");
                for line in lines {
                    let cell = (!line.is_empty()).then(|| line.clone());
                    writer.add_row(Row::new(vec![cell]));
                }
                writer.save(path)?;
            }
            Self::Pdf(layout) => {
                let mut writer = PdfWriter::new(layout.clone());
                writer.write_paragraphs(lines);
                writer.save(path)?;
            }
            Self::Image { format, options } => {
                let canvas = raster::render_text(lines, options);
                raster::save_as(&DynamicImage::ImageLuma8(canvas), path, *format)?;
            }
        }
        Ok(())
    }
}

/// Reads lines from one text-bearing format and lays them out in another.
#[derive(Debug, Clone)]
pub struct TextConverter {
    name: String,
    source: TextSource,
    sink: TextSink,
}

impl TextConverter {
    /// Pair a source reader with a sink.
    pub fn new(source: TextSource, sink: TextSink) -> Self {
        Self {
            name: format!("{}-to-{}", source.label(), sink.label()),
            source,
            sink,
        }
    }
}

impl Converter for TextConverter {
    fn name(&self) -> &str {
        &self.name
    }

    fn convert(&self, src: &Path, dst: &Path) -> Result<()> {
        let lines = self.source.read_lines(src)?;
        tracing::debug!(converter = %self.name, lines = lines.len(), "read source text");
        self.sink.write_lines(&lines, dst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detect::detect_format_from_path;
    use crate::docx::read_document;

    fn lines(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_names() {
        let converter = TextConverter::new(TextSource::Plain, TextSink::Pdf(PageLayout::default()));
        assert_eq!(converter.name(), "text-to-pdf");
        let converter = TextConverter::new(TextSource::Spreadsheet, TextSink::Document);
        assert_eq!(converter.name(), "spreadsheet-to-document");
    }

    #[test]
    fn test_plain_source_is_lossy() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("in.txt");
        std::fs::write(&path, b"ok\r\nbad \xff byte\n").unwrap();

        let read = TextSource::Plain.read_lines(&path).unwrap();
        assert_eq!(read, vec!["ok", "bad \u{fffd} byte"]);
    }

    #[test]
    fn test_plain_sink_terminates_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.txt");
        TextSink::Plain.write_lines(&lines(&["a", "", "b"]), &path).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "a\n\nb\n");
    }

    #[test]
    fn test_document_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.docx");
        TextSink::Document
            .write_lines(&lines(&["first", "tab\there"]), &path)
            .unwrap();

        assert_eq!(detect_format_from_path(&path).unwrap(), Format::Docx);
        let doc = read_document(&path).unwrap();
        assert_eq!(doc.paragraphs, vec!["first", "tab\there"]);
    }

    #[test]
    fn test_spreadsheet_sink_keeps_blank_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.xlsx");
        TextSink::Spreadsheet
            .write_lines(&lines(&["top", "", "bottom"]), &path)
            .unwrap();

        assert_eq!(detect_format_from_path(&path).unwrap(), Format::Xlsx);
        let read = TextSource::Spreadsheet.read_lines(&path).unwrap();
        assert_eq!(read, vec!["top", "", "bottom"]);
    }

    #[test]
    fn test_image_sink() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.png");
        let sink = TextSink::Image {
            format: Format::Png,
            options: TextImageOptions::default(),
        };
        sink.write_lines(&lines(&["hello"]), &path).unwrap();
        assert_eq!(detect_format_from_path(&path).unwrap(), Format::Png);
    }
}
