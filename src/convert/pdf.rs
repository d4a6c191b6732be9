//! PDF to document and presentation through page images.

use super::{scratch_dir, Converter};
use crate::config::ConverterConfig;
use crate::docx::DocxWriter;
use crate::error::Result;
use crate::pptx::PptxWriter;
use crate::tools::Rasterizer;
use std::path::{Path, PathBuf};

/// Rasterizes every PDF page and embeds the images in a new document, one
/// full-width picture per page followed by an empty paragraph.
#[derive(Debug, Clone)]
pub struct PdfToDocx {
    rasterizer: Rasterizer,
    dpi: u32,
    scratch: PathBuf,
}

impl PdfToDocx {
    /// Converter using the configured rasterizer and page resolution.
    pub fn new(config: &ConverterConfig) -> Self {
        Self {
            rasterizer: Rasterizer::from_config(config),
            dpi: config.page_dpi,
            scratch: config.scratch_dir.clone(),
        }
    }
}

impl Converter for PdfToDocx {
    fn name(&self) -> &str {
        "pdf-to-document"
    }

    fn convert(&self, src: &Path, dst: &Path) -> Result<()> {
        let work = scratch_dir(&self.scratch, "pages-")?;
        let pages = self.rasterizer.render_pages(src, self.dpi, work.path())?;
        tracing::debug!(pages = pages.len(), dpi = self.dpi, "rasterized pdf");

        let mut writer = DocxWriter::new();
        for page in &pages {
            let (width, height) = image::image_dimensions(page)?;
            writer.add_picture(std::fs::read(page)?, width, height);
            writer.add_paragraph("");
        }
        writer.save(dst)
    }
}

/// Rasterizes every PDF page onto its own blank slide, the image stretched
/// to fill the slide.
#[derive(Debug, Clone)]
pub struct PdfToPptx {
    rasterizer: Rasterizer,
    dpi: u32,
    scratch: PathBuf,
}

impl PdfToPptx {
    /// Converter using the configured rasterizer and slide resolution.
    pub fn new(config: &ConverterConfig) -> Self {
        Self {
            rasterizer: Rasterizer::from_config(config),
            dpi: config.slide_dpi,
            scratch: config.scratch_dir.clone(),
        }
    }
}

impl Converter for PdfToPptx {
    fn name(&self) -> &str {
        "pdf-to-presentation"
    }

    fn convert(&self, src: &Path, dst: &Path) -> Result<()> {
        let work = scratch_dir(&self.scratch, "slides-")?;
        let pages = self.rasterizer.render_pages(src, self.dpi, work.path())?;
        tracing::debug!(pages = pages.len(), dpi = self.dpi, "rasterized pdf");

        let mut writer = PptxWriter::new();
        for page in &pages {
            writer.add_picture_slide(std::fs::read(page)?);
        }
        writer.save(dst)
    }
}
