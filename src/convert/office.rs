//! Presentation converters backed by the office suite.

use super::{scratch_dir, Converter};
use crate::config::ConverterConfig;
use crate::error::Result;
use crate::pptx::PresentationInfo;
use crate::tools::{OfficeSuite, Rasterizer};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Renders a presentation to PDF with the office suite.
#[derive(Debug, Clone)]
pub struct PresentationToPdf {
    office: OfficeSuite,
    scratch: PathBuf,
}

impl PresentationToPdf {
    /// Converter using the configured office suite.
    pub fn new(config: &ConverterConfig) -> Self {
        Self {
            office: OfficeSuite::from_config(config),
            scratch: config.scratch_dir.clone(),
        }
    }
}

impl Converter for PresentationToPdf {
    fn name(&self) -> &str {
        "presentation-to-pdf"
    }

    fn convert(&self, src: &Path, dst: &Path) -> Result<()> {
        let work = scratch_dir(&self.scratch, "office-")?;
        let pdf = self.office.to_pdf(src, work.path())?;
        std::fs::copy(&pdf, dst)?;
        Ok(())
    }
}

/// Renders each slide to PNG and packs the images into a zip archive.
///
/// Entries are named `slide_001.png`, `slide_002.png`, ... in show order.
#[derive(Debug, Clone)]
pub struct PresentationToArchive {
    office: OfficeSuite,
    rasterizer: Rasterizer,
    dpi: u32,
    scratch: PathBuf,
}

impl PresentationToArchive {
    /// Converter using the configured office suite and rasterizer.
    pub fn new(config: &ConverterConfig) -> Self {
        Self {
            office: OfficeSuite::from_config(config),
            rasterizer: Rasterizer::from_config(config),
            dpi: config.slide_dpi,
            scratch: config.scratch_dir.clone(),
        }
    }
}

impl Converter for PresentationToArchive {
    fn name(&self) -> &str {
        "presentation-to-zip"
    }

    fn convert(&self, src: &Path, dst: &Path) -> Result<()> {
        let work = scratch_dir(&self.scratch, "slides-")?;
        let pdf = self.office.to_pdf(src, work.path())?;

        let pages_dir = work.path().join("pages");
        std::fs::create_dir_all(&pages_dir)?;
        let pages = self.rasterizer.render_pages(&pdf, self.dpi, &pages_dir)?;

        match PresentationInfo::open(src) {
            Ok(info) if info.slide_count() != pages.len() => tracing::warn!(
                slides = info.slide_count(),
                rendered = pages.len(),
                "slide count differs from rendered pages"
            ),
            Ok(_) => {}
            Err(e) => tracing::debug!("could not read slide list: {}", e),
        }

        write_archive(&pages, dst)
    }
}

/// Zip page images as `slide_NNN.png`. PNG data is stored uncompressed.
fn write_archive(pages: &[PathBuf], dst: &Path) -> Result<()> {
    let mut zip = ZipWriter::new(File::create(dst)?);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);

    for (i, page) in pages.iter().enumerate() {
        zip.start_file(format!("slide_{:03}.png", i + 1), options)?;
        zip.write_all(&std::fs::read(page)?)?;
    }
    zip.finish()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    fn missing_tools(scratch: &Path) -> ConverterConfig {
        ConverterConfig::new()
            .with_scratch_dir(scratch)
            .with_office_path("/nonexistent/soffice")
            .with_rasterizer_path("/nonexistent/pdftoppm")
    }

    #[test]
    fn test_archive_entry_names() {
        let dir = tempfile::tempdir().unwrap();
        let pages: Vec<PathBuf> = (1..=2)
            .map(|i| {
                let path = dir.path().join(format!("page-{i}.png"));
                std::fs::write(&path, [i as u8]).unwrap();
                path
            })
            .collect();
        let dst = dir.path().join("slides.zip");
        write_archive(&pages, &dst).unwrap();

        let archive = zip::ZipArchive::new(File::open(&dst).unwrap()).unwrap();
        let names: Vec<_> = archive.file_names().collect();
        assert!(names.contains(&"slide_001.png"));
        assert!(names.contains(&"slide_002.png"));
        assert_eq!(archive.len(), 2);
    }

    #[test]
    fn test_missing_office_suite() {
        let dir = tempfile::tempdir().unwrap();
        let config = missing_tools(dir.path());
        let src = dir.path().join("deck.pptx");
        std::fs::write(&src, b"PK").unwrap();

        for converter in [
            Box::new(PresentationToPdf::new(&config)) as Box<dyn Converter>,
            Box::new(PresentationToArchive::new(&config)),
        ] {
            let dst = dir.path().join("out");
            let err = converter.convert(&src, &dst).unwrap_err();
            assert!(matches!(err, Error::CapabilityUnavailable { .. }), "{err}");
            assert!(!dst.exists());
        }
    }
}
