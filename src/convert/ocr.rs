//! Image to text through the OCR engine.

use super::{scratch_dir, Converter};
use crate::config::ConverterConfig;
use crate::error::Result;
use crate::format::Format;
use crate::raster;
use crate::tools::OcrEngine;
use std::path::{Path, PathBuf};

/// Recognizes text in a raster image. Accuracy depends on the engine.
#[derive(Debug, Clone)]
pub struct ImageToText {
    ocr: OcrEngine,
    scratch: PathBuf,
}

impl ImageToText {
    /// Converter using the configured OCR engine and language.
    pub fn new(config: &ConverterConfig) -> Self {
        Self {
            ocr: OcrEngine::from_config(config),
            scratch: config.scratch_dir.clone(),
        }
    }
}

impl Converter for ImageToText {
    fn name(&self) -> &str {
        "image-to-text"
    }

    fn convert(&self, src: &Path, dst: &Path) -> Result<()> {
        // The engine is always handed a PNG, whatever the source encoding.
        let work = scratch_dir(&self.scratch, "ocr-")?;
        let normalized = work.path().join("page.png");
        raster::save_as(&raster::load(src)?, &normalized, Format::Png)?;

        let text = self.ocr.recognize(&normalized)?;
        let mut text = text.trim_end().to_string();
        if text.is_empty() {
            tracing::warn!(source = %src.display(), "no text recognized");
        } else {
            text.push('\n');
        }
        std::fs::write(dst, text)?;
        Ok(())
    }
}
