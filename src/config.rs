//! Converter configuration.
//!
//! Host tool paths and layout parameters are passed explicitly into every
//! capability when the registry is built; nothing reads process-wide state.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Page geometry and typography for page-description output.
///
/// Lengths are in millimetres, the font size in points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageLayout {
    /// Page width
    pub page_width_mm: f32,
    /// Page height
    pub page_height_mm: f32,
    /// Left and right margin
    pub side_margin_mm: f32,
    /// Top margin
    pub top_margin_mm: f32,
    /// Distance from the bottom edge that triggers a page break
    pub bottom_margin_mm: f32,
    /// Font size in points
    pub font_size_pt: f32,
    /// Distance between baselines
    pub line_height_mm: f32,
    /// Spaces a tab expands to
    pub tab_width: usize,
}

impl Default for PageLayout {
    fn default() -> Self {
        Self {
            page_width_mm: 210.0,
            page_height_mm: 297.0,
            side_margin_mm: 10.0,
            top_margin_mm: 10.0,
            bottom_margin_mm: 15.0,
            font_size_pt: 12.0,
            line_height_mm: 10.0,
            tab_width: 4,
        }
    }
}

/// How text is drawn onto raster images.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextImageOptions {
    /// Integer scale applied to the 8x8 glyphs
    pub glyph_scale: u32,
    /// Wrap column
    pub columns: usize,
    /// Lines beyond this are dropped
    pub max_lines: usize,
    /// Blank border around the text, in pixels
    pub padding_px: u32,
    /// Spaces a tab expands to
    pub tab_width: usize,
}

impl Default for TextImageOptions {
    fn default() -> Self {
        Self {
            glyph_scale: 2,
            columns: 100,
            max_lines: 400,
            padding_px: 20,
            tab_width: 4,
        }
    }
}

/// Configuration shared by all converters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConverterConfig {
    /// Directory for per-request scratch files.
    #[serde(default = "default_scratch_dir")]
    pub scratch_dir: PathBuf,

    /// Office suite binary used for presentation rendering.
    #[serde(default = "default_office_path")]
    pub office_path: PathBuf,

    /// PDF rasterizer binary (poppler's pdftoppm).
    #[serde(default = "default_rasterizer_path")]
    pub rasterizer_path: PathBuf,

    /// OCR engine binary.
    #[serde(default = "default_ocr_path")]
    pub ocr_path: PathBuf,

    /// Language passed to the OCR engine.
    #[serde(default = "default_ocr_language")]
    pub ocr_language: String,

    /// Resolution used when slides are rasterized and when PDF pages become
    /// slides.
    #[serde(default = "default_slide_dpi")]
    pub slide_dpi: u32,

    /// Resolution used when PDF pages are rasterized into documents.
    #[serde(default = "default_page_dpi")]
    pub page_dpi: u32,

    /// Page-description layout.
    #[serde(default)]
    pub page: PageLayout,

    /// Text rendering for raster targets.
    #[serde(default)]
    pub text_image: TextImageOptions,
}

fn default_scratch_dir() -> PathBuf {
    std::env::temp_dir().join("fileshift")
}

fn default_office_path() -> PathBuf {
    PathBuf::from("soffice")
}

fn default_rasterizer_path() -> PathBuf {
    PathBuf::from("pdftoppm")
}

fn default_ocr_path() -> PathBuf {
    PathBuf::from("tesseract")
}

fn default_ocr_language() -> String {
    "eng".to_string()
}

fn default_slide_dpi() -> u32 {
    150
}

fn default_page_dpi() -> u32 {
    200
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            scratch_dir: default_scratch_dir(),
            office_path: default_office_path(),
            rasterizer_path: default_rasterizer_path(),
            ocr_path: default_ocr_path(),
            ocr_language: default_ocr_language(),
            slide_dpi: default_slide_dpi(),
            page_dpi: default_page_dpi(),
            page: PageLayout::default(),
            text_image: TextImageOptions::default(),
        }
    }
}

impl ConverterConfig {
    /// Create a configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a configuration from a JSON file. Missing fields take defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let data = std::fs::read_to_string(path.as_ref())?;
        Ok(serde_json::from_str(&data)?)
    }

    /// Set the scratch directory.
    pub fn with_scratch_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.scratch_dir = dir.into();
        self
    }

    /// Set the office suite binary.
    pub fn with_office_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.office_path = path.into();
        self
    }

    /// Set the PDF rasterizer binary.
    pub fn with_rasterizer_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.rasterizer_path = path.into();
        self
    }

    /// Set the OCR binary.
    pub fn with_ocr_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.ocr_path = path.into();
        self
    }

    /// Set the OCR language.
    pub fn with_ocr_language(mut self, language: impl Into<String>) -> Self {
        self.ocr_language = language.into();
        self
    }

    /// Set the slide rasterization resolution (clamped to 36..=600).
    pub fn with_slide_dpi(mut self, dpi: u32) -> Self {
        self.slide_dpi = dpi.clamp(36, 600);
        self
    }

    /// Set the page layout.
    pub fn with_page_layout(mut self, page: PageLayout) -> Self {
        self.page = page;
        self
    }

    /// Set text image options.
    pub fn with_text_image(mut self, options: TextImageOptions) -> Self {
        self.text_image = options;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ConverterConfig::default();
        assert_eq!(config.office_path, PathBuf::from("soffice"));
        assert_eq!(config.ocr_language, "eng");
        assert_eq!(config.page.font_size_pt, 12.0);
        assert!(config.scratch_dir.ends_with("fileshift"));
    }

    #[test]
    fn test_builder_pattern() {
        let config = ConverterConfig::new()
            .with_office_path("/opt/office/soffice")
            .with_ocr_language("deu")
            .with_slide_dpi(10_000);

        assert_eq!(config.office_path, PathBuf::from("/opt/office/soffice"));
        assert_eq!(config.ocr_language, "deu");
        assert_eq!(config.slide_dpi, 600);
    }

    #[test]
    fn test_partial_json() {
        let config: ConverterConfig =
            serde_json::from_str(r#"{"ocr_path": "/usr/local/bin/tesseract", "page": {"font_size_pt": 10}}"#)
                .unwrap();
        assert_eq!(config.ocr_path, PathBuf::from("/usr/local/bin/tesseract"));
        assert_eq!(config.page.font_size_pt, 10.0);
        assert_eq!(config.page.line_height_mm, 10.0);
        assert_eq!(config.rasterizer_path, PathBuf::from("pdftoppm"));
    }

    #[test]
    fn test_from_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fileshift.json");
        std::fs::write(&path, r#"{"slide_dpi": 96}"#).unwrap();

        let config = ConverterConfig::from_json_file(&path).unwrap();
        assert_eq!(config.slide_dpi, 96);

        std::fs::write(&path, "not json").unwrap();
        assert!(ConverterConfig::from_json_file(&path).is_err());
    }
}
