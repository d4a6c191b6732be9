//! Host tools: office suite, PDF rasterizer and OCR engine.
//!
//! Tools are looked up when a conversion runs, not when the registry is
//! built. A program that cannot be spawned maps to
//! [`Error::CapabilityUnavailable`]; one that exits non-zero maps to
//! [`Error::ToolFailed`] with its stderr.

use crate::config::ConverterConfig;
use crate::error::{Error, Result};
use std::ffi::OsStr;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

/// An external program reached through the command line.
#[derive(Debug, Clone)]
pub struct ExternalTool {
    capability: &'static str,
    program: PathBuf,
}

impl ExternalTool {
    /// Describe a tool by the capability it provides and its program path.
    pub fn new(capability: &'static str, program: impl Into<PathBuf>) -> Self {
        Self {
            capability,
            program: program.into(),
        }
    }

    /// Capability name used in error messages.
    pub fn capability(&self) -> &'static str {
        self.capability
    }

    /// Configured program path.
    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Run the tool to completion and capture its output.
    pub fn run<I, S>(&self, args: I) -> Result<Output>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let args: Vec<_> = args.into_iter().map(|a| a.as_ref().to_os_string()).collect();
        tracing::debug!(program = %self.program.display(), ?args, "running host tool");

        let output = Command::new(&self.program)
            .args(&args)
            .output()
            .map_err(|e| {
                let reason = if e.kind() == ErrorKind::NotFound {
                    format!("{} not found", self.program.display())
                } else {
                    format!("cannot run {}: {}", self.program.display(), e)
                };
                Error::unavailable(self.capability, reason)
            })?;

        if !output.status.success() {
            return Err(Error::ToolFailed {
                tool: self.program.display().to_string(),
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(output)
    }
}

/// Headless office suite used to render presentations.
#[derive(Debug, Clone)]
pub struct OfficeSuite {
    tool: ExternalTool,
}

impl OfficeSuite {
    /// Office suite at the configured path.
    pub fn from_config(config: &ConverterConfig) -> Self {
        Self {
            tool: ExternalTool::new("office suite", &config.office_path),
        }
    }

    /// Render `src` to PDF inside `out_dir` and return the produced file.
    ///
    /// A private user profile under `out_dir` keeps concurrent instances
    /// from contending for the default profile lock.
    pub fn to_pdf(&self, src: &Path, out_dir: &Path) -> Result<PathBuf> {
        let profile = out_dir.join("profile");
        let mut profile_arg = std::ffi::OsString::from("-env:UserInstallation=file://");
        profile_arg.push(profile.as_os_str());

        self.tool.run([
            profile_arg.as_os_str(),
            OsStr::new("--headless"),
            OsStr::new("--convert-to"),
            OsStr::new("pdf"),
            OsStr::new("--outdir"),
            out_dir.as_os_str(),
            src.as_os_str(),
        ])?;

        let stem = src
            .file_stem()
            .ok_or_else(|| Error::InvalidData(format!("{} has no file name", src.display())))?;
        let produced = out_dir.join(format!("{}.pdf", stem.to_string_lossy()));
        if !produced.is_file() {
            return Err(Error::MissingComponent(format!(
                "{} did not produce {}",
                self.tool.program().display(),
                produced.display()
            )));
        }
        Ok(produced)
    }
}

/// PDF page rasterizer (poppler's `pdftoppm` command line).
#[derive(Debug, Clone)]
pub struct Rasterizer {
    tool: ExternalTool,
}

impl Rasterizer {
    /// Rasterizer at the configured path.
    pub fn from_config(config: &ConverterConfig) -> Self {
        Self {
            tool: ExternalTool::new("PDF rasterizer", &config.rasterizer_path),
        }
    }

    /// Render every page of `pdf` to PNG in `out_dir`, returned in page order.
    pub fn render_pages(&self, pdf: &Path, dpi: u32, out_dir: &Path) -> Result<Vec<PathBuf>> {
        let prefix = out_dir.join("page");
        let dpi = dpi.to_string();
        self.tool.run([
            OsStr::new("-png"),
            OsStr::new("-r"),
            OsStr::new(&dpi),
            pdf.as_os_str(),
            prefix.as_os_str(),
        ])?;
        collect_pages(out_dir)
    }
}

/// Page images written by the rasterizer, sorted by name.
///
/// Page numbers are zero-padded to a common width, so name order is page order.
fn collect_pages(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut pages = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        let is_page = path
            .file_name()
            .and_then(OsStr::to_str)
            .is_some_and(|name| name.starts_with("page") && name.ends_with(".png"));
        if is_page {
            pages.push(path);
        }
    }
    pages.sort();
    Ok(pages)
}

/// Optical character recognition engine (`tesseract` command line).
#[derive(Debug, Clone)]
pub struct OcrEngine {
    tool: ExternalTool,
    language: String,
}

impl OcrEngine {
    /// OCR engine at the configured path and language.
    pub fn from_config(config: &ConverterConfig) -> Self {
        Self {
            tool: ExternalTool::new("OCR engine", &config.ocr_path),
            language: config.ocr_language.clone(),
        }
    }

    /// Recognize the text in an image.
    pub fn recognize(&self, image: &Path) -> Result<String> {
        let output = self.tool.run([
            image.as_os_str(),
            OsStr::new("stdout"),
            OsStr::new("-l"),
            OsStr::new(&self.language),
        ])?;
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_program_is_unavailable() {
        let tool = ExternalTool::new("office suite", "/nonexistent/fileshift-office");
        let err = tool.run(["--version"]).unwrap_err();
        match err {
            Error::CapabilityUnavailable { capability, reason } => {
                assert_eq!(capability, "office suite");
                assert!(reason.contains("not found"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_collect_pages_sorted() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["page-10.png", "page-02.png", "page-01.png", "profile.png", "page-03.ppm"] {
            std::fs::write(dir.path().join(name), b"x").unwrap();
        }
        let pages = collect_pages(dir.path()).unwrap();
        let names: Vec<_> = pages
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["page-01.png", "page-02.png", "page-10.png"]);
    }

    #[test]
    fn test_tools_from_config() {
        let config = ConverterConfig::new()
            .with_ocr_path("/opt/ocr")
            .with_ocr_language("fra");
        let ocr = OcrEngine::from_config(&config);
        assert_eq!(ocr.tool.program(), Path::new("/opt/ocr"));
        assert_eq!(ocr.language, "fra");
        assert_eq!(OfficeSuite::from_config(&config).tool.capability(), "office suite");
    }

    #[cfg(unix)]
    #[test]
    fn test_failing_program_reports_stderr() {
        let tool = ExternalTool::new("shell", "sh");
        let err = tool.run(["-c", "echo broken >&2; exit 3"]).unwrap_err();
        match err {
            Error::ToolFailed { stderr, .. } => assert_eq!(stderr, "broken"),
            other => panic!("unexpected error: {other}"),
        }
    }
}
