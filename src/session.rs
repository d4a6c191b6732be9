//! Upload, convert and download flow.
//!
//! A [`Workspace`] owns the dispatcher and the scratch directory. Each
//! upload becomes a [`Session`] with its own `input_{uuid}.{ext}` file;
//! converted files are written next to it as `output_{uuid}.{ext}`. Both
//! are deleted when the session is dropped.
//!
//! # Example
//!
//! ```no_run
//! use fileshift::{ConverterConfig, Workspace};
//!
//! let workspace = Workspace::new(&ConverterConfig::default());
//! let mut session = workspace.upload("notes.txt", b"one\ntwo\n")?;
//! let download = session.convert("pdf")?;
//! assert_eq!(download.file_name, "notes_converted.pdf");
//! std::fs::write(&download.file_name, download.read_bytes()?)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use crate::config::ConverterConfig;
use crate::dispatch::{ConversionOutcome, ConversionRequest, Dispatcher};
use crate::error::{Error, Result};
use crate::format::{extension_of, mime_for_extension, normalize_extension, Format};
use crate::registry::Registry;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Dispatcher plus the directory sessions write into.
#[derive(Debug)]
pub struct Workspace {
    dispatcher: Dispatcher,
    scratch_dir: PathBuf,
}

impl Workspace {
    /// Workspace with the default registry.
    pub fn new(config: &ConverterConfig) -> Self {
        Self::with_dispatcher(
            Dispatcher::new(Registry::with_defaults(config)),
            config.scratch_dir.clone(),
        )
    }

    /// Workspace over a custom dispatcher.
    pub fn with_dispatcher(dispatcher: Dispatcher, scratch_dir: impl Into<PathBuf>) -> Self {
        Self {
            dispatcher,
            scratch_dir: scratch_dir.into(),
        }
    }

    /// The dispatcher conversions run through.
    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Directory holding session files.
    pub fn scratch_dir(&self) -> &Path {
        &self.scratch_dir
    }

    /// Store an uploaded file and open a session for it.
    ///
    /// Only the extension of `filename` is checked: it must name a format
    /// with at least one registered target.
    pub fn upload(&self, filename: &str, bytes: &[u8]) -> Result<Session<'_>> {
        let extension = extension_of(filename);
        let format = Format::from_extension(&extension)
            .filter(|f| self.dispatcher.registry().accepts_source(*f))
            .ok_or_else(|| Error::UnsupportedSource(filename.to_string()))?;

        std::fs::create_dir_all(&self.scratch_dir)?;
        let id = Uuid::new_v4();
        let input = self.scratch_dir.join(format!("input_{}.{}", id, extension));
        std::fs::write(&input, bytes)?;
        tracing::debug!(session = %id, file = filename, bytes = bytes.len(), "upload stored");

        Ok(Session {
            workspace: self,
            id,
            original_stem: original_stem(filename),
            source_format: format,
            input,
            outputs: Vec::new(),
        })
    }
}

/// Stem used for download names; falls back to "file".
fn original_stem(filename: &str) -> String {
    Path::new(filename)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "file".to_string())
}

/// A converted file ready to be handed back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Download {
    /// Where the converted file is stored
    pub path: PathBuf,
    /// Suggested name: `{original_stem}_converted.{ext}`
    pub file_name: String,
    /// MIME type for the extension
    pub mime_type: &'static str,
}

impl Download {
    /// Read the converted file.
    pub fn read_bytes(&self) -> Result<Vec<u8>> {
        Ok(std::fs::read(&self.path)?)
    }
}

/// One uploaded file and everything converted from it.
#[derive(Debug)]
pub struct Session<'a> {
    workspace: &'a Workspace,
    id: Uuid,
    original_stem: String,
    source_format: Format,
    input: PathBuf,
    outputs: Vec<PathBuf>,
}

impl Session<'_> {
    /// Session identifier, also used in file names.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Format of the uploaded file.
    pub fn source_format(&self) -> Format {
        self.source_format
    }

    /// Path of the stored upload.
    pub fn input_path(&self) -> &Path {
        &self.input
    }

    /// Formats the upload can be converted to.
    pub fn targets(&self) -> Vec<Format> {
        self.workspace
            .dispatcher
            .registry()
            .targets_for(self.source_format)
    }

    /// Convert the upload to the format named by `target_extension`.
    pub fn convert(&mut self, target_extension: &str) -> Result<Download> {
        self.convert_with_outcome(target_extension)
            .map(|(download, _)| download)
    }

    /// Like [`Session::convert`], also returning the dispatcher's report.
    pub fn convert_with_outcome(
        &mut self,
        target_extension: &str,
    ) -> Result<(Download, ConversionOutcome)> {
        let extension = normalize_extension(target_extension);
        let output = self
            .workspace
            .scratch_dir
            .join(format!("output_{}.{}", self.id, extension));

        let request = ConversionRequest::new(&self.input, &output);
        let outcome = self.workspace.dispatcher.convert(&request)?;
        if !self.outputs.contains(&output) {
            self.outputs.push(output.clone());
        }

        let download = Download {
            file_name: format!("{}_converted.{}", self.original_stem, extension),
            mime_type: mime_for_extension(&extension),
            path: output,
        };
        Ok((download, outcome))
    }
}

impl Drop for Session<'_> {
    fn drop(&mut self) {
        for path in std::iter::once(&self.input).chain(self.outputs.iter()) {
            if let Err(e) = std::fs::remove_file(path) {
                if e.kind() != std::io::ErrorKind::NotFound {
                    tracing::warn!(path = %path.display(), "failed to remove session file: {}", e);
                }
            }
        }
    }
}
