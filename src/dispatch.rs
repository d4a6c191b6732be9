//! Conversion dispatcher.
//!
//! Resolves a converter for the extensions of a source and destination
//! path, runs it and checks what it produced. Anything the converter left
//! behind is removed when the conversion fails.

use crate::error::{Error, Result};
use crate::format::{extension_of, Format};
use crate::registry::Registry;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// A single conversion: read `source`, write `destination`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionRequest {
    /// File to convert
    pub source: PathBuf,
    /// Where the converted file is written
    pub destination: PathBuf,
}

impl ConversionRequest {
    /// Create a request.
    pub fn new(source: impl Into<PathBuf>, destination: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            destination: destination.into(),
        }
    }

    /// Lowercased source extension without the dot.
    pub fn source_extension(&self) -> String {
        extension_of(&self.source)
    }

    /// Lowercased destination extension without the dot.
    pub fn destination_extension(&self) -> String {
        extension_of(&self.destination)
    }
}

/// What a successful conversion produced.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionOutcome {
    /// Name of the converter that ran
    pub converter: String,
    /// Format of the source
    pub source_format: Format,
    /// Format of the destination
    pub destination_format: Format,
    /// Size of the destination file
    pub bytes_written: u64,
    /// Entry count, for archive destinations
    pub archive_entries: Option<usize>,
    /// Time spent in the converter and validation
    pub elapsed: Duration,
}

/// Runs conversions against a registry.
#[derive(Debug)]
pub struct Dispatcher {
    registry: Registry,
}

impl Dispatcher {
    /// Create a dispatcher over `registry`.
    pub fn new(registry: Registry) -> Self {
        Self { registry }
    }

    /// The registry conversions are resolved against.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Convert `request.source` into `request.destination`.
    ///
    /// A missing source or an identical format pair leaves the destination
    /// untouched. An unsupported pair, or any failure once the converter
    /// has run, removes whatever sits at the destination, file or directory.
    pub fn convert(&self, request: &ConversionRequest) -> Result<ConversionOutcome> {
        if !request.source.exists() {
            return Err(Error::MissingInput {
                path: request.source.clone(),
            });
        }

        let from_ext = request.source_extension();
        let to_ext = request.destination_extension();
        if from_ext == to_ext {
            return Err(Error::IdenticalFormat { extension: from_ext });
        }

        let formats = Format::from_extension(&from_ext).zip(Format::from_extension(&to_ext));
        if let Some((from, to)) = formats {
            if from == to {
                return Err(Error::IdenticalFormat {
                    extension: to.extension().to_string(),
                });
            }
        }

        let resolved = formats.and_then(|(from, to)| {
            self.registry
                .get(from, to)
                .map(|converter| (from, to, converter))
        });
        let Some((from, to, converter)) = resolved else {
            // stale output from an earlier run
            remove_artifact(&request.destination);
            return Err(Error::UnsupportedConversion {
                from: from_ext,
                to: to_ext,
            });
        };

        let started = Instant::now();
        let destination = request.destination.as_path();
        let result = converter
            .convert(&request.source, destination)
            .map_err(|e| match e {
                e @ Error::CapabilityUnavailable { .. } => e,
                e => Error::ConverterExecution {
                    converter: converter.name().to_string(),
                    message: e.to_string(),
                },
            })
            .and_then(|()| validate_output(destination, to));

        match result {
            Ok((bytes_written, archive_entries)) => {
                let outcome = ConversionOutcome {
                    converter: converter.name().to_string(),
                    source_format: from,
                    destination_format: to,
                    bytes_written,
                    archive_entries,
                    elapsed: started.elapsed(),
                };
                tracing::info!(
                    converter = %outcome.converter,
                    from = from.extension(),
                    to = to.extension(),
                    bytes = outcome.bytes_written,
                    elapsed_ms = outcome.elapsed.as_millis() as u64,
                    "conversion finished"
                );
                Ok(outcome)
            }
            Err(err) => {
                tracing::warn!(
                    converter = converter.name(),
                    destination = %destination.display(),
                    "conversion failed: {}",
                    err
                );
                remove_artifact(destination);
                Err(err)
            }
        }
    }
}

/// Check the destination exists, is a non-empty file and, for archives,
/// holds at least one entry. Returns the size and the entry count.
fn validate_output(path: &Path, format: Format) -> Result<(u64, Option<usize>)> {
    let metadata = match std::fs::metadata(path) {
        Ok(metadata) => metadata,
        Err(_) => {
            return Err(Error::OutputNotCreated {
                path: path.to_path_buf(),
            })
        }
    };
    let empty = || Error::EmptyOutput {
        path: path.to_path_buf(),
    };

    if !metadata.is_file() || metadata.len() == 0 {
        return Err(empty());
    }

    let entries = if format.is_archive() {
        let count = zip::ZipArchive::new(File::open(path)?)
            .map(|archive| archive.len())
            .unwrap_or(0);
        if count == 0 {
            return Err(empty());
        }
        Some(count)
    } else {
        None
    };

    Ok((metadata.len(), entries))
}

/// Remove whatever sits at `path`. Failures are logged, not returned.
fn remove_artifact(path: &Path) {
    let Ok(metadata) = std::fs::symlink_metadata(path) else {
        return;
    };
    let removed = if metadata.is_dir() {
        std::fs::remove_dir_all(path)
    } else {
        std::fs::remove_file(path)
    };
    if let Err(e) = removed {
        tracing::warn!(path = %path.display(), "failed to remove partial output: {}", e);
    }
}
