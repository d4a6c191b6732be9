//! Error types for the fileshift library.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for fileshift operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while converting files.
#[derive(Error, Debug)]
pub enum Error {
    /// No converter is registered for the requested extension pair.
    #[error("Unsupported conversion from .{from} to .{to}")]
    UnsupportedConversion {
        /// Source extension (lowercased, no dot)
        from: String,
        /// Destination extension (lowercased, no dot)
        to: String,
    },

    /// Source and destination share the same format.
    #[error("Source and destination are both .{extension}")]
    IdenticalFormat {
        /// The shared extension
        extension: String,
    },

    /// The source file does not exist.
    #[error("Input file not found: {}", path.display())]
    MissingInput {
        /// Path that was looked up
        path: PathBuf,
    },

    /// The converter itself failed.
    #[error("{converter} failed: {message}")]
    ConverterExecution {
        /// Name of the converter that ran
        converter: String,
        /// Underlying error message
        message: String,
    },

    /// The converter returned without producing the destination file.
    #[error("Converter produced no output at {}", path.display())]
    OutputNotCreated {
        /// Expected destination path
        path: PathBuf,
    },

    /// The converter produced an empty file or an archive with no entries.
    #[error("Converter produced empty output at {}", path.display())]
    EmptyOutput {
        /// Destination path (already removed)
        path: PathBuf,
    },

    /// An optional host tool needed by the converter is not present.
    #[error("{capability} is unavailable on this host: {reason}")]
    CapabilityUnavailable {
        /// Human-readable capability name (e.g. "office suite")
        capability: String,
        /// Why the capability could not be used
        reason: String,
    },

    /// A host tool ran but reported failure.
    #[error("{tool} exited with {status}: {stderr}")]
    ToolFailed {
        /// Program that was run
        tool: String,
        /// Exit status description
        status: String,
        /// Captured standard error, trimmed
        stderr: String,
    },

    /// An uploaded file has an extension no converter accepts.
    #[error("Unsupported source file: {0}")]
    UnsupportedSource(String),

    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Error reading or writing a ZIP archive.
    #[error("ZIP archive error: {0}")]
    ZipArchive(String),

    /// Error parsing XML content.
    #[error("XML parse error: {0}")]
    XmlParse(String),

    /// Error decoding or encoding a raster image.
    #[error("Image error: {0}")]
    Image(String),

    /// Error building a PDF document.
    #[error("PDF error: {0}")]
    Pdf(String),

    /// Invalid or malformed data in the input.
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// A required package component is missing.
    #[error("Missing component: {0}")]
    MissingComponent(String),

    /// Invalid configuration.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Creates a capability-unavailable error.
    pub fn unavailable(capability: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::CapabilityUnavailable {
            capability: capability.into(),
            reason: reason.into(),
        }
    }

    /// Whether this error points at the host setup rather than the input file.
    pub fn is_host_problem(&self) -> bool {
        matches!(self, Self::CapabilityUnavailable { .. } | Self::Config(_))
    }
}

impl From<zip::result::ZipError> for Error {
    fn from(err: zip::result::ZipError) -> Self {
        Error::ZipArchive(err.to_string())
    }
}

impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        Error::XmlParse(err.to_string())
    }
}

impl From<image::ImageError> for Error {
    fn from(err: image::ImageError) -> Self {
        Error::Image(err.to_string())
    }
}

impl From<lopdf::Error> for Error {
    fn from(err: lopdf::Error) -> Self {
        Error::Pdf(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::UnsupportedConversion {
            from: "txt".to_string(),
            to: "pptx".to_string(),
        };
        assert_eq!(err.to_string(), "Unsupported conversion from .txt to .pptx");

        let err = Error::IdenticalFormat {
            extension: "pdf".to_string(),
        };
        assert_eq!(err.to_string(), "Source and destination are both .pdf");
    }

    #[test]
    fn test_error_from_io() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_host_problem() {
        assert!(Error::unavailable("office suite", "soffice not found").is_host_problem());
        assert!(!Error::InvalidData("bad".into()).is_host_problem());
    }
}
