//! DOCX (Word) documents.
//!
//! Reading reduces a document to its paragraphs; writing produces a minimal
//! package with one paragraph per input line, or one picture per page.
//!
//! # Example
//!
//! ```no_run
//! use fileshift::docx::{read_document, DocxWriter};
//!
//! let doc = read_document("letter.docx")?;
//!
//! let mut writer = DocxWriter::new();
//! for para in &doc.paragraphs {
//!     writer.add_paragraph(para);
//! }
//! writer.save("copy.docx")?;
//! # Ok::<(), fileshift::Error>(())
//! ```

mod reader;
mod writer;

pub use reader::{read_document, read_paragraphs_from_xml};
pub use writer::DocxWriter;

/// Content type of the main document part.
pub const MAIN_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml";

/// Path of the main document part.
pub const MAIN_PART: &str = "word/document.xml";
