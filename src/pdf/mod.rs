//! PDF output.
//!
//! Text is set in the standard Helvetica font so no font program has to be
//! embedded; characters outside WinAnsi are replaced.

mod metrics;
mod writer;

pub use metrics::{encode_win_ansi, text_width};
pub use writer::PdfWriter;
