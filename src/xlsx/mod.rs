//! XLSX (Excel) workbooks.
//!
//! # Example
//!
//! ```no_run
//! use fileshift::xlsx::XlsxReader;
//!
//! let workbook = XlsxReader::open("data.xlsx")?.read()?;
//! if let Some(sheet) = workbook.active_sheet() {
//!     for line in sheet.to_lines() {
//!         println!("{}", line);
//!     }
//! }
//! # Ok::<(), fileshift::Error>(())
//! ```

mod reader;
mod shared_strings;
mod writer;

pub use reader::{column_index, XlsxReader};
pub use writer::XlsxWriter;

/// Content type of the workbook part.
pub const WORKBOOK_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml";

/// Content type of a worksheet part.
pub const WORKSHEET_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml";

/// Path of the workbook part.
pub const WORKBOOK_PART: &str = "xl/workbook.xml";
