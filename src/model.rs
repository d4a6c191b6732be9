//! Intermediate content shared between readers and writers.
//!
//! Conversions are lossy by nature: everything is reduced to paragraphs of
//! plain text or to rows of optional cell values.

use serde::{Deserialize, Serialize};

/// A flow of plain-text paragraphs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextDocument {
    /// Paragraphs in reading order
    pub paragraphs: Vec<String>,
}

impl TextDocument {
    /// Create a document from paragraphs.
    pub fn new(paragraphs: Vec<String>) -> Self {
        Self { paragraphs }
    }

    /// Split text into one paragraph per line.
    ///
    /// A trailing newline does not produce an extra empty paragraph.
    pub fn from_text(text: &str) -> Self {
        let text = text.strip_prefix('\u{feff}').unwrap_or(text);
        Self {
            paragraphs: text.lines().map(String::from).collect(),
        }
    }

    /// Join paragraphs with newlines.
    pub fn to_text(&self) -> String {
        self.paragraphs.join("\n")
    }

    /// Check if there are no paragraphs.
    pub fn is_empty(&self) -> bool {
        self.paragraphs.is_empty()
    }
}

/// One spreadsheet row. `None` marks a null cell.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Row {
    /// Cells by column, starting at column A
    pub cells: Vec<Option<String>>,
}

impl Row {
    /// Create a row from cells.
    pub fn new(cells: Vec<Option<String>>) -> Self {
        Self { cells }
    }

    /// Set the cell at a zero-based column, growing the row as needed.
    pub fn set(&mut self, column: usize, value: String) {
        if self.cells.len() <= column {
            self.cells.resize(column + 1, None);
        }
        self.cells[column] = Some(value);
    }

    /// Tab-joined values with null cells skipped.
    pub fn to_tab_line(&self) -> String {
        self.cells
            .iter()
            .flatten()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join("\t")
    }
}

/// A named worksheet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sheet {
    /// Sheet name as shown on its tab
    pub name: String,
    /// Rows in order, starting at row 1
    pub rows: Vec<Row>,
}

impl Sheet {
    /// Create an empty sheet.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rows: Vec::new(),
        }
    }

    /// Serialize the sheet row-major, one tab-joined line per row.
    pub fn to_lines(&self) -> Vec<String> {
        self.rows.iter().map(Row::to_tab_line).collect()
    }
}

/// A workbook with the sheet that was active when it was saved.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Workbook {
    /// Sheets in tab order
    pub sheets: Vec<Sheet>,
    /// Index of the active sheet
    pub active: usize,
}

impl Workbook {
    /// The active sheet, falling back to the first one.
    pub fn active_sheet(&self) -> Option<&Sheet> {
        self.sheets.get(self.active).or_else(|| self.sheets.first())
    }
}
