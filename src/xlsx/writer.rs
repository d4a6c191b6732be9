//! Minimal XLSX writer producing a single worksheet of inline strings.

use crate::error::Result;
use crate::model::Row;
use crate::package::{escape, PackageWriter, RelationshipList, REL_WORKSHEET, XML_DECLARATION};
use std::path::Path;

use super::{WORKBOOK_CONTENT_TYPE, WORKBOOK_PART, WORKSHEET_CONTENT_TYPE};

const SHEET_PART: &str = "xl/worksheets/sheet1.xml";

/// Builds a one-sheet workbook.
#[derive(Debug)]
pub struct XlsxWriter {
    sheet_name: String,
    rows: Vec<Row>,
}

impl XlsxWriter {
    /// Create a workbook whose only sheet has the given name.
    pub fn new(sheet_name: impl Into<String>) -> Self {
        Self {
            sheet_name: sheet_name.into(),
            rows: Vec::new(),
        }
    }

    /// Append a row. `None` cells are left out of the sheet.
    pub fn add_row(&mut self, row: Row) {
        self.rows.push(row);
    }

    /// Write the package to `path`.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut package = PackageWriter::create(path)?;

        let mut sheet_data = String::new();
        for (r, row) in self.rows.iter().enumerate() {
            let row_number = r + 1;
            if row.cells.iter().all(Option::is_none) {
                continue;
            }
            sheet_data.push_str(&format!(r#"<row r="{}">"#, row_number));
            for (c, cell) in row.cells.iter().enumerate() {
                if let Some(value) = cell {
                    sheet_data.push_str(&format!(
                        r#"<c r="{}{}" t="inlineStr"><is><t xml:space="preserve">{}</t></is></c>"#,
                        column_name(c),
                        row_number,
                        escape(value)
                    ));
                }
            }
            sheet_data.push_str("</row>");
        }

        let worksheet = format!(
            r#"{}<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData>{}</sheetData></worksheet>"#,
            XML_DECLARATION, sheet_data
        );
        package.add_part(SHEET_PART, WORKSHEET_CONTENT_TYPE, &worksheet)?;

        let mut rels = RelationshipList::default();
        let rel_id = rels.push(REL_WORKSHEET, "worksheets/sheet1.xml");
        package.add_raw("xl/_rels/workbook.xml.rels", rels.to_xml().as_bytes())?;

        let workbook = format!(
            concat!(
                "{}",
                r#"<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main""#,
                r#" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">"#,
                r#"<sheets><sheet name="{}" sheetId="1" r:id="{}"/></sheets></workbook>"#
            ),
            XML_DECLARATION,
            escape(&sheet_title(&self.sheet_name)),
            rel_id
        );
        package.add_part(WORKBOOK_PART, WORKBOOK_CONTENT_TYPE, &workbook)?;

        package.finish(WORKBOOK_PART)
    }
}

/// Spreadsheet column letters for a zero-based index (0 → A, 26 → AA).
pub(crate) fn column_name(mut index: usize) -> String {
    let mut name = Vec::new();
    loop {
        name.push(b'A' + (index % 26) as u8);
        if index < 26 {
            break;
        }
        index = index / 26 - 1;
    }
    name.reverse();
    String::from_utf8_lossy(&name).into_owned()
}

/// Sheet titles are limited to 31 characters and may not contain `[]:*?/\`.
fn sheet_title(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .filter(|c| !matches!(c, '[' | ']' | ':' | '*' | '?' | '/' | '\\'))
        .take(31)
        .collect();
    if cleaned.trim().is_empty() {
        "Sheet1".to_string()
    } else {
        cleaned
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xlsx::column_index;

    #[test]
    fn test_column_name() {
        assert_eq!(column_name(0), "A");
        assert_eq!(column_name(25), "Z");
        assert_eq!(column_name(26), "AA");
        assert_eq!(column_name(701), "ZZ");
        assert_eq!(column_name(702), "AAA");
        for i in [0, 5, 27, 300, 702] {
            assert_eq!(column_index(&format!("{}1", column_name(i))), Some(i));
        }
    }

    #[test]
    fn test_sheet_title() {
        assert_eq!(sheet_title("Q1: Sales/Costs"), "Q1 SalesCosts");
        assert_eq!(sheet_title("  "), "Sheet1");
        assert_eq!(sheet_title(&"x".repeat(40)).len(), 31);
    }
}
