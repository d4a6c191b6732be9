//! XLSX reader.

use crate::container::OoxmlContainer;
use crate::error::{Error, Result};
use crate::model::{Row, Sheet, Workbook};
use quick_xml::events::{BytesStart, Event};
use std::path::Path;

use super::shared_strings::SharedStrings;
use super::WORKBOOK_PART;

/// Sheet entry from workbook.xml.
#[derive(Debug, Clone)]
struct SheetInfo {
    name: String,
    rel_id: String,
}

/// Reader for XLSX workbooks.
pub struct XlsxReader {
    container: OoxmlContainer,
    shared_strings: SharedStrings,
    sheets: Vec<SheetInfo>,
    active: usize,
}

impl XlsxReader {
    /// Open an XLSX file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_container(OoxmlContainer::open(path)?)
    }

    /// Create a reader from bytes.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        Self::from_container(OoxmlContainer::from_bytes(data)?)
    }

    fn from_container(container: OoxmlContainer) -> Result<Self> {
        let shared_strings = match container.read_xml("xl/sharedStrings.xml") {
            Ok(xml) => SharedStrings::parse(&xml)?,
            Err(_) => SharedStrings::default(),
        };

        let xml = container.read_xml(WORKBOOK_PART)?;
        let (sheets, active) = parse_workbook(&xml)?;

        Ok(Self {
            container,
            shared_strings,
            sheets,
            active,
        })
    }

    /// Sheet names in tab order.
    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.iter().map(|s| s.name.as_str()).collect()
    }

    /// Read every sheet.
    ///
    /// A sheet whose part cannot be found is returned empty.
    pub fn read(&self) -> Result<Workbook> {
        let rels = self.container.read_relationships(WORKBOOK_PART)?;
        let mut workbook = Workbook {
            sheets: Vec::with_capacity(self.sheets.len()),
            active: self.active,
        };

        for info in &self.sheets {
            let mut sheet = Sheet::new(info.name.clone());
            if let Some(rel) = rels.get(&info.rel_id) {
                let part = OoxmlContainer::resolve_path(WORKBOOK_PART, &rel.target);
                if let Ok(xml) = self.container.read_xml(&part) {
                    sheet.rows = self.parse_sheet(&xml)?;
                }
            }
            workbook.sheets.push(sheet);
        }

        Ok(workbook)
    }

    /// Parse a worksheet part into rows.
    fn parse_sheet(&self, xml: &str) -> Result<Vec<Row>> {
        let mut rows: Vec<Row> = Vec::new();
        let mut reader = quick_xml::Reader::from_str(xml);
        reader.config_mut().trim_text(false);

        let mut buf = Vec::new();
        let mut current_row: Option<Row> = None;
        let mut row_number = 0usize;
        let mut cell: Option<CellState> = None;
        let mut in_value = false;

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(ref e)) => match e.name().as_ref() {
                    b"row" => {
                        row_number = row_index(e).unwrap_or(row_number + 1);
                        current_row = Some(Row::default());
                    }
                    b"c" if current_row.is_some() => {
                        let next_column = current_row.as_ref().map_or(0, |r| r.cells.len());
                        cell = Some(CellState::from_start(e, next_column));
                    }
                    b"v" | b"t" if cell.is_some() => in_value = true,
                    _ => {}
                },
                Ok(Event::Empty(ref e)) => match e.name().as_ref() {
                    b"row" => {
                        row_number = row_index(e).unwrap_or(row_number + 1);
                        push_row(&mut rows, row_number, Row::default());
                    }
                    b"c" => {
                        // Styled but valueless cell: a null, only advances the column
                        if let Some(ref mut row) = current_row {
                            let next_column = row.cells.len();
                            let state = CellState::from_start(e, next_column);
                            if row.cells.len() <= state.column {
                                row.cells.resize(state.column + 1, None);
                            }
                        }
                    }
                    _ => {}
                },
                Ok(Event::Text(ref e)) => {
                    if in_value {
                        if let Some(ref mut state) = cell {
                            let text =
                                e.unescape().map_err(|err| Error::XmlParse(err.to_string()))?;
                            state.value.get_or_insert_with(String::new).push_str(&text);
                        }
                    }
                }
                Ok(Event::End(ref e)) => match e.name().as_ref() {
                    b"row" => {
                        if let Some(row) = current_row.take() {
                            push_row(&mut rows, row_number, row);
                        }
                    }
                    b"c" => {
                        if let (Some(state), Some(row)) = (cell.take(), current_row.as_mut()) {
                            match state.value {
                                Some(ref raw) => {
                                    let value =
                                        self.resolve_cell_value(raw, state.cell_type.as_deref());
                                    row.set(state.column, value);
                                }
                                None => {
                                    if row.cells.len() <= state.column {
                                        row.cells.resize(state.column + 1, None);
                                    }
                                }
                            }
                        }
                    }
                    b"v" | b"t" => in_value = false,
                    _ => {}
                },
                Ok(Event::Eof) => break,
                Err(e) => return Err(Error::XmlParse(e.to_string())),
                _ => {}
            }
            buf.clear();
        }

        // Trailing nulls carry no content
        for row in &mut rows {
            while matches!(row.cells.last(), Some(None)) {
                row.cells.pop();
            }
        }
        while rows.last().is_some_and(|r| r.cells.is_empty()) {
            rows.pop();
        }

        Ok(rows)
    }

    /// Resolve a cell value based on its type.
    fn resolve_cell_value(&self, value: &str, cell_type: Option<&str>) -> String {
        match cell_type {
            Some("s") => value
                .trim()
                .parse::<usize>()
                .ok()
                .and_then(|idx| self.shared_strings.get(idx))
                .unwrap_or(value)
                .to_string(),
            Some("b") => {
                if value.trim() == "1" {
                    "TRUE".to_string()
                } else {
                    "FALSE".to_string()
                }
            }
            Some("e") => format!("#ERROR:{}", value),
            _ => value.to_string(),
        }
    }
}

/// A cell being read.
struct CellState {
    column: usize,
    cell_type: Option<String>,
    value: Option<String>,
}

impl CellState {
    fn from_start(e: &BytesStart<'_>, fallback_column: usize) -> Self {
        let mut column = fallback_column;
        let mut cell_type = None;
        for attr in e.attributes().flatten() {
            match attr.key.as_ref() {
                b"r" => {
                    if let Some(idx) = column_index(&String::from_utf8_lossy(&attr.value)) {
                        column = idx;
                    }
                }
                b"t" => cell_type = Some(String::from_utf8_lossy(&attr.value).to_string()),
                _ => {}
            }
        }
        Self {
            column,
            cell_type,
            value: None,
        }
    }
}

/// Append a row at its 1-based position, filling skipped rows with empty ones.
fn push_row(rows: &mut Vec<Row>, row_number: usize, row: Row) {
    let index = row_number.saturating_sub(1).max(rows.len());
    while rows.len() < index {
        rows.push(Row::default());
    }
    rows.push(row);
}

fn row_index(e: &BytesStart<'_>) -> Option<usize> {
    e.attributes()
        .flatten()
        .find(|a| a.key.as_ref() == b"r")
        .and_then(|a| String::from_utf8_lossy(&a.value).parse().ok())
}

/// Zero-based column of a cell reference such as `B3` or `AA10`.
pub fn column_index(reference: &str) -> Option<usize> {
    let letters: String = reference
        .chars()
        .take_while(|c| c.is_ascii_alphabetic())
        .collect();
    if letters.is_empty() {
        return None;
    }
    let mut index = 0usize;
    for c in letters.chars() {
        index = index * 26 + (c.to_ascii_uppercase() as usize - 'A' as usize + 1);
    }
    Some(index - 1)
}

/// Sheets and active tab from workbook.xml.
fn parse_workbook(xml: &str) -> Result<(Vec<SheetInfo>, usize)> {
    let mut sheets = Vec::new();
    let mut active = 0usize;
    let mut reader = quick_xml::Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Empty(e)) | Ok(Event::Start(e)) => match e.name().as_ref() {
                b"sheet" => {
                    let mut name = String::new();
                    let mut rel_id = String::new();
                    for attr in e.attributes().flatten() {
                        match attr.key.as_ref() {
                            b"name" => name = String::from_utf8_lossy(&attr.value).to_string(),
                            b"r:id" => rel_id = String::from_utf8_lossy(&attr.value).to_string(),
                            _ => {}
                        }
                    }
                    if !name.is_empty() {
                        sheets.push(SheetInfo { name, rel_id });
                    }
                }
                b"workbookView" => {
                    for attr in e.attributes().flatten() {
                        if attr.key.as_ref() == b"activeTab" {
                            active = String::from_utf8_lossy(&attr.value).parse().unwrap_or(0);
                        }
                    }
                }
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(Error::XmlParse(e.to_string())),
            _ => {}
        }
        buf.clear();
    }

    Ok((sheets, active))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xlsx::XlsxWriter;

    fn reader_with_sheet(sheet_xml: &str) -> XlsxReader {
        let container_bytes = {
            use std::io::{Cursor, Write};
            use zip::write::SimpleFileOptions;

            let mut buffer = Vec::new();
            let mut zip = zip::ZipWriter::new(Cursor::new(&mut buffer));
            let options = SimpleFileOptions::default();
            zip.start_file("xl/workbook.xml", options).unwrap();
            zip.write_all(
                br#"<workbook><bookViews><workbookView activeTab="1"/></bookViews><sheets><sheet name="Cover" sheetId="1" r:id="rId1"/><sheet name="Data" sheetId="2" r:id="rId2"/></sheets></workbook>"#,
            )
            .unwrap();
            zip.start_file("xl/_rels/workbook.xml.rels", options).unwrap();
            zip.write_all(
                br#"<Relationships><Relationship Id="rId1" Type="ws" Target="worksheets/sheet1.xml"/><Relationship Id="rId2" Type="ws" Target="/xl/worksheets/sheet2.xml"/></Relationships>"#,
            )
            .unwrap();
            zip.start_file("xl/sharedStrings.xml", options).unwrap();
            zip.write_all(br#"<sst><si><t>Name</t></si><si><t>Qty</t></si></sst>"#)
                .unwrap();
            zip.start_file("xl/worksheets/sheet1.xml", options).unwrap();
            zip.write_all(br#"<worksheet><sheetData/></worksheet>"#).unwrap();
            zip.start_file("xl/worksheets/sheet2.xml", options).unwrap();
            zip.write_all(sheet_xml.as_bytes()).unwrap();
            zip.finish().unwrap();
            buffer
        };
        XlsxReader::from_bytes(container_bytes).unwrap()
    }

    #[test]
    fn test_column_index() {
        assert_eq!(column_index("A1"), Some(0));
        assert_eq!(column_index("C7"), Some(2));
        assert_eq!(column_index("Z1"), Some(25));
        assert_eq!(column_index("AA10"), Some(26));
        assert_eq!(column_index("12"), None);
    }

    #[test]
    fn test_active_sheet_and_types() {
        let reader = reader_with_sheet(
            r#"<worksheet><sheetData>
<row r="1"><c r="A1" t="s"><v>0</v></c><c r="B1" t="s"><v>1</v></c></row>
<row r="2"><c r="A2" t="inlineStr"><is><t>bolts</t></is></c><c r="B2"><v>12</v></c><c r="C2" t="b"><v>1</v></c></row>
</sheetData></worksheet>"#,
        );
        assert_eq!(reader.sheet_names(), vec!["Cover", "Data"]);

        let workbook = reader.read().unwrap();
        let sheet = workbook.active_sheet().unwrap();
        assert_eq!(sheet.name, "Data");
        assert_eq!(sheet.to_lines(), vec!["Name\tQty", "bolts\t12\tTRUE"]);
    }

    #[test]
    fn test_nulls_and_row_gaps() {
        let reader = reader_with_sheet(
            r#"<worksheet><sheetData>
<row r="1"><c r="A1"><v>1</v></c><c r="B1" s="3"/><c r="C1"><v>3</v></c></row>
<row r="3"><c r="B3"><v>x</v></c></row>
<row r="4"><c r="A4" s="1"/></row>
</sheetData></worksheet>"#,
        );
        let workbook = reader.read().unwrap();
        let sheet = workbook.active_sheet().unwrap();

        assert_eq!(sheet.rows.len(), 3);
        assert_eq!(
            sheet.rows[0].cells,
            vec![Some("1".to_string()), None, Some("3".to_string())]
        );
        assert_eq!(sheet.to_lines(), vec!["1\t3", "", "x"]);
    }

    #[test]
    fn test_reads_written_workbook() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("book.xlsx");

        let mut writer = XlsxWriter::new("Sheet1");
        writer.add_row(Row::new(vec![Some("a & b".into()), None, Some("c".into())]));
        writer.add_row(Row::default());
        writer.add_row(Row::new(vec![Some("d".into())]));
        writer.save(&path).unwrap();

        let workbook = XlsxReader::open(&path).unwrap().read().unwrap();
        let sheet = workbook.active_sheet().unwrap();
        assert_eq!(sheet.to_lines(), vec!["a & b\tc", "", "d"]);
    }
}
