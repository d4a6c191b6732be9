//! Paragraph extraction from word/document.xml.

use crate::container::OoxmlContainer;
use crate::error::{Error, Result};
use crate::model::TextDocument;
use quick_xml::events::Event;
use std::path::Path;

use super::MAIN_PART;

/// Read every paragraph of a DOCX file as plain text.
///
/// Paragraphs inside tables are included in document order. Runs are
/// concatenated; `w:tab` becomes a tab and `w:br`/`w:cr` a newline.
pub fn read_document(path: impl AsRef<Path>) -> Result<TextDocument> {
    let container = OoxmlContainer::open(path)?;
    let xml = container.read_xml(MAIN_PART)?;
    Ok(TextDocument::new(read_paragraphs_from_xml(&xml)?))
}

/// Extract paragraphs from the XML of a main document part.
pub fn read_paragraphs_from_xml(xml: &str) -> Result<Vec<String>> {
    let mut reader = quick_xml::Reader::from_str(xml);
    // xml:space="preserve" runs carry meaningful whitespace
    reader.config_mut().trim_text(false);

    let mut paragraphs = Vec::new();
    let mut buf = Vec::new();
    let mut current = String::new();
    let mut para_depth: u32 = 0;
    let mut in_run = false;
    let mut in_text = false;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => match e.name().as_ref() {
                b"w:p" => {
                    if para_depth == 0 {
                        current.clear();
                    }
                    para_depth += 1;
                }
                b"w:r" => in_run = true,
                b"w:t" if in_run => in_text = true,
                _ => {}
            },
            Ok(Event::Empty(ref e)) => match e.name().as_ref() {
                b"w:p" if para_depth == 0 => paragraphs.push(String::new()),
                b"w:tab" if in_run => current.push('\t'),
                b"w:br" | b"w:cr" if in_run => current.push('\n'),
                _ => {}
            },
            Ok(Event::Text(ref e)) => {
                if in_text {
                    let text = e.unescape().map_err(|err| Error::XmlParse(err.to_string()))?;
                    current.push_str(&text);
                }
            }
            Ok(Event::End(ref e)) => match e.name().as_ref() {
                b"w:p" if para_depth > 0 => {
                    para_depth -= 1;
                    if para_depth == 0 {
                        paragraphs.push(std::mem::take(&mut current));
                    }
                }
                b"w:r" => in_run = false,
                b"w:t" => in_text = false,
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(Error::XmlParse(e.to_string())),
            _ => {}
        }
        buf.clear();
    }

    Ok(paragraphs)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body(inner: &str) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?><w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{}</w:body></w:document>"#,
            inner
        )
    }

    #[test]
    fn test_runs_are_concatenated() {
        let xml = body(
            r#"<w:p><w:r><w:t>Hello </w:t></w:r><w:r><w:rPr><w:b/></w:rPr><w:t>World</w:t></w:r></w:p>"#,
        );
        assert_eq!(read_paragraphs_from_xml(&xml).unwrap(), vec!["Hello World"]);
    }

    #[test]
    fn test_tabs_breaks_and_entities() {
        let xml = body(
            r#"<w:p><w:pPr><w:tabs><w:tab w:val="left" w:pos="720"/></w:tabs></w:pPr><w:r><w:t>a</w:t><w:tab/><w:t>b &amp; c</w:t><w:br/><w:t>d</w:t></w:r></w:p>"#,
        );
        assert_eq!(read_paragraphs_from_xml(&xml).unwrap(), vec!["a\tb & c\nd"]);
    }

    #[test]
    fn test_empty_and_table_paragraphs() {
        let xml = body(
            r#"<w:p/><w:p><w:r><w:t>first</w:t></w:r></w:p><w:tbl><w:tr><w:tc><w:p><w:r><w:t>cell</w:t></w:r></w:p></w:tc></w:tr></w:tbl>"#,
        );
        assert_eq!(
            read_paragraphs_from_xml(&xml).unwrap(),
            vec!["", "first", "cell"]
        );
    }

    #[test]
    fn test_field_codes_skipped() {
        let xml = body(
            r#"<w:p><w:r><w:instrText> PAGE </w:instrText></w:r><w:r><w:t>7</w:t></w:r></w:p>"#,
        );
        assert_eq!(read_paragraphs_from_xml(&xml).unwrap(), vec!["7"]);
    }
}
