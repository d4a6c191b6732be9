//! Read access to Office Open XML packages.

use crate::error::{Error, Result};
use quick_xml::events::{BytesStart, Event};
use std::cell::RefCell;
use std::collections::HashMap;
use std::io::{Cursor, Read};
use std::path::Path;

/// A relationship entry from a .rels file.
#[derive(Debug, Clone)]
pub struct Relationship {
    /// Relationship ID (e.g., "rId1")
    pub id: String,
    /// Relationship type URI
    pub rel_type: String,
    /// Target path (relative or absolute)
    pub target: String,
}

/// Relationships parsed from a .rels file, keyed by ID.
#[derive(Debug, Clone, Default)]
pub struct Relationships {
    by_id: HashMap<String, Relationship>,
}

impl Relationships {
    /// Get a relationship by ID.
    pub fn get(&self, id: &str) -> Option<&Relationship> {
        self.by_id.get(id)
    }

    /// Number of relationships.
    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    fn add(&mut self, rel: Relationship) {
        self.by_id.insert(rel.id.clone(), rel);
    }
}

/// Decode an XML part to a string.
///
/// Parts are normally UTF-8, but some producers write UTF-16 with a byte
/// order mark. The declaration of a transcoded part is rewritten to UTF-8 so
/// the XML reader does not decode it again. Undecodable UTF-8 is replaced.
pub fn decode_xml_bytes(bytes: &[u8]) -> Result<String> {
    let text = match bytes {
        [0xEF, 0xBB, 0xBF, rest @ ..] => return Ok(String::from_utf8_lossy(rest).into_owned()),
        [0xFF, 0xFE, rest @ ..] => decode_utf16(rest, u16::from_le_bytes)?,
        [0xFE, 0xFF, rest @ ..] => decode_utf16(rest, u16::from_be_bytes)?,
        _ => return Ok(String::from_utf8_lossy(bytes).into_owned()),
    };
    Ok(declare_utf8(text))
}

fn declare_utf8(text: String) -> String {
    let Some(end) = text.strip_prefix("<?xml").and_then(|_| text.find("?>")) else {
        return text;
    };
    let declaration = text[..end].replace("UTF-16", "UTF-8").replace("utf-16", "UTF-8");
    format!("{}{}", declaration, &text[end..])
}

fn decode_utf16(bytes: &[u8], unit: fn([u8; 2]) -> u16) -> Result<String> {
    let units = bytes.chunks_exact(2).map(|pair| unit([pair[0], pair[1]]));
    char::decode_utf16(units)
        .collect::<std::result::Result<String, _>>()
        .map_err(|e| Error::InvalidData(format!("bad UTF-16 in XML part: {}", e)))
}

/// OOXML container abstraction over a ZIP archive.
pub struct OoxmlContainer {
    archive: RefCell<zip::ZipArchive<Cursor<Vec<u8>>>>,
}

impl OoxmlContainer {
    /// Open an OOXML container from a file path.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use fileshift::container::OoxmlContainer;
    ///
    /// let container = OoxmlContainer::open("report.docx")?;
    /// assert!(container.exists("word/document.xml"));
    /// # Ok::<(), fileshift::Error>(())
    /// ```
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let data = std::fs::read(path.as_ref())?;
        Self::from_bytes(data)
    }

    /// Create an OOXML container from a byte vector.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        let archive = zip::ZipArchive::new(Cursor::new(data))?;
        Ok(Self {
            archive: RefCell::new(archive),
        })
    }

    /// Read an XML part as a string, whatever its encoding.
    pub fn read_xml(&self, path: &str) -> Result<String> {
        let bytes = self.read_binary(path)?;
        decode_xml_bytes(&bytes)
    }

    /// Read a binary part.
    pub fn read_binary(&self, path: &str) -> Result<Vec<u8>> {
        let mut archive = self.archive.borrow_mut();
        let mut file = archive
            .by_name(path)
            .map_err(|_| Error::MissingComponent(path.to_string()))?;
        let mut data = Vec::new();
        file.read_to_end(&mut data)?;
        Ok(data)
    }

    /// Check if a part exists in the archive.
    pub fn exists(&self, path: &str) -> bool {
        let archive = self.archive.borrow();
        let found = archive.file_names().any(|n| n == path);
        found
    }

    /// List parts whose name starts with a prefix.
    pub fn list_files_with_prefix(&self, prefix: &str) -> Vec<String> {
        let archive = self.archive.borrow();
        archive
            .file_names()
            .filter(|n| n.starts_with(prefix))
            .map(String::from)
            .collect()
    }

    /// Read the relationships of a part (e.g. `xl/workbook.xml`).
    ///
    /// A part without a .rels file has no relationships.
    pub fn read_relationships(&self, part_path: &str) -> Result<Relationships> {
        let path = Path::new(part_path);
        let parent = path.parent().unwrap_or(Path::new(""));
        let filename = path.file_name().unwrap_or_default().to_string_lossy();
        let rels_path = if parent.as_os_str().is_empty() {
            format!("_rels/{}.rels", filename)
        } else {
            format!("{}/_rels/{}.rels", parent.display(), filename)
        };

        let content = match self.read_xml(&rels_path) {
            Ok(c) => c,
            Err(_) => return Ok(Relationships::default()),
        };
        parse_relationships(&content)
    }

    /// Resolve a relationship target against the part that owns it.
    pub fn resolve_path(base: &str, relative: &str) -> String {
        if let Some(stripped) = relative.strip_prefix('/') {
            return stripped.to_string();
        }

        let base_dir = Path::new(base).parent().unwrap_or(Path::new(""));

        let mut result = base_dir.to_path_buf();
        for component in Path::new(relative).components() {
            match component {
                std::path::Component::ParentDir => {
                    result.pop();
                }
                std::path::Component::Normal(c) => {
                    result.push(c);
                }
                _ => {}
            }
        }

        result.to_string_lossy().replace('\\', "/")
    }
}

fn parse_relationships(content: &str) -> Result<Relationships> {
    let mut rels = Relationships::default();
    let mut reader = quick_xml::Reader::from_str(content);
    reader.config_mut().trim_text(true);

    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Empty(e) | Event::Start(e) if e.local_name().as_ref() == b"Relationship" => {
                let rel = relationship_from(&e);
                if !rel.id.is_empty() {
                    rels.add(rel);
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(rels)
}

fn relationship_from(element: &BytesStart<'_>) -> Relationship {
    let mut rel = Relationship {
        id: String::new(),
        rel_type: String::new(),
        target: String::new(),
    };
    for attr in element.attributes().flatten() {
        let value = String::from_utf8_lossy(&attr.value).into_owned();
        match attr.key.as_ref() {
            b"Id" => rel.id = value,
            b"Type" => rel.rel_type = value,
            b"Target" => rel.target = value,
            _ => {}
        }
    }
    rel
}

impl std::fmt::Debug for OoxmlContainer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OoxmlContainer")
            .field("files", &self.archive.borrow().len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use zip::write::SimpleFileOptions;

    #[test]
    fn test_resolve_path() {
        assert_eq!(
            OoxmlContainer::resolve_path("word/document.xml", "../media/image1.png"),
            "media/image1.png"
        );
        assert_eq!(
            OoxmlContainer::resolve_path("xl/workbook.xml", "worksheets/sheet1.xml"),
            "xl/worksheets/sheet1.xml"
        );
        assert_eq!(
            OoxmlContainer::resolve_path("ppt/slides/slide1.xml", "/ppt/media/image1.png"),
            "ppt/media/image1.png"
        );
    }

    #[test]
    fn test_read_relationships() {
        let mut buffer = Vec::new();
        {
            let mut zip = zip::ZipWriter::new(Cursor::new(&mut buffer));
            zip.start_file("xl/_rels/workbook.xml.rels", SimpleFileOptions::default())
                .unwrap();
            zip.write_all(
                br#"<Relationships><Relationship Id="rId1" Type="t/worksheet" Target="worksheets/sheet1.xml"/></Relationships>"#,
            )
            .unwrap();
            zip.finish().unwrap();
        }

        let container = OoxmlContainer::from_bytes(buffer).unwrap();
        let rels = container.read_relationships("xl/workbook.xml").unwrap();
        assert_eq!(rels.len(), 1);
        assert_eq!(rels.get("rId1").unwrap().target, "worksheets/sheet1.xml");

        let none = container.read_relationships("word/document.xml").unwrap();
        assert!(none.is_empty());
    }

    #[test]
    fn test_utf16_decoding_function() {
        let utf16_le = b"\xFF\xFE<\0?\0x\0m\0l\0>\0";
        assert_eq!(decode_xml_bytes(utf16_le).unwrap(), "<?xml>");

        let utf16_be = b"\xFE\xFF\0<\0?\0x\0m\0l\0>";
        assert_eq!(decode_xml_bytes(utf16_be).unwrap(), "<?xml>");

        let utf8_bom = b"\xEF\xBB\xBF<?xml>";
        assert_eq!(decode_xml_bytes(utf8_bom).unwrap(), "<?xml>");

        assert_eq!(decode_xml_bytes(b"<?xml>").unwrap(), "<?xml>");
    }

    #[test]
    fn test_utf16_declaration_rewritten() {
        let mut bytes = vec![0xFF, 0xFE];
        for unit in r#"<?xml version="1.0" encoding="UTF-16"?><a/>"#.encode_utf16() {
            bytes.extend_from_slice(&unit.to_le_bytes());
        }
        let decoded = decode_xml_bytes(&bytes).unwrap();
        assert!(decoded.contains(r#"encoding="UTF-8""#));
    }
}
