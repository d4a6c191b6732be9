//! Writing Office Open XML packages.
//!
//! Only the parts a consumer needs to open the file are produced: content
//! types, package relationships, the main part and its relationships.

use crate::error::Result;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

/// XML declaration used by every written part.
pub const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#;

/// Relationship type of a package's main part.
pub const REL_OFFICE_DOCUMENT: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument";

/// Relationship type for embedded images.
pub const REL_IMAGE: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/image";

/// Relationship type for worksheets.
pub const REL_WORKSHEET: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet";

/// Whether `c` matches the XML 1.0 `Char` production.
pub fn is_xml_char(c: char) -> bool {
    matches!(
        c,
        '\t' | '\n' | '\r' | '\u{20}'..='\u{D7FF}' | '\u{E000}'..='\u{FFFD}' | '\u{10000}'..='\u{10FFFF}'
    )
}

/// Escape text for use in XML content or attribute values.
///
/// Characters XML 1.0 cannot represent (most C0 controls, U+FFFE, U+FFFF)
/// are dropped.
pub fn escape(text: &str) -> String {
    if text.chars().all(is_xml_char) {
        return quick_xml::escape::escape(text).into_owned();
    }
    let cleaned: String = text.chars().filter(|c| is_xml_char(*c)).collect();
    quick_xml::escape::escape(&cleaned).into_owned()
}

/// Relationship list of a single part.
#[derive(Debug, Default)]
pub struct RelationshipList {
    entries: Vec<(String, &'static str, String)>,
}

impl RelationshipList {
    /// Add a relationship and return its ID.
    pub fn push(&mut self, rel_type: &'static str, target: impl Into<String>) -> String {
        let id = format!("rId{}", self.entries.len() + 1);
        self.entries.push((id.clone(), rel_type, target.into()));
        id
    }

    /// Render the .rels XML.
    pub fn to_xml(&self) -> String {
        let mut xml = String::from(XML_DECLARATION);
        xml.push_str(
            r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
        );
        for (id, rel_type, target) in &self.entries {
            xml.push_str(&format!(
                r#"<Relationship Id="{}" Type="{}" Target="{}"/>"#,
                id,
                rel_type,
                escape(target)
            ));
        }
        xml.push_str("</Relationships>");
        xml
    }
}

/// Streams the parts of an OOXML package into a ZIP file.
pub struct PackageWriter {
    zip: ZipWriter<File>,
    options: SimpleFileOptions,
    defaults: Vec<(&'static str, &'static str)>,
    overrides: Vec<(String, &'static str)>,
}

impl PackageWriter {
    /// Create the package file at `path`, replacing any existing file.
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::create(path.as_ref())?;
        Ok(Self {
            zip: ZipWriter::new(file),
            options: SimpleFileOptions::default()
                .compression_method(zip::CompressionMethod::Deflated),
            defaults: vec![
                (
                    "rels",
                    "application/vnd.openxmlformats-package.relationships+xml",
                ),
                ("xml", "application/xml"),
            ],
            overrides: Vec::new(),
        })
    }

    /// Register a default content type for an extension (e.g. `png`).
    pub fn default_content_type(&mut self, extension: &'static str, content_type: &'static str) {
        if !self.defaults.iter().any(|(ext, _)| *ext == extension) {
            self.defaults.push((extension, content_type));
        }
    }

    /// Write a part and register a content type override for it.
    pub fn add_part(&mut self, name: &str, content_type: &'static str, xml: &str) -> Result<()> {
        self.overrides.push((format!("/{}", name), content_type));
        self.add_raw(name, xml.as_bytes())
    }

    /// Write a part whose content type comes from the defaults.
    pub fn add_raw(&mut self, name: &str, data: &[u8]) -> Result<()> {
        self.zip.start_file(name, self.options)?;
        self.zip.write_all(data)?;
        Ok(())
    }

    /// Write `[Content_Types].xml` and `_rels/.rels`, then close the archive.
    pub fn finish(mut self, main_part: &str) -> Result<()> {
        let mut types = String::from(XML_DECLARATION);
        types.push_str(
            r#"<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">"#,
        );
        for (ext, content_type) in &self.defaults {
            types.push_str(&format!(
                r#"<Default Extension="{}" ContentType="{}"/>"#,
                ext, content_type
            ));
        }
        for (part, content_type) in &self.overrides {
            types.push_str(&format!(
                r#"<Override PartName="{}" ContentType="{}"/>"#,
                escape(part),
                content_type
            ));
        }
        types.push_str("</Types>");
        self.add_raw("[Content_Types].xml", types.as_bytes())?;

        let mut package_rels = RelationshipList::default();
        package_rels.push(REL_OFFICE_DOCUMENT, main_part);
        self.add_raw("_rels/.rels", package_rels.to_xml().as_bytes())?;

        self.zip.finish()?;
        Ok(())
    }
}
