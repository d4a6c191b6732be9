//! Minimal DOCX writer.

use crate::error::Result;
use crate::package::{escape, PackageWriter, RelationshipList, REL_IMAGE, XML_DECLARATION};
use std::path::Path;

use super::{MAIN_CONTENT_TYPE, MAIN_PART};

/// English Metric Units per inch.
const EMU_PER_INCH: u64 = 914_400;

/// Pictures span the printable width of a Letter page with 1" margins.
const PICTURE_WIDTH_EMU: u64 = EMU_PER_INCH * 13 / 2;

#[derive(Debug)]
enum Block {
    Paragraph(String),
    Picture {
        png: Vec<u8>,
        width_px: u32,
        height_px: u32,
    },
}

/// Builds a DOCX document from paragraphs and PNG pictures.
#[derive(Debug, Default)]
pub struct DocxWriter {
    blocks: Vec<Block>,
}

impl DocxWriter {
    /// Create an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a paragraph. Tabs and newlines are kept as `w:tab`/`w:br`, a
    /// form feed becomes a page break.
    pub fn add_paragraph(&mut self, text: &str) {
        self.blocks.push(Block::Paragraph(text.to_string()));
    }

    /// Append a PNG picture scaled to the page width, in its own paragraph.
    pub fn add_picture(&mut self, png: Vec<u8>, width_px: u32, height_px: u32) {
        self.blocks.push(Block::Picture {
            png,
            width_px: width_px.max(1),
            height_px: height_px.max(1),
        });
    }

    /// Number of blocks added so far.
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Check if nothing was added.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Write the package to `path`.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut package = PackageWriter::create(path)?;
        let mut rels = RelationshipList::default();
        let mut body = String::new();
        let mut picture_count = 0usize;

        for block in &self.blocks {
            match block {
                Block::Paragraph(text) => body.push_str(&paragraph_xml(text)),
                Block::Picture {
                    png,
                    width_px,
                    height_px,
                } => {
                    picture_count += 1;
                    let media = format!("media/image{}.png", picture_count);
                    package.default_content_type("png", "image/png");
                    package.add_raw(&format!("word/{}", media), png)?;
                    let rel_id = rels.push(REL_IMAGE, media);
                    body.push_str(&picture_xml(picture_count, &rel_id, *width_px, *height_px));
                }
            }
        }

        let document = format!(
            concat!(
                "{}",
                r#"<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main""#,
                r#" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships""#,
                r#" xmlns:wp="http://schemas.openxmlformats.org/drawingml/2006/wordprocessingDrawing">"#,
                "<w:body>{}<w:sectPr/></w:body></w:document>"
            ),
            XML_DECLARATION, body
        );

        package.add_part(MAIN_PART, MAIN_CONTENT_TYPE, &document)?;
        package.add_raw("word/_rels/document.xml.rels", rels.to_xml().as_bytes())?;
        package.finish(MAIN_PART)
    }
}

fn paragraph_xml(text: &str) -> String {
    if text.is_empty() {
        return "<w:p/>".to_string();
    }

    let mut runs = String::new();
    let mut pending = String::new();
    for c in text.chars() {
        let tag = match c {
            '\n' => "<w:br/>",
            '\t' => "<w:tab/>",
            '\u{c}' => r#"<w:br w:type="page"/>"#,
            _ => {
                pending.push(c);
                continue;
            }
        };
        flush_text(&mut runs, &mut pending);
        runs.push_str(tag);
    }
    flush_text(&mut runs, &mut pending);
    format!("<w:p><w:r>{}</w:r></w:p>", runs)
}

fn flush_text(runs: &mut String, pending: &mut String) {
    let text = escape(pending);
    if !text.is_empty() {
        runs.push_str(&format!(r#"<w:t xml:space="preserve">{}</w:t>"#, text));
    }
    pending.clear();
}

fn picture_xml(id: usize, rel_id: &str, width_px: u32, height_px: u32) -> String {
    let cx = PICTURE_WIDTH_EMU;
    let cy = cx * u64::from(height_px) / u64::from(width_px);
    format!(
        concat!(
            "<w:p><w:r><w:drawing>",
            r#"<wp:inline distT="0" distB="0" distL="0" distR="0">"#,
            r#"<wp:extent cx="{cx}" cy="{cy}"/>"#,
            r#"<wp:docPr id="{id}" name="Picture {id}"/>"#,
            r#"<a:graphic xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main">"#,
            r#"<a:graphicData uri="http://schemas.openxmlformats.org/drawingml/2006/picture">"#,
            r#"<pic:pic xmlns:pic="http://schemas.openxmlformats.org/drawingml/2006/picture">"#,
            r#"<pic:nvPicPr><pic:cNvPr id="{id}" name="image{id}.png"/><pic:cNvPicPr/></pic:nvPicPr>"#,
            r#"<pic:blipFill><a:blip r:embed="{rel}"/><a:stretch><a:fillRect/></a:stretch></pic:blipFill>"#,
            r#"<pic:spPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="{cx}" cy="{cy}"/></a:xfrm>"#,
            r#"<a:prstGeom prst="rect"><a:avLst/></a:prstGeom></pic:spPr>"#,
            "</pic:pic></a:graphicData></a:graphic></wp:inline></w:drawing></w:r></w:p>"
        ),
        cx = cx,
        cy = cy,
        id = id,
        rel = rel_id
    )
}
