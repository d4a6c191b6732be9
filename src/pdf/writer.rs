//! Page-description writer built on lopdf.

use super::metrics::{encode_win_ansi, glyph_width, text_width};
use crate::config::PageLayout;
use crate::error::{Error, Result};
use image::RgbImage;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, ObjectId, Stream};
use std::path::Path;

const MM_TO_PT: f32 = 72.0 / 25.4;

/// Horizontal padding inside the text column, in millimetres.
const CELL_MARGIN_MM: f32 = 1.0;

#[derive(Debug, Clone)]
struct TextLine {
    x: f32,
    baseline: f32,
    encoded: Vec<u8>,
}

#[derive(Debug, Clone)]
enum Page {
    Text(Vec<TextLine>),
    Image(RgbImage),
}

/// Lays out text lines and images onto PDF pages.
///
/// Text flows top to bottom with greedy word wrapping; a new page starts
/// once the next line would cross the bottom margin. Image pages are sized
/// to the image at 72 dpi.
#[derive(Debug)]
pub struct PdfWriter {
    layout: PageLayout,
    pages: Vec<Page>,
    /// Top of the next text line in points from the top edge
    cursor: f32,
}

impl PdfWriter {
    /// Create an empty writer.
    pub fn new(layout: PageLayout) -> Self {
        Self {
            layout,
            pages: Vec::new(),
            cursor: 0.0,
        }
    }

    /// Number of pages laid out so far.
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Write one paragraph. Embedded newlines start new lines; an empty
    /// paragraph still advances one line.
    pub fn write_paragraph(&mut self, text: &str) {
        let expanded = text.replace('\t', &" ".repeat(self.layout.tab_width));
        for line in expanded.split('\n') {
            for wrapped in self.wrap(&encode_win_ansi(line)) {
                self.push_line(wrapped);
            }
        }
    }

    /// Write several paragraphs in order.
    pub fn write_paragraphs<I, S>(&mut self, paragraphs: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for paragraph in paragraphs {
            self.write_paragraph(paragraph.as_ref());
        }
    }

    /// Append a page holding a single image. Following text starts on a new page.
    pub fn add_image_page(&mut self, image: RgbImage) {
        self.pages.push(Page::Image(image));
    }

    fn line_height(&self) -> f32 {
        self.layout.line_height_mm * MM_TO_PT
    }

    fn column_width(&self) -> f32 {
        (self.layout.page_width_mm - 2.0 * (self.layout.side_margin_mm + CELL_MARGIN_MM)) * MM_TO_PT
    }

    fn wrap(&self, encoded: &[u8]) -> Vec<Vec<u8>> {
        let font_size = self.layout.font_size_pt;
        let max_width = self.column_width().max(font_size);
        let mut lines = Vec::new();
        let mut current: Vec<u8> = Vec::new();

        for word in encoded.split(|&b| b == b' ') {
            let mut candidate = current.clone();
            if !candidate.is_empty() {
                candidate.push(b' ');
            }
            candidate.extend_from_slice(word);

            if text_width(&candidate, font_size) <= max_width {
                current = candidate;
                continue;
            }

            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }

            // A single word wider than the column is broken by character.
            let mut width = 0.0;
            for &byte in word {
                let advance = f32::from(glyph_width(byte)) * font_size / 1000.0;
                if width + advance > max_width && !current.is_empty() {
                    lines.push(std::mem::take(&mut current));
                    width = 0.0;
                }
                current.push(byte);
                width += advance;
            }
        }

        lines.push(current);
        lines
    }

    fn push_line(&mut self, encoded: Vec<u8>) {
        let page_height = self.layout.page_height_mm * MM_TO_PT;
        let limit = page_height - self.layout.bottom_margin_mm * MM_TO_PT;
        let line_height = self.line_height();

        let needs_page = !matches!(self.pages.last(), Some(Page::Text(_)))
            || self.cursor + line_height > limit;
        if needs_page {
            self.pages.push(Page::Text(Vec::new()));
            self.cursor = self.layout.top_margin_mm * MM_TO_PT;
        }

        // Text is centred vertically in its line box.
        let font_size = self.layout.font_size_pt;
        let baseline = page_height - (self.cursor + 0.5 * line_height + 0.3 * font_size);
        let x = (self.layout.side_margin_mm + CELL_MARGIN_MM) * MM_TO_PT;

        if let Some(Page::Text(lines)) = self.pages.last_mut() {
            lines.push(TextLine {
                x,
                baseline,
                encoded,
            });
        }
        self.cursor += line_height;
    }

    /// Serialize the document. An empty writer produces one blank page.
    pub fn save(mut self, path: impl AsRef<Path>) -> Result<()> {
        if self.pages.is_empty() {
            self.pages.push(Page::Text(Vec::new()));
        }

        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
            "Encoding" => "WinAnsiEncoding",
        });

        let text_size = (
            self.layout.page_width_mm * MM_TO_PT,
            self.layout.page_height_mm * MM_TO_PT,
        );

        let mut kids: Vec<Object> = Vec::with_capacity(self.pages.len());
        for page in &self.pages {
            let page_id = match page {
                Page::Text(lines) => {
                    let content = text_content(lines, self.layout.font_size_pt);
                    let resources = dictionary! {
                        "Font" => dictionary! { "F1" => font_id },
                    };
                    add_page(&mut doc, pages_id, content, resources, text_size)?
                }
                Page::Image(image) => {
                    let (width, height) = image.dimensions();
                    let image_id = doc.add_object(Stream::new(
                        dictionary! {
                            "Type" => "XObject",
                            "Subtype" => "Image",
                            "Width" => width as i64,
                            "Height" => height as i64,
                            "ColorSpace" => "DeviceRGB",
                            "BitsPerComponent" => 8,
                        },
                        image.as_raw().clone(),
                    ));
                    let (w, h) = (width as f32, height as f32);
                    let content = Content {
                        operations: vec![
                            Operation::new("q", vec![]),
                            Operation::new(
                                "cm",
                                vec![w.into(), 0.into(), 0.into(), h.into(), 0.into(), 0.into()],
                            ),
                            Operation::new("Do", vec!["Im1".into()]),
                            Operation::new("Q", vec![]),
                        ],
                    };
                    let resources = dictionary! {
                        "XObject" => dictionary! { "Im1" => image_id },
                    };
                    add_page(&mut doc, pages_id, content, resources, (w, h))?
                }
            };
            kids.push(page_id.into());
        }

        let count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
            }),
        );

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);
        doc.compress();

        doc.save(path.as_ref())
            .map_err(|e| Error::Pdf(format!("failed to write {}: {}", path.as_ref().display(), e)))?;
        Ok(())
    }
}

fn text_content(lines: &[TextLine], font_size: f32) -> Content {
    let mut operations = Vec::new();
    if !lines.is_empty() {
        operations.push(Operation::new("BT", vec![]));
        operations.push(Operation::new("Tf", vec!["F1".into(), font_size.into()]));
        for line in lines.iter().filter(|l| !l.encoded.is_empty()) {
            operations.push(Operation::new(
                "Tm",
                vec![
                    1.into(),
                    0.into(),
                    0.into(),
                    1.into(),
                    round(line.x).into(),
                    round(line.baseline).into(),
                ],
            ));
            operations.push(Operation::new(
                "Tj",
                vec![Object::string_literal(line.encoded.clone())],
            ));
        }
        operations.push(Operation::new("ET", vec![]));
    }
    Content { operations }
}

fn add_page(
    doc: &mut Document,
    pages_id: ObjectId,
    content: Content,
    resources: lopdf::Dictionary,
    (width, height): (f32, f32),
) -> Result<ObjectId> {
    let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));
    let resources_id = doc.add_object(resources);
    Ok(doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "MediaBox" => vec![0.into(), 0.into(), round(width).into(), round(height).into()],
        "Contents" => content_id,
        "Resources" => resources_id,
    }))
}

fn round(value: f32) -> f32 {
    (value * 100.0).round() / 100.0
}
