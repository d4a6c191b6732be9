//! PPTX (PowerPoint) presentations.
//!
//! Slides are rendered by the office host. Reading only inspects the slide
//! list so rendered output can be checked against it; writing builds
//! picture-only decks from page images.

mod writer;

pub use writer::{PptxWriter, SLIDE_HEIGHT_EMU, SLIDE_WIDTH_EMU};

use crate::container::OoxmlContainer;
use crate::error::{Error, Result};
use quick_xml::events::Event;
use std::path::Path;

/// Path of the presentation part.
pub const PRESENTATION_PART: &str = "ppt/presentation.xml";

/// Content type of the presentation part.
pub const PRESENTATION_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.presentationml.presentation.main+xml";

/// Slide inventory of a presentation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresentationInfo {
    /// Relationship IDs of the slides, in show order
    pub slide_ids: Vec<String>,
}

impl PresentationInfo {
    /// Read the slide list of a PPTX file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let container = OoxmlContainer::open(path)?;
        Self::from_container(&container)
    }

    /// Read the slide list from an opened container.
    ///
    /// Falls back to counting `ppt/slides/slideN.xml` parts when the
    /// presentation part has no slide list.
    pub fn from_container(container: &OoxmlContainer) -> Result<Self> {
        let xml = container.read_xml(PRESENTATION_PART)?;
        let mut slide_ids = parse_slide_list(&xml)?;

        if slide_ids.is_empty() {
            slide_ids = container
                .list_files_with_prefix("ppt/slides/slide")
                .into_iter()
                .filter(|name| name.ends_with(".xml"))
                .collect();
            slide_ids.sort();
        }

        Ok(Self { slide_ids })
    }

    /// Number of slides.
    pub fn slide_count(&self) -> usize {
        self.slide_ids.len()
    }
}

fn parse_slide_list(xml: &str) -> Result<Vec<String>> {
    let mut reader = quick_xml::Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut ids = Vec::new();
    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Empty(e)) | Ok(Event::Start(e)) if e.name().as_ref() == b"p:sldId" => {
                if let Some(attr) = e
                    .attributes()
                    .flatten()
                    .find(|a| a.key.as_ref() == b"r:id")
                {
                    ids.push(String::from_utf8_lossy(&attr.value).to_string());
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(Error::XmlParse(e.to_string())),
            _ => {}
        }
        buf.clear();
    }
    Ok(ids)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Write};
    use zip::write::SimpleFileOptions;

    fn package(entries: &[(&str, &str)]) -> OoxmlContainer {
        let mut buffer = Vec::new();
        let mut zip = zip::ZipWriter::new(Cursor::new(&mut buffer));
        for (name, body) in entries {
            zip.start_file(*name, SimpleFileOptions::default()).unwrap();
            zip.write_all(body.as_bytes()).unwrap();
        }
        zip.finish().unwrap();
        OoxmlContainer::from_bytes(buffer).unwrap()
    }

    #[test]
    fn test_slide_list() {
        let container = package(&[(
            PRESENTATION_PART,
            r#"<p:presentation><p:sldIdLst><p:sldId id="256" r:id="rId2"/><p:sldId id="257" r:id="rId3"/></p:sldIdLst></p:presentation>"#,
        )]);
        let info = PresentationInfo::from_container(&container).unwrap();
        assert_eq!(info.slide_ids, vec!["rId2", "rId3"]);
        assert_eq!(info.slide_count(), 2);
    }

    #[test]
    fn test_fallback_to_slide_parts() {
        let container = package(&[
            (PRESENTATION_PART, "<p:presentation/>"),
            ("ppt/slides/slide1.xml", "<p:sld/>"),
            ("ppt/slides/_rels/slide1.xml.rels", "<Relationships/>"),
        ]);
        let info = PresentationInfo::from_container(&container).unwrap();
        assert_eq!(info.slide_count(), 1);
    }

    #[test]
    fn test_missing_presentation_part() {
        let container = package(&[("word/document.xml", "<w:document/>")]);
        assert!(matches!(
            PresentationInfo::from_container(&container),
            Err(Error::MissingComponent(_))
        ));
    }
}
